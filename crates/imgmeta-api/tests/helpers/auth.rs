//! Token fixtures signed with the fixed ES256 test key pair

use chrono::Utc;
use imgmeta_api::auth::Claims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

pub const ES256_PRIVATE: &[u8] = include_bytes!("../fixtures/es256_private.pem");
pub const ES256_PUBLIC: &[u8] = include_bytes!("../fixtures/es256_public.pem");
pub const ES256_OTHER_PRIVATE: &[u8] = include_bytes!("../fixtures/es256_other_private.pem");

fn claims(exp_offset_secs: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: Some("test-user".to_string()),
        email: Some("test@example.com".to_string()),
        exp: now + exp_offset_secs,
        iat: Some(now),
    }
}

fn sign_es256(private_key: &[u8], claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::ES256),
        claims,
        &EncodingKey::from_ec_pem(private_key).expect("test private key"),
    )
    .expect("sign test token")
}

/// `Authorization` header value for a token
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn valid_token() -> String {
    sign_es256(ES256_PRIVATE, &claims(3600))
}

pub fn expired_token() -> String {
    sign_es256(ES256_PRIVATE, &claims(-3600))
}

/// Correctly formed token signed by a key the service does not trust
pub fn foreign_token() -> String {
    sign_es256(ES256_OTHER_PRIVATE, &claims(3600))
}

/// HS256 token keyed with the service's public key (algorithm confusion attempt)
pub fn hs256_confusion_token() -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims(3600),
        &EncodingKey::from_secret(ES256_PUBLIC),
    )
    .expect("sign test token")
}
