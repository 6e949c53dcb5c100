//! Bearer token verification against a single configured public key
//!
//! Only the configured asymmetric algorithm is accepted. A token whose header names any
//! other algorithm is rejected before signature checks, so an HMAC token keyed with the
//! public key can never pass.

use crate::auth::models::Claims;
use imgmeta_core::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use std::str::FromStr;

const BEARER_PREFIX: &str = "Bearer ";

pub struct TokenVerifier {
    key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Build a verifier from a PEM public key and an algorithm name such as `RS256`.
    pub fn from_pem(public_key_pem: &[u8], algorithm: &str) -> Result<Self, AppError> {
        let algorithm = Algorithm::from_str(&algorithm.trim().to_uppercase()).map_err(|_| {
            AppError::InvalidInput(format!("Unsupported JWT algorithm: {}", algorithm))
        })?;

        let key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(public_key_pem),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(public_key_pem),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(public_key_pem),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                return Err(AppError::InvalidInput(format!(
                    "{:?} is symmetric; a public key algorithm is required",
                    algorithm
                )));
            }
        }
        .map_err(|e| AppError::InvalidInput(format!("Invalid public key for {:?}: {}", algorithm, e)))?;

        let mut validation = Validation::new(algorithm);
        validation.algorithms = vec![algorithm];
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Ok(Self {
            key,
            algorithm,
            validation,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Verify the value of an `Authorization` header.
    ///
    /// Missing header or a value without the `Bearer ` prefix is `Unauthenticated`;
    /// every verification failure after that is `Forbidden`.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Claims, AppError> {
        let token = bearer_token(authorization)?;
        self.verify(token)
    }

    /// Verify a raw token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let header = decode_header(token)
            .map_err(|e| AppError::Forbidden(format!("Malformed token: {}", e)))?;

        if header.alg != self.algorithm {
            tracing::warn!(
                token_alg = ?header.alg,
                expected_alg = ?self.algorithm,
                "Rejected token signed with unexpected algorithm"
            );
            return Err(AppError::Forbidden(format!(
                "Token algorithm {:?} is not accepted",
                header.alg
            )));
        }

        let token_data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Forbidden("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                    AppError::Forbidden("Token is not yet valid (nbf)".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::Forbidden("Invalid token signature".to_string())
                }
                _ => AppError::Forbidden(format!("Invalid token: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Strip the `Bearer ` prefix from an `Authorization` header value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AppError> {
    let header = authorization
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or_else(|| {
            AppError::Unauthenticated("Invalid authorization header format".to_string())
        })?;

    if token.is_empty() {
        return Err(AppError::Unauthenticated(
            "Invalid authorization header format".to_string(),
        ));
    }

    Ok(token)
}
