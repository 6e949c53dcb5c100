//! Caller authentication
//!
//! Every image route runs [`middleware::auth_middleware`] first. It verifies the bearer
//! token with [`jwt::TokenVerifier`] and stores the resulting [`models::Caller`] in the
//! request extensions.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::TokenVerifier;
pub use models::{Caller, Claims};
