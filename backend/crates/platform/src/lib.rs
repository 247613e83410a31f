//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, Base64, secure random keys)
//! - Password hashing (Argon2id, NIST SP 800-63B length rules)
//! - Bearer token extraction from the `Authorization` header

pub mod bearer;
pub mod crypto;
pub mod password;
