//! Value Object Module

pub mod email;
pub mod profile;
pub mod user_name;
pub mod user_password;
