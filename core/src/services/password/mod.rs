//! Password handling module
//!
//! This module covers the two password concerns of the credential authority:
//! - Digesting and verifying passwords (`PasswordHasher` and its schemes)
//! - Generating random passwords from a `PasswordPolicy`

mod generator;
mod hasher;

pub use generator::{PasswordGenerator, PasswordPolicy, MAX_GENERATED_LENGTH};
pub use hasher::{
    hasher_for_config, hasher_for_scheme, BcryptHasher, DoubledDigestHasher, DoubledMd5Hasher,
    DoubledSha256Hasher, PasswordHasher, UpgradingHasher, BCRYPT_MAX_PASSWORD_BYTES,
};
