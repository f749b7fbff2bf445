//! Business services containing the credential logic.

pub mod credential;
pub mod password;

// Re-export commonly used types
pub use credential::{CredentialAuthority, CredentialAuthorityConfig};
pub use password::{
    hasher_for_config, hasher_for_scheme, BcryptHasher, DoubledMd5Hasher, DoubledSha256Hasher,
    PasswordGenerator, PasswordHasher, PasswordPolicy, UpgradingHasher,
};
