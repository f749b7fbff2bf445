//! Password digest schemes

use std::marker::PhantomData;
use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use md5::Md5;
use sha2::{Digest, Sha256};
use sd_shared::config::{AuthConfig, PasswordScheme};

use crate::errors::{DomainError, DomainResult};

/// Turns plaintext passwords into stored digests and checks candidates
pub trait PasswordHasher: Send + Sync {
    /// Short scheme name, used in logs
    fn scheme(&self) -> &'static str;

    /// Digest a plaintext password for storage
    fn hash(&self, plaintext: &str) -> DomainResult<String>;

    /// Check a candidate password against a stored digest
    ///
    /// The default re-hashes the candidate and compares both digests in
    /// constant time, which is correct for every deterministic scheme.
    fn verify(&self, plaintext: &str, digest: &str) -> DomainResult<bool> {
        let candidate = self.hash(plaintext)?;
        Ok(constant_time_eq(candidate.as_bytes(), digest.as_bytes()))
    }

    /// Whether `digest` has the shape this scheme produces
    fn recognizes(&self, _digest: &str) -> bool {
        true
    }

    /// Whether a digest that just verified should be replaced by a fresh
    /// `hash` of the same password
    fn needs_rehash(&self, _digest: &str) -> bool {
        false
    }
}

/// Applies digest `D` twice: `hex(D(hex(D(plaintext))))`
///
/// Unsalted, so identical passwords share a digest. Only kept so digests
/// written by the previous backend keep verifying; prefer [`BcryptHasher`].
pub struct DoubledDigestHasher<D> {
    name: &'static str,
    _digest: PhantomData<fn() -> D>,
}

/// The historical scheme of the sociald API
pub type DoubledMd5Hasher = DoubledDigestHasher<Md5>;

pub type DoubledSha256Hasher = DoubledDigestHasher<Sha256>;

impl DoubledMd5Hasher {
    pub fn new() -> Self {
        Self::named("legacy-md5")
    }
}

impl Default for DoubledMd5Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubledSha256Hasher {
    pub fn new() -> Self {
        Self::named("sha256")
    }
}

impl Default for DoubledSha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> DoubledDigestHasher<D> {
    fn named(name: &'static str) -> Self {
        Self {
            name,
            _digest: PhantomData,
        }
    }

    fn hex_digest(input: &[u8]) -> String {
        hex::encode(D::digest(input))
    }
}

impl<D: Digest> PasswordHasher for DoubledDigestHasher<D> {
    fn scheme(&self) -> &'static str {
        self.name
    }

    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        let first = Self::hex_digest(plaintext.as_bytes());
        Ok(Self::hex_digest(first.as_bytes()))
    }

    fn recognizes(&self, digest: &str) -> bool {
        digest.len() == <D as Digest>::output_size() * 2 && digest.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

/// bcrypt only reads this many bytes of a password
pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;

/// Salted, iterated bcrypt digests
///
/// Passwords longer than [`BCRYPT_MAX_PASSWORD_BYTES`] are refused rather
/// than silently truncated.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Creates a hasher with the given work factor (4..=31)
    pub fn new(cost: u32) -> DomainResult<Self> {
        if !(4..=31).contains(&cost) {
            return Err(DomainError::Validation {
                message: format!("bcrypt cost must be between 4 and 31, got {}", cost),
            });
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl PasswordHasher for BcryptHasher {
    fn scheme(&self) -> &'static str {
        "bcrypt"
    }

    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        if plaintext.len() > BCRYPT_MAX_PASSWORD_BYTES {
            return Err(DomainError::Validation {
                message: format!(
                    "password must not exceed {} bytes",
                    BCRYPT_MAX_PASSWORD_BYTES
                ),
            });
        }
        bcrypt::hash(plaintext, self.cost).map_err(|e| DomainError::Internal {
            message: format!("bcrypt hashing failed: {}", e),
        })
    }

    // Salted digests differ on every call, so the re-hash comparison of the
    // default implementation can never match.
    fn verify(&self, plaintext: &str, digest: &str) -> DomainResult<bool> {
        if plaintext.len() > BCRYPT_MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        match bcrypt::verify(plaintext, digest) {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::warn!(error = %e, "Stored digest is not a bcrypt hash");
                Ok(false)
            }
        }
    }

    fn recognizes(&self, digest: &str) -> bool {
        ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| digest.starts_with(prefix))
    }
}

/// Hashes with `current` while still accepting digests of `legacy`
///
/// A legacy digest that verifies is flagged by `needs_rehash`, so the
/// authority can store a `current` digest in its place on login.
pub struct UpgradingHasher {
    current: Arc<dyn PasswordHasher>,
    legacy: Arc<dyn PasswordHasher>,
}

impl UpgradingHasher {
    pub fn new(current: Arc<dyn PasswordHasher>, legacy: Arc<dyn PasswordHasher>) -> Self {
        Self { current, legacy }
    }
}

impl PasswordHasher for UpgradingHasher {
    fn scheme(&self) -> &'static str {
        self.current.scheme()
    }

    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        self.current.hash(plaintext)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> DomainResult<bool> {
        if self.current.recognizes(digest) {
            self.current.verify(plaintext, digest)
        } else if self.legacy.recognizes(digest) {
            self.legacy.verify(plaintext, digest)
        } else {
            Ok(false)
        }
    }

    fn recognizes(&self, digest: &str) -> bool {
        self.current.recognizes(digest) || self.legacy.recognizes(digest)
    }

    fn needs_rehash(&self, digest: &str) -> bool {
        !self.current.recognizes(digest) && self.legacy.recognizes(digest)
    }
}

/// Builds the hasher configured for `scheme`
pub fn hasher_for_scheme(
    scheme: PasswordScheme,
    bcrypt_cost: u32,
) -> DomainResult<Arc<dyn PasswordHasher>> {
    let hasher: Arc<dyn PasswordHasher> = match scheme {
        PasswordScheme::LegacyMd5 => Arc::new(DoubledMd5Hasher::new()),
        PasswordScheme::Sha256 => Arc::new(DoubledSha256Hasher::new()),
        PasswordScheme::Bcrypt => Arc::new(BcryptHasher::new(bcrypt_cost)?),
    };
    Ok(hasher)
}

/// Builds the hasher described by the auth configuration
///
/// With `upgrade_legacy_digests` set and a scheme other than the legacy one,
/// doubled-MD5 digests keep verifying and are upgraded on login.
pub fn hasher_for_config(auth: &AuthConfig) -> DomainResult<Arc<dyn PasswordHasher>> {
    let current = hasher_for_scheme(auth.password_scheme, auth.bcrypt_cost)?;
    if auth.upgrade_legacy_digests && auth.password_scheme != PasswordScheme::LegacyMd5 {
        return Ok(Arc::new(UpgradingHasher::new(
            current,
            Arc::new(DoubledMd5Hasher::new()),
        )));
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubled_md5_known_values() {
        let hasher = DoubledMd5Hasher::new();
        assert_eq!(
            hasher.hash("password").unwrap(),
            "696d29e0940a4957748fe3fc9efd22a3"
        );
        assert_eq!(
            hasher.hash("sociald").unwrap(),
            "9bba032c3fbe14ada86fe15098525781"
        );
        assert_eq!(hasher.hash("").unwrap(), "74be16979710d4c4e7c6647856088456");
    }

    #[test]
    fn test_doubled_sha256_known_value() {
        let hasher = DoubledSha256Hasher::new();
        assert_eq!(
            hasher.hash("password").unwrap(),
            "113459eb7bb31bddee85ade5230d6ad5d8b2fb52879e00a84ff6ae1067a210d3"
        );
    }

    #[test]
    fn test_deterministic_verify() {
        let hasher = DoubledMd5Hasher::new();
        let digest = hasher.hash("s3cret").unwrap();
        assert!(hasher.verify("s3cret", &digest).unwrap());
        assert!(!hasher.verify("s3cret ", &digest).unwrap());
        assert!(!hasher.verify("S3cret", &digest).unwrap());
        assert!(!hasher.verify("s3cret", "").unwrap());
    }

    #[test]
    fn test_scheme_names() {
        assert_eq!(DoubledMd5Hasher::new().scheme(), "legacy-md5");
        assert_eq!(DoubledSha256Hasher::new().scheme(), "sha256");
        assert_eq!(BcryptHasher::new(4).unwrap().scheme(), "bcrypt");
    }

    #[test]
    fn test_bcrypt_round_trip() {
        let hasher = BcryptHasher::new(4).unwrap();
        let digest = hasher.hash("s3cret").unwrap();
        assert!(digest.starts_with("$2"));
        assert_ne!(digest, hasher.hash("s3cret").unwrap());
        assert!(hasher.verify("s3cret", &digest).unwrap());
        assert!(!hasher.verify("wrong", &digest).unwrap());
    }

    #[test]
    fn test_bcrypt_rejects_foreign_digest() {
        let hasher = BcryptHasher::new(4).unwrap();
        let legacy = DoubledMd5Hasher::new().hash("s3cret").unwrap();
        assert!(!hasher.verify("s3cret", &legacy).unwrap());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        assert!(BcryptHasher::new(3).is_err());
        assert!(BcryptHasher::new(32).is_err());
        assert_eq!(BcryptHasher::new(10).unwrap().cost(), 10);
    }

    #[test]
    fn test_hasher_for_scheme() {
        let md5 = hasher_for_scheme(PasswordScheme::LegacyMd5, 12).unwrap();
        assert_eq!(md5.scheme(), "legacy-md5");

        let bcrypt = hasher_for_scheme(PasswordScheme::Bcrypt, 4).unwrap();
        assert_eq!(bcrypt.scheme(), "bcrypt");

        assert!(hasher_for_scheme(PasswordScheme::Bcrypt, 2).is_err());
    }

    #[test]
    fn test_recognizes_own_digests() {
        let md5 = DoubledMd5Hasher::new();
        let sha = DoubledSha256Hasher::new();
        let bcrypt = BcryptHasher::new(4).unwrap();

        let md5_digest = md5.hash("s3cret").unwrap();
        let bcrypt_digest = bcrypt.hash("s3cret").unwrap();

        assert!(md5.recognizes(&md5_digest));
        assert!(!sha.recognizes(&md5_digest));
        assert!(!md5.recognizes(&bcrypt_digest));
        assert!(bcrypt.recognizes(&bcrypt_digest));
        assert!(!bcrypt.recognizes(&md5_digest));
    }

    #[test]
    fn test_bcrypt_refuses_passwords_it_would_truncate() {
        let hasher = BcryptHasher::new(4).unwrap();
        let at_limit = "a".repeat(BCRYPT_MAX_PASSWORD_BYTES);
        let digest = hasher.hash(&at_limit).unwrap();
        assert!(hasher.verify(&at_limit, &digest).unwrap());

        let longer = format!("{}b", at_limit);
        assert!(matches!(
            hasher.hash(&longer),
            Err(DomainError::Validation { .. })
        ));
        // would match the truncated prefix otherwise
        assert!(!hasher.verify(&longer, &digest).unwrap());
    }

    #[test]
    fn test_upgrading_hasher_accepts_legacy_digests() {
        let hasher = UpgradingHasher::new(
            Arc::new(BcryptHasher::new(4).unwrap()),
            Arc::new(DoubledMd5Hasher::new()),
        );
        let legacy = "9bba032c3fbe14ada86fe15098525781";

        assert!(hasher.verify("sociald", legacy).unwrap());
        assert!(!hasher.verify("wrong", legacy).unwrap());
        assert!(hasher.needs_rehash(legacy));

        let fresh = hasher.hash("sociald").unwrap();
        assert!(fresh.starts_with("$2"));
        assert!(hasher.verify("sociald", &fresh).unwrap());
        assert!(!hasher.needs_rehash(&fresh));
        assert!(!hasher.verify("sociald", "not-a-digest").unwrap());
        assert_eq!(hasher.scheme(), "bcrypt");
    }

    #[test]
    fn test_hasher_for_config() {
        let mut auth = AuthConfig {
            password_scheme: PasswordScheme::Bcrypt,
            bcrypt_cost: 4,
            ..Default::default()
        };
        let upgrading = hasher_for_config(&auth).unwrap();
        assert!(upgrading.verify("sociald", "9bba032c3fbe14ada86fe15098525781").unwrap());

        auth.upgrade_legacy_digests = false;
        let strict = hasher_for_config(&auth).unwrap();
        assert!(!strict.verify("sociald", "9bba032c3fbe14ada86fe15098525781").unwrap());

        auth.password_scheme = PasswordScheme::LegacyMd5;
        auth.upgrade_legacy_digests = true;
        let legacy = hasher_for_config(&auth).unwrap();
        assert!(!legacy.needs_rehash("9bba032c3fbe14ada86fe15098525781"));
    }
}
