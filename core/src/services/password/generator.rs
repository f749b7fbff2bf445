//! Random password generation

use rand::seq::SliceRandom;
use rand::Rng;
use sd_shared::config::PasswordPolicyConfig;

use crate::errors::{DomainError, DomainResult};

/// Upper bound on generated password length
pub const MAX_GENERATED_LENGTH: usize = 128;

const DIGITS: &[u8] = b"0123456789";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length and character classes of generated passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub length: usize,
    pub numbers: bool,
    pub lowercase: bool,
    pub uppercase: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::from(&PasswordPolicyConfig::default())
    }
}

impl From<&PasswordPolicyConfig> for PasswordPolicy {
    fn from(config: &PasswordPolicyConfig) -> Self {
        Self {
            length: config.length,
            numbers: config.numbers,
            lowercase: config.lowercase,
            uppercase: config.uppercase,
        }
    }
}

impl PasswordPolicy {
    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (self.numbers, DIGITS),
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
        ]
        .into_iter()
        .filter_map(|(enabled, class)| enabled.then_some(class))
        .collect()
    }

    /// Checks that `password` has the policy's length, uses only enabled
    /// classes and contains at least one character of each of them
    pub fn is_satisfied_by(&self, password: &str) -> bool {
        if password.len() != self.length || password.chars().count() != self.length {
            return false;
        }
        let classes = self.classes();
        let bytes = password.as_bytes();

        bytes.iter().all(|b| classes.iter().any(|class| class.contains(b)))
            && classes
                .iter()
                .all(|class| bytes.iter().any(|b| class.contains(b)))
    }
}

/// Generates random passwords satisfying a validated policy
#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    policy: PasswordPolicy,
    classes: Vec<&'static [u8]>,
    alphabet: Vec<u8>,
}

impl PasswordGenerator {
    /// Creates a generator after validating `policy`
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` when no class is enabled, or the length
    /// cannot hold one character of each enabled class, or it exceeds
    /// [`MAX_GENERATED_LENGTH`].
    pub fn new(policy: PasswordPolicy) -> DomainResult<Self> {
        let classes = policy.classes();
        if classes.is_empty() {
            return Err(DomainError::Validation {
                message: "password policy must enable at least one character class".to_string(),
            });
        }
        if policy.length < classes.len() || policy.length > MAX_GENERATED_LENGTH {
            return Err(DomainError::Validation {
                message: format!(
                    "password length must be between {} and {}, got {}",
                    classes.len(),
                    MAX_GENERATED_LENGTH,
                    policy.length
                ),
            });
        }

        let alphabet = classes.concat();
        Ok(Self {
            policy,
            classes,
            alphabet,
        })
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Generates one password from the thread-local CSPRNG
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();

        // one guaranteed character per enabled class, the rest from the union
        let mut chars: Vec<u8> = self
            .classes
            .iter()
            .map(|class| class[rng.gen_range(0..class.len())])
            .collect();
        while chars.len() < self.policy.length {
            chars.push(self.alphabet[rng.gen_range(0..self.alphabet.len())]);
        }
        chars.shuffle(&mut rng);

        chars.into_iter().map(char::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(length: usize, numbers: bool, lowercase: bool, uppercase: bool) -> PasswordPolicy {
        PasswordPolicy {
            length,
            numbers,
            lowercase,
            uppercase,
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = PasswordPolicy::default();
        assert_eq!(policy.length, 10);
        assert!(policy.numbers && policy.lowercase && policy.uppercase);
    }

    #[test]
    fn test_generated_passwords_satisfy_policy() {
        let generator = PasswordGenerator::new(PasswordPolicy::default()).unwrap();
        for _ in 0..100 {
            let password = generator.generate();
            assert_eq!(password.len(), 10);
            assert!(generator.policy().is_satisfied_by(&password), "{}", password);
            assert!(password.chars().any(|c| c.is_ascii_digit()));
            assert!(password.chars().any(|c| c.is_ascii_lowercase()));
            assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_single_class_policy() {
        let generator = PasswordGenerator::new(policy(16, true, false, false)).unwrap();
        for _ in 0..100 {
            let password = generator.generate();
            assert_eq!(password.len(), 16);
            assert!(password.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_minimum_length_holds_every_class() {
        let generator = PasswordGenerator::new(policy(3, true, true, true)).unwrap();
        for _ in 0..100 {
            assert!(generator.policy().is_satisfied_by(&generator.generate()));
        }
    }

    #[test]
    fn test_invalid_policies() {
        assert!(PasswordGenerator::new(policy(10, false, false, false)).is_err());
        assert!(PasswordGenerator::new(policy(2, true, true, true)).is_err());
        assert!(PasswordGenerator::new(policy(0, true, false, false)).is_err());
        assert!(PasswordGenerator::new(policy(MAX_GENERATED_LENGTH + 1, true, true, true)).is_err());
    }

    #[test]
    fn test_is_satisfied_by() {
        let p = policy(4, true, true, false);
        assert!(p.is_satisfied_by("a1b2"));
        assert!(!p.is_satisfied_by("abcd"));
        assert!(!p.is_satisfied_by("a1B2"));
        assert!(!p.is_satisfied_by("a1b"));
    }

    #[test]
    fn test_passwords_differ() {
        let generator = PasswordGenerator::new(policy(24, true, true, true)).unwrap();
        assert_ne!(generator.generate(), generator.generate());
    }
}
