//! Authentication configuration: token signing, password scheme and policy

use serde::{Deserialize, Serialize};

use super::{env_flag, env_parse};

/// Built-in development signing secret, refused in production
pub const DEFAULT_JWT_SECRET: &str = "development-secret-change-in-production";

/// Longest accepted token lifetime in seconds (one year)
pub const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 24 * 3600;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Process-wide secret used to sign and verify every token
    pub secret: String,

    /// Token lifetime in seconds
    pub token_ttl_seconds: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// HMAC algorithm for JWT signing (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            token_ttl_seconds: 3600, // 1 hour
            issuer: String::from("sociald"),
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set token lifetime in hours
    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_seconds = hours * 3600;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }

    fn overlay_env(mut self) -> Self {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.secret = secret;
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            self.issuer = issuer;
        }
        if let Ok(algorithm) = std::env::var("JWT_ALGORITHM") {
            self.algorithm = algorithm.to_uppercase();
        }
        if let Some(ttl) = env_parse("JWT_TTL_SECONDS") {
            self.token_ttl_seconds = ttl;
        }
        self
    }
}

/// Password digest scheme used for stored credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordScheme {
    /// MD5 applied twice, hex encoded. Kept for digests created by the
    /// previous backend.
    LegacyMd5,
    /// SHA-256 applied twice, hex encoded
    Sha256,
    /// Salted bcrypt
    Bcrypt,
}

impl Default for PasswordScheme {
    fn default() -> Self {
        PasswordScheme::LegacyMd5
    }
}

impl std::fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordScheme::LegacyMd5 => write!(f, "legacy-md5"),
            PasswordScheme::Sha256 => write!(f, "sha256"),
            PasswordScheme::Bcrypt => write!(f, "bcrypt"),
        }
    }
}

impl std::str::FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy-md5" | "md5" => Ok(PasswordScheme::LegacyMd5),
            "sha256" | "sha-256" => Ok(PasswordScheme::Sha256),
            "bcrypt" => Ok(PasswordScheme::Bcrypt),
            _ => Err(format!("Invalid password scheme: {}", s)),
        }
    }
}

/// Policy for randomly generated passwords
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PasswordPolicyConfig {
    /// Number of characters
    pub length: usize,
    /// Include digits
    pub numbers: bool,
    /// Include lower-case letters
    pub lowercase: bool,
    /// Include upper-case letters
    pub uppercase: bool,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            length: 10,
            numbers: true,
            lowercase: true,
            uppercase: true,
        }
    }
}

impl PasswordPolicyConfig {
    fn overlay_env(mut self) -> Self {
        if let Some(length) = env_parse("PASSWORD_LENGTH") {
            self.length = length;
        }
        if let Some(numbers) = env_flag("PASSWORD_NUMBERS") {
            self.numbers = numbers;
        }
        if let Some(lowercase) = env_flag("PASSWORD_LOWERCASE") {
            self.lowercase = lowercase;
        }
        if let Some(uppercase) = env_flag("PASSWORD_UPPERCASE") {
            self.uppercase = uppercase;
        }
        self
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Digest scheme for stored passwords
    #[serde(default)]
    pub password_scheme: PasswordScheme,

    /// bcrypt work factor, only read when the scheme is bcrypt
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Policy for passwords generated on reset
    #[serde(default)]
    pub password_policy: PasswordPolicyConfig,

    /// Keep accepting legacy doubled-MD5 digests under another scheme and
    /// replace them on the next successful login
    #[serde(default = "default_upgrade_legacy_digests")]
    pub upgrade_legacy_digests: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            password_scheme: PasswordScheme::default(),
            bcrypt_cost: default_bcrypt_cost(),
            password_policy: PasswordPolicyConfig::default(),
            upgrade_legacy_digests: default_upgrade_legacy_digests(),
        }
    }
}

impl AuthConfig {
    pub(crate) fn overlay_env(mut self) -> Self {
        self.jwt = self.jwt.overlay_env();
        self.password_policy = self.password_policy.overlay_env();
        if let Some(scheme) = env_parse("PASSWORD_SCHEME") {
            self.password_scheme = scheme;
        }
        if let Some(cost) = env_parse("BCRYPT_COST") {
            self.bcrypt_cost = cost;
        }
        if let Some(upgrade) = env_flag("PASSWORD_UPGRADE_LEGACY") {
            self.upgrade_legacy_digests = upgrade;
        }
        self
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_upgrade_legacy_digests() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_defaults() {
        let jwt = JwtConfig::default();
        assert!(jwt.is_using_default_secret());
        assert_eq!(jwt.algorithm, "HS256");
        assert_eq!(jwt.token_ttl_seconds, 3600);
    }

    #[test]
    fn test_ttl_hours() {
        let jwt = JwtConfig::new("secret").with_ttl_hours(8);
        assert_eq!(jwt.token_ttl_seconds, 8 * 3600);
        assert!(!jwt.is_using_default_secret());
    }

    #[test]
    fn test_password_scheme_parsing() {
        assert_eq!("md5".parse::<PasswordScheme>().unwrap(), PasswordScheme::LegacyMd5);
        assert_eq!("BCRYPT".parse::<PasswordScheme>().unwrap(), PasswordScheme::Bcrypt);
        assert_eq!("sha-256".parse::<PasswordScheme>().unwrap(), PasswordScheme::Sha256);
        assert!("scrypt".parse::<PasswordScheme>().is_err());
    }

    #[test]
    fn test_password_scheme_serialization() {
        let json = serde_json::to_string(&PasswordScheme::LegacyMd5).unwrap();
        assert_eq!(json, "\"legacy-md5\"");
        assert_eq!(PasswordScheme::Bcrypt.to_string(), "bcrypt");
    }

    #[test]
    fn test_auth_config_defaults_from_partial_json() {
        let json = r#"{"jwt":{"secret":"s","token_ttl_seconds":60,"issuer":"sociald"}}"#;
        let config: AuthConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.jwt.algorithm, "HS256");
        assert_eq!(config.password_scheme, PasswordScheme::LegacyMd5);
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.password_policy, PasswordPolicyConfig::default());
        assert!(config.upgrade_legacy_digests);
    }
}
