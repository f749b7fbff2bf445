//! Domain entities representing user credentials and signed tokens.

pub mod token;
pub mod user;


// Re-export commonly used types
pub use token::{TokenPayload, DEFAULT_TOKEN_TTL_SECONDS, JWT_ISSUER, MAX_TOKEN_TTL_SECONDS};
pub use user::{UserRecord, ROLE_PERSON};
