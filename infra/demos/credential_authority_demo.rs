//! Credential authority walkthrough
//!
//! Enrolls a user, logs in, verifies the token and resets the password
//! against the store selected by `USER_STORE` (in-memory by default).
//!
//! Run with: `cargo run -p sd_infra --example credential_authority_demo`

use anyhow::Context;
use sd_core::ROLE_PERSON;
use sd_infra::{build_authority, build_user_store, load_config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config();
    telemetry::init_tracing(&config.logging)?;

    let store = build_user_store(&config).await?;
    let authority = build_authority(&config, store)?;

    let username = format!("demo-{}@example.com", uuid::Uuid::new_v4().simple());
    let user = authority
        .enroll(&username, "initial-password", ROLE_PERSON, None)
        .await
        .context("enroll failed")?;
    tracing::info!(user_id = %user.id, "Enrolled demo user");

    let verified = authority
        .verify_credentials(&username, "initial-password")
        .await
        .context("login failed")?;
    let token = authority.issue_token(&verified)?;
    let payload = authority.verify_token(&token)?;
    tracing::info!(sub = %payload.subject_id, expires_at = ?payload.expires_at(), "Token verified");

    let generated = authority.reset_password(&username).await?;
    authority
        .verify_credentials(&username, &generated)
        .await
        .context("login with the generated password failed")?;
    tracing::info!("Password reset and verified");

    Ok(())
}
