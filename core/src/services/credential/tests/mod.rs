//! Tests for the credential authority
