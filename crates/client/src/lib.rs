//! Async client SDK for the Discipulado course-administration API.
//!
//! The interesting part lives in [`ApiClient`]: bearer credentials are
//! attached from an injected [`CredentialStore`], an expired access
//! credential is renewed through a single-flight refresh exchange with the
//! failed request replayed underneath the caller, and a terminally lost
//! session escalates to a session-expired callback so the consuming UI can
//! route back to its login entry point.

pub mod api;
mod claims;
mod client;
mod config;
mod error;
mod store;

pub use claims::{IdentityClaims, decode_identity};
pub use client::{ApiClient, SessionExpiredHandler};
pub use config::ApiConfig;
pub use error::ApiError;
pub use store::{CredentialKind, CredentialStore, FileCredentialStore, MemoryCredentialStore};
