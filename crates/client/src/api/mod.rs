//! Typed surface over the REST resources.
//!
//! Thin wrappers around [`crate::ApiClient`]'s verb helpers; every call
//! goes through the session-aware pipeline, none of them special-case
//! authentication.

pub mod academia;
pub mod models;
pub mod usuarios;
