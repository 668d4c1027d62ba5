//! Networking modules for the identity provider and backend REST calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! `identity` wraps the external identity provider and `api` handles the
//! role-sync and admin endpoints. Wire schema lives in the `roles` crate.

pub mod api;
pub mod identity;
