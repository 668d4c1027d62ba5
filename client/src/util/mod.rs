//! Route table and access-decision helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure functions over the session snapshot, kept free of signals so routing
//! decisions are testable without a reactive runtime.

pub mod guard;
pub mod routes;
