//! Shared role model and backend wire schema.
//!
//! This crate owns the closed [`Role`] enumeration and the HTTP payloads
//! exchanged with the clinical backend. Both the Leptos `client` and the
//! `cli` tool interpret backend responses through the helpers in [`wire`], so
//! the fallback and validation rules live in exactly one place.

#[cfg(test)]
#[path = "lib_test.rs"]
mod lib_test;

pub mod wire;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use wire::{AdminActionError, RoleSyncError};

/// Backend used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Upper bound for any single backend request, in milliseconds.
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

/// Access role assigned to a user by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Default role for every newly synced account.
    Patient,
    Doctor,
    Assistant,
    /// Full access, including user role management.
    SuperAdmin,
}

impl Role {
    /// Every role, least privileged first.
    pub const ALL: [Role; 4] = [Role::Patient, Role::Assistant, Role::Doctor, Role::SuperAdmin];

    /// Role used whenever the backend cannot provide a valid answer.
    #[must_use]
    pub const fn least_privileged() -> Self {
        Self::Patient
    }

    /// Wire label, e.g. `"SUPER_ADMIN"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "PATIENT",
            Self::Doctor => "DOCTOR",
            Self::Assistant => "ASSISTANT",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Human-readable label for UI display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Assistant => "Assistant",
            Self::SuperAdmin => "Super Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role label outside the closed enumeration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| UnknownRole(value.to_owned()))
    }
}
