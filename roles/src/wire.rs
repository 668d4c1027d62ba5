//! Backend endpoints, payloads, and response interpretation.
//!
//! Transports (`gloo-net` in the browser, `reqwest` in the CLI) only move
//! bytes; they hand `(status, body)` to the `parse_*` helpers here, which
//! decide success, decode payloads, and validate role labels.

#[cfg(test)]
#[path = "wire_test.rs"]
mod wire_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Role, UnknownRole};

pub const SYNC_PATH: &str = "/api/auth/sync";
pub const ADMIN_USERS_PATH: &str = "/api/admin/users";
pub const HEALTH_PATH: &str = "/api/health";

/// Path for updating a single user's role. The uid is percent-encoded as one
/// path segment.
#[must_use]
pub fn user_role_path(uid: &str) -> String {
    format!("{ADMIN_USERS_PATH}/{}/role", urlencoding::encode(uid))
}

/// Join a configured base URL and an absolute API path.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// `Authorization` header value for a bearer credential.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[must_use]
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Optional body of `POST /api/auth/sync`.
///
/// The backend copies these onto the user record when the account is first
/// created; existing accounts ignore them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Body returned by `POST /api/auth/sync`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Role label as stored by the backend. Validated separately so an
    /// out-of-range label is reported as [`RoleSyncError::UnknownRole`].
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One row of `GET /api/admin/users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Raw stored label; accounts created outside the sync flow may carry
    /// labels the client does not recognise.
    #[serde(default)]
    pub role: Option<String>,
}

impl AdminUser {
    /// Stored role, if it is a member of the enumeration.
    #[must_use]
    pub fn known_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|label| label.parse().ok())
    }

    /// Best available name for display.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Body of `PUT /api/admin/users/{uid}/role`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// Body returned by `GET /api/health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub firebase_connected: bool,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Failure to obtain a role from the sync endpoint.
///
/// Every variant is recovered locally by falling back to
/// [`Role::least_privileged`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RoleSyncError {
    #[error("role sync request failed: {0}")]
    Transport(String),
    #[error("role sync timed out")]
    Timeout,
    #[error("role sync rejected with status {0}")]
    Status(u16),
    #[error("role sync response malformed: {0}")]
    Decode(String),
    #[error("role sync response carried no role")]
    MissingRole,
    #[error("role sync returned {0}")]
    UnknownRole(#[from] UnknownRole),
    #[error("no credential available: {0}")]
    Credential(String),
}

/// Failure of an admin user-management call. Surfaced to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdminActionError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("no credential available: {0}")]
    Credential(String),
}

// =============================================================================
// RESPONSE INTERPRETATION
// =============================================================================

/// Interpret a role sync response.
///
/// # Errors
///
/// Returns [`RoleSyncError`] for non-2xx statuses, undecodable bodies, and
/// missing or unknown role labels.
pub fn parse_sync_response(status: u16, body: &str) -> Result<Role, RoleSyncError> {
    if !is_success(status) {
        return Err(RoleSyncError::Status(status));
    }
    let payload: SyncResponse =
        serde_json::from_str(body).map_err(|e| RoleSyncError::Decode(e.to_string()))?;
    let label = payload.role.ok_or(RoleSyncError::MissingRole)?;
    Ok(label.parse::<Role>()?)
}

/// Interpret a user listing response.
///
/// # Errors
///
/// Returns [`AdminActionError`] for non-2xx statuses or undecodable bodies.
pub fn parse_admin_users(status: u16, body: &str) -> Result<Vec<AdminUser>, AdminActionError> {
    if !is_success(status) {
        return Err(AdminActionError::Status { status, message: error_message(body) });
    }
    serde_json::from_str(body).map_err(|e| AdminActionError::Decode(e.to_string()))
}

/// Interpret a role update response, returning the server's confirmation text.
///
/// # Errors
///
/// Returns [`AdminActionError::Status`] for non-2xx statuses.
pub fn parse_role_update(status: u16, body: &str) -> Result<String, AdminActionError> {
    if !is_success(status) {
        return Err(AdminActionError::Status { status, message: error_message(body) });
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(ToOwned::to_owned))
        .unwrap_or_else(|| "role updated".to_owned());
    Ok(message)
}

/// Interpret a health response.
///
/// # Errors
///
/// Returns [`AdminActionError`] for non-2xx statuses or undecodable bodies.
pub fn parse_health(status: u16, body: &str) -> Result<HealthStatus, AdminActionError> {
    if !is_success(status) {
        return Err(AdminActionError::Status { status, message: error_message(body) });
    }
    serde_json::from_str(body).map_err(|e| AdminActionError::Decode(e.to_string()))
}

/// Extract a readable message from a backend error body.
///
/// The backend answers `{ "error": ..., "message": ... }`; `message` wins when
/// both are present. Non-JSON bodies are returned trimmed.
#[must_use]
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_owned();
    };
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map_or_else(|| value.to_string(), ToOwned::to_owned)
}
