//! Admin dashboard actions: list users and change a user's role.
//!
//! A successful update is followed by a fresh listing so the table shows the
//! backend's view; a failed update leaves the table alone and raises an
//! alert. The client does not re-check the caller's role, the backend
//! rejects non-admins.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::logging::warn;
use roles::{AdminActionError, Role};

use crate::net::api::AdminApi;
use crate::net::identity::IdentityProvider;
use crate::state::StateStore;
use crate::state::admin::AdminState;

async fn bearer_token<P>(provider: &P) -> Result<String, AdminActionError>
where
    P: IdentityProvider + ?Sized,
{
    provider
        .id_token()
        .await
        .map_err(|e| AdminActionError::Credential(e.to_string()))
}

/// Reload the user table.
pub async fn refresh_users<St, P, A>(admin: &St, provider: &P, api: &A)
where
    St: StateStore<AdminState>,
    P: IdentityProvider + ?Sized,
    A: AdminApi + ?Sized,
{
    admin.mutate(AdminState::begin_load);
    let result = match bearer_token(provider).await {
        Ok(token) => api.list_users(&token).await,
        Err(e) => Err(e),
    };
    if let Err(e) = &result {
        warn!("failed to fetch users: {e}");
    }
    admin.mutate(|s| s.finish_load(result));
}

/// Update one user's role, then reload the table.
///
/// Ignored while another update is in flight.
///
/// # Errors
///
/// Returns the failure that was also raised as the dashboard alert.
pub async fn change_user_role<St, P, A>(
    admin: &St,
    provider: &P,
    api: &A,
    uid: &str,
    role: Role,
) -> Result<(), AdminActionError>
where
    St: StateStore<AdminState>,
    P: IdentityProvider + ?Sized,
    A: AdminApi + ?Sized,
{
    if !admin.mutate(|s| s.begin_update(uid, role)).unwrap_or(false) {
        return Ok(());
    }
    let result = match bearer_token(provider).await {
        Ok(token) => api.update_user_role(&token, uid, role).await,
        Err(e) => Err(e),
    };
    let outcome = result.clone().map(|_| ());
    if let Err(e) = &outcome {
        warn!("failed to update role for {uid}: {e}");
    }
    admin.mutate(|s| s.finish_update(result));

    if outcome.is_ok() {
        refresh_users(admin, provider, api).await;
    }
    outcome
}
