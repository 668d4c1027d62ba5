//! User-management state for the admin dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Holds the last fetched user list plus the in-flight/alert status of role
//! updates. A failed update never touches `users`, so the table keeps showing
//! the previous role next to the visible alert.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use roles::wire::AdminUser;
use roles::{AdminActionError, Role};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminState {
    /// Users as last returned by the backend.
    pub users: Vec<AdminUser>,
    /// True while a list request is in flight.
    pub loading: bool,
    /// User whose role update is in flight.
    pub pending_uid: Option<String>,
    /// Role requested by the in-flight update.
    pub pending_role: Option<Role>,
    /// Visible failure message.
    pub alert: Option<String>,
    /// Confirmation from the last successful update.
    pub status: Option<String>,
}

impl AdminState {
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Replace the user list, or raise an alert and keep the old one.
    pub fn finish_load(&mut self, result: Result<Vec<AdminUser>, AdminActionError>) {
        self.loading = false;
        match result {
            Ok(users) => self.users = users,
            Err(e) => self.alert = Some(format!("Failed to load users: {e}")),
        }
    }

    /// Mark `uid` as updating to `role`. Only one update runs at a time.
    pub fn begin_update(&mut self, uid: &str, role: Role) -> bool {
        if self.pending_uid.is_some() {
            return false;
        }
        self.pending_uid = Some(uid.to_owned());
        self.pending_role = Some(role);
        self.alert = None;
        self.status = None;
        true
    }

    pub fn finish_update(&mut self, result: Result<String, AdminActionError>) {
        self.pending_uid = None;
        self.pending_role = None;
        match result {
            Ok(message) => self.status = Some(message),
            Err(e) => self.alert = Some(format!("Failed to update role: {e}")),
        }
    }

    /// Role the selector for `uid` shows: the requested role while its update
    /// is in flight, otherwise the stored role. A failed update therefore
    /// snaps the selector back.
    #[must_use]
    pub fn selected_role(&self, uid: &str) -> Option<Role> {
        if self.is_pending(uid) {
            return self.pending_role;
        }
        self.users.iter().find(|user| user.uid == uid).and_then(AdminUser::known_role)
    }

    #[must_use]
    pub fn is_pending(&self, uid: &str) -> bool {
        self.pending_uid.as_deref() == Some(uid)
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
