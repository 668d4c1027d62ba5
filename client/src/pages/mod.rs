//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Public pages (home, login, unauthorized) render for anyone. Clinical and
//! admin pages assume the route wrapper already checked the role.

pub mod admin;
pub mod clinical;
pub mod home;
pub mod login;
pub mod not_found;
pub mod unauthorized;
