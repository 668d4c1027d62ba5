//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session context to decide what may render: the gate
//! waits for the first resolution, the route wrapper enforces role policies.

pub mod protected_route;
pub mod session_gate;
