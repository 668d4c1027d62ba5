//! Async orchestration between the providers in `net` and the state models.
//!
//! ARCHITECTURE
//! ============
//! Services are generic over the `net` traits and the `StateStore` seam so
//! the same code drives `RwSignal` contexts in the browser and plain cells in
//! tests.

pub mod admin;
pub mod session;
