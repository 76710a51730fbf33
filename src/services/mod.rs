//! Operations exposed to the host.
//!
//! ARCHITECTURE
//! ============
//! Each module owns one concern and takes `&AppState`. All of them lock the
//! registry for the whole operation; none of them await while holding it.

pub mod admission;
pub mod lookup;
pub mod messages;
pub mod reconcile;
pub mod refund;
pub mod scheduler;
pub mod selection;
pub mod session;
