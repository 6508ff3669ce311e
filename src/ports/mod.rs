//! Ports (trait boundaries) for external dependencies.
//!
//! The solvers only produce tables; storing them, choosing moves from them and
//! watching a match are owned by these traits and implemented elsewhere
//! (`adapters` for storage, `agents` for move selection).

pub mod agent;
pub mod observer;
pub mod repository;

pub use agent::{Agent, Observation};
pub use observer::MatchObserver;
pub use repository::TableRepository;
