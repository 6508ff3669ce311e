//! Match play between two agents
//!
//! The demo loop consuming the solved tables: two [`Agent`]s alternate moves
//! on an [`Environment`](crate::environment::Environment) until the game is
//! decided, with [`MatchObserver`]s notified along the way.

pub mod observers;
pub mod runner;

pub use observers::{BoardPrinter, MoveCollector};
pub use runner::{MatchRecord, MatchRunner, MoveRecord};

pub use crate::ports::{Agent, MatchObserver};
