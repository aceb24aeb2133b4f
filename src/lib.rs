//! Tasklist: an embedded task lifecycle and persistence engine.
//!
//! Tasks are short text records stored in a single SQLite file. Each task is
//! pending until completed, can be soft-deleted (hidden but kept) or
//! hard-deleted, and everything can be purged on explicit confirmation.
//!
//! # Example
//!
//! ```no_run
//! use tasklist::{Store, StoreQueryExt};
//!
//! let mut store = Store::open("tasks.db").unwrap();
//!
//! store.add("Buy milk").unwrap();
//! store.add("Buy milk").unwrap();
//! store.add("Walk dog").unwrap();
//!
//! // The oldest matching pending task is completed first
//! store.complete("Buy milk").unwrap();
//! assert_eq!(store.list_pending().unwrap(), vec!["Buy milk", "Walk dog"]);
//!
//! // "Nothing to do" is an ordinary result, not an error
//! let outcome = store.remove("Feed cat").unwrap();
//! assert_eq!(outcome.to_string(), "No pending task found to remove.");
//!
//! let hits = store.search("walk").execute().unwrap();
//! assert_eq!(hits, vec!["Walk dog"]);
//!
//! store.close().unwrap();
//! ```

mod normalize;
mod storage;
mod store;
mod types;

pub mod query;
pub mod vacuum;

// Re-export public API
pub use normalize::{DEFAULT_MAX_LENGTH, normalize};
pub use query::{Search, StoreQueryExt};
pub use store::{Store, StoreConfig, StoreError};
pub use types::{Action, MatchMode, Outcome, Task, TaskCounts, TaskState};
pub use vacuum::VacuumResult;
