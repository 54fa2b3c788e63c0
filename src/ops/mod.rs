pub mod filter;
pub mod pending;
pub mod reorder;
pub mod session;
pub mod task_ops;

pub use filter::{ListView, TaskRow};
pub use session::{Renderer, Session, SessionSettings, ViewBuffer, Warning};
pub use task_ops::{InsertPosition, Outcome, PersistenceWarning, TaskStore, ValidationError};
