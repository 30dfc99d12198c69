pub mod coordinator;

pub use coordinator::{Assignment, Coordinator, Dispatch};
