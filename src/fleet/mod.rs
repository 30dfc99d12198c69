pub mod fleet;
pub mod registry;

pub use fleet::Fleet;
pub use registry::{ElevatorRegistry, ElevatorRepository};
