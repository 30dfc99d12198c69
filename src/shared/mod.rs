pub mod macros;
pub mod structs;

pub use structs::Direction;
pub use structs::ElevatorRequest;
pub use structs::ElevatorSnapshot;
pub use structs::Status;
