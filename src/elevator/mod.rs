pub mod fsm;
pub mod movement;

pub use fsm::{Action, Elevator, State};
pub use movement::{DriveReport, MoveOutcome, MovementDriver};
