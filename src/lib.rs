/***************************************/
/*               Modules               */
/***************************************/
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod elevator;
pub mod error;
pub mod fleet;
pub mod intake;
pub mod logging;
pub mod shared;
pub mod system;
pub mod ui;

pub use error::{Error, Result};
pub use system::ElevatorSystem;
