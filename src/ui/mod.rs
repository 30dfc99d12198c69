pub mod grid;
pub mod menu;
pub mod simulation;

pub use grid::StatusGrid;
pub use menu::ConsoleMenu;
pub use simulation::{describe_floors, random_floors, Simulation};
