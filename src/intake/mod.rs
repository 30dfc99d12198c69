pub mod intake;
mod intake_tests;

pub use intake::{RequestIntake, Submission};
