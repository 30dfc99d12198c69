/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result`, or logs the error and terminates the process.
/// Only meant for the binary's start-up path.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr, $context:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("{}: {}", $context, e);
                eprintln!("ERROR: {}: {}", $context, e);
                std::process::exit(1);
            }
        }
    };
}

/// Logs a simulation event (request received, elevator assigned, arrival)
/// on the `elevator_sim::event` target, so it can be filtered on its own.
#[macro_export]
macro_rules! event {
    ($($arg:tt)+) => {
        log::info!(target: "elevator_sim::event", $($arg)+)
    };
}
