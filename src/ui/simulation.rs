/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use rand::Rng;
use std::io::Write;
use std::thread;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::Result;
use crate::system::ElevatorSystem;
use crate::ui::grid::StatusGrid;

/// `count` floors drawn uniformly from `1..=n_floors`.
pub fn random_floors(rng: &mut impl Rng, n_floors: i32, count: usize) -> Vec<i32> {
    (0..count).map(|_| rng.gen_range(1..=n_floors)).collect()
}

/// One summary line for a burst of requests, `None` for an empty burst.
pub fn describe_floors(floors: &[i32]) -> Option<String> {
    match floors {
        [] => None,
        [floor] => Some(format!("Request for floor {} has been received.", floor)),
        [first, second] => Some(format!(
            "Requests for floors {} and {} have been received.",
            first, second
        )),
        [all_but_last @ .., last] => {
            let listed: Vec<String> = all_but_last.iter().map(|f| f.to_string()).collect();
            Some(format!(
                "Requests for floors {}, and {} have been received.",
                listed.join(", "),
                last
            ))
        }
    }
}

/**
 * Automated run: submits a burst of requests at once, then redraws the
 * status grid every `refresh` until the system is settled, and once more
 * after that.
 */
pub struct Simulation<'a> {
    system: &'a ElevatorSystem,
    refresh: Duration,
}

impl<'a> Simulation<'a> {
    pub fn new(system: &'a ElevatorSystem, refresh: Duration) -> Self {
        Simulation { system, refresh }
    }

    pub fn run<W: Write>(&self, floors: &[i32], out: &mut W) -> Result<()> {
        if let Some(summary) = describe_floors(floors) {
            writeln!(out, "{}", summary)?;
        }
        info!("Simulating {} request(s)", floors.len());

        for &floor in floors {
            // Failures are logged by the intake, the burst goes on
            if let Err(e) = self.system.submit(floor) {
                debug!("Simulated request for floor {} dropped: {}", floor, e);
            }
        }

        let mut grid = StatusGrid::new(out);
        while !self.system.is_settled()? {
            grid.render(&self.system.list_elevators()?)?;
            thread::sleep(self.refresh);
        }
        grid.render(&self.system.list_elevators()?)?;
        info!("Simulation finished");
        Ok(())
    }
}
