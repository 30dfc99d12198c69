/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::debug;
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::Result;
use crate::fleet::Fleet;
use crate::shared::{ElevatorRequest, ElevatorSnapshot};

/***************************************/
/*               Enums                 */
/***************************************/
/// Result of trying to hand a request to an elevator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The stop was added to this elevator.
    Assigned(usize),
    /// The chosen elevator is already on the requested floor; nothing to do.
    AlreadyThere(usize),
    /// The floor is outside the building. Dropped without an error.
    Rejected,
}

/// Assigns requests to elevators.
pub trait Dispatch: Send + Sync {
    fn assign(&self, request: ElevatorRequest) -> Result<Assignment>;
}

/***************************************/
/*             Public API              */
/***************************************/
/**
 * Greedy nearest-elevator dispatcher.
 *
 * Idle elevators are preferred so that no running route gets longer than it
 * has to. When every elevator is busy the request piggy-backs on the closest
 * one regardless of status. Ties go to the lowest id.
 */
pub struct Coordinator {
    fleet: Arc<Fleet>,
    max_floor: i32,
}

impl Coordinator {
    pub fn new(fleet: Arc<Fleet>, max_floor: i32) -> Coordinator {
        Coordinator { fleet, max_floor }
    }

    fn in_range(&self, floor: i32) -> bool {
        (0..=self.max_floor).contains(&floor)
    }
}

impl Dispatch for Coordinator {
    fn assign(&self, request: ElevatorRequest) -> Result<Assignment> {
        let floor = request.requested_floor();
        if !self.in_range(floor) {
            debug!(
                "Request for floor {} ignored, floors are 0..={}",
                floor, self.max_floor
            );
            return Ok(Assignment::Rejected);
        }

        let elevators = self.fleet.snapshots()?;
        let chosen = closest(elevators.iter().filter(|e| e.is_idle()), floor)
            .or_else(|| closest(elevators.iter(), floor));
        let Some(chosen) = chosen else {
            return Ok(Assignment::Rejected);
        };

        if chosen.current_floor == floor || !self.fleet.dispatch(chosen.id, request)? {
            debug!("Elevator {} is already at floor {}", chosen.id, floor);
            return Ok(Assignment::AlreadyThere(chosen.id));
        }

        crate::event!("Elevator {} assigned to floor {}", chosen.id, floor);
        Ok(Assignment::Assigned(chosen.id))
    }
}

fn closest<'a>(
    elevators: impl Iterator<Item = &'a ElevatorSnapshot>,
    floor: i32,
) -> Option<&'a ElevatorSnapshot> {
    elevators.min_by_key(|e| (e.current_floor - floor).abs())
}
