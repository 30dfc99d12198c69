/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::Result;
use crate::fleet::Fleet;
use crate::shared::ElevatorSnapshot;

/// Read-only queries over the fleet.
pub trait ElevatorRepository: Send + Sync {
    fn all_elevators(&self) -> Result<Vec<ElevatorSnapshot>>;

    /// `Ok(None)` when no elevator has that id.
    fn elevator_by_id(&self, id: usize) -> Result<Option<ElevatorSnapshot>>;

    /// True iff at least one elevator is `Stopped`.
    fn is_any_idle(&self) -> Result<bool>;
}

/// Live view of a [`Fleet`]. Every call reads the current state, nothing is
/// cached.
#[derive(Clone)]
pub struct ElevatorRegistry {
    fleet: Arc<Fleet>,
}

impl ElevatorRegistry {
    pub fn new(fleet: Arc<Fleet>) -> ElevatorRegistry {
        ElevatorRegistry { fleet }
    }
}

impl ElevatorRepository for ElevatorRegistry {
    fn all_elevators(&self) -> Result<Vec<ElevatorSnapshot>> {
        self.fleet.snapshots()
    }

    fn elevator_by_id(&self, id: usize) -> Result<Option<ElevatorSnapshot>> {
        self.fleet.snapshot(id)
    }

    fn is_any_idle(&self) -> Result<bool> {
        self.fleet.is_any_idle()
    }
}
