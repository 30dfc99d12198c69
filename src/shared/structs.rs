/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::time::Instant;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// Direction that brings a cabin at `from` closer to `to`.
    pub fn toward(from: i32, to: i32) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Idle
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Idle => "Idle",
        };
        f.pad(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    #[serde(rename = "stopped")]
    Stopped,
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "droppingPicking")]
    DroppingPicking,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Stopped => "Stopped",
            Status::Moving => "Moving",
            Status::DroppingPicking => "Dropping/Picking",
        };
        f.pad(name)
    }
}

/// A floor request as it enters the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorRequest {
    requested_floor: i32,
    requested_at: Instant,
}

impl ElevatorRequest {
    pub fn new(requested_floor: i32, requested_at: Instant) -> ElevatorRequest {
        ElevatorRequest {
            requested_floor,
            requested_at,
        }
    }

    pub fn requested_floor(&self) -> i32 {
        self.requested_floor
    }

    pub fn requested_at(&self) -> Instant {
        self.requested_at
    }
}

/// Point-in-time copy of one elevator, safe to hand across threads.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ElevatorSnapshot {
    pub id: usize,
    #[serde(rename = "currentFloor")]
    pub current_floor: i32,
    #[serde(rename = "targetFloor")]
    pub target_floor: Option<i32>,
    pub status: Status,
    pub direction: Direction,
    #[serde(rename = "pendingStops")]
    pub pending_stops: Vec<i32>,
}

impl ElevatorSnapshot {
    pub fn is_idle(&self) -> bool {
        self.status == Status::Stopped
    }
}
