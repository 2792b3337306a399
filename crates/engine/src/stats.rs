use serde::{Deserialize, Serialize};

/// Running counters for one simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    /// Accepted swap requests
    pub swaps: u32,
    /// Swaps undone because neither side matched
    pub reverts: u32,
    /// Normal tokens destroyed
    pub resolved: u32,
    pub obstacles_destroyed: u32,
    pub powerups_created: u32,
    pub powerups_activated: u32,
    /// Collapse, refill and rescan rounds
    pub cascade_passes: u32,
    pub shuffles: u32,
    /// Moves forced into place by the watchdog
    pub watchdog_snaps: u32,
}
