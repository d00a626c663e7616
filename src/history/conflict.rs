use super::block::Tick;
use std::fmt;

/// Which operation ran into the conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// Allocation at an address that already holds a live block
    Allocation,
    /// Free of an address with no live block
    Free,
}

/// A double-allocation or free-of-unknown-address anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub tick: Tick,
    pub address: u64,
    pub kind: ConflictKind,
}

impl Conflict {
    pub fn is_allocation_conflict(&self) -> bool {
        self.kind == ConflictKind::Allocation
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Allocation => write!(f, "double allocation"),
            ConflictKind::Free => write!(f, "free of unknown address"),
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at 0x{:x} (tick {})", self.kind, self.address, self.tick)
    }
}
