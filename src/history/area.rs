use super::block::Tick;
use crate::constants::TICK_HEADROOM;

/// Running bounding box of every recorded block in address and time
///
/// The box only ever grows. `maximum_tick` is kept ahead of the current
/// tick by [`TICK_HEADROOM`] so consumers have room past the last event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalArea {
    pub minimum_address: u64,
    pub maximum_address: u64,
    pub minimum_tick: u64,
    pub maximum_tick: u64,
}

impl GlobalArea {
    /// An empty area: no addresses seen, time axis `[0, 1]`
    pub fn new() -> Self {
        GlobalArea {
            minimum_address: u64::MAX,
            maximum_address: 0,
            minimum_tick: 0,
            maximum_tick: 1,
        }
    }

    /// True until the first block has been recorded
    pub fn is_empty(&self) -> bool {
        self.minimum_address > self.maximum_address
    }

    /// Grow to cover a block of `size` bytes at `address`
    pub fn include_block(&mut self, address: u64, size: u64) {
        self.maximum_address = self.maximum_address.max(address.saturating_add(size));
        self.minimum_address = self.minimum_address.min(address);
    }

    /// Grow the time axis to `tick` plus headroom
    pub fn extend_to_tick(&mut self, tick: Tick) {
        let padded = (f64::from(tick) * TICK_HEADROOM + 1.0) as u64;
        self.maximum_tick = self.maximum_tick.max(padded);
    }
}

impl Default for GlobalArea {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_area_is_empty() {
        let area = GlobalArea::new();
        assert!(area.is_empty());
        assert_eq!(area.maximum_tick, 1);
    }

    #[test]
    fn test_include_block_grows_both_ends() {
        let mut area = GlobalArea::new();
        area.include_block(0x2000, 0x100);
        area.include_block(0x1000, 0x10);

        assert!(!area.is_empty());
        assert_eq!(area.minimum_address, 0x1000);
        assert_eq!(area.maximum_address, 0x2100);
    }

    #[test]
    fn test_tick_headroom() {
        let mut area = GlobalArea::new();
        area.extend_to_tick(100);
        assert_eq!(area.maximum_tick, 106);
        area.extend_to_tick(1);
        assert_eq!(area.maximum_tick, 106);
        area.extend_to_tick(u32::MAX - 1);
        assert!(area.maximum_tick > u64::from(u32::MAX - 1));
    }
}
