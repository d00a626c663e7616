/// Address ranges that restrict which heap events get recorded
///
/// An empty set admits every address. Once any range exists, only addresses
/// inside at least one range (bounds inclusive) are admitted.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    ranges: Vec<(u64, u64)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, low: u64, high: u64) {
        self.ranges.push((low, high));
    }

    /// Whether an event at `address` should be dropped
    pub fn excludes(&self, address: u64) -> bool {
        !self.is_empty()
            && !self
                .ranges
                .iter()
                .any(|&(low, high)| address >= low && address <= high)
    }

    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_admits_everything() {
        let filter = FilterSet::new();
        assert!(filter.is_empty());
        assert!(!filter.excludes(0));
        assert!(!filter.excludes(u64::MAX));
    }

    #[test]
    fn test_ranges_are_inclusive_and_unioned() {
        let mut filter = FilterSet::new();
        filter.add(0x1000, 0x1FFF);
        filter.add(0x8000, 0x8000);

        assert!(!filter.excludes(0x1000));
        assert!(!filter.excludes(0x1FFF));
        assert!(!filter.excludes(0x8000));
        assert!(filter.excludes(0x0FFF));
        assert!(filter.excludes(0x2000));
        assert!(filter.excludes(0x5000));
        assert_eq!(filter.ranges().len(), 2);
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let mut filter = FilterSet::new();
        filter.add(10, 5);
        assert!(filter.excludes(7));
        assert!(filter.excludes(10));
    }
}
