//! Timeline events and address labels
//!
//! Purely for display: nothing here feeds back into block bookkeeping.

use super::block::Tick;
use crate::constants::EVENT_SEARCH_RADIUS;
use crate::events::Color;
use std::collections::BTreeMap;

/// A colored label attached to a tick or an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub color: Color,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct Annotations {
    events: BTreeMap<Tick, Annotation>,
    addresses: BTreeMap<u64, Annotation>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an event to `tick`, replacing any earlier event at that tick
    pub fn record_event(&mut self, tick: Tick, label: String, color: Color) {
        self.events.insert(tick, Annotation { color, label });
    }

    /// Attach a label to `address`, replacing any earlier label there
    pub fn record_address(&mut self, address: u64, label: String, color: Color) {
        self.addresses.insert(address, Annotation { color, label });
    }

    pub fn events(&self) -> &BTreeMap<Tick, Annotation> {
        &self.events
    }

    pub fn addresses(&self) -> &BTreeMap<u64, Annotation> {
        &self.addresses
    }

    /// Find the event closest to `tick`
    ///
    /// An exact hit wins outright. Otherwise events within
    /// [`EVENT_SEARCH_RADIUS`] ticks on either side are scanned in tick order
    /// and the first one at the smallest distance is returned, so on a tie
    /// the earlier event wins.
    pub fn event_near(&self, tick: Tick) -> Option<(Tick, &Annotation)> {
        if let Some(annotation) = self.events.get(&tick) {
            return Some((tick, annotation));
        }

        let low = tick.saturating_sub(EVENT_SEARCH_RADIUS);
        let high = tick.saturating_add(EVENT_SEARCH_RADIUS);
        let mut best: Option<(u32, Tick, &Annotation)> = None;
        for (&at, annotation) in self.events.range(low..=high) {
            let distance = at.abs_diff(tick);
            if best.map_or(true, |(closest, _, _)| distance < closest) {
                best = Some((distance, at, annotation));
            }
        }
        best.map(|(_, at, annotation)| (at, annotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(annotations: &Annotations, tick: Tick) -> Option<&str> {
        annotations.event_near(tick).map(|(_, a)| a.label.as_str())
    }

    #[test]
    fn test_exact_and_windowed_lookup() {
        let mut annotations = Annotations::new();
        annotations.record_event(1000, "checkpoint".to_string(), Color::default());

        assert_eq!(label(&annotations, 1000), Some("checkpoint"));
        assert_eq!(label(&annotations, 1250), Some("checkpoint"));
        assert_eq!(label(&annotations, 750), Some("checkpoint"));
        assert_eq!(label(&annotations, 1300), Some("checkpoint"));
        assert_eq!(label(&annotations, 1301), None);
        assert_eq!(label(&annotations, 1400), None);
        assert_eq!(label(&annotations, 699), None);
    }

    #[test]
    fn test_nearest_wins() {
        let mut annotations = Annotations::new();
        annotations.record_event(100, "a".to_string(), Color::default());
        annotations.record_event(180, "b".to_string(), Color::default());
        annotations.record_event(400, "c".to_string(), Color::default());

        assert_eq!(label(&annotations, 130), Some("a"));
        assert_eq!(label(&annotations, 150), Some("b"));
        assert_eq!(annotations.event_near(390).map(|(t, _)| t), Some(400));
    }

    #[test]
    fn test_tie_keeps_earlier_event() {
        let mut annotations = Annotations::new();
        annotations.record_event(100, "early".to_string(), Color::default());
        annotations.record_event(200, "late".to_string(), Color::default());

        assert_eq!(label(&annotations, 150), Some("early"));
    }

    #[test]
    fn test_window_saturates_at_zero() {
        let mut annotations = Annotations::new();
        annotations.record_event(0, "start".to_string(), Color::default());

        assert_eq!(label(&annotations, 10), Some("start"));
        assert_eq!(label(&annotations, u32::MAX), None);
    }

    #[test]
    fn test_later_record_replaces_earlier() {
        let mut annotations = Annotations::new();
        annotations.record_event(5, "first".to_string(), Color::default());
        annotations.record_event(5, "second".to_string(), Color::from_rgb(0xFF0000));
        annotations.record_address(0x1000, "stack guard".to_string(), Color::default());

        assert_eq!(annotations.events().len(), 1);
        assert_eq!(label(&annotations, 5), Some("second"));
        assert_eq!(annotations.addresses()[&0x1000].label, "stack guard");
    }
}
