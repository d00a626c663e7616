//! Event records fed into the heap history
//!
//! Every occurrence the engine understands is a [`HeapEvent`]. Records are
//! plain values: they carry already-validated fields and no behavior beyond
//! construction. Turning a JSON trace into records is the job of [`decode`].
//!
//! | Variant | Ticks consumed | Touches the ledger |
//! |---|---|---|
//! | `Allocate` | 1 | yes |
//! | `Free` | 1 | yes |
//! | `FreeRange` | 1 per live block in range | yes |
//! | `Realloc` | 2 | yes |
//! | `FilterRange` | 0 | no |
//! | `Event` | 0 | no |
//! | `AddressAnnotation` | 0 | no |

pub mod decode;

use crate::constants::DEFAULT_COLOR;
use std::fmt;
use std::str::FromStr;

/// Identifier of the heap an event belongs to
pub type HeapId = u8;

/// A 24-bit packed RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Create a color from a packed `0xRRGGBB` value (upper bits are dropped)
    pub fn from_rgb(rgb: u32) -> Self {
        Color(rgb & 0x00FF_FFFF)
    }

    /// Packed `0xRRGGBB` value
    pub fn rgb(self) -> u32 {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color(DEFAULT_COLOR)
    }
}

/// Error returned when a color string is not of the form `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}': expected '#' followed by 6 hex digits")]
pub struct InvalidColor(pub String);

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| InvalidColor(s.to_string()))?;
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// One ingestible heap lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapEvent {
    /// A block of `size` bytes was allocated at `address`
    Allocate {
        address: u64,
        size: u64,
        tag: String,
        heap_id: HeapId,
    },

    /// The block at `address` was freed
    Free {
        address: u64,
        tag: String,
        heap_id: HeapId,
    },

    /// Every live block whose address lies in `[low, high]` was freed
    FreeRange {
        low: u64,
        high: u64,
        tag: String,
        heap_id: HeapId,
    },

    /// A block moved from `old_address` to `new_address`
    Realloc {
        old_address: u64,
        new_address: u64,
        size: u64,
        heap_id: HeapId,
    },

    /// Only record later heap events whose address lies in `[low, high]`
    /// (or in any other filter range)
    FilterRange { low: u64, high: u64 },

    /// A named point on the timeline
    Event { label: String, color: Color },

    /// A named address
    AddressAnnotation {
        address: u64,
        label: String,
        color: Color,
    },
}

impl HeapEvent {
    /// Short name of the record kind, as used in traces
    pub fn kind(&self) -> &'static str {
        match self {
            HeapEvent::Allocate { .. } => "alloc",
            HeapEvent::Free { .. } => "free",
            HeapEvent::FreeRange { .. } => "rangefree",
            HeapEvent::Realloc { .. } => "realloc",
            HeapEvent::FilterRange { .. } => "filterrange",
            HeapEvent::Event { .. } => "event",
            HeapEvent::AddressAnnotation { .. } => "address",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        let color: Color = "#FF8000".parse().unwrap();
        assert_eq!(color.rgb(), 0xFF8000);
        assert_eq!(color.to_string(), "#FF8000");

        let lower: Color = "#0a0b0c".parse().unwrap();
        assert_eq!(lower.rgb(), 0x0A0B0C);
    }

    #[test]
    fn test_color_rejects_malformed() {
        assert!("FF8000".parse::<Color>().is_err());
        assert!("#FF80".parse::<Color>().is_err());
        assert!("#FF80001".parse::<Color>().is_err());
        assert!("#GG8000".parse::<Color>().is_err());
        assert!("#+F8000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_default_color_is_gray() {
        assert_eq!(Color::default().to_string(), "#B0B0B0");
    }

    #[test]
    fn test_kind_matches_trace_names() {
        let alloc = HeapEvent::Allocate {
            address: 0,
            size: 1,
            tag: String::new(),
            heap_id: 0,
        };
        let filter = HeapEvent::FilterRange { low: 0, high: 1 };
        let label = HeapEvent::AddressAnnotation {
            address: 0,
            label: String::new(),
            color: Color::default(),
        };
        assert_eq!(alloc.kind(), "alloc");
        assert_eq!(filter.kind(), "filterrange");
        assert_eq!(label.kind(), "address");
    }

    #[test]
    fn test_from_rgb_masks_upper_bits() {
        assert_eq!(Color::from_rgb(0xFF12_3456).rgb(), 0x12_3456);
    }
}
