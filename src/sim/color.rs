//! Zone palette and color stacks
//!
//! The palette is ordered easy → hard. A group of `k` zones always takes the
//! trailing `k` entries, so shrinking groups keep the most valuable colors.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_ZONE_COUNT;

/// Hit zone colors, ordered by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZoneColor {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Fixed palette, least valuable first
pub const PALETTE: [ZoneColor; MAX_ZONE_COUNT as usize] = [
    ZoneColor::Green,
    ZoneColor::Yellow,
    ZoneColor::Orange,
    ZoneColor::Red,
];

impl ZoneColor {
    /// Points awarded for hitting a zone of this color
    pub fn points(self) -> u32 {
        match self {
            ZoneColor::Green => 1,
            ZoneColor::Yellow => 2,
            ZoneColor::Orange => 3,
            ZoneColor::Red => 4,
        }
    }

    /// 0xRRGGBB for the presentation layer
    pub fn rgb(self) -> u32 {
        match self {
            ZoneColor::Green => 0x44ff44,
            ZoneColor::Yellow => 0xffee00,
            ZoneColor::Orange => 0xff8800,
            ZoneColor::Red => 0xff1111,
        }
    }
}

/// Trailing `count` palette entries. `count` is clamped to the palette size.
pub fn build_color_stack(count: u8) -> Vec<ZoneColor> {
    let count = usize::from(count.min(MAX_ZONE_COUNT));
    PALETTE[PALETTE.len() - count..].to_vec()
}

/// Color stack change decided by an attempt, applied at the next gate crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PendingStack {
    #[default]
    None,
    /// Drop the least valuable color
    Trim,
    /// Rebuild from the palette for the current zone count
    Rebuild,
}

impl PendingStack {
    /// Apply to `stack` and reset to `None`
    pub fn apply(&mut self, stack: &mut Vec<ZoneColor>, zone_count: u8) {
        match std::mem::take(self) {
            PendingStack::None => {}
            PendingStack::Trim => {
                if stack.len() > 1 {
                    stack.remove(0);
                }
            }
            PendingStack::Rebuild => *stack = build_color_stack(zone_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_is_trailing_slice() {
        assert_eq!(build_color_stack(4), PALETTE.to_vec());
        assert_eq!(build_color_stack(2), vec![ZoneColor::Orange, ZoneColor::Red]);
        assert_eq!(build_color_stack(1), vec![ZoneColor::Red]);
        assert_eq!(build_color_stack(9).len(), 4);
    }

    #[test]
    fn test_points_strictly_increase_along_stack() {
        for k in 1..=MAX_ZONE_COUNT {
            let stack = build_color_stack(k);
            assert_eq!(stack.len(), k as usize);
            assert!(stack.windows(2).all(|w| w[0].points() < w[1].points()));
        }
    }

    #[test]
    fn test_pending_trim_drops_palest() {
        let mut stack = build_color_stack(4);
        let mut pending = PendingStack::Trim;
        pending.apply(&mut stack, 3);
        assert_eq!(stack, build_color_stack(3));
        assert_eq!(pending, PendingStack::None);

        // Consumed: a second apply is a no-op
        pending.apply(&mut stack, 3);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_pending_rebuild_matches_count() {
        let mut stack = build_color_stack(1);
        let mut pending = PendingStack::Rebuild;
        pending.apply(&mut stack, 2);
        assert_eq!(stack, vec![ZoneColor::Orange, ZoneColor::Red]);
    }
}
