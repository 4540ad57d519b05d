//! Hit zone geometry
//!
//! Zones are arcs on the dial face. A group is laid out edge-to-edge from a
//! random offset inside the spawn arc:
//! - start_angle, end_angle: unwrapped radians, end = start + zone arc
//! - index: position within the group (0 = least valuable color)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;
use crate::{normalize_angle, polar_to_cartesian};

/// One colored arc the pointer must overlap to score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitZone {
    /// Start angle (radians, unwrapped)
    pub start_angle: f32,
    /// End angle (radians, unwrapped)
    pub end_angle: f32,
    /// Position within the group, used to pick the color
    pub index: usize,
}

impl HitZone {
    /// Angular span of the zone (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = normalize_angle(self.end_angle) - normalize_angle(self.start_angle);
        if span < 0.0 {
            span += std::f32::consts::TAU;
        }
        span
    }

    /// Check if an angle falls in [start, end)
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = normalize_angle(theta);
        let start = normalize_angle(self.start_angle);
        let end = normalize_angle(self.end_angle);

        if start <= end {
            theta >= start && theta < end
        } else {
            // Wraps through 0
            theta >= start || theta < end
        }
    }

    /// Mid-angle of the zone
    pub fn mid_angle(&self) -> f32 {
        normalize_angle(self.start_angle + self.angular_span() / 2.0)
    }

    /// Sample points along the arc at `radius` (for drawing the wedge)
    pub fn sample_edge(&self, radius: f32, num_points: usize) -> Vec<Vec2> {
        let span = self.angular_span();

        (0..num_points)
            .map(|i| {
                let t = i as f32 / (num_points - 1).max(1) as f32;
                polar_to_cartesian(radius, self.start_angle + t * span)
            })
            .collect()
    }
}

/// Lay out `count` adjacent zones at a random offset inside the spawn arc
pub fn generate_zones<R: Rng + ?Sized>(count: u8, tuning: &Tuning, rng: &mut R) -> Vec<HitZone> {
    let available = tuning.spawn_max - tuning.spawn_min;
    let group_arc = f32::from(count) * tuning.zone_arc;

    // Zero-width offset range when the group doesn't fit
    let slack = (available - group_arc).max(0.0);
    let start = tuning.spawn_min + rng.random::<f32>() * slack;

    (0..usize::from(count))
        .map(|i| {
            let s = start + i as f32 * tuning.zone_arc;
            HitZone {
                start_angle: s,
                end_angle: s + tuning.zone_arc,
                index: i,
            }
        })
        .collect()
}

/// The zone under the pointer, if any
pub fn find_hit(angle: f32, zones: &[HitZone]) -> Option<&HitZone> {
    zones.iter().find(|z| z.contains_angle(angle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_zone_contains_angle_no_wrap() {
        let zone = HitZone { start_angle: 0.0, end_angle: PI / 2.0, index: 0 };
        assert!(zone.contains_angle(0.0));
        assert!(zone.contains_angle(PI / 4.0));
        assert!(!zone.contains_angle(PI / 2.0)); // end is exclusive
        assert!(!zone.contains_angle(PI));
        assert!(zone.contains_angle(TAU + 0.1)); // unwrapped pointer
    }

    #[test]
    fn test_zone_contains_angle_wraparound() {
        // 350° to 10°
        let zone = HitZone {
            start_angle: 350.0_f32.to_radians(),
            end_angle: 370.0_f32.to_radians(),
            index: 0,
        };
        assert!(zone.contains_angle(0.0));
        assert!(zone.contains_angle(355.0_f32.to_radians()));
        assert!(zone.contains_angle(-5.0_f32.to_radians()));
        assert!(!zone.contains_angle(PI));
        assert!((zone.angular_span() - 20.0_f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_find_hit_picks_zone_by_index() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let zones = generate_zones(4, &tuning, &mut rng);
        let target = zones[2].mid_angle();
        assert_eq!(find_hit(target, &zones).map(|z| z.index), Some(2));
        assert!(find_hit(tuning.gate_angle, &zones).is_none());
    }

    #[test]
    fn test_oversized_group_starts_at_spawn_min() {
        let tuning = Tuning {
            zone_arc: 1.5,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let zones = generate_zones(4, &tuning, &mut rng);
        assert_eq!(zones[0].start_angle, tuning.spawn_min);
    }

    #[test]
    fn test_sample_edge_endpoints() {
        let zone = HitZone { start_angle: 0.0, end_angle: PI / 2.0, index: 0 };
        let pts = zone.sample_edge(10.0, 5);
        assert_eq!(pts.len(), 5);
        assert!((pts[0] - Vec2::new(10.0, 0.0)).length() < 1e-3);
        assert!((pts[4] - Vec2::new(0.0, 10.0)).length() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_zones_stay_inside_spawn_arc(seed in any::<u64>(), count in 1u8..=4) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let zones = generate_zones(count, &tuning, &mut rng);

            prop_assert_eq!(zones.len(), count as usize);
            for (i, zone) in zones.iter().enumerate() {
                prop_assert_eq!(zone.index, i);
                prop_assert!(zone.start_angle >= tuning.spawn_min - 1e-5);
                prop_assert!(zone.end_angle <= tuning.spawn_max + 1e-5);
            }
            let group = zones[zones.len() - 1].end_angle - zones[0].start_angle;
            prop_assert!(group <= tuning.spawn_max - tuning.spawn_min + 1e-5);
        }
    }
}
