// Wagon-wheel chart data: one point per zone with a boundary count, drawn
// at the zone's center angle with a radius scaled by volume.

use crate::records::{fours_key, sixes_key, BatterRecord};
use crate::scouting::zones::{center_angle, label_for, ZoneError, ZONE_COUNT};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Boundary kind plotted on the wheel. Sixes get a small angular offset so
/// they do not overlap fours in the same zone, and a slightly larger radius
/// scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    Fours,
    Sixes,
}

impl BoundaryKind {
    fn angle_offset(&self) -> f64 {
        match self {
            BoundaryKind::Fours => 0.0,
            BoundaryKind::Sixes => 8.0,
        }
    }

    fn radius(&self, count: u32) -> f64 {
        let (scale, cap) = match self {
            BoundaryKind::Fours => (1.5, 2.0),
            BoundaryKind::Sixes => (1.8, 2.3),
        };
        (0.5 + f64::from(count) / 10.0 * scale).min(cap)
    }
}

/// One plottable point on the wagon wheel.
#[derive(Debug, Clone, Serialize)]
pub struct WheelPoint {
    pub zone: u8,
    /// Fielding-position label, mirrored for left-handers.
    pub label: &'static str,
    pub kind: BoundaryKind,
    /// Degrees clockwise from straight down the ground.
    pub angle: f64,
    pub count: u32,
    pub radius: f64,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the wagon-wheel points for a batter. Zones with a zero or missing
/// count produce no point; a batter with no boundary columns yields an empty
/// wheel.
pub fn wheel_points(batter: &BatterRecord) -> Result<Vec<WheelPoint>, ZoneError> {
    let mut points = Vec::new();
    for zone in 1..=ZONE_COUNT {
        for (kind, key) in [
            (BoundaryKind::Fours, fours_key(zone)),
            (BoundaryKind::Sixes, sixes_key(zone)),
        ] {
            let count = match batter.metric(&key) {
                Some(v) if v > 0.0 => v.round() as u32,
                _ => continue,
            };
            points.push(WheelPoint {
                zone,
                label: label_for(zone, batter.hand)?,
                kind,
                angle: center_angle(zone)? + kind.angle_offset(),
                count,
                radius: kind.radius(count),
            });
        }
    }
    Ok(points)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scouting::zones::Hand;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn batter() -> BatterRecord {
        BatterRecord::new(1, "Wheel Batter", Hand::Right)
            .with_metric(fours_key(3), 7.0)
            .with_metric(fours_key(6), 2.0)
            .with_metric(sixes_key(3), 4.0)
            .with_metric(sixes_key(8), 0.0)
    }

    #[test]
    fn zero_and_missing_counts_produce_no_points() {
        let points = wheel_points(&batter()).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.zone != 8));
        assert!(points.iter().all(|p| p.count > 0));
    }

    #[test]
    fn angles_follow_zone_centers() {
        let points = wheel_points(&batter()).unwrap();
        let fours_z3 = points
            .iter()
            .find(|p| p.zone == 3 && p.kind == BoundaryKind::Fours)
            .unwrap();
        assert!(approx_eq(fours_z3.angle, 112.5));
        let sixes_z3 = points
            .iter()
            .find(|p| p.zone == 3 && p.kind == BoundaryKind::Sixes)
            .unwrap();
        assert!(approx_eq(sixes_z3.angle, 120.5));
    }

    #[test]
    fn radius_scales_with_count_and_caps() {
        assert!(approx_eq(BoundaryKind::Fours.radius(7), 0.5 + 0.7 * 1.5));
        assert!(approx_eq(BoundaryKind::Fours.radius(100), 2.0));
        assert!(approx_eq(BoundaryKind::Sixes.radius(4), 0.5 + 0.4 * 1.8));
        assert!(approx_eq(BoundaryKind::Sixes.radius(100), 2.3));
    }

    #[test]
    fn labels_mirror_for_left_handers() {
        let lefty = BatterRecord::new(2, "Lefty", Hand::Left).with_metric(fours_key(4), 3.0);
        let points = wheel_points(&lefty).unwrap();
        assert_eq!(points[0].label, "Mid Off");

        let righty = BatterRecord::new(3, "Righty", Hand::Right).with_metric(fours_key(4), 3.0);
        let points = wheel_points(&righty).unwrap();
        assert_eq!(points[0].label, "Mid On");
    }

    #[test]
    fn empty_batter_yields_empty_wheel() {
        let no_data = BatterRecord::new(4, "No Data", Hand::Right);
        assert!(wheel_points(&no_data).unwrap().is_empty());
    }
}
