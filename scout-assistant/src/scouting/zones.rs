// Wagon zone to fielding-position mapping with LHB/RHB lateral mirroring.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Batting hand
// ---------------------------------------------------------------------------

/// Which hand a batter bats with. Determines the zone-label mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Parse the dataset's `LHB`/`RHB` strings. Anything else is `None`;
    /// callers decide the fallback (the loader defaults to right-handed).
    pub fn parse(s: &str) -> Option<Hand> {
        match s.trim() {
            "LHB" => Some(Hand::Left),
            "RHB" => Some(Hand::Right),
            _ => None,
        }
    }

    /// Short display label matching the dataset convention.
    pub fn label(&self) -> &'static str {
        match self {
            Hand::Left => "LHB",
            Hand::Right => "RHB",
        }
    }
}

// ---------------------------------------------------------------------------
// Zone tables
// ---------------------------------------------------------------------------

/// Number of wagon zones on the field diagram.
pub const ZONE_COUNT: u8 = 8;

/// Canonical zone labels for a right-handed batter, zones 1-8.
const RHB_LABELS: [&str; 8] = [
    "Fine Leg",
    "Square Leg",
    "Mid Wicket",
    "Mid On",
    "Mid Off",
    "Covers",
    "Point",
    "Third Man",
];

/// Zone labels for a left-handed batter. Laterally mirrored: zones 4 and 5
/// (Mid On / Mid Off) swap; the remaining zones keep their RHB label.
const LHB_LABELS: [&str; 8] = [
    "Fine Leg",
    "Square Leg",
    "Mid Wicket",
    "Mid Off",
    "Mid On",
    "Covers",
    "Point",
    "Third Man",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    #[error("wagon zone {0} is outside the valid range 1-8")]
    InvalidZone(u8),
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Fielding-position label for a wagon zone, given the batter's hand.
pub fn label_for(zone: u8, hand: Hand) -> Result<&'static str, ZoneError> {
    if !(1..=ZONE_COUNT).contains(&zone) {
        return Err(ZoneError::InvalidZone(zone));
    }
    let table = match hand {
        Hand::Left => &LHB_LABELS,
        Hand::Right => &RHB_LABELS,
    };
    Ok(table[(zone - 1) as usize])
}

/// The complete zone-label table for a hand, indexed by zone - 1.
pub fn zone_labels(hand: Hand) -> [&'static str; 8] {
    match hand {
        Hand::Left => LHB_LABELS,
        Hand::Right => RHB_LABELS,
    }
}

/// Center angle of a zone in degrees, clockwise from straight down the
/// ground. Used by chart consumers only; the write-up text never needs it.
pub fn center_angle(zone: u8) -> Result<f64, ZoneError> {
    if !(1..=ZONE_COUNT).contains(&zone) {
        return Err(ZoneError::InvalidZone(zone));
    }
    Ok(f64::from(zone - 1) * 45.0 + 22.5)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rhb_table_matches_canonical_diagram() {
        let expected = [
            "Fine Leg",
            "Square Leg",
            "Mid Wicket",
            "Mid On",
            "Mid Off",
            "Covers",
            "Point",
            "Third Man",
        ];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(label_for(i as u8 + 1, Hand::Right).unwrap(), *want);
        }
    }

    #[test]
    fn lhb_swaps_mid_on_and_mid_off_only() {
        assert_eq!(label_for(4, Hand::Left).unwrap(), "Mid Off");
        assert_eq!(label_for(5, Hand::Left).unwrap(), "Mid On");
        for zone in [1u8, 2, 3, 6, 7, 8] {
            assert_eq!(
                label_for(zone, Hand::Left).unwrap(),
                label_for(zone, Hand::Right).unwrap(),
            );
        }
    }

    #[test]
    fn mapping_is_total_for_both_hands() {
        for zone in 1..=ZONE_COUNT {
            assert!(label_for(zone, Hand::Left).is_ok());
            assert!(label_for(zone, Hand::Right).is_ok());
        }
    }

    #[test]
    fn mirroring_twice_is_identity() {
        // The LHB table is a permutation of the RHB table. Composing that
        // permutation with itself must give back the RHB assignment.
        let rhb = zone_labels(Hand::Right);
        let lhb = zone_labels(Hand::Left);
        for zone in 0..8usize {
            let mirrored_once = lhb[zone];
            let source = rhb.iter().position(|l| *l == mirrored_once).unwrap();
            let mirrored_twice = lhb[source];
            assert_eq!(mirrored_twice, rhb[zone]);
        }
    }

    #[test]
    fn zone_zero_and_nine_rejected() {
        assert_eq!(label_for(0, Hand::Right), Err(ZoneError::InvalidZone(0)));
        assert_eq!(label_for(9, Hand::Left), Err(ZoneError::InvalidZone(9)));
        assert_eq!(center_angle(0), Err(ZoneError::InvalidZone(0)));
        assert_eq!(center_angle(9), Err(ZoneError::InvalidZone(9)));
    }

    #[test]
    fn center_angles_step_clockwise_by_45() {
        assert!((center_angle(1).unwrap() - 22.5).abs() < f64::EPSILON);
        assert!((center_angle(2).unwrap() - 67.5).abs() < f64::EPSILON);
        assert!((center_angle(8).unwrap() - 337.5).abs() < f64::EPSILON);
    }

    #[test]
    fn hand_parsing() {
        assert_eq!(Hand::parse("LHB"), Some(Hand::Left));
        assert_eq!(Hand::parse(" RHB "), Some(Hand::Right));
        assert_eq!(Hand::parse("switch"), None);
        assert_eq!(Hand::Left.label(), "LHB");
        assert_eq!(Hand::Right.label(), "RHB");
    }
}
