//! Turn-by-turn instruction synthesis from a path polyline

use serde::{Deserialize, Serialize};

use crate::{
    Meters,
    geometry::{Coordinate, bearing, compass_direction, delta_angle, haversine},
};

pub const CONTINUE_TEXT: &str = "Continue straight";
pub const ARRIVE_TEXT: &str = "You have arrived";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Start,
    Straight,
    Turn,
    Arrive,
}

/// Turn classification by bearing change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    SlightLeft,
    SlightRight,
    Left,
    Right,
    UTurn,
}

impl Maneuver {
    pub fn text(self) -> &'static str {
        match self {
            Maneuver::SlightLeft => "Slight left",
            Maneuver::SlightRight => "Slight right",
            Maneuver::Left => "Turn left",
            Maneuver::Right => "Turn right",
            Maneuver::UTurn => "Make a U-turn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub kind: StepKind,
    pub text: String,
    /// Meters covered by a `straight` step, zero otherwise
    pub distance: Meters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maneuver: Option<Maneuver>,
}

impl InstructionStep {
    fn new(kind: StepKind, text: impl Into<String>, distance: Meters) -> Self {
        Self {
            kind,
            text: text.into(),
            distance,
            maneuver: None,
        }
    }

    fn turn(maneuver: Maneuver) -> Self {
        Self {
            kind: StepKind::Turn,
            text: maneuver.text().to_string(),
            distance: 0.0,
            maneuver: Some(maneuver),
        }
    }
}

/// Turn detection sensitivity, degrees of bearing change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionConfig {
    /// Below this the path counts as straight
    pub straight_threshold_deg: f64,
    /// From here on a change is a full turn rather than a slight one
    pub turn_threshold_deg: f64,
    /// From here on a change is a U-turn
    pub u_turn_threshold_deg: f64,
}

impl Default for InstructionConfig {
    fn default() -> Self {
        Self {
            straight_threshold_deg: 15.0,
            turn_threshold_deg: 45.0,
            u_turn_threshold_deg: 135.0,
        }
    }
}

impl InstructionConfig {
    /// `None` while the change stays below the straight threshold
    pub fn classify(&self, delta: f64) -> Option<Maneuver> {
        let magnitude = delta.abs();
        let right = delta > 0.0;

        if magnitude < self.straight_threshold_deg {
            None
        } else if magnitude >= self.u_turn_threshold_deg {
            Some(Maneuver::UTurn)
        } else if magnitude >= self.turn_threshold_deg {
            Some(if right { Maneuver::Right } else { Maneuver::Left })
        } else {
            Some(if right {
                Maneuver::SlightRight
            } else {
                Maneuver::SlightLeft
            })
        }
    }
}

/// Steps together with the path coordinate index each takes effect at
///
/// Anchors are non-decreasing in step order: `start` at 0, a `straight`
/// one vertex into its span, a `turn` at the vertex where the bearing
/// changes and `arrive` at the last coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directions {
    pub steps: Vec<InstructionStep>,
    pub anchors: Vec<usize>,
}

impl Directions {
    fn push(&mut self, step: InstructionStep, anchor: usize) {
        self.steps.push(step);
        self.anchors.push(anchor);
    }
}

/// Builds the compact list of turn-by-turn steps for a path
pub fn build_instructions(
    coordinates: &[Coordinate],
    config: &InstructionConfig,
) -> Vec<InstructionStep> {
    build_directions(coordinates, config).steps
}

/// [`build_instructions`] with step anchors. Fewer than two coordinates
/// yield no steps.
pub fn build_directions(coordinates: &[Coordinate], config: &InstructionConfig) -> Directions {
    let mut directions = Directions::default();
    if coordinates.len() < 2 {
        return directions;
    }

    // (bearing, length) of every segment
    let segments: Vec<(f64, Meters)> = coordinates
        .windows(2)
        .map(|pair| (bearing(pair[0], pair[1]), haversine(pair[0], pair[1])))
        .collect();

    let (first_bearing, first_length) = segments[0];
    directions.push(
        InstructionStep::new(
            StepKind::Start,
            format!("Head {}", compass_direction(first_bearing)),
            0.0,
        ),
        0,
    );

    let mut accumulated = first_length;
    let mut previous_bearing = first_bearing;
    let mut span_start = 0;

    for (idx, &(segment_bearing, length)) in segments.iter().enumerate().skip(1) {
        let delta = delta_angle(previous_bearing, segment_bearing);
        previous_bearing = segment_bearing;

        let Some(maneuver) = config.classify(delta) else {
            accumulated += length;
            continue;
        };

        if accumulated > 0.0 {
            directions.push(
                InstructionStep::new(StepKind::Straight, CONTINUE_TEXT, accumulated),
                span_start + 1,
            );
        }
        directions.push(InstructionStep::turn(maneuver), idx);

        accumulated = length;
        span_start = idx;
    }

    if accumulated > 0.0 {
        directions.push(
            InstructionStep::new(StepKind::Straight, CONTINUE_TEXT, accumulated),
            span_start + 1,
        );
    }
    directions.push(
        InstructionStep::new(StepKind::Arrive, ARRIVE_TEXT, 0.0),
        coordinates.len() - 1,
    );

    directions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::path_length;

    fn kinds(steps: &[InstructionStep]) -> Vec<StepKind> {
        steps.iter().map(|s| s.kind).collect()
    }

    /// North for ~33 m, then east for ~33 m
    fn l_shape() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0001, 0.0),
            Coordinate::new(0.0002, 0.0),
            Coordinate::new(0.0003, 0.0),
            Coordinate::new(0.0003, 0.0001),
            Coordinate::new(0.0003, 0.0002),
            Coordinate::new(0.0003, 0.0003),
        ]
    }

    #[test]
    fn degenerate_paths_have_no_steps() {
        let config = InstructionConfig::default();
        assert!(build_instructions(&[], &config).is_empty());
        assert!(build_instructions(&[Coordinate::new(1.0, 1.0)], &config).is_empty());
    }

    #[test]
    fn straight_path_is_start_straight_arrive() {
        let coords: Vec<Coordinate> = (0..10)
            .map(|i| Coordinate::new(f64::from(i) * 0.0001, 0.0))
            .collect();
        let steps = build_instructions(&coords, &InstructionConfig::default());

        assert_eq!(
            kinds(&steps),
            vec![StepKind::Start, StepKind::Straight, StepKind::Arrive]
        );
        assert_eq!(steps[0].text, "Head N");
        assert!((steps[1].distance - path_length(&coords)).abs() < 1e-6);
        assert_eq!(steps[0].distance, 0.0);
        assert_eq!(steps[2].distance, 0.0);
    }

    #[test]
    fn right_angle_is_a_full_turn() {
        let coords = l_shape();
        let directions = build_directions(&coords, &InstructionConfig::default());
        let steps = &directions.steps;

        assert_eq!(
            kinds(steps),
            vec![
                StepKind::Start,
                StepKind::Straight,
                StepKind::Turn,
                StepKind::Straight,
                StepKind::Arrive
            ]
        );
        assert_eq!(steps[2].text, "Turn right");
        assert_eq!(steps[2].maneuver, Some(Maneuver::Right));
        assert_eq!(directions.anchors, vec![0, 1, 3, 4, 6]);

        let straight_total: f64 = steps.iter().map(|s| s.distance).sum();
        assert!((straight_total - path_length(&coords)).abs() < 1e-6);
    }

    #[test]
    fn left_turn_has_negative_delta() {
        let mut coords = l_shape();
        for c in &mut coords {
            c.lon = -c.lon;
        }
        let steps = build_instructions(&coords, &InstructionConfig::default());
        assert_eq!(steps[2].text, "Turn left");
    }

    #[test]
    fn classification_thresholds() {
        let config = InstructionConfig::default();
        assert_eq!(config.classify(14.9), None);
        assert_eq!(config.classify(-14.9), None);
        assert_eq!(config.classify(15.0), Some(Maneuver::SlightRight));
        assert_eq!(config.classify(-30.0), Some(Maneuver::SlightLeft));
        assert_eq!(config.classify(45.0), Some(Maneuver::Right));
        assert_eq!(config.classify(-90.0), Some(Maneuver::Left));
        assert_eq!(config.classify(135.0), Some(Maneuver::UTurn));
        assert_eq!(config.classify(-180.0), Some(Maneuver::UTurn));
    }

    #[test]
    fn doubling_back_is_a_u_turn() {
        let coords = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0002, 0.0),
            Coordinate::new(0.0001, 0.0),
        ];
        let steps = build_instructions(&coords, &InstructionConfig::default());
        assert_eq!(steps[2].maneuver, Some(Maneuver::UTurn));
        assert_eq!(steps[2].text, "Make a U-turn");
    }

    #[test]
    fn consecutive_turns_do_not_emit_empty_straights() {
        // east, then north, then west: every segment turns
        let coords = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.0001),
            Coordinate::new(0.0001, 0.0001),
            Coordinate::new(0.0001, 0.0),
        ];
        let directions = build_directions(&coords, &InstructionConfig::default());

        assert_eq!(
            kinds(&directions.steps),
            vec![
                StepKind::Start,
                StepKind::Straight,
                StepKind::Turn,
                StepKind::Straight,
                StepKind::Turn,
                StepKind::Straight,
                StepKind::Arrive
            ]
        );
        assert!(directions.anchors.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(directions.steps[0].text, "Head E");
        assert_eq!(directions.steps[2].text, "Turn left");
    }
}
