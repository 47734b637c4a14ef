use std::ops::RangeInclusive;

use fixedbitset::FixedBitSet;

use super::PositionFix;
use crate::{
    Coordinate, Meters,
    geometry::haversine,
    routing::{RoutePlan, StepKind},
};

/// Transient state of one active navigation
#[derive(Debug, Clone)]
pub(super) struct NavigationSession {
    pub(super) plan: RoutePlan,
    /// Index into the route coordinates; never decreases
    pub(super) cursor: usize,
    /// Index into the route steps; never decreases
    pub(super) active_step: usize,
    /// Steps whose transition has been announced
    transitioned: FixedBitSet,
    /// Turn steps that have been pre-alerted
    pre_alerted: FixedBitSet,
    pub(super) last_fix: Option<PositionFix>,
}

impl NavigationSession {
    pub(super) fn new(plan: RoutePlan) -> Self {
        let step_count = plan.steps.len();
        let mut transitioned = FixedBitSet::with_capacity(step_count);
        // The first step is announced when the session starts
        if step_count > 0 {
            transitioned.insert(0);
        }
        Self {
            plan,
            cursor: 0,
            active_step: 0,
            transitioned,
            pre_alerted: FixedBitSet::with_capacity(step_count),
            last_fix: None,
        }
    }

    /// Route coordinate closest to `position`, searching only from the
    /// cursor forward. Ties keep the earliest index.
    pub(super) fn nearest_ahead(&self, position: Coordinate) -> usize {
        self.plan
            .coordinates
            .iter()
            .enumerate()
            .skip(self.cursor)
            .map(|(idx, &coordinate)| (idx, haversine(position, coordinate)))
            .fold(None, |best: Option<(usize, Meters)>, candidate| match best {
                Some((_, best_distance)) if best_distance <= candidate.1 => best,
                _ => Some(candidate),
            })
            .map_or(self.cursor, |(idx, _)| idx)
    }

    /// Last step taking effect at or before the cursor
    pub(super) fn step_at_cursor(&self) -> usize {
        self.plan
            .step_anchors
            .partition_point(|&anchor| anchor <= self.cursor)
            .saturating_sub(1)
    }

    /// Moves the cursor forward to `index`. Returns the steps that became
    /// passed by the move, ending with the newly current step.
    pub(super) fn advance_to(&mut self, index: usize) -> Option<RangeInclusive<usize>> {
        if index <= self.cursor {
            return None;
        }
        self.cursor = index;

        let step = self.step_at_cursor();
        if step > self.active_step {
            let passed = self.active_step + 1..=step;
            self.active_step = step;
            Some(passed)
        } else {
            None
        }
    }

    /// Latches the transition announcement of `step`; true the first time
    pub(super) fn latch_transition(&mut self, step: usize) -> bool {
        step < self.transitioned.len() && !self.transitioned.put(step)
    }

    /// Latches every step in `passed` and returns the last turn among them
    /// that had not been announced yet
    pub(super) fn pass_steps(&mut self, passed: RangeInclusive<usize>) -> Option<usize> {
        let mut turn = None;
        for step in passed {
            let is_turn = self
                .plan
                .steps
                .get(step)
                .is_some_and(|s| s.kind == StepKind::Turn);
            if self.latch_transition(step) && is_turn {
                turn = Some(step);
            }
        }
        turn
    }

    /// Latches the pre-alert of `step`; true the first time
    pub(super) fn latch_pre_alert(&mut self, step: usize) -> bool {
        step < self.pre_alerted.len() && !self.pre_alerted.put(step)
    }

    /// Next turn step after the current one, with its coordinate
    pub(super) fn upcoming_turn(&self) -> Option<(usize, Coordinate)> {
        let step = (self.active_step + 1..self.plan.steps.len())
            .find(|&idx| self.plan.steps[idx].kind == StepKind::Turn)?;
        let anchor = *self.plan.step_anchors.get(step)?;
        self.plan
            .coordinates
            .get(anchor)
            .map(|&coordinate| (step, coordinate))
    }
}
