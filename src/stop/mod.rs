//! Stop conditions for multi-step tool-calling loops.

use std::sync::Arc;

use crate::types::StepResult;

/// Decides, after each completed step, whether the loop must end.
pub trait StopCondition: Send + Sync {
    /// Check the steps completed so far.
    fn should_stop(&self, steps: &[StepResult]) -> bool;
}

/// Shared stop predicate attached to request parameters.
pub type StopWhen = Arc<dyn StopCondition>;

/// Stop once `max_steps` steps have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCountIs {
    max_steps: u32,
}

impl StepCountIs {
    pub fn new(max_steps: u32) -> Self {
        Self { max_steps }
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Same check as [`StopCondition::should_stop`] for callers that only
    /// track a counter.
    pub fn reached(&self, step_count: usize) -> bool {
        step_count >= self.max_steps as usize
    }
}

impl StopCondition for StepCountIs {
    fn should_stop(&self, steps: &[StepResult]) -> bool {
        self.reached(steps.len())
    }
}

/// Stop when a custom predicate returns true.
pub struct PredicateStop<F: Fn(&[StepResult]) -> bool + Send + Sync> {
    predicate: F,
}

impl<F: Fn(&[StepResult]) -> bool + Send + Sync> PredicateStop<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F: Fn(&[StepResult]) -> bool + Send + Sync> StopCondition for PredicateStop<F> {
    fn should_stop(&self, steps: &[StepResult]) -> bool {
        (self.predicate)(steps)
    }
}
