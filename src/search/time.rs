use std::time::{Duration, Instant};

use crate::config::SearchParams;

/// Per-call time budget derived from the remaining clock.
///
/// The soft limit gates starting a new iteration; the hard limit cancels an
/// iteration in flight. A remaining time too large to represent means no
/// deadline at all.
#[derive(Clone, Copy, Debug)]
pub struct TimeManager {
    start: Instant,
    soft: Option<Instant>,
    hard: Option<Instant>,
    finish_one: bool,
    tm_factor: f32,
    poll_mask: u64,
}

/// Nodes between clock reads, as a mask: tight budgets are polled more often.
fn poll_mask_for(hard_budget: Duration) -> u64 {
    if hard_budget < Duration::from_millis(2) {
        7
    } else if hard_budget < Duration::from_millis(50) {
        63
    } else {
        1023
    }
}

impl TimeManager {
    pub fn new(remaining: Duration, params: &SearchParams) -> Self {
        let start = Instant::now();
        let soft_budget = remaining / params.time_divisor.max(1);
        let hard_budget = soft_budget.saturating_mul(params.hard_limit_factor.max(1)).min(remaining / 2);
        Self {
            start,
            soft: start.checked_add(soft_budget),
            hard: start.checked_add(hard_budget),
            finish_one: params.finish_one,
            tm_factor: if params.tm_factor > 0.1 { params.tm_factor } else { 1.9 },
            poll_mask: poll_mask_for(hard_budget),
        }
    }

    /// No deadline; depth or node limits end the search.
    pub fn unlimited() -> Self {
        Self { start: Instant::now(), soft: None, hard: None, finish_one: false, tm_factor: 1.9, poll_mask: 1023 }
    }

    pub fn elapsed(&self) -> Duration { self.start.elapsed() }

    pub fn hard_expired(&self) -> bool { self.hard.map_or(false, |dl| Instant::now() >= dl) }

    /// Whether the clock should be read after `nodes` nodes.
    pub fn should_poll(&self, nodes: u64) -> bool { nodes & self.poll_mask == 0 }

    /// Whether another iteration is worth starting after one that took `last_iter`.
    pub fn can_start_iteration(&self, last_iter: Duration) -> bool {
        let Some(soft) = self.soft else { return true };
        let remaining = soft.saturating_duration_since(Instant::now());
        if remaining.is_zero() { return false; }
        !(self.finish_one && !last_iter.is_zero() && remaining < last_iter.mul_f32(self.tm_factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_budget_expires_immediately() {
        let tm = TimeManager::new(Duration::from_millis(1), &SearchParams::default());
        std::thread::sleep(Duration::from_millis(2));
        assert!(tm.hard_expired());
        assert!(!tm.can_start_iteration(Duration::ZERO));
    }

    #[test]
    fn unbounded_clock_has_no_deadline() {
        let tm = TimeManager::new(Duration::MAX, &SearchParams::default());
        assert!(!tm.hard_expired());
        assert!(tm.can_start_iteration(Duration::from_secs(3600)));
    }

    #[test]
    fn prediction_blocks_iterations_that_cannot_finish() {
        let mut p = SearchParams::default();
        p.time_divisor = 1;
        let tm = TimeManager::new(Duration::from_millis(500), &p);
        assert!(tm.can_start_iteration(Duration::from_millis(1)));
        assert!(!tm.can_start_iteration(Duration::from_secs(10)));
    }

    #[test]
    fn tight_budgets_poll_the_clock_more_often() {
        let p = SearchParams::default();
        let tight = TimeManager::new(Duration::from_millis(1), &p);
        let roomy = TimeManager::new(Duration::from_secs(60), &p);
        assert!(tight.should_poll(8));
        assert!(!roomy.should_poll(8));
        assert!(roomy.should_poll(1024));
        assert!(TimeManager::unlimited().should_poll(0));
    }
}
