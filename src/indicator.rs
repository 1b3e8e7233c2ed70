// src/indicator.rs

use std::time::{Duration, Instant};

pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Where the current round's indicator stands.
///
/// `Idle → Pending` on submission, `Pending → Resolved` when the round's
/// assistant message lands, `Pending → TimedOut` when the visual ceiling
/// elapses first. Both terminal states immediately decay back to `Idle` so
/// the next submission is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Idle,
    Pending,
    Resolved,
    TimedOut,
}

/// Shows the "thinking" cue between submission and response. The timeout is
/// visual only: it hides the indicator but never cancels the in-flight
/// request, so a late response still reaches the timeline.
#[derive(Debug)]
pub struct TypingIndicator {
    state: IndicatorState,
    pending_since: Option<Instant>,
    timeout: Duration,
    spinner_idx: usize,
}

impl TypingIndicator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: IndicatorState::Idle,
            pending_since: None,
            timeout,
            spinner_idx: 0,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == IndicatorState::Pending
    }

    /// Idle → Pending. Called right after the user message is appended.
    pub fn start(&mut self) {
        if self.state == IndicatorState::Idle {
            self.state = IndicatorState::Pending;
            self.pending_since = Some(Instant::now());
        }
    }

    /// Pending → Resolved → Idle. Called once the round's assistant message
    /// has been appended, whether the search succeeded or failed. A resolve
    /// after the visual timeout is a no-op; the message append is handled
    /// by the caller regardless.
    pub fn resolve(&mut self) -> IndicatorState {
        if self.state == IndicatorState::Pending {
            self.state = IndicatorState::Idle;
            self.pending_since = None;
            IndicatorState::Resolved
        } else {
            self.state
        }
    }

    /// Checks the visual ceiling. Returns `TimedOut` exactly on the tick
    /// that crosses it, after which the controller is back at `Idle`.
    pub fn tick(&mut self) -> IndicatorState {
        if self.state == IndicatorState::Pending {
            if let Some(since) = self.pending_since {
                if since.elapsed() >= self.timeout {
                    self.state = IndicatorState::Idle;
                    self.pending_since = None;
                    return IndicatorState::TimedOut;
                }
            }
        }
        self.state
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let indicator = TypingIndicator::new(Duration::from_secs(10));
        assert_eq!(indicator.state(), IndicatorState::Idle);
    }

    #[test]
    fn test_start_then_resolve() {
        let mut indicator = TypingIndicator::new(Duration::from_secs(10));
        indicator.start();
        assert!(indicator.is_pending());

        assert_eq!(indicator.resolve(), IndicatorState::Resolved);
        assert_eq!(indicator.state(), IndicatorState::Idle);
    }

    #[test]
    fn test_tick_before_ceiling_stays_pending() {
        let mut indicator = TypingIndicator::new(Duration::from_secs(10));
        indicator.start();
        assert_eq!(indicator.tick(), IndicatorState::Pending);
        assert!(indicator.is_pending());
    }

    #[test]
    fn test_tick_past_ceiling_times_out_once() {
        let mut indicator = TypingIndicator::new(Duration::ZERO);
        indicator.start();

        assert_eq!(indicator.tick(), IndicatorState::TimedOut);
        // Already reset; subsequent ticks report Idle.
        assert_eq!(indicator.tick(), IndicatorState::Idle);
    }

    #[test]
    fn test_resolve_after_timeout_is_noop() {
        let mut indicator = TypingIndicator::new(Duration::ZERO);
        indicator.start();
        assert_eq!(indicator.tick(), IndicatorState::TimedOut);

        // The late response no longer transitions the controller.
        assert_eq!(indicator.resolve(), IndicatorState::Idle);
    }

    #[test]
    fn test_resolve_without_start_is_noop() {
        let mut indicator = TypingIndicator::new(Duration::from_secs(10));
        assert_eq!(indicator.resolve(), IndicatorState::Idle);
    }

    #[test]
    fn test_spinner_cycles() {
        let mut indicator = TypingIndicator::new(Duration::from_secs(10));
        let first = indicator.spinner_frame();
        indicator.update_spinner();
        assert_ne!(first, indicator.spinner_frame());
    }
}
