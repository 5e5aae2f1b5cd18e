//! Tracking quality monitor.
//!
//! Every tracking-state change shows a short-lived info message. Degraded
//! states (limited, unavailable) additionally arm an escalation warning that
//! only becomes visible if tracking has not returned to normal within the
//! escalation delay. Returning to normal cancels the pending or visible
//! escalation, so flicker between states never flashes a warning.

use chrono::{NaiveDateTime, TimeDelta};

use crate::events::TrackingState;
use crate::status::{MessageKind, StatusBoard};

#[derive(Debug)]
pub struct TrackingQualityMonitor {
    state: TrackingState,
    escalation_delay: TimeDelta,
    last_change: Option<NaiveDateTime>,
}

impl TrackingQualityMonitor {
    pub fn new(escalation_delay: TimeDelta) -> Self {
        Self {
            state: TrackingState::default(),
            escalation_delay,
            last_change: None,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// When the last tracking signal arrived.
    pub fn last_change(&self) -> Option<NaiveDateTime> {
        self.last_change
    }

    pub fn handle_state_change(
        &mut self,
        state: TrackingState,
        now: NaiveDateTime,
        status: &mut StatusBoard,
    ) {
        if state != self.state {
            tracing::debug!(from = ?self.state, to = ?state, "Tracking state changed");
        }
        self.state = state;
        self.last_change = Some(now);

        status.show(state.presentation(), None, true, now);

        if state.is_degraded() {
            // Re-arming replaces the earlier timer, so the delay restarts
            status.schedule(
                MessageKind::TrackingStateEscalation,
                escalation_text(state),
                self.escalation_delay,
                false,
                now,
            );
        } else {
            status.cancel(MessageKind::TrackingStateEscalation);
        }
    }
}

/// Warning shown when a degraded state persists.
pub fn escalation_text(state: TrackingState) -> String {
    match state.recommendation() {
        Some(recommendation) => format!("{}: {}", state.presentation(), recommendation),
        None => state.presentation().to_string(),
    }
}
