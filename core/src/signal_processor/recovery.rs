//! Session recovery controller.
//!
//! Handles the failure side of the session lifecycle:
//! - Fatal errors: surfaced as a blocking dialog with a restart action, never auto-retried
//! - Interruptions: informational only; the session relocalizes on its own
//! - Restarts: full session reset, deduplicated by a cooldown gate

use chrono::{NaiveDateTime, TimeDelta};

use crate::events::{
    DetectionConfig, FailureOrigin, RecoveryAction, RunOptions, SessionControl, SessionFailure,
};
use crate::status::{ErrorDialog, MessageKind, StatusBoard};
use crate::timing::deadline_after;

pub const ERROR_TITLE: &str = "The AR session failed.";
pub const INTERRUPTED_TEXT: &str =
    "SESSION INTERRUPTED\nThe session will be reset after the interruption has ended.";
pub const INTERRUPTION_ENDED_TEXT: &str = "RESETTING SESSION";
pub const LOOK_AROUND_TEXT: &str = "Look around to detect images";

/// Debounce for session restarts.
///
/// Closes on a successful restart and reopens once the cooldown has elapsed.
#[derive(Debug, Clone)]
pub struct RestartGate {
    available: bool,
    reopen_at: Option<NaiveDateTime>,
    cooldown: TimeDelta,
}

impl RestartGate {
    pub fn new(cooldown: TimeDelta) -> Self {
        Self {
            available: true,
            reopen_at: None,
            cooldown,
        }
    }

    pub fn is_open(&self) -> bool {
        self.available
    }

    pub fn reopen_at(&self) -> Option<NaiveDateTime> {
        self.reopen_at
    }

    /// Close the gate if it is open. Returns false when already closed.
    pub fn try_close(&mut self, now: NaiveDateTime) -> bool {
        self.tick(now);
        if !self.available {
            return false;
        }
        self.available = false;
        self.reopen_at = Some(deadline_after(now, self.cooldown));
        true
    }

    pub fn tick(&mut self, now: NaiveDateTime) {
        if let Some(reopen_at) = self.reopen_at
            && reopen_at <= now
        {
            self.available = true;
            self.reopen_at = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    Restarted,
    /// Gate closed: a restart already happened within the cooldown
    Suppressed,
}

pub struct SessionRecoveryController {
    session: Box<dyn SessionControl>,
    detection: DetectionConfig,
    gate: RestartGate,
    look_around_delay: TimeDelta,
    interrupted: bool,
    reset_count: u64,
}

impl SessionRecoveryController {
    pub fn new(
        session: Box<dyn SessionControl>,
        detection: DetectionConfig,
        restart_cooldown: TimeDelta,
        look_around_delay: TimeDelta,
    ) -> Self {
        Self {
            session,
            detection,
            gate: RestartGate::new(restart_cooldown),
            look_around_delay,
            interrupted: false,
            reset_count: 0,
        }
    }

    /// Run the session for the first time. Not gated.
    pub fn start(&mut self, now: NaiveDateTime, status: &mut StatusBoard) {
        self.reset_tracking(now, status);
    }

    pub fn suspend(&mut self) {
        self.session.pause();
    }

    /// Surface a fatal error with a restart action. Returns false for
    /// failures that do not come from the AR session, which are only logged.
    pub fn handle_failure(&mut self, failure: &SessionFailure, status: &mut StatusBoard) -> bool {
        if failure.origin != FailureOrigin::Session {
            tracing::warn!(description = %failure.description, "Ignoring non-session failure");
            return false;
        }

        let message = failure.composite_message();
        tracing::error!(error = %message.replace('\n', " | "), "AR session failed");

        status.show_error(ErrorDialog {
            title: ERROR_TITLE.to_string(),
            message,
            action: RecoveryAction::RestartSession,
        });
        true
    }

    pub fn handle_interruption(&mut self, now: NaiveDateTime, status: &mut StatusBoard) {
        tracing::info!("Session interrupted");
        self.interrupted = true;
        status.show(INTERRUPTED_TEXT, None, false, now);
    }

    pub fn handle_interruption_ended(&mut self, now: NaiveDateTime, status: &mut StatusBoard) {
        tracing::info!("Session interruption ended");
        self.interrupted = false;
        status.show(INTERRUPTION_ENDED_TEXT, None, true, now);
    }

    /// Relocalization after an interruption is always attempted.
    pub fn should_attempt_relocalization(&self) -> bool {
        true
    }

    /// Reset the session unless a restart happened within the cooldown.
    pub fn restart(&mut self, now: NaiveDateTime, status: &mut StatusBoard) -> RestartOutcome {
        if !self.gate.try_close(now) {
            tracing::debug!(reopen_at = ?self.gate.reopen_at(), "Restart suppressed by cooldown");
            return RestartOutcome::Suppressed;
        }

        status.cancel_all();
        self.reset_tracking(now, status);
        RestartOutcome::Restarted
    }

    pub fn tick(&mut self, now: NaiveDateTime) {
        self.gate.tick(now);
    }

    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.gate.reopen_at()
    }

    pub fn gate(&self) -> &RestartGate {
        &self.gate
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Number of session runs issued (initial start included).
    pub fn reset_count(&self) -> u64 {
        self.reset_count
    }

    fn reset_tracking(&mut self, now: NaiveDateTime, status: &mut StatusBoard) {
        self.session.run(&self.detection, RunOptions::FULL_RESET);
        self.reset_count += 1;
        tracing::info!(
            group = %self.detection.reference_group,
            run = self.reset_count,
            "Session run with image detection"
        );

        status.schedule(
            MessageKind::ContentPlacement,
            LOOK_AROUND_TEXT,
            self.look_around_delay,
            true,
            now,
        );
    }
}
