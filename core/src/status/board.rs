use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};

use crate::events::{RecoveryAction, StatusSink};
use crate::timing::deadline_after;

/// Tag used to replace or cancel messages of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Escalated warning after sustained degraded tracking
    TrackingStateEscalation,
    /// Hints about finding content to place overlays on
    ContentPlacement,
}

/// A message as handed to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: Option<MessageKind>,
    pub auto_hide: bool,
}

/// A blocking error dialog with a single recovery action.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
    pub action: RecoveryAction,
}

/// Identity of one scheduled message instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleToken(u64);

#[derive(Debug)]
struct PendingMessage {
    token: ScheduleToken,
    text: String,
    auto_hide: bool,
    fire_at: NaiveDateTime,
}

#[derive(Debug)]
struct VisibleMessage {
    message: StatusMessage,
    hide_at: Option<NaiveDateTime>,
}

/// Message scheduler in front of the UI's status surface.
///
/// One visible slot; a new message replaces the previous one. At most one
/// pending message per kind; scheduling again replaces the earlier entry.
pub struct StatusBoard {
    sink: Box<dyn StatusSink>,
    display_duration: TimeDelta,
    visible: Option<VisibleMessage>,
    pending: HashMap<MessageKind, PendingMessage>,
    next_token: u64,
}

impl StatusBoard {
    pub fn new(sink: Box<dyn StatusSink>, display_duration: TimeDelta) -> Self {
        Self {
            sink,
            display_duration,
            visible: None,
            pending: HashMap::new(),
            next_token: 0,
        }
    }

    /// Show a message now, replacing the visible one.
    pub fn show(
        &mut self,
        text: impl Into<String>,
        kind: Option<MessageKind>,
        auto_hide: bool,
        now: NaiveDateTime,
    ) {
        let message = StatusMessage {
            text: text.into(),
            kind,
            auto_hide,
        };
        self.sink.show_message(&message);
        let hide_at = auto_hide.then(|| deadline_after(now, self.display_duration));
        self.visible = Some(VisibleMessage { message, hide_at });
    }

    /// Show `text` after `after` has elapsed, replacing any pending message of `kind`.
    pub fn schedule(
        &mut self,
        kind: MessageKind,
        text: impl Into<String>,
        after: TimeDelta,
        auto_hide: bool,
        now: NaiveDateTime,
    ) -> ScheduleToken {
        let token = ScheduleToken(self.next_token);
        self.next_token += 1;

        let replaced = self.pending.insert(
            kind,
            PendingMessage {
                token,
                text: text.into(),
                auto_hide,
                fire_at: deadline_after(now, after),
            },
        );
        if replaced.is_some() {
            tracing::trace!(?kind, "Re-armed scheduled message");
        }
        token
    }

    /// Drop the pending message of `kind` and hide it if it is the visible one.
    pub fn cancel(&mut self, kind: MessageKind) {
        self.pending.remove(&kind);
        if self.visible_kind() == Some(kind) {
            self.hide();
        }
    }

    /// Cancel one specific scheduled instance. Returns false if it already
    /// fired, was replaced, or was cancelled.
    pub fn cancel_token(&mut self, token: ScheduleToken) -> bool {
        let Some(kind) = self
            .pending
            .iter()
            .find_map(|(kind, p)| (p.token == token).then_some(*kind))
        else {
            return false;
        };
        self.pending.remove(&kind);
        true
    }

    /// Drop every pending message. The visible message stays.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn show_error(&mut self, dialog: ErrorDialog) {
        self.sink.show_error(&dialog);
    }

    /// Fire due messages and hide expired ones, in deadline order.
    pub fn tick(&mut self, now: NaiveDateTime) {
        loop {
            let next_fire = self
                .pending
                .iter()
                .min_by_key(|(_, p)| (p.fire_at, p.token))
                .map(|(kind, p)| (*kind, p.token, p.fire_at));
            let hide_at = self.visible.as_ref().and_then(|v| v.hide_at);

            match (next_fire, hide_at) {
                (Some((kind, token, at)), hide) if at <= now && hide.is_none_or(|h| at <= h) => {
                    self.fire(kind, token, at);
                }
                (_, Some(hide)) if hide <= now => self.hide(),
                _ => break,
            }
        }
    }

    /// Earliest moment `tick` has work to do.
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        let next_fire = self.pending.values().map(|p| p.fire_at).min();
        let hide_at = self.visible.as_ref().and_then(|v| v.hide_at);
        match (next_fire, hide_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_pending(&self, kind: MessageKind) -> bool {
        self.pending.contains_key(&kind)
    }

    pub fn visible(&self) -> Option<&StatusMessage> {
        self.visible.as_ref().map(|v| &v.message)
    }

    fn visible_kind(&self) -> Option<MessageKind> {
        self.visible.as_ref().and_then(|v| v.message.kind)
    }

    fn fire(&mut self, kind: MessageKind, token: ScheduleToken, at: NaiveDateTime) {
        // Stale instance: replaced or cancelled since it was armed
        if self.pending.get(&kind).is_none_or(|p| p.token != token) {
            return;
        }
        let Some(pending) = self.pending.remove(&kind) else {
            return;
        };
        self.show(pending.text, Some(kind), pending.auto_hide, at);
    }

    fn hide(&mut self) {
        if self.visible.take().is_some() {
            self.sink.hide_message();
        }
    }
}
