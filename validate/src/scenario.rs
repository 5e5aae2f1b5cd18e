//! Scripted session scenarios
//!
//! A scenario is a TOML file of steps, each offset in seconds from the
//! scenario start:
//!
//! ```toml
//! start = "2025-01-01T12:00:00"
//!
//! [[step]]
//! at = 0.0
//! event = "start"
//!
//! [[step]]
//! at = 1.5
//! event = "anchor_found"
//! anchor = 1
//! name = "poster"
//! width = 0.2
//! height = 0.1
//! ```

use std::path::Path;

use anchorview_core::events::{
    AnchorId, FailureOrigin, NodeId, RecoveryAction, SessionFailure, SessionSignal,
    SwipeDirection, TrackingState,
};
use anchorview_types::PhysicalSize;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Wall-clock time of offset 0
    #[serde(default)]
    pub start: Option<NaiveDateTime>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Seconds since scenario start
    pub at: f64,
    #[serde(flatten)]
    pub event: StepEvent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StepEvent {
    /// First session run
    Start,
    Suspend,
    /// Advance the clock without a signal
    Tick,
    AnchorFound {
        anchor: u64,
        /// Defaults to the anchor id
        node: Option<u64>,
        name: Option<String>,
        width: f64,
        height: f64,
    },
    Tracking {
        state: TrackingState,
    },
    Interrupted,
    InterruptionEnded,
    Failed {
        description: String,
        reason: Option<String>,
        suggestion: Option<String>,
        #[serde(default)]
        origin: FailureOrigin,
    },
    Swipe {
        direction: SwipeDirection,
        target: Option<u64>,
    },
    Restart,
    /// User picked "Restart Session" in the error dialog
    Recover,
}

/// What the replay loop does with one step.
#[derive(Debug, Clone)]
pub enum Action {
    Start,
    Suspend,
    Tick,
    Signal(SessionSignal),
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario {}: {}", path.display(), e))?;
        Self::parse(&contents).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        let mut scenario: Scenario = toml::from_str(contents).map_err(|e| e.to_string())?;

        if let Some(step) = scenario.steps.iter().find(|s| !s.at.is_finite() || s.at < 0.0) {
            return Err(format!("step offset must be a non-negative number, got {}", step.at));
        }
        let start = scenario.start_time();
        if let Some(step) = scenario
            .steps
            .iter()
            .find(|s| offset_from(start, s.at).is_none())
        {
            return Err(format!("step offset {} is out of range", step.at));
        }
        // Stable: steps at the same offset keep file order
        scenario.steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(scenario)
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start.unwrap_or_else(default_start)
    }

    /// Absolute time of a step offset, saturating at the latest
    /// representable time.
    pub fn time_at(&self, offset_secs: f64) -> NaiveDateTime {
        offset_from(self.start_time(), offset_secs).unwrap_or(NaiveDateTime::MAX)
    }

    /// Steps resolved to absolute times, in replay order.
    pub fn actions(&self) -> Vec<(NaiveDateTime, Action)> {
        self.steps
            .iter()
            .map(|step| {
                let now = self.time_at(step.at);
                (now, step.event.to_action(now))
            })
            .collect()
    }

    /// Offset of the last step, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.steps.last().map(|s| s.at).unwrap_or(0.0)
    }
}

impl StepEvent {
    fn to_action(&self, timestamp: NaiveDateTime) -> Action {
        let signal = match self {
            Self::Start => return Action::Start,
            Self::Suspend => return Action::Suspend,
            Self::Tick => return Action::Tick,
            Self::AnchorFound {
                anchor,
                node,
                name,
                width,
                height,
            } => SessionSignal::AnchorFound {
                anchor: AnchorId(*anchor),
                node: NodeId(node.unwrap_or(*anchor)),
                name: name.clone(),
                physical_size: PhysicalSize::new(*width, *height),
                timestamp,
            },
            Self::Tracking { state } => SessionSignal::TrackingStateChanged {
                state: *state,
                timestamp,
            },
            Self::Interrupted => SessionSignal::SessionInterrupted { timestamp },
            Self::InterruptionEnded => SessionSignal::SessionInterruptionEnded { timestamp },
            Self::Failed {
                description,
                reason,
                suggestion,
                origin,
            } => SessionSignal::SessionFailed {
                failure: SessionFailure {
                    origin: *origin,
                    description: description.clone(),
                    reason: reason.clone(),
                    suggestion: suggestion.clone(),
                },
                timestamp,
            },
            Self::Swipe { direction, target } => SessionSignal::Swipe {
                direction: *direction,
                target: target.map(NodeId),
                timestamp,
            },
            Self::Restart => SessionSignal::RestartRequested { timestamp },
            Self::Recover => SessionSignal::RecoveryChosen {
                action: RecoveryAction::RestartSession,
                timestamp,
            },
        };
        Action::Signal(signal)
    }
}

fn offset_from(start: NaiveDateTime, secs: f64) -> Option<NaiveDateTime> {
    let millis = (secs * 1000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    start.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)
}

fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}
