use anchorview_types::PhysicalSize;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Opaque identity of a session-tracked anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

/// Handle of a renderable node owned by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Why tracking quality is currently limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitedReason {
    Initializing,
    ExcessiveMotion,
    InsufficientFeatures,
    Relocalizing,
}

/// Coarse pose-estimation confidence reported by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    #[default]
    NotAvailable,
    Limited(LimitedReason),
    Normal,
}

impl TrackingState {
    /// True for states that should escalate if they persist.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Short status line describing the state.
    pub fn presentation(&self) -> &'static str {
        match self {
            Self::NotAvailable => "TRACKING UNAVAILABLE",
            Self::Normal => "TRACKING NORMAL",
            Self::Limited(LimitedReason::ExcessiveMotion) => "TRACKING LIMITED\nExcessive motion",
            Self::Limited(LimitedReason::InsufficientFeatures) => "TRACKING LIMITED\nLow detail",
            Self::Limited(LimitedReason::Initializing) => "Initializing",
            Self::Limited(LimitedReason::Relocalizing) => "Recovering from interruption",
        }
    }

    /// What the user can do about the state, if anything.
    pub fn recommendation(&self) -> Option<&'static str> {
        match self {
            Self::Limited(LimitedReason::ExcessiveMotion) => {
                Some("Try slowing down your movement, or reset the session.")
            }
            Self::Limited(LimitedReason::InsufficientFeatures) => {
                Some("Try pointing at a flat surface, or reset the session.")
            }
            Self::Limited(LimitedReason::Relocalizing) => Some(
                "Return to the location where you left off or try resetting the session.",
            ),
            _ => None,
        }
    }
}

/// Physical swipe direction as recognized by the gesture layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Direction to move through the overlay catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

impl CycleDirection {
    pub fn delta(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Previous => -1,
        }
    }
}

impl From<SwipeDirection> for CycleDirection {
    fn from(swipe: SwipeDirection) -> Self {
        match swipe {
            SwipeDirection::Left => Self::Next,
            SwipeDirection::Right => Self::Previous,
        }
    }
}

/// Where a reported failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureOrigin {
    /// The AR session itself (sensor, configuration, world tracking)
    #[default]
    Session,
    /// Anything else surfaced through the session callback
    Platform,
}

/// A fatal session error as reported by the session collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFailure {
    pub origin: FailureOrigin,
    pub description: String,
    pub reason: Option<String>,
    pub suggestion: Option<String>,
}

impl SessionFailure {
    /// Join description, reason and suggestion, one per line, skipping absent
    /// or blank parts. Never empty.
    pub fn composite_message(&self) -> String {
        let parts: Vec<&str> = std::iter::once(self.description.as_str())
            .chain(self.reason.as_deref())
            .chain(self.suggestion.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            return "An unknown session error occurred.".to_string();
        }
        parts.join("\n")
    }
}

/// Action offered alongside a blocking error dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    RestartSession,
}

impl RecoveryAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RestartSession => "Restart Session",
        }
    }
}

/// Events delivered into the core by the session, gesture and UI collaborators.
#[derive(Debug, Clone)]
pub enum SessionSignal {
    // Anchor events
    AnchorFound {
        anchor: AnchorId,
        node: NodeId,
        name: Option<String>,
        physical_size: PhysicalSize,
        timestamp: NaiveDateTime,
    },

    // Session signals
    TrackingStateChanged {
        state: TrackingState,
        timestamp: NaiveDateTime,
    },
    SessionInterrupted {
        timestamp: NaiveDateTime,
    },
    SessionInterruptionEnded {
        timestamp: NaiveDateTime,
    },
    SessionFailed {
        failure: SessionFailure,
        timestamp: NaiveDateTime,
    },

    // User input
    Swipe {
        direction: SwipeDirection,
        /// Node under the gesture's hit location, if any
        target: Option<NodeId>,
        timestamp: NaiveDateTime,
    },
    RestartRequested {
        timestamp: NaiveDateTime,
    },
    RecoveryChosen {
        action: RecoveryAction,
        timestamp: NaiveDateTime,
    },
}

impl SessionSignal {
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::AnchorFound { timestamp, .. }
            | Self::TrackingStateChanged { timestamp, .. }
            | Self::SessionInterrupted { timestamp }
            | Self::SessionInterruptionEnded { timestamp }
            | Self::SessionFailed { timestamp, .. }
            | Self::Swipe { timestamp, .. }
            | Self::RestartRequested { timestamp }
            | Self::RecoveryChosen { timestamp, .. } => *timestamp,
        }
    }
}
