pub mod handler;
pub mod signal;

pub use handler::{DetectionConfig, RunOptions, SceneGraph, SessionControl, StatusSink};
pub use signal::{
    AnchorId, CycleDirection, FailureOrigin, LimitedReason, NodeId, RecoveryAction,
    SessionFailure, SessionSignal, SwipeDirection, TrackingState,
};
