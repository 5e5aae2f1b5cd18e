pub mod anchors;
pub mod catalog;
pub mod context;
pub mod events;
pub mod placement;
pub mod scene;
pub mod signal_processor;
pub mod status;
pub mod timing;

#[cfg(test)]
mod test_utils;

// Re-exports for convenience
pub use anchors::{AnchorBinding, AnchorTracker, CycleOutcome, Placement};
pub use catalog::{CatalogError, OverlayCatalog, OverlayImage};
pub use context::{ArExperience, ExperienceConfigExt, LaunchError};
pub use events::{
    AnchorId, CycleDirection, NodeId, SceneGraph, SessionControl, SessionSignal, StatusSink,
    TrackingState,
};
pub use placement::{PlacementError, compute_geometry};
pub use scene::{SceneQueue, SceneQueueError};
pub use status::{MessageKind, StatusBoard, StatusMessage};
