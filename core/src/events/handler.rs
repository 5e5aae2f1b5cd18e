//! Collaborator interfaces
//!
//! The core never talks to a concrete UI, session or renderer type. Each
//! collaborator is injected at construction time behind one of these traits.

use anchorview_types::RectDimensions;

use crate::catalog::OverlayImage;
use crate::status::{ErrorDialog, StatusMessage};

use super::NodeId;

/// Messaging surface of the UI layer.
pub trait StatusSink {
    /// Replace the visible status message.
    fn show_message(&mut self, message: &StatusMessage);
    /// Hide whatever status message is visible.
    fn hide_message(&mut self);
    /// Present a blocking error dialog. The user's choice comes back as
    /// `SessionSignal::RecoveryChosen`.
    fn show_error(&mut self, dialog: &ErrorDialog);
}

/// Image-detection configuration armed on every session run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Name of the reference image group to detect
    pub reference_group: String,
}

/// Options for (re)running the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub reset_tracking: bool,
    pub remove_existing_anchors: bool,
}

impl RunOptions {
    /// Full reset: forget tracking history and every anchor.
    pub const FULL_RESET: Self = Self {
        reset_tracking: true,
        remove_existing_anchors: true,
    };
}

/// Control surface of the AR session.
pub trait SessionControl {
    fn run(&mut self, detection: &DetectionConfig, options: RunOptions);
    fn pause(&mut self);
}

/// Live scene graph. Only ever called from the scene queue's worker thread.
pub trait SceneGraph: Send + 'static {
    fn apply_geometry(&mut self, node: NodeId, dims: RectDimensions, overlay: &OverlayImage);
}
