use anchorview_types::PhysicalSize;
use chrono::NaiveDateTime;

use crate::events::{AnchorId, NodeId};

/// One physical anchor currently tracked by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorBinding {
    pub anchor: AnchorId,
    /// Renderable node owned by the rendering layer
    pub node: NodeId,
    /// Reference image name, when the session reports one
    pub name: Option<String>,
    pub physical_size: PhysicalSize,
    /// Index of the displayed overlay, always in `[0, catalog.len())`
    pub overlay_index: usize,
    pub bound_at: NaiveDateTime,
}
