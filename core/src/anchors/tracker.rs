//! Anchor binding tracker
//!
//! Owns the mapping from session anchors to their displayed overlay. The
//! per-anchor overlay index is the source of truth; the global cursor is only
//! the default handed to anchors bound in the future and is never applied
//! retroactively to existing bindings.

use std::collections::HashMap;
use std::sync::Arc;

use anchorview_types::{PhysicalSize, RectDimensions};
use chrono::NaiveDateTime;

use crate::catalog::{OverlayCatalog, OverlayImage};
use crate::events::{AnchorId, CycleDirection, NodeId};
use crate::placement::{PlacementError, compute_geometry};

use super::AnchorBinding;

/// Wrap `index + delta` into `[0, len)`, negative deltas included.
///
/// Equivalent to `((index + delta) % len + len) % len`.
pub fn wrap_index(index: usize, delta: isize, len: usize) -> usize {
    debug_assert!(len > 0, "wrap_index on an empty catalog");
    if len == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(len as isize) as usize
}

/// Geometry to apply to one anchor's node.
#[derive(Debug, Clone)]
pub struct Placement {
    pub anchor: AnchorId,
    pub node: NodeId,
    pub overlay_index: usize,
    pub dims: RectDimensions,
    pub overlay: Arc<OverlayImage>,
}

/// Result of a swipe through the catalog.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// The gesture hit a bound node; its overlay changed
    Rebound(Placement),
    /// The gesture hit nothing; only the default for future anchors moved
    CursorMoved { cursor: usize },
}

#[derive(Debug)]
pub struct AnchorTracker {
    catalog: Arc<OverlayCatalog>,
    /// Overlay index given to newly bound anchors
    cursor: usize,
    bindings: HashMap<AnchorId, AnchorBinding>,
    /// Node -> anchor, for resolving gesture hit targets
    nodes: HashMap<NodeId, AnchorId>,
}

impl AnchorTracker {
    pub fn new(catalog: Arc<OverlayCatalog>) -> Self {
        Self {
            catalog,
            cursor: 0,
            bindings: HashMap::new(),
            nodes: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<OverlayCatalog> {
        &self.catalog
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn binding(&self, anchor: AnchorId) -> Option<&AnchorBinding> {
        self.bindings.get(&anchor)
    }

    pub fn binding_for_node(&self, node: NodeId) -> Option<&AnchorBinding> {
        self.nodes.get(&node).and_then(|anchor| self.bindings.get(anchor))
    }

    pub fn bindings(&self) -> impl Iterator<Item = &AnchorBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind a newly found anchor at the current cursor and compute its geometry.
    ///
    /// A repeated event for a known anchor keeps its overlay and refreshes
    /// node, name and physical size. The binding exists even when geometry
    /// fails; the caller just has nothing to apply.
    pub fn on_anchor_found(
        &mut self,
        anchor: AnchorId,
        node: NodeId,
        name: Option<String>,
        physical_size: PhysicalSize,
        now: NaiveDateTime,
    ) -> Result<Placement, PlacementError> {
        let overlay_index = match self.bindings.get(&anchor) {
            Some(existing) => {
                tracing::debug!(?anchor, "Anchor found again, keeping its overlay");
                if existing.node != node {
                    self.nodes.remove(&existing.node);
                }
                existing.overlay_index
            }
            None => self.cursor,
        };

        let binding = AnchorBinding {
            anchor,
            node,
            name,
            physical_size,
            overlay_index,
            bound_at: now,
        };
        let placement = placement_for(&self.catalog, &binding);
        self.nodes.insert(node, anchor);
        self.bindings.insert(anchor, binding);

        placement
    }

    /// Move one step through the catalog.
    ///
    /// With a target that resolves to a binding, that binding advances and
    /// the cursor follows it, so the next anchor found starts from the user's
    /// latest choice. Without a target only the cursor moves.
    pub fn cycle(
        &mut self,
        direction: CycleDirection,
        target: Option<NodeId>,
    ) -> Result<CycleOutcome, PlacementError> {
        let len = self.catalog.len();
        let delta = direction.delta();

        let Some(anchor) = target.and_then(|node| self.nodes.get(&node).copied()) else {
            if let Some(node) = target {
                tracing::debug!(?node, "Gesture target is not a bound node");
            }
            self.cursor = wrap_index(self.cursor, delta, len);
            return Ok(CycleOutcome::CursorMoved {
                cursor: self.cursor,
            });
        };

        let Some(binding) = self.bindings.get_mut(&anchor) else {
            // Node index and bindings are updated together
            tracing::error!(?anchor, "BUG: node maps to an unbound anchor");
            self.cursor = wrap_index(self.cursor, delta, len);
            return Ok(CycleOutcome::CursorMoved {
                cursor: self.cursor,
            });
        };

        binding.overlay_index = wrap_index(binding.overlay_index, delta, len);
        self.cursor = binding.overlay_index;

        placement_for(&self.catalog, binding).map(CycleOutcome::Rebound)
    }

    /// Forget every binding. Called when the session drops its anchors.
    /// The cursor is kept.
    pub fn clear(&mut self) {
        if !self.bindings.is_empty() {
            tracing::debug!(count = self.bindings.len(), "Clearing anchor bindings");
        }
        self.bindings.clear();
        self.nodes.clear();
    }
}

fn placement_for(
    catalog: &OverlayCatalog,
    binding: &AnchorBinding,
) -> Result<Placement, PlacementError> {
    let overlay = Arc::clone(catalog.at(binding.overlay_index));
    let dims = compute_geometry(overlay.size(), binding.physical_size)?;

    Ok(Placement {
        anchor: binding.anchor,
        node: binding.node,
        overlay_index: binding.overlay_index,
        dims,
        overlay,
    })
}
