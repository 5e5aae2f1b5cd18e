//! Tests for the anchor binding tracker
//!
//! Covers cursor cycling, per-anchor rebinding and geometry on bind.

use anchorview_types::PhysicalSize;

use super::tracker::{AnchorTracker, CycleOutcome, wrap_index};
use crate::events::{AnchorId, CycleDirection, NodeId};
use crate::placement::PlacementError;
use crate::test_utils::{at, catalog, t0};

fn make_tracker(count: usize) -> AnchorTracker {
    let sizes: Vec<(u32, u32)> = (0..count).map(|_| (400, 200)).collect();
    AnchorTracker::new(catalog(&sizes))
}

fn postcard() -> PhysicalSize {
    PhysicalSize::new(0.2, 0.1)
}

fn find(tracker: &mut AnchorTracker, id: u64) -> usize {
    tracker
        .on_anchor_found(AnchorId(id), NodeId(id * 10), None, postcard(), t0())
        .unwrap()
        .overlay_index
}

// ─────────────────────────────────────────────────────────────────────────────
// Index wrapping
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_wrap_index_handles_both_directions() {
    assert_eq!(wrap_index(2, 1, 3), 0);
    assert_eq!(wrap_index(0, -1, 3), 2);
    assert_eq!(wrap_index(1, -1, 3), 0);
    assert_eq!(wrap_index(0, 1, 1), 0);
    assert_eq!(wrap_index(0, -1, 1), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Cursor cycling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_cycle_next_wraps_around_catalog() {
    let mut tracker = make_tracker(3);
    let mut seen = vec![tracker.cursor()];

    for _ in 0..3 {
        tracker.cycle(CycleDirection::Next, None).unwrap();
        seen.push(tracker.cursor());
    }

    assert_eq!(seen, vec![0, 1, 2, 0]);
}

#[test]
fn test_cycle_previous_from_zero_wraps_to_last() {
    let mut tracker = make_tracker(3);
    let outcome = tracker.cycle(CycleDirection::Previous, None).unwrap();

    assert!(matches!(outcome, CycleOutcome::CursorMoved { cursor: 2 }));
}

#[test]
fn test_next_then_previous_returns_to_start() {
    for len in 1..6 {
        let mut tracker = make_tracker(len);
        for start in 0..len {
            while tracker.cursor() != start {
                tracker.cycle(CycleDirection::Next, None).unwrap();
            }
            tracker.cycle(CycleDirection::Next, None).unwrap();
            tracker.cycle(CycleDirection::Previous, None).unwrap();
            assert_eq!(tracker.cursor(), start, "len {len}");
        }
    }
}

#[test]
fn test_indices_stay_in_range_over_long_sequences() {
    let mut tracker = make_tracker(4);
    find(&mut tracker, 1);

    // Fixed pseudo-random walk mixing targeted and untargeted gestures
    let mut seed: u64 = 0x2545_f491;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let direction = if seed >> 63 == 0 {
            CycleDirection::Next
        } else {
            CycleDirection::Previous
        };
        let target = ((seed >> 62) & 1 == 1).then_some(NodeId(10));
        tracker.cycle(direction, target).unwrap();

        assert!(tracker.cursor() < 4);
        assert!(tracker.binding(AnchorId(1)).unwrap().overlay_index < 4);
    }
}

#[test]
fn test_single_image_catalog_always_shows_it() {
    let mut tracker = make_tracker(1);
    tracker.cycle(CycleDirection::Next, None).unwrap();
    tracker.cycle(CycleDirection::Previous, None).unwrap();

    assert_eq!(tracker.cursor(), 0);
    assert_eq!(find(&mut tracker, 1), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Binding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_new_anchor_binds_at_cursor() {
    let mut tracker = make_tracker(3);
    assert_eq!(find(&mut tracker, 1), 0);

    tracker.cycle(CycleDirection::Next, None).unwrap();
    tracker.cycle(CycleDirection::Next, None).unwrap();
    assert_eq!(find(&mut tracker, 2), 2);
    assert_eq!(tracker.len(), 2);
}

#[test]
fn test_anchor_found_computes_geometry() {
    let mut tracker = make_tracker(3);
    let placement = tracker
        .on_anchor_found(
            AnchorId(7),
            NodeId(3),
            Some("poster".to_string()),
            postcard(),
            t0(),
        )
        .unwrap();

    assert_eq!(placement.node, NodeId(3));
    assert_eq!(placement.overlay.name(), "overlay_0");
    assert!((placement.dims.width - 0.2).abs() < 1e-12);
    assert!((placement.dims.height - 0.1).abs() < 1e-12);
    assert_eq!(
        tracker.binding_for_node(NodeId(3)).unwrap().name.as_deref(),
        Some("poster")
    );
}

#[test]
fn test_untargeted_cycle_leaves_existing_bindings() {
    let mut tracker = make_tracker(3);
    find(&mut tracker, 1);

    let outcome = tracker.cycle(CycleDirection::Next, None).unwrap();

    assert!(matches!(outcome, CycleOutcome::CursorMoved { cursor: 1 }));
    assert_eq!(tracker.binding(AnchorId(1)).unwrap().overlay_index, 0);
}

#[test]
fn test_unknown_target_moves_cursor_only() {
    let mut tracker = make_tracker(3);
    find(&mut tracker, 1);

    let outcome = tracker.cycle(CycleDirection::Next, Some(NodeId(999))).unwrap();

    assert!(matches!(outcome, CycleOutcome::CursorMoved { cursor: 1 }));
    assert_eq!(tracker.binding(AnchorId(1)).unwrap().overlay_index, 0);
}

#[test]
fn test_targeted_cycle_rebinds_and_syncs_cursor() {
    let mut tracker = make_tracker(3);
    find(&mut tracker, 1);
    find(&mut tracker, 2);

    let outcome = tracker.cycle(CycleDirection::Previous, Some(NodeId(20))).unwrap();
    let CycleOutcome::Rebound(placement) = outcome else {
        panic!("expected a rebind, got {outcome:?}");
    };

    assert_eq!(placement.anchor, AnchorId(2));
    assert_eq!(placement.overlay_index, 2);
    assert_eq!(placement.overlay.name(), "overlay_2");
    assert_eq!(tracker.cursor(), 2);
    assert_eq!(tracker.binding(AnchorId(1)).unwrap().overlay_index, 0);
}

#[test]
fn test_duplicate_anchor_found_keeps_overlay() {
    let mut tracker = make_tracker(3);
    find(&mut tracker, 1);
    tracker.cycle(CycleDirection::Next, Some(NodeId(10))).unwrap();
    tracker.cycle(CycleDirection::Next, None).unwrap();

    let placement = tracker
        .on_anchor_found(AnchorId(1), NodeId(11), None, PhysicalSize::new(0.4, 0.2), at(5.0))
        .unwrap();

    assert_eq!(placement.overlay_index, 1);
    assert!((placement.dims.height - 0.2).abs() < 1e-12);
    assert_eq!(tracker.len(), 1);
    assert!(tracker.binding_for_node(NodeId(10)).is_none());
    assert_eq!(tracker.binding_for_node(NodeId(11)).unwrap().anchor, AnchorId(1));
}

#[test]
fn test_clear_drops_bindings_but_keeps_cursor() {
    let mut tracker = make_tracker(3);
    find(&mut tracker, 1);
    tracker.cycle(CycleDirection::Next, None).unwrap();

    tracker.clear();

    assert!(tracker.is_empty());
    assert!(tracker.binding_for_node(NodeId(10)).is_none());
    assert_eq!(tracker.cursor(), 1);
    assert!(matches!(
        tracker.cycle(CycleDirection::Next, Some(NodeId(10))).unwrap(),
        CycleOutcome::CursorMoved { cursor: 2 }
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Invalid assets
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_zero_height_overlay_is_invalid_asset() {
    let mut tracker = AnchorTracker::new(catalog(&[(400, 0)]));

    let err = tracker
        .on_anchor_found(AnchorId(1), NodeId(10), None, postcard(), t0())
        .unwrap_err();

    assert_eq!(err, PlacementError::InvalidAsset { width: 400, height: 0 });
    // The anchor stays bound; only the geometry is missing
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_rebinding_onto_invalid_asset_reports_error() {
    let mut tracker = AnchorTracker::new(catalog(&[(400, 200), (400, 0)]));
    find(&mut tracker, 1);

    let err = tracker.cycle(CycleDirection::Next, Some(NodeId(10))).unwrap_err();

    assert!(matches!(err, PlacementError::InvalidAsset { .. }));
    assert_eq!(tracker.binding(AnchorId(1)).unwrap().overlay_index, 1);
}
