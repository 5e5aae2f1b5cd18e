//! Tests for the status board
//!
//! Covers replacement by kind, cooperative cancellation and auto-hide timing.

use chrono::TimeDelta;

use super::board::{MessageKind, StatusBoard};
use crate::test_utils::{RecordingSink, UiEvent, at, t0};

fn make_board() -> (StatusBoard, RecordingSink) {
    let sink = RecordingSink::default();
    let board = StatusBoard::new(Box::new(sink.clone()), TimeDelta::seconds(6));
    (board, sink)
}

// ─────────────────────────────────────────────────────────────────────────────
// Immediate messages
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_show_replaces_visible_message() {
    let (mut board, sink) = make_board();

    board.show("first", None, false, t0());
    board.show("second", None, false, at(1.0));

    assert_eq!(sink.shown_texts(), vec!["first", "second"]);
    assert_eq!(board.visible().unwrap().text, "second");
}

#[test]
fn test_auto_hide_after_display_duration() {
    let (mut board, sink) = make_board();
    board.show("hello", None, true, t0());

    board.tick(at(5.9));
    assert!(board.visible().is_some());

    board.tick(at(6.0));
    assert!(board.visible().is_none());
    assert_eq!(sink.events().last(), Some(&UiEvent::Hidden));
}

#[test]
fn test_persistent_message_never_auto_hides() {
    let (mut board, sink) = make_board();
    board.show("stay", None, false, t0());

    board.tick(at(3600.0));
    assert_eq!(board.visible().unwrap().text, "stay");
    assert!(!sink.events().contains(&UiEvent::Hidden));
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduled messages
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_scheduled_message_fires_at_deadline() {
    let (mut board, sink) = make_board();
    board.schedule(MessageKind::ContentPlacement, "look", TimeDelta::seconds(3), true, t0());

    board.tick(at(2.999));
    assert!(sink.shown_texts().is_empty());
    assert_eq!(board.next_deadline(), Some(at(3.0)));

    board.tick(at(3.0));
    assert_eq!(sink.shown_texts(), vec!["look"]);
    assert_eq!(board.visible().unwrap().kind, Some(MessageKind::ContentPlacement));
    assert!(!board.is_pending(MessageKind::ContentPlacement));
}

#[test]
fn test_rescheduling_same_kind_replaces_previous() {
    let (mut board, sink) = make_board();
    board.schedule(MessageKind::ContentPlacement, "old", TimeDelta::seconds(3), true, t0());
    board.schedule(MessageKind::ContentPlacement, "new", TimeDelta::seconds(3), true, at(2.0));

    board.tick(at(4.0));
    assert!(sink.shown_texts().is_empty(), "re-armed timer restarts the delay");

    board.tick(at(5.0));
    assert_eq!(sink.shown_texts(), vec!["new"]);
}

#[test]
fn test_cancel_kind_hides_visible_message_of_that_kind() {
    let (mut board, sink) = make_board();
    board.schedule(
        MessageKind::TrackingStateEscalation,
        "warn",
        TimeDelta::seconds(3),
        false,
        t0(),
    );
    board.tick(at(3.0));
    assert_eq!(board.visible().unwrap().text, "warn");

    board.cancel(MessageKind::TrackingStateEscalation);
    assert!(board.visible().is_none());
    assert_eq!(sink.events().last(), Some(&UiEvent::Hidden));
}

#[test]
fn test_cancel_kind_keeps_unrelated_visible_message() {
    let (mut board, sink) = make_board();
    board.show("info", None, false, t0());

    board.cancel(MessageKind::TrackingStateEscalation);
    assert_eq!(board.visible().unwrap().text, "info");
    assert!(!sink.events().contains(&UiEvent::Hidden));
}

#[test]
fn test_cancelled_token_never_fires() {
    let (mut board, sink) = make_board();
    let token = board.schedule(
        MessageKind::ContentPlacement,
        "x",
        TimeDelta::seconds(1),
        true,
        t0(),
    );

    assert!(board.cancel_token(token));
    assert!(!board.cancel_token(token));

    board.tick(at(10.0));
    assert!(sink.shown_texts().is_empty());
}

#[test]
fn test_stale_token_does_not_cancel_replacement() {
    let (mut board, sink) = make_board();
    let old = board.schedule(
        MessageKind::ContentPlacement,
        "old",
        TimeDelta::seconds(1),
        true,
        t0(),
    );
    board.schedule(MessageKind::ContentPlacement, "new", TimeDelta::seconds(1), true, t0());

    assert!(!board.cancel_token(old));
    board.tick(at(1.0));
    assert_eq!(sink.shown_texts(), vec!["new"]);
}

#[test]
fn test_cancel_all_drops_pending_but_keeps_visible() {
    let (mut board, sink) = make_board();
    board.show("visible", None, false, t0());
    board.schedule(MessageKind::ContentPlacement, "a", TimeDelta::seconds(1), true, t0());
    board.schedule(MessageKind::TrackingStateEscalation, "b", TimeDelta::seconds(2), false, t0());

    board.cancel_all();
    board.tick(at(10.0));

    assert_eq!(sink.shown_texts(), vec!["visible"]);
    assert!(board.next_deadline().is_none());
}

#[test]
fn test_tick_processes_deadlines_in_order() {
    let (mut board, sink) = make_board();
    board.show("info", None, true, t0()); // hides at 6.0
    board.schedule(MessageKind::ContentPlacement, "hint", TimeDelta::seconds(8), true, t0());

    // One late tick covers the hide at 6.0 then the hint at 8.0 (which hides at 14.0)
    board.tick(at(9.0));
    assert_eq!(
        sink.events(),
        vec![
            UiEvent::Shown(crate::status::StatusMessage {
                text: "info".to_string(),
                kind: None,
                auto_hide: true,
            }),
            UiEvent::Hidden,
            UiEvent::Shown(crate::status::StatusMessage {
                text: "hint".to_string(),
                kind: Some(MessageKind::ContentPlacement),
                auto_hide: true,
            }),
        ]
    );
    assert_eq!(board.next_deadline(), Some(at(14.0)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Out-of-range deadlines
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unrepresentable_delay_saturates_instead_of_panicking() {
    let (mut board, sink) = make_board();
    board.schedule(MessageKind::TrackingStateEscalation, "late", TimeDelta::MAX, false, t0());

    assert_eq!(board.next_deadline(), Some(chrono::NaiveDateTime::MAX));
    board.tick(at(86_400.0));
    assert!(sink.shown_texts().is_empty());
    assert!(board.is_pending(MessageKind::TrackingStateEscalation));
}

#[test]
fn test_unrepresentable_display_duration_keeps_message_visible() {
    let sink = RecordingSink::default();
    let mut board = StatusBoard::new(Box::new(sink.clone()), TimeDelta::MAX);

    board.show("hello", None, true, t0());
    board.tick(at(3600.0));

    assert_eq!(board.visible().unwrap().text, "hello");
}
