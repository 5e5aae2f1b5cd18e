//! Status messaging
//!
//! The `StatusBoard` owns the UI's message surface and every message timer:
//! delayed messages, auto-hide, and cancellation by kind.

mod board;

#[cfg(test)]
mod board_tests;

pub use board::{ErrorDialog, MessageKind, ScheduleToken, StatusBoard, StatusMessage};
