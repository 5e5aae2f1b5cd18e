//! Anchor binding system
//!
//! Binds each detected physical image (anchor) to the overlay it displays,
//! and moves that choice through the catalog on swipe gestures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 OverlayCatalog (loaded once)                     │
//! │             a.jpg, b.jpg, c.jpg  (sorted by file name)           │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                  SessionSignal::AnchorFound
//!                              │  binds at the global cursor
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   AnchorBinding (runtime state)                  │
//! │        "anchor 7 on node 3 shows b.jpg at 0.20 m x 0.10 m"       │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                  SessionSignal::Swipe (hit node 3)
//!                              │  moves that binding only
//!                              ▼
//!                   Placement -> scene queue
//! ```

mod binding;
pub mod tracker;

#[cfg(test)]
mod tracker_tests;

pub use binding::AnchorBinding;
pub use tracker::{AnchorTracker, CycleOutcome, Placement, wrap_index};
