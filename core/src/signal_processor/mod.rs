//! Session signal processing
//!
//! Two small state machines consume session signals:
//! - **Tracking quality**: info message on every change, delayed escalation
//!   while tracking stays degraded
//! - **Recovery**: fatal errors, interruptions, and gated session restarts

mod recovery;
mod tracking_quality;

pub use recovery::{RestartGate, RestartOutcome, SessionRecoveryController};
pub use tracking_quality::TrackingQualityMonitor;
