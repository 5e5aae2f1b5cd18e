//! Shared types for anchorview
//!
//! Configuration and geometry value types used by both the core state
//! machines and the binaries that drive them.

pub mod config;
pub mod formatting;
pub mod geometry;

pub use config::{ExperienceConfig, TimingConfig};
pub use geometry::{PhysicalSize, PixelSize, RectDimensions};
