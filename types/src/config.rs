//! Experience configuration
//!
//! Persisted with confy by the core crate (see `ExperienceConfigExt`).
//! Every field has a default so partial config files stay valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for an AR overlay experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Directory holding the overlay images cycled by swipes
    pub overlay_directory: String,
    /// File extension of eligible overlay images (without the dot)
    pub overlay_extension: String,
    /// Name of the reference image group armed for detection
    pub reference_group: String,
    pub timing: TimingConfig,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            overlay_directory: "Images".to_string(),
            overlay_extension: "jpg".to_string(),
            reference_group: "AR Resources".to_string(),
            timing: TimingConfig::default(),
        }
    }
}

/// Delays and durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Sustained degraded tracking before the escalated warning shows
    pub escalation_delay_secs: f32,
    /// Window after a restart during which further restarts are ignored
    pub restart_cooldown_secs: f32,
    /// How long auto-hiding messages stay visible
    pub message_display_secs: f32,
    /// Delay before the "look around" hint after a session (re)start
    pub look_around_hint_secs: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            escalation_delay_secs: 3.0,
            restart_cooldown_secs: 5.0,
            message_display_secs: 6.0,
            look_around_hint_secs: 7.5,
        }
    }
}
