use std::path::{Path, PathBuf};

use anchorview_types::ExperienceConfig;

use crate::events::DetectionConfig;

const APP_NAME: &str = "anchorview";

/// Persistence and path resolution for [`ExperienceConfig`].
pub trait ExperienceConfigExt: Sized {
    /// Load from the user's config directory, falling back to defaults.
    fn load() -> Self;
    fn save(&self) -> Result<(), confy::ConfyError>;
    /// Absolute overlay directory.
    ///
    /// Relative paths are looked up next to the executable first, then under
    /// the user's data directory.
    fn resolve_overlay_dir(&self) -> PathBuf;
    fn detection(&self) -> DetectionConfig;
}

impl ExperienceConfigExt for ExperienceConfig {
    fn load() -> Self {
        match confy::load(APP_NAME, None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, None, self)
    }

    fn resolve_overlay_dir(&self) -> PathBuf {
        let configured = Path::new(&self.overlay_directory);
        if configured.is_absolute() {
            return configured.to_path_buf();
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join(configured)));
        if let Some(dir) = beside_exe.filter(|d| d.is_dir()) {
            return dir;
        }

        dirs::data_dir()
            .map(|p| p.join(APP_NAME).join(configured))
            .filter(|d| d.is_dir())
            .unwrap_or_else(|| configured.to_path_buf())
    }

    fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            reference_group: self.reference_group.clone(),
        }
    }
}
