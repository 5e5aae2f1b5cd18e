mod app_config;
mod experience;

pub use app_config::ExperienceConfigExt;
pub use experience::{ArExperience, LaunchError};
