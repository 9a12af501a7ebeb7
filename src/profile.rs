use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::error;
use uuid::Uuid;

/// The only state that survives navigation: the display name chosen at
/// login and the device key attached to click reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub device_key: String,
}

impl Profile {
    pub fn generate() -> Self {
        Self {
            display_name: None,
            device_key: Uuid::new_v4().to_string(),
        }
    }
}

pub fn resolve_profile_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("PROFILE_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/profile.json"))
}

/// Loads the profile, generating a fresh one when the file is missing or
/// unreadable. A stored profile without a device key gets one assigned.
pub async fn load_profile(path: &Path) -> Profile {
    let mut profile = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(profile) => profile,
            Err(err) => {
                error!("failed to parse profile file: {err}");
                Profile::generate()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Profile::generate(),
        Err(err) => {
            error!("failed to read profile file: {err}");
            Profile::generate()
        }
    };

    if profile.device_key.is_empty() {
        profile.device_key = Uuid::new_v4().to_string();
    }
    profile
}

pub async fn persist_profile(path: &Path, profile: &Profile) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(profile).map_err(AppError::internal)?;
    fs::write(path, payload).await?;
    Ok(())
}
