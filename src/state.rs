use crate::api::ApiClient;
use crate::profile::Profile;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub profile_path: PathBuf,
    pub profile: Arc<Mutex<Profile>>,
}

impl AppState {
    pub fn new(api: ApiClient, profile_path: PathBuf, profile: Profile) -> Self {
        Self {
            api,
            profile_path,
            profile: Arc::new(Mutex::new(profile)),
        }
    }
}
