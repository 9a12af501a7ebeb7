pub mod api;
pub mod app;
pub mod errors;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod profile;
pub mod ui;
pub mod state;

pub use api::ApiClient;
pub use app::router;
pub use profile::{load_profile, resolve_profile_path};
pub use state::AppState;
