//! Backend for the CV SaaS application: account registration, OAuth2-style
//! password login issuing JWTs, and the product feedback survey.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod feedback;
pub mod state;

pub use app::build_app;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Reversible migrations under `./migrations`, applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
