//! Personal finance tracking API: user registration, JWT login and
//! per-user expenditure records.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod expenditures;
pub mod state;
pub mod storage;
pub mod validation;

pub use app::build_app;
pub use state::AppState;
