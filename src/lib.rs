pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod selection;
pub mod state;
pub mod storage;
pub mod submission;
pub mod ui;
pub mod upstream;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{load_catalog, load_selection};
