mod app;
mod config;
mod desktop;
mod logging;

pub use app::run_app;
