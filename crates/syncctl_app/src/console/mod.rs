mod app;
mod config;
mod input;
mod logging;
mod render;

pub use app::run_app;
