pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::pipeline::{Pipeline, RunReport};
