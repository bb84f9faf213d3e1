pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod models;
pub mod progress;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
pub use services::{ClientConfig, FuzzworkClient};
