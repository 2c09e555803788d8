//! Configuration and file management for ash
//!
//! This crate provides:
//! - Configuration file lookup and loading (TOML)
//! - Application configuration (AppConfig)
//! - Directories for config and review work files

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{config_file_candidates, load_config_file};
pub use paths::{app_config_path, config_dir, review_work_dir};
