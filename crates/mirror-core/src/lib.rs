pub mod cache;
pub mod config;
pub mod daemon;
pub mod error;
pub mod lockfile;
pub mod model;
pub mod provider;
pub mod repo_list;
pub mod scheduler;
pub mod sync_engine;
