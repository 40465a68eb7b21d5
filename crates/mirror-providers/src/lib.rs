pub mod auth;
pub mod github;
mod github_models;
mod http;

pub use github::{DEFAULT_API_BASE, GitHubClient};
