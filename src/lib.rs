pub mod advisor;
pub mod artifact;
pub mod collector;
pub mod config;
pub mod error;
