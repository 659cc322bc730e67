pub mod browser;
pub mod charts;
pub mod config;
pub mod github;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod repo;
pub mod summary;
