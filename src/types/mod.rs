pub mod artifact;
pub mod config;
pub mod metrics;
pub mod record;
