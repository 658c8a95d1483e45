pub mod config;
pub mod error;
pub mod scoring;
pub mod submissions;
pub mod table;
pub mod telemetry;
