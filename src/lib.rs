// Library for tests to access modules

pub mod config;
pub mod error;
pub mod line_source;
pub mod liveness;
pub mod models;
pub mod monitor;
pub mod parser;
pub mod store;
pub mod telemetry_repo;
pub mod worker;
