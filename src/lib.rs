pub mod config;
pub mod dataset;
pub mod error;
pub mod estimator;
pub mod i18n;
pub mod output;
pub mod overview;
pub mod scenario;
pub mod server;
