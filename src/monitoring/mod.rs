//! Monitoring API client, entity models and chart dimensions

pub mod client;
pub mod dims;
mod impl_monitoring_api;
pub mod models;
pub mod traits;

pub use client::MonitoringClient;
pub use models::*;
pub use traits::MonitoringApi;

#[cfg(test)]
pub(crate) mod mock;
