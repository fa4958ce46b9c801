pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::ReqwestTransport;
pub use crate::config::ClientConfig;
pub use crate::core::{client::CrptApi, rate_limiter::RateLimiter, time_unit::TimeUnit};
pub use crate::domain::model::{Description, Document, Product};
pub use crate::utils::error::{CrptError, Result};
