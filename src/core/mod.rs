pub mod client;
pub mod rate_limiter;
pub mod time_unit;

pub use crate::domain::model::{Description, Document, Product};
pub use crate::domain::ports::{ApiRequest, ApiResponse, ConfigProvider, Transport};
pub use crate::utils::error::Result;
