pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::app::pipelines::order_pipeline::OrderPipeline;
pub use crate::core::etl::EtlEngine;
pub use crate::domain::model::{
    CustomerGrouping, CustomerRecord, OrderReport, OrderSummary, PricePairing, ReportFormat,
};
pub use crate::utils::error::{EtlError, Result};
