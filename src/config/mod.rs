pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{CustomerGrouping, PricePairing, ReportFormat};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT_PATH: &str = "Input.xml";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "order-extract")]
#[command(about = "Extract order summary and customer contacts from an XML purchase order")]
pub struct CliConfig {
    #[arg(default_value = DEFAULT_INPUT_PATH, help = "Path to the XML purchase order")]
    pub input: String,

    #[arg(long, default_value = "text", help = "Report format: text, json or csv")]
    pub format: ReportFormat,

    #[arg(long, help = "Write the report to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, default_value = "truncate", help = "USPrice/Order_Quantity pairing: truncate or strict")]
    pub price_pairing: PricePairing,

    #[arg(long, default_value = "positional", help = "Customer pairing: positional or grouped")]
    pub customer_grouping: CustomerGrouping,

    #[arg(long, help = "Omit per-step timing lines")]
    pub no_timings: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Defaults for everything except the input path.
    pub fn for_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            format: ReportFormat::default(),
            output: None,
            price_pairing: PricePairing::default(),
            customer_grouping: CustomerGrouping::default(),
            no_timings: false,
            verbose: false,
            monitor: false,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn output_format(&self) -> ReportFormat {
        self.format
    }

    fn price_pairing(&self) -> PricePairing {
        self.price_pairing
    }

    fn customer_grouping(&self) -> CustomerGrouping {
        self.customer_grouping
    }

    fn show_timings(&self) -> bool {
        !self.no_timings
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        Ok(())
    }
}
