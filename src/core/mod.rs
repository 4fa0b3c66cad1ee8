pub mod etl;
pub mod extractor;
pub mod report;

pub use crate::domain::model::{CustomerRecord, OrderReport, OrderSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
