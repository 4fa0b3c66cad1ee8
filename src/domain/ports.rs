use crate::domain::model::{CustomerGrouping, OrderReport, PricePairing, ReportFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    /// `None` means the report goes to stdout.
    fn output_path(&self) -> Option<&str>;
    fn output_format(&self) -> ReportFormat;
    fn price_pairing(&self) -> PricePairing;
    fn customer_grouping(&self) -> CustomerGrouping;
    fn show_timings(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Loads the raw XML document text.
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, xml: String) -> Result<OrderReport>;
    /// Renders the report and returns where it was written.
    async fn load(&self, report: OrderReport) -> Result<String>;
}
