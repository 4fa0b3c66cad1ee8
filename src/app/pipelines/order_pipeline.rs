use crate::core::extractor::{parse_document, OrderExtractor};
use crate::core::report;
use crate::core::{ConfigProvider, OrderReport, Pipeline, Storage};
use crate::utils::error::Result;

pub const STDOUT_DESTINATION: &str = "stdout";

/// Reads one XML purchase order, extracts the summary and renders it.
pub struct OrderPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> OrderPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OrderPipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        let path = self.config.input_path();
        tracing::debug!("Reading order document: {}", path);

        let bytes = self.storage.read_file(path).await?;
        Ok(String::from_utf8(bytes)?)
    }

    async fn transform(&self, xml: String) -> Result<OrderReport> {
        let doc = parse_document(&xml)?;
        tracing::debug!(
            "Parsed document with {} nodes, pairing prices by {}, customers by {}",
            doc.descendants().count(),
            self.config.price_pairing(),
            self.config.customer_grouping()
        );

        OrderExtractor::new(&doc)
            .extract_report(self.config.price_pairing(), self.config.customer_grouping())
    }

    async fn load(&self, report: OrderReport) -> Result<String> {
        let format = self.config.output_format();
        let rendered = report::render(&report, format, self.config.show_timings())?;
        tracing::debug!("Rendered {} report ({} bytes)", format, rendered.len());

        match self.config.output_path() {
            Some(path) => {
                self.storage.write_file(path, rendered.as_bytes()).await?;
                Ok(path.to_string())
            }
            None => {
                print!("{}", rendered);
                Ok(STDOUT_DESTINATION.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CustomerGrouping, PricePairing, ReportFormat};
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        output: Option<String>,
        format: ReportFormat,
        pairing: PricePairing,
    }

    impl TestConfig {
        fn to_file(path: &str, format: ReportFormat) -> Self {
            Self {
                output: Some(path.to_string()),
                format,
                pairing: PricePairing::Truncate,
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn input_path(&self) -> &str {
            "po.xml"
        }

        fn output_path(&self) -> Option<&str> {
            self.output.as_deref()
        }

        fn output_format(&self) -> ReportFormat {
            self.format
        }

        fn price_pairing(&self) -> PricePairing {
            self.pairing
        }

        fn customer_grouping(&self) -> CustomerGrouping {
            CustomerGrouping::Positional
        }

        fn show_timings(&self) -> bool {
            false
        }
    }

    const PO_XML: &str = "<PurchaseOrder>\
        <ID>PO-7</ID><RequestedShipDate>2024-03-01</RequestedShipDate>\
        <Line><LOADFACTOR>1.5</LOADFACTOR><Order_Quantity>4</Order_Quantity>\
          <USPrice>2.5</USPrice><LeadTime>3</LeadTime></Line>\
        <Customer><Name>Dana</Name><Address1>9 Elm Rd</Address1>\
          <Phone>555-0199</Phone><DeliveryReceiptEmail>dana@example.com</DeliveryReceiptEmail></Customer>\
        </PurchaseOrder>";

    #[tokio::test]
    async fn test_extract_reads_configured_input() {
        let storage = MockStorage::with_file("po.xml", PO_XML);
        let pipeline = OrderPipeline::new(
            storage,
            TestConfig::to_file("report.txt", ReportFormat::Text),
        );

        let xml = pipeline.extract().await.unwrap();
        assert!(xml.contains("<ID>PO-7</ID>"));
    }

    #[tokio::test]
    async fn test_transform_builds_report() {
        let storage = MockStorage::with_file("po.xml", PO_XML);
        let pipeline = OrderPipeline::new(
            storage,
            TestConfig::to_file("report.txt", ReportFormat::Text),
        );

        let report = pipeline.transform(PO_XML.to_string()).await.unwrap();
        assert_eq!(report.summary.order_id.as_deref(), Some("PO-7"));
        assert_eq!(report.summary.total_price, 10.0);
        assert_eq!(report.summary.available_truck_count, 4.5);
        assert_eq!(report.customers[0].email.as_deref(), Some("dana@example.com"));
    }

    #[tokio::test]
    async fn test_load_writes_rendered_report() {
        let storage = MockStorage::with_file("po.xml", PO_XML);
        let pipeline = OrderPipeline::new(
            storage.clone(),
            TestConfig::to_file("out/report.csv", ReportFormat::Csv),
        );

        let report = pipeline.transform(PO_XML.to_string()).await.unwrap();
        let destination = pipeline.load(report).await.unwrap();
        assert_eq!(destination, "out/report.csv");

        let written = String::from_utf8(storage.get_file("out/report.csv").await.unwrap()).unwrap();
        assert!(written.contains("1,Dana,9 Elm Rd,555-0199,dana@example.com"));
    }

    #[tokio::test]
    async fn test_malformed_xml_fails_transform() {
        let storage = MockStorage::with_file("po.xml", "<PurchaseOrder><ID>");
        let pipeline = OrderPipeline::new(
            storage,
            TestConfig::to_file("report.txt", ReportFormat::Text),
        );

        let err = pipeline
            .transform("<PurchaseOrder><ID>".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::XmlError(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8_input_fails_extract() {
        let storage = MockStorage::with_file("po.xml", "");
        storage
            .write_file("po.xml", &[0x3c, 0xff, 0xfe, 0x3e])
            .await
            .unwrap();
        let pipeline = OrderPipeline::new(
            storage,
            TestConfig::to_file("report.txt", ReportFormat::Text),
        );

        assert!(matches!(
            pipeline.extract().await,
            Err(EtlError::EncodingError(_))
        ));
    }
}
