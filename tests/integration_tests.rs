use order_extract::core::ConfigProvider;
use order_extract::{
    CliConfig, CustomerGrouping, EtlEngine, EtlError, LocalStorage, OrderPipeline, PricePairing,
    ReportFormat, TomlConfig,
};
use tempfile::TempDir;

const PURCHASE_ORDER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<PurchaseOrder>
  <OrderHeader>
    <ID>PO-2024-0042</ID>
    <RequestedShipDate>2024-06-15T00:00:00</RequestedShipDate>
    <CreatedBy>Morgan Lee</CreatedBy>
  </OrderHeader>
  <LineItems>
    <LineItem>
      <Product><Name>Steel Beam</Name><LOADFACTOR>20.5</LOADFACTOR></Product>
      <Order_Quantity>2</Order_Quantity>
      <USPrice>10.0</USPrice>
      <LeadTime>5</LeadTime>
    </LineItem>
    <LineItem>
      <Product><LOADFACTOR>25</LOADFACTOR></Product>
      <Order_Quantity>3</Order_Quantity>
      <USPrice>20.0</USPrice>
      <LeadTime>12</LeadTime>
    </LineItem>
    <LineItem>
      <LeadTime>7</LeadTime>
    </LineItem>
  </LineItems>
  <Customers>
    <Customer>
      <Name>Acme Corp</Name>
      <Address1>100 Industrial Way</Address1>
      <Phone>555-0100</Phone>
      <DeliveryReceiptEmail>receiving@acme.example</DeliveryReceiptEmail>
    </Customer>
    <Customer>
      <Name>Globex</Name>
      <Address1>42 Harbor Rd</Address1>
      <Phone>555-0142</Phone>
      <DeliveryReceiptEmail>dock@globex.example</DeliveryReceiptEmail>
    </Customer>
  </Customers>
</PurchaseOrder>
"#;

fn setup(xml: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("Input.xml");
    std::fs::write(&input, xml).unwrap();
    let input = input.to_str().unwrap().to_string();
    (temp_dir, input)
}

fn config_with_output(input: &str, output: &str, format: ReportFormat) -> CliConfig {
    let mut config = CliConfig::for_input(input);
    config.output = Some(output.to_string());
    config.format = format;
    config.no_timings = true;
    config
}

#[tokio::test]
async fn test_end_to_end_text_report() {
    let (temp_dir, input) = setup(PURCHASE_ORDER);
    let output = temp_dir.path().join("report.txt");
    let config = config_with_output(&input, output.to_str().unwrap(), ReportFormat::Text);

    let engine = EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config));
    let destination = engine.run().await.unwrap();
    assert_eq!(destination, output.to_str().unwrap());

    let report = std::fs::read_to_string(&output).unwrap();
    assert!(report.contains("Order ID: PO-2024-0042\n"));
    assert!(report.contains("Order Request Date: 2024-06-15 00:00:00\n"));
    assert!(report.contains("CreatedBy: Morgan Lee\n"));
    assert!(report.contains("Load of the order: 45.5\n"));
    assert!(report.contains("Quantities of the Order: 5\n"));
    assert!(report.contains("Price: 80\n"));
    assert!(report.contains("Manufacturing Days: 12\n"));
    assert!(report.contains("Available Truck: 546\n"));
    assert!(!report.contains(" ms\n"));

    // the product <Name> is collected too, so positional pairing shifts customers
    assert!(report.contains("Customer1 Name: Steel Beam\nCustomer1 Address: 100 Industrial Way\n"));
    assert!(report.contains("Customer3 Name: Globex\nCustomer3 Address: \n"));
}

#[tokio::test]
async fn test_grouped_customers_keep_contacts_together() {
    let (temp_dir, input) = setup(PURCHASE_ORDER);
    let output = temp_dir.path().join("report.txt");
    let mut config = config_with_output(&input, output.to_str().unwrap(), ReportFormat::Text);
    config.customer_grouping = CustomerGrouping::Grouped;

    EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config))
        .run()
        .await
        .unwrap();

    let report = std::fs::read_to_string(&output).unwrap();
    assert!(report.contains(
        "Customer2 Name: Acme Corp\nCustomer2 Address: 100 Industrial Way\nCustomer2 Phone: 555-0100\nCustomer2 Email: receiving@acme.example\n"
    ));
    assert!(report.contains("Customer3 Name: Globex\nCustomer3 Address: 42 Harbor Rd\n"));
}

#[tokio::test]
async fn test_timing_lines_are_printed_before_summary() {
    let (temp_dir, input) = setup(PURCHASE_ORDER);
    let output = temp_dir.path().join("report.txt");
    let mut config = config_with_output(&input, output.to_str().unwrap(), ReportFormat::Text);
    config.no_timings = false;

    EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config))
        .run()
        .await
        .unwrap();

    let report = std::fs::read_to_string(&output).unwrap();
    let summary_at = report.find("--- Generated Output ---").unwrap();
    for label in ["Order ID : ", "Price : ", "Manufacturing Days : ", "Total Response Time "] {
        let at = report.find(label).unwrap();
        assert!(at < summary_at, "{} should precede the summary", label);
    }
}

#[tokio::test]
async fn test_json_report_file() {
    let (temp_dir, input) = setup(PURCHASE_ORDER);
    let output = temp_dir.path().join("report.json");
    let config = config_with_output(&input, output.to_str().unwrap(), ReportFormat::Json);

    EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config))
        .run()
        .await
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["summary"]["total_price"], 80.0);
    assert_eq!(json["summary"]["requested_ship_date"], "2024-06-15T00:00:00");
    assert_eq!(json["customers"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_malformed_date_aborts_without_output() {
    let xml = PURCHASE_ORDER.replace("2024-06-15T00:00:00", "the fifteenth of June");
    let (temp_dir, input) = setup(&xml);
    let output = temp_dir.path().join("report.txt");
    let config = config_with_output(&input, output.to_str().unwrap(), ReportFormat::Text);

    let err = EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, EtlError::FieldParseError { ref field, .. } if field == "RequestedShipDate"));
    assert_eq!(err.exit_code(), 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_strict_pairing_rejects_mismatched_prices() {
    let xml = PURCHASE_ORDER.replace("<USPrice>20.0</USPrice>", "");
    let (temp_dir, input) = setup(&xml);
    let output = temp_dir.path().join("report.txt");
    let mut config = config_with_output(&input, output.to_str().unwrap(), ReportFormat::Text);

    config.price_pairing = PricePairing::Strict;
    let err = EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config.clone()))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, EtlError::ValidationError { .. }));

    config.price_pairing = PricePairing::Truncate;
    EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config))
        .run()
        .await
        .unwrap();
    let report = std::fs::read_to_string(&output).unwrap();
    assert!(report.contains("Price: 20\n"));
}

#[tokio::test]
async fn test_missing_input_file_is_critical() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.xml");
    let config = CliConfig::for_input(missing.to_str().unwrap());

    let err = EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, EtlError::IoError(_)));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_toml_config_drives_pipeline() {
    let (temp_dir, input) = setup(PURCHASE_ORDER);
    let output = temp_dir.path().join("customers.csv");
    let normalized = |p: &str| p.replace('\\', "/");

    let toml_content = format!(
        r#"
[pipeline]
name = "integration"

[input]
path = "{}"

[extract]
customer_grouping = "grouped"

[output]
format = "csv"
path = "{}"
"#,
        normalized(&input),
        normalized(output.to_str().unwrap())
    );
    let config_path = temp_dir.path().join("order-config.toml");
    tokio::fs::write(&config_path, toml_content).await.unwrap();

    let config = TomlConfig::from_file(&config_path).unwrap();
    assert_eq!(config.output_format(), ReportFormat::Csv);

    EtlEngine::new(OrderPipeline::new(LocalStorage::default(), config))
        .run()
        .await
        .unwrap();

    let csv = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "customer,name,address,phone,email");
    assert_eq!(
        lines[2],
        "2,Acme Corp,100 Industrial Way,555-0100,receiving@acme.example"
    );
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_shipped_sample_config_runs() {
    use order_extract::utils::validation::Validate;

    let config =
        TomlConfig::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/order-config.toml")).unwrap();
    config.validate().unwrap();

    let pipeline = OrderPipeline::new(
        LocalStorage::new(env!("CARGO_MANIFEST_DIR").to_string()),
        config,
    );
    let destination = EtlEngine::new(pipeline).run().await.unwrap();
    assert_eq!(destination, "stdout");
}
