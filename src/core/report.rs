use crate::domain::model::{CustomerRecord, OrderReport, ReportFormat, TimingReport};
use crate::utils::error::{EtlError, Result};
use std::fmt::Write;

pub fn render(report: &OrderReport, format: ReportFormat, show_timings: bool) -> Result<String> {
    match format {
        ReportFormat::Text => {
            let mut out = String::new();
            if show_timings {
                out.push_str(&render_timings(&report.timings));
            }
            out.push_str(&render_text(report));
            Ok(out)
        }
        ReportFormat::Json => render_json(report, show_timings),
        ReportFormat::Csv => render_csv(&report.customers),
    }
}

pub fn render_timings(timings: &TimingReport) -> String {
    let mut out = String::new();
    for step in &timings.steps {
        let _ = writeln!(out, "{} : {} ms", step.label, step.elapsed_ms);
    }
    let _ = writeln!(out, "Total Response Time {} ms", timings.total_ms);
    out
}

pub fn render_text(report: &OrderReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "\n--- Generated Output ---");
    let _ = writeln!(out, "Order ID: {}", summary.order_id.as_deref().unwrap_or(""));
    let _ = writeln!(
        out,
        "Order Request Date: {}",
        summary.requested_ship_date.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "CreatedBy: {}", summary.created_by.as_deref().unwrap_or(""));
    let _ = writeln!(out, "Load of the order: {}", summary.total_load);
    let _ = writeln!(out, "Quantities of the Order: {}", summary.total_quantity);
    let _ = writeln!(out, "Price: {}", summary.total_price);
    let _ = writeln!(out, "Manufacturing Days: {}", summary.max_lead_time);
    let _ = writeln!(out, "Available Truck: {}", summary.available_truck_count);

    for (i, customer) in report.customers.iter().enumerate() {
        out.push_str(&render_customer(i + 1, customer));
    }

    out
}

fn render_customer(number: usize, customer: &CustomerRecord) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    format!(
        "\nCustomer{n} Name: {}\nCustomer{n} Address: {}\nCustomer{n} Phone: {}\nCustomer{n} Email: {}\n",
        field(&customer.name),
        field(&customer.address),
        field(&customer.phone),
        field(&customer.email),
        n = number
    )
}

pub fn render_json(report: &OrderReport, show_timings: bool) -> Result<String> {
    if show_timings {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut value = serde_json::to_value(report)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("timings");
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn render_csv(customers: &[CustomerRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["customer", "name", "address", "phone", "email"])?;

    for (i, customer) in customers.iter().enumerate() {
        let number = (i + 1).to_string();
        writer.write_record([
            number.as_str(),
            customer.name.as_deref().unwrap_or(""),
            customer.address.as_deref().unwrap_or(""),
            customer.phone.as_deref().unwrap_or(""),
            customer.email.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(EtlError::from)
}
