use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: Option<String>,
    pub requested_ship_date: NaiveDateTime,
    pub created_by: Option<String>,
    pub total_load: f64,
    pub total_quantity: i64,
    pub total_price: f64,
    pub max_lead_time: i64,
    pub available_truck_count: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// The four customer sequences as they appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerLists {
    pub names: Vec<String>,
    pub addresses: Vec<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
}

impl CustomerLists {
    pub fn is_aligned(&self) -> bool {
        let n = self.names.len();
        self.addresses.len() == n && self.phones.len() == n && self.emails.len() == n
    }

    /// Pairs the sequences by index. The name list drives the customer count.
    pub fn into_records(self) -> Vec<CustomerRecord> {
        let CustomerLists {
            names,
            addresses,
            phones,
            emails,
        } = self;

        let mut addresses = addresses.into_iter();
        let mut phones = phones.into_iter();
        let mut emails = emails.into_iter();

        names
            .into_iter()
            .map(|name| CustomerRecord {
                name: Some(name),
                address: addresses.next(),
                phone: phones.next(),
                email: emails.next(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTiming {
    pub label: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingReport {
    pub steps: Vec<StepTiming>,
    pub total_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReport {
    pub summary: OrderSummary,
    pub customers: Vec<CustomerRecord>,
    pub timings: TimingReport,
}

/// How `USPrice` and `Order_Quantity` sequences of different length are paired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePairing {
    #[default]
    Truncate,
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerGrouping {
    #[default]
    Positional,
    Grouped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for PricePairing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "truncate" => Ok(PricePairing::Truncate),
            "strict" => Ok(PricePairing::Strict),
            other => Err(format!(
                "unknown price pairing '{}', expected truncate or strict",
                other
            )),
        }
    }
}

impl FromStr for CustomerGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positional" => Ok(CustomerGrouping::Positional),
            "grouped" => Ok(CustomerGrouping::Grouped),
            other => Err(format!(
                "unknown customer grouping '{}', expected positional or grouped",
                other
            )),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!(
                "unknown report format '{}', expected text, json or csv",
                other
            )),
        }
    }
}

impl fmt::Display for PricePairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricePairing::Truncate => write!(f, "truncate"),
            PricePairing::Strict => write!(f, "strict"),
        }
    }
}

impl fmt::Display for CustomerGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerGrouping::Positional => write!(f, "positional"),
            CustomerGrouping::Grouped => write!(f, "grouped"),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}
