//! Field extraction over a parsed purchase-order document.
//!
//! Every field is located by tag name anywhere in the tree, in document
//! order, and then reduced to a single value.

use crate::domain::model::{
    CustomerGrouping, CustomerLists, CustomerRecord, OrderReport, OrderSummary, PricePairing,
};
use crate::utils::error::{EtlError, Result};
use crate::utils::monitor::StepTimer;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use roxmltree::{Document, Node};

pub const ORDER_ID: &str = "ID";
pub const REQUESTED_SHIP_DATE: &str = "RequestedShipDate";
pub const CREATED_BY: &str = "CreatedBy";
pub const LOAD_FACTOR: &str = "LOADFACTOR";
pub const ORDER_QUANTITY: &str = "Order_Quantity";
pub const US_PRICE: &str = "USPrice";
pub const LEAD_TIME: &str = "LeadTime";
pub const CUSTOMER_NAME: &str = "Name";
pub const CUSTOMER_ADDRESS: &str = "Address1";
pub const CUSTOMER_PHONE: &str = "Phone";
pub const CUSTOMER_EMAIL: &str = "DeliveryReceiptEmail";

const CONTACT_TAGS: [&str; 3] = [CUSTOMER_ADDRESS, CUSTOMER_PHONE, CUSTOMER_EMAIL];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

pub fn parse_document(xml: &str) -> Result<Document<'_>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    Ok(Document::parse_with_options(xml, options)?)
}

/// Depth-first walk below `root` yielding elements whose local name is `name`.
pub fn descendants_named<'a, 'input>(
    root: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a
where
    'input: 'a,
{
    root.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Concatenated text of every text node under `node`.
pub fn element_value(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn first_value(root: Node<'_, '_>, name: &str) -> Option<String> {
    descendants_named(root, name).next().map(element_value)
}

pub fn parse_float(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| EtlError::FieldParseError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

pub fn parse_int(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| EtlError::FieldParseError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Accepts RFC 3339 plus the common ISO and US date layouts.
/// Date-only values resolve to midnight; an offset is dropped in favour of
/// the wall-clock time it was written with.
pub fn parse_ship_date(raw: &str) -> Result<NaiveDateTime> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(EtlError::FieldParseError {
        field: REQUESTED_SHIP_DATE.to_string(),
        value: raw.to_string(),
        reason: "unrecognised date format".to_string(),
    })
}

pub fn available_truck_count(max_lead_time: i64, total_load: f64) -> f64 {
    max_lead_time as f64 * total_load
}

pub struct OrderExtractor<'a, 'input> {
    doc: &'a Document<'input>,
}

impl<'a, 'input> OrderExtractor<'a, 'input> {
    pub fn new(doc: &'a Document<'input>) -> Self {
        Self { doc }
    }

    fn values(&self, name: &str) -> Vec<String> {
        descendants_named(self.doc.root(), name)
            .map(element_value)
            .collect()
    }

    fn floats(&self, name: &str) -> Result<Vec<f64>> {
        self.values(name)
            .iter()
            .map(|v| parse_float(name, v))
            .collect()
    }

    fn ints(&self, name: &str) -> Result<Vec<i64>> {
        self.values(name).iter().map(|v| parse_int(name, v)).collect()
    }

    pub fn order_id(&self) -> Option<String> {
        first_value(self.doc.root(), ORDER_ID)
    }

    pub fn requested_ship_date(&self) -> Result<NaiveDateTime> {
        let raw = first_value(self.doc.root(), REQUESTED_SHIP_DATE).ok_or_else(|| {
            EtlError::MissingFieldError {
                field: REQUESTED_SHIP_DATE.to_string(),
            }
        })?;
        parse_ship_date(&raw)
    }

    pub fn created_by(&self) -> Option<String> {
        first_value(self.doc.root(), CREATED_BY)
    }

    pub fn total_load(&self) -> Result<f64> {
        Ok(self.floats(LOAD_FACTOR)?.into_iter().sum())
    }

    pub fn total_quantity(&self) -> Result<i64> {
        self.ints(ORDER_QUANTITY)?
            .into_iter()
            .try_fold(0i64, |acc, q| acc.checked_add(q))
            .ok_or_else(|| EtlError::ProcessingError {
                message: format!("sum of <{}> overflows", ORDER_QUANTITY),
            })
    }

    pub fn total_price(&self, pairing: PricePairing) -> Result<f64> {
        let prices = self.floats(US_PRICE)?;
        let quantities = self.ints(ORDER_QUANTITY)?;

        if prices.len() != quantities.len() {
            match pairing {
                PricePairing::Strict => {
                    return Err(EtlError::ValidationError {
                        message: format!(
                            "found {} <{}> but {} <{}> elements",
                            prices.len(),
                            US_PRICE,
                            quantities.len(),
                            ORDER_QUANTITY
                        ),
                    });
                }
                PricePairing::Truncate => {
                    tracing::warn!(
                        "⚠️ {} prices vs {} quantities, pairing the first {}",
                        prices.len(),
                        quantities.len(),
                        prices.len().min(quantities.len())
                    );
                }
            }
        }

        Ok(prices
            .iter()
            .zip(quantities.iter())
            .map(|(price, qty)| price * *qty as f64)
            .sum())
    }

    pub fn max_lead_time(&self) -> Result<i64> {
        self.ints(LEAD_TIME)?
            .into_iter()
            .max()
            .ok_or_else(|| EtlError::MissingFieldError {
                field: LEAD_TIME.to_string(),
            })
    }

    pub fn customer_names(&self) -> Vec<String> {
        self.values(CUSTOMER_NAME)
    }

    pub fn customer_addresses(&self) -> Vec<String> {
        self.values(CUSTOMER_ADDRESS)
    }

    pub fn customer_phones(&self) -> Vec<String> {
        self.values(CUSTOMER_PHONE)
    }

    pub fn customer_emails(&self) -> Vec<String> {
        self.values(CUSTOMER_EMAIL)
    }

    pub fn customer_lists(&self) -> CustomerLists {
        CustomerLists {
            names: self.customer_names(),
            addresses: self.customer_addresses(),
            phones: self.customer_phones(),
            emails: self.customer_emails(),
        }
    }

    pub fn customers(&self, grouping: CustomerGrouping) -> Vec<CustomerRecord> {
        match grouping {
            CustomerGrouping::Positional => {
                let lists = self.customer_lists();
                if !lists.is_aligned() {
                    tracing::warn!(
                        "⚠️ Customer fields are not aligned: {} names, {} addresses, {} phones, {} emails",
                        lists.names.len(),
                        lists.addresses.len(),
                        lists.phones.len(),
                        lists.emails.len()
                    );
                }
                lists.into_records()
            }
            CustomerGrouping::Grouped => self.grouped_customers(),
        }
    }

    // 每個 Name 往上找最近一個包含聯絡欄位的祖先；祖先裡若還有別的 Name 就不算同一位客戶
    fn grouped_customers(&self) -> Vec<CustomerRecord> {
        descendants_named(self.doc.root(), CUSTOMER_NAME)
            .map(|name_node| {
                let group = name_node
                    .ancestors()
                    .skip(1)
                    .filter(|n| n.is_element())
                    .find(|n| {
                        CONTACT_TAGS
                            .iter()
                            .any(|tag| descendants_named(*n, *tag).next().is_some())
                    })
                    .filter(|group| descendants_named(*group, CUSTOMER_NAME).count() == 1);

                match group {
                    Some(group) => CustomerRecord {
                        name: Some(element_value(name_node)),
                        address: first_value(group, CUSTOMER_ADDRESS),
                        phone: first_value(group, CUSTOMER_PHONE),
                        email: first_value(group, CUSTOMER_EMAIL),
                    },
                    None => CustomerRecord {
                        name: Some(element_value(name_node)),
                        ..CustomerRecord::default()
                    },
                }
            })
            .collect()
    }

    /// Runs every extractor once, timing each step.
    pub fn extract_report(
        &self,
        pairing: PricePairing,
        grouping: CustomerGrouping,
    ) -> Result<OrderReport> {
        let mut timer = StepTimer::start();

        let order_id = self.order_id();
        timer.lap("Order ID");

        let requested_ship_date = self.requested_ship_date()?;
        timer.lap("Order Request Date");

        let created_by = self.created_by();
        timer.lap("CreatedBy");

        let total_load = self.total_load()?;
        timer.lap("Load of the order");

        let total_quantity = self.total_quantity()?;
        timer.lap("Quantities of the Order");

        let total_price = self.total_price(pairing)?;
        timer.lap("Price");

        let max_lead_time = self.max_lead_time()?;
        timer.lap("Manufacturing Days");

        let available_truck_count = available_truck_count(max_lead_time, total_load);
        timer.lap("Getting Available Truck");

        let customers = self.customers(grouping);
        timer.lap("Customer details");

        Ok(OrderReport {
            summary: OrderSummary {
                order_id,
                requested_ship_date,
                created_by,
                total_load,
                total_quantity,
                total_price,
                max_lead_time,
                available_truck_count,
            },
            customers,
            timings: timer.finish(),
        })
    }
}
