//! Response DTOs for the CRM JSON API
//!
//! Defines the structure of the response bodies the client decodes. Decimal
//! amounts arrive as strings (`"12.50"`) and are kept that way; use
//! [`parse_amount`] when arithmetic is needed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pricing::{parse_amount, LineItem};

/// Response body of a paginated list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    /// Rows, each an object with at least an `id`
    #[serde(default)]
    pub items: Vec<Value>,
    /// Number of rows across all pages
    #[serde(default)]
    pub total_count: u64,
}

impl ListResponse {
    /// Ids of the rows on this page, rendered as strings.
    pub fn ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| match item.get("id")? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Response body of `GET /api/get-item/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemLookup {
    #[serde(default)]
    pub success: bool,
    pub item: Option<ItemRecord>,
}

/// An Item Master record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRecord {
    pub id: Option<i64>,
    pub item_code: String,
    pub description: String,
    pub short_name: String,
    pub item_type: String,
    pub unit_of_measurement: String,
    pub standard_price: String,
    pub minimum_price: String,
    pub purchase_price: String,
    pub hsn_sac_code: String,
    pub default_tax_percentage: String,
    pub manufacturer: String,
    pub brand: String,
    pub category: String,
}

/// Response body of `GET /api/get-prospect/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProspectLookup {
    #[serde(default)]
    pub success: bool,
    pub prospect: Option<ProspectRecord>,
}

/// A prospect or customer record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProspectRecord {
    pub id: Option<i64>,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub contact_person: String,
    pub address: String,
    pub status: String,
}

/// Response body of `GET /api/get-quotation/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationLookup {
    #[serde(default)]
    pub success: bool,
    pub quotation: Option<QuotationHeader>,
    #[serde(default)]
    pub items: Vec<QuotationLine>,
}

/// Header fields of a quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotationHeader {
    pub id: Option<i64>,
    pub quote_number: String,
    pub prospect_id: Option<i64>,
    pub prospect_name: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub currency: String,
    pub exchange_rate: String,
    pub payment_terms: String,
    pub delivery_terms: String,
    pub reference_number: String,
    pub customer_remarks: String,
    pub internal_notes: String,
    pub discount_percentage: String,
    pub freight_charges: String,
}

/// One line of a quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotationLine {
    pub line_number: u32,
    pub item_code: String,
    pub description: String,
    pub quantity: String,
    pub uom: String,
    pub unit_price: String,
    pub discount_percentage: String,
    pub tax_percentage: String,
    pub line_total: String,
    pub remarks: String,
}

impl QuotationLine {
    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            quantity: parse_amount(&self.quantity),
            unit_price: parse_amount(&self.unit_price),
            discount_percent: parse_amount(&self.discount_percentage),
            tax_percent: parse_amount(&self.tax_percentage),
        }
    }
}

/// Response body of `GET /api/dashboard-data/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardMetrics {
    pub visits_today: u64,
    pub visits_month: u64,
    pub total_leads: u64,
    /// Only present on a sales executive's own dashboard
    pub active_leads: Option<u64>,
    pub conversion_rate: f64,
    pub converted_count: u64,
    pub leads_by_stage: Vec<StageCount>,
    pub upcoming_followups: Vec<Value>,
    pub timestamp: Option<String>,
}

/// Lead count for one pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageCount {
    pub status: String,
    pub count: u64,
}
