//! Line-item rows and contact fields
//!
//! Form values are kept as the strings the user typed. Lookups only fill
//! fields that are still empty, so nothing the user entered is overwritten.

use serde::{Deserialize, Serialize};

use crate::models::{ItemRecord, ProspectRecord, QuotationLine};
use crate::pricing::{format_currency, format_number, grand_total, parse_amount, LineItem};

/// One editable row of a quotation or sales order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineRow {
    pub item_code: String,
    pub description: String,
    pub uom: String,
    pub quantity: String,
    pub unit_price: String,
    pub discount_percentage: String,
    pub tax_percentage: String,
}

impl LineRow {
    /// Has an item code, a quantity and a unit price.
    pub fn is_complete(&self) -> bool {
        [&self.item_code, &self.quantity, &self.unit_price]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            quantity: parse_amount(&self.quantity),
            unit_price: parse_amount(&self.unit_price),
            discount_percent: parse_amount(&self.discount_percentage),
            tax_percent: parse_amount(&self.tax_percentage),
        }
    }

    pub fn total(&self) -> f64 {
        self.to_line_item().total()
    }

    /// Row total as shown in the total cell.
    pub fn formatted_total(&self) -> String {
        format_number(self.total(), 2)
    }

    /// Copies item master details into the empty fields of this row.
    /// Returns whether anything changed.
    pub fn fill_from_item(&mut self, item: &ItemRecord) -> bool {
        let mut changed = fill(&mut self.description, &item.description);
        changed |= fill(&mut self.uom, &item.unit_of_measurement);
        changed |= fill(&mut self.unit_price, or_zero(&item.standard_price));
        changed |= fill(&mut self.tax_percentage, or_zero(&item.default_tax_percentage));
        changed
    }
}

impl From<&QuotationLine> for LineRow {
    fn from(line: &QuotationLine) -> Self {
        Self {
            item_code: line.item_code.clone(),
            description: line.description.clone(),
            uom: line.uom.clone(),
            quantity: line.quantity.clone(),
            unit_price: line.unit_price.clone(),
            discount_percentage: line.discount_percentage.clone(),
            tax_percentage: line.tax_percentage.clone(),
        }
    }
}

/// Recomputed totals of a line-item form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormTotals {
    /// One formatted total per row
    pub row_totals: Vec<String>,
    pub grand_total: f64,
    /// Grand total for display, e.g. `$1,234.50`
    pub display: String,
    /// Grand total for the hidden `total_amount` input, e.g. `1234.50`
    pub hidden_value: String,
}

pub fn form_totals(rows: &[LineRow]) -> FormTotals {
    let items: Vec<LineItem> = rows.iter().map(LineRow::to_line_item).collect();
    let total = grand_total(&items);
    FormTotals {
        row_totals: rows.iter().map(LineRow::formatted_total).collect(),
        grand_total: total,
        display: format_currency(total),
        hidden_value: format!("{:.2}", total),
    }
}

/// Contact block of a quotation or sales order header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFields {
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub billing_address: String,
}

impl ContactFields {
    /// Copies prospect details into the empty fields. Returns whether
    /// anything changed.
    pub fn fill_from_prospect(&mut self, prospect: &ProspectRecord) -> bool {
        let mut changed = fill(&mut self.contact_person, &prospect.contact_person);
        changed |= fill(&mut self.contact_email, &prospect.email);
        changed |= fill(&mut self.contact_phone, &prospect.phone);
        changed |= fill(&mut self.billing_address, &prospect.address);
        changed
    }
}

fn fill(field: &mut String, value: &str) -> bool {
    if !field.is_empty() || value.is_empty() {
        return false;
    }
    *field = value.to_string();
    true
}

fn or_zero(value: &str) -> &str {
    if value.is_empty() {
        "0"
    } else {
        value
    }
}
