//! Line Total Calculator
//!
//! Pure monetary arithmetic for quotation and sales-order line items.
//!
//! Tax is applied after discount, on the discounted amount. Inputs are not
//! validated: NaN, infinities and negative values flow straight through the
//! arithmetic, so callers must sanitize what they read from a form.

use serde::{Deserialize, Serialize};

// == Line Item ==
/// One row of a quotation or order. Missing fields decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub tax_percent: f64,
}

impl LineItem {
    pub fn new(quantity: f64, unit_price: f64) -> Self {
        Self {
            quantity,
            unit_price,
            ..Self::default()
        }
    }

    pub fn with_discount(mut self, discount_percent: f64) -> Self {
        self.discount_percent = discount_percent;
        self
    }

    pub fn with_tax(mut self, tax_percent: f64) -> Self {
        self.tax_percent = tax_percent;
        self
    }

    pub fn total(&self) -> f64 {
        line_total(
            self.quantity,
            self.unit_price,
            self.discount_percent,
            self.tax_percent,
        )
    }

    pub fn breakdown(&self) -> LineBreakdown {
        line_breakdown(
            self.quantity,
            self.unit_price,
            self.discount_percent,
            self.tax_percent,
        )
    }
}

/// Intermediate amounts of a line total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBreakdown {
    /// quantity * unit price
    pub subtotal: f64,
    /// subtotal after discount
    pub discounted: f64,
    /// discounted amount plus tax
    pub total: f64,
}

// == Line Total ==
/// Computes each stage of a line total.
pub fn line_breakdown(
    quantity: f64,
    unit_price: f64,
    discount_percent: f64,
    tax_percent: f64,
) -> LineBreakdown {
    let subtotal = quantity * unit_price;
    let discounted = subtotal * (1.0 - discount_percent / 100.0);
    let total = discounted * (1.0 + tax_percent / 100.0);

    LineBreakdown {
        subtotal,
        discounted,
        total,
    }
}

/// Monetary total of one line: discount first, then tax on the discounted
/// amount.
pub fn line_total(quantity: f64, unit_price: f64, discount_percent: f64, tax_percent: f64) -> f64 {
    line_breakdown(quantity, unit_price, discount_percent, tax_percent).total
}

/// Sum of the line totals of `items`.
pub fn grand_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::total).sum()
}

// == Parsing & Formatting ==
/// Reads a numeric form value; anything unparseable counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Fixed-point rendering, e.g. `format_number(54.0, 2)` is `"54.00"`.
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// US dollar rendering with thousands separators, e.g. `"$1,234.50"`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }

    let fixed = format_number(amount.abs(), 2);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}
