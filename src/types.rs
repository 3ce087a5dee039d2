//! Core types and data structures for invoice computation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::tax::{HsnClassification, TaxComponents};
use crate::utils::money::round2;

/// An item as it arrives from the order, before HSN classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Free-text product description
    pub description: String,
    /// Number of units sold
    pub quantity: u32,
    /// Tax-inclusive price per unit
    pub unit_price: BigDecimal,
    /// Item-level discount, already in rupees
    pub discount_amount: BigDecimal,
    /// Pre-assigned classification; classified from the description when absent
    pub classification: Option<HsnClassification>,
}

impl ItemDraft {
    /// Create an unclassified draft with no discount
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: BigDecimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            discount_amount: BigDecimal::from(0),
            classification: None,
        }
    }

    /// Attach an item-level discount
    pub fn with_discount(mut self, discount_amount: BigDecimal) -> Self {
        self.discount_amount = discount_amount;
        self
    }

    /// Skip classification and use the given HSN code and rate
    pub fn classified(mut self, classification: HsnClassification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Unit price multiplied by quantity, rounded to paise
    pub fn line_total(&self) -> BigDecimal {
        round2(&(&self.unit_price * BigDecimal::from(self.quantity)))
    }
}

/// A classified line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub hsn_code: String,
    /// Total GST rate percentage (e.g. 18 for 18%)
    pub gst_rate_percent: BigDecimal,
    pub quantity: u32,
    /// Tax-inclusive price per unit
    pub unit_price: BigDecimal,
    pub discount_amount: BigDecimal,
}

/// A line item together with everything computed for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedLineItem {
    /// The classified item as ordered
    pub item: LineItem,
    /// Displayed unit price (raised when the invoice was reconciled upwards)
    pub display_unit_price: BigDecimal,
    /// Displayed unit price times quantity
    pub unit_price_total: BigDecimal,
    /// Displayed total less the charged amount (the item discount, or the line's
    /// share of a reconciliation discount when a target total was supplied)
    pub discount: BigDecimal,
    /// Tax-inclusive amount charged for the line
    pub amount_after_discount: BigDecimal,
    /// Reverse-derived tax breakdown of `amount_after_discount`
    pub tax: TaxComponents,
}

/// Tax totals for all items sharing an HSN code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsnTaxGroup {
    pub hsn_code: String,
    pub gst_rate_percent: BigDecimal,
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
}

impl HsnTaxGroup {
    /// Create an empty group for the given code
    pub fn new(hsn_code: String, gst_rate_percent: BigDecimal) -> Self {
        Self {
            hsn_code,
            gst_rate_percent,
            taxable_value: BigDecimal::from(0),
            cgst: BigDecimal::from(0),
            sgst: BigDecimal::from(0),
            igst: BigDecimal::from(0),
        }
    }

    /// Add one item's tax breakdown to the group
    pub fn accumulate(&mut self, tax: &TaxComponents) {
        self.taxable_value += &tax.taxable_value;
        self.cgst += &tax.cgst;
        self.sgst += &tax.sgst;
        self.igst += &tax.igst;
    }

    /// CGST + SGST + IGST for the group
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }
}

/// The buyer named on the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: Option<String>,
    pub gst_number: Option<String>,
}

impl Customer {
    /// Create a customer with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            gst_number: None,
        }
    }
}

/// The store issuing the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Key of the invoice sequence counter; falls back to the city
    pub id: Option<String>,
    pub city: String,
    pub state: String,
    pub gst_number: String,
}

impl Location {
    /// Create a location without an explicit id
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        gst_number: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            city: city.into(),
            state: state.into(),
            gst_number: gst_number.into(),
        }
    }

    /// Key used for the per-location invoice sequence
    pub fn sequence_key(&self) -> String {
        match &self.id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => self.city.trim().to_lowercase(),
        }
    }

    /// Whether a sale to `place_of_supply` crosses a state border
    pub fn is_inter_state(&self, place_of_supply: &str) -> bool {
        !self
            .state
            .trim()
            .eq_ignore_ascii_case(place_of_supply.trim())
    }
}

/// Kinds of non-fatal issues raised while assembling an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// A missing or malformed input field was replaced with a default
    DefaultedField,
    /// Item-level sums drifted more than a paisa from the aggregate computation
    RoundingDrift,
    /// The order's own total disagrees with the computed grand total
    OrderTotalMismatch,
    /// A target total was supplied but there was nothing to spread it over
    UnallocatableTarget,
    /// Items sharing an HSN code carry different GST rates
    MixedHsnRates,
}

/// A non-fatal issue recorded on the invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl InvoiceWarning {
    /// Create a warning of the given kind
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A fully computed tax invoice, ready for rendering
///
/// Created once per sale by the assembler and never modified afterwards.
/// Renderers only read from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Unique identifier for the record
    pub id: Uuid,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub customer: Customer,
    pub location: Location,
    pub payment_method: String,
    /// Whether IGST (rather than CGST + SGST) applies
    pub inter_state: bool,
    pub items: Vec<ComputedLineItem>,
    /// Tax totals keyed by HSN code
    pub hsn_groups: BTreeMap<String, HsnTaxGroup>,
    pub subtotal_before_discount: BigDecimal,
    pub total_discount: BigDecimal,
    pub subtotal_after_discount: BigDecimal,
    pub total_taxable_value: BigDecimal,
    pub total_cgst: BigDecimal,
    pub total_sgst: BigDecimal,
    pub total_igst: BigDecimal,
    pub total_tax: BigDecimal,
    pub grand_total: BigDecimal,
    pub amount_in_words: String,
    pub tax_amount_in_words: String,
    /// Non-fatal issues raised during intake and assembly
    pub warnings: Vec<InvoiceWarning>,
}

impl InvoiceRecord {
    /// Filesystem-safe file name for the rendered document
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "{}.{}",
            crate::invoice::numbering::file_safe(&self.invoice_number),
            extension
        )
    }

    /// Whether any warning of the given kind was raised
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// Errors that can occur while building an invoice
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No eligible products: {0}")]
    NoEligibleProducts(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type for invoice operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
