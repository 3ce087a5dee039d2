//! Invoice requests and their builder

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::settings::InvoiceSettings;
use crate::types::*;
use crate::utils::validation::{
    validate_invoice_number, validate_item_draft, validate_non_negative_amount,
};

/// Everything the assembler needs to compute one invoice
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRequest {
    pub id: Uuid,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub customer: Customer,
    pub location: Location,
    pub payment_method: String,
    pub inter_state: bool,
    pub items: Vec<ItemDraft>,
    /// Grand total the cart must be reconciled to
    pub target_grand_total: Option<BigDecimal>,
    /// Total the caller believes the order has; checked, never enforced
    pub expected_grand_total: Option<BigDecimal>,
    /// Order's own subtotal, checked against the unit-price total
    pub expected_subtotal: Option<BigDecimal>,
    /// Order's own tax figure, checked against the computed tax
    pub expected_total_tax: Option<BigDecimal>,
    /// Warnings raised before assembly (input recoveries)
    pub warnings: Vec<InvoiceWarning>,
}

/// Builder for creating invoice requests
pub struct InvoiceRequestBuilder {
    request: InvoiceRequest,
}

impl InvoiceRequestBuilder {
    /// Create a new builder with the default placeholders
    pub fn new(invoice_number: impl Into<String>, date: NaiveDate, location: Location) -> Self {
        Self::with_settings(invoice_number, date, location, &InvoiceSettings::default())
    }

    /// Create a new builder whose customer and payment method start as the
    /// configured placeholders
    pub fn with_settings(
        invoice_number: impl Into<String>,
        date: NaiveDate,
        location: Location,
        settings: &InvoiceSettings,
    ) -> Self {
        Self {
            request: InvoiceRequest {
                id: Uuid::new_v4(),
                invoice_number: invoice_number.into(),
                date,
                customer: Customer::named(settings.placeholder_customer.clone()),
                location,
                payment_method: settings.placeholder_text.clone(),
                inter_state: false,
                items: Vec::new(),
                target_grand_total: None,
                expected_grand_total: None,
                expected_subtotal: None,
                expected_total_tax: None,
                warnings: Vec::new(),
            },
        }
    }

    /// Use a fixed record id
    pub fn id(mut self, id: Uuid) -> Self {
        self.request.id = id;
        self
    }

    pub fn customer(mut self, customer: Customer) -> Self {
        self.request.customer = customer;
        self
    }

    pub fn payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.request.payment_method = payment_method.into();
        self
    }

    /// Charge IGST instead of CGST + SGST
    pub fn inter_state(mut self, inter_state: bool) -> Self {
        self.request.inter_state = inter_state;
        self
    }

    /// Add an item
    pub fn item(mut self, item: ItemDraft) -> Self {
        self.request.items.push(item);
        self
    }

    /// Add several items
    pub fn items(mut self, items: impl IntoIterator<Item = ItemDraft>) -> Self {
        self.request.items.extend(items);
        self
    }

    /// Reconcile the cart to this grand total
    pub fn target_grand_total(mut self, target: BigDecimal) -> Self {
        self.request.target_grand_total = Some(target);
        self
    }

    pub fn expected_grand_total(mut self, expected: BigDecimal) -> Self {
        self.request.expected_grand_total = Some(expected);
        self
    }

    pub fn expected_subtotal(mut self, expected: BigDecimal) -> Self {
        self.request.expected_subtotal = Some(expected);
        self
    }

    pub fn expected_total_tax(mut self, expected: BigDecimal) -> Self {
        self.request.expected_total_tax = Some(expected);
        self
    }

    /// Carry over a warning raised during intake
    pub fn warning(mut self, warning: InvoiceWarning) -> Self {
        self.request.warnings.push(warning);
        self
    }

    /// Build and validate the request
    pub fn build(self) -> InvoiceResult<InvoiceRequest> {
        let request = self.request;

        validate_invoice_number(&request.invoice_number)?;
        for item in &request.items {
            validate_item_draft(item)?;
        }
        if let Some(target) = &request.target_grand_total {
            validate_non_negative_amount("Target grand total", target)?;
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn pune() -> Location {
        Location::new("Pune", "Maharashtra", "27ABCDE1234F1Z5")
    }

    #[test]
    fn test_builder_defaults() {
        let request = InvoiceRequestBuilder::new("PUNEEYE0001", date(), pune())
            .item(ItemDraft::new("Aviator Sunglasses", 1, BigDecimal::from(999)))
            .build()
            .unwrap();

        assert_eq!(request.customer.name, "Customer");
        assert_eq!(request.payment_method, "N/A");
        assert!(!request.inter_state);
        assert_eq!(request.items.len(), 1);
        assert!(request.target_grand_total.is_none());
    }

    #[test]
    fn test_builder_uses_configured_placeholders() {
        let settings = InvoiceSettings {
            placeholder_customer: "Walk-in Customer".to_string(),
            placeholder_text: "-".to_string(),
            ..InvoiceSettings::default()
        };
        let request =
            InvoiceRequestBuilder::with_settings("PUNEEYE0001", date(), pune(), &settings)
                .build()
                .unwrap();

        assert_eq!(request.customer.name, "Walk-in Customer");
        assert_eq!(request.payment_method, "-");
    }

    #[test]
    fn test_builder_rejects_negative_target() {
        let result = InvoiceRequestBuilder::new("PUNEEYE0001", date(), pune())
            .target_grand_total(BigDecimal::from(-10))
            .build();
        assert!(matches!(result, Err(InvoiceError::Validation(_))));
    }

    #[test]
    fn test_builder_rejects_empty_number() {
        let result = InvoiceRequestBuilder::new("", date(), pune()).build();
        assert!(result.is_err());
    }
}
