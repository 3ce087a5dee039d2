//! Validation utilities

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(field: &str, amount: &BigDecimal) -> InvoiceResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(InvoiceError::Validation(format!(
            "{} cannot be negative: {}",
            field, amount
        )))
    } else {
        Ok(())
    }
}

/// Validate that an invoice number is usable
pub fn validate_invoice_number(invoice_number: &str) -> InvoiceResult<()> {
    if invoice_number.trim().is_empty() {
        return Err(InvoiceError::Validation(
            "Invoice number cannot be empty".to_string(),
        ));
    }

    if invoice_number.len() > 64 {
        return Err(InvoiceError::Validation(
            "Invoice number cannot exceed 64 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a single item before classification
pub fn validate_item_draft(item: &ItemDraft) -> InvoiceResult<()> {
    if item.quantity == 0 {
        return Err(InvoiceError::Validation(format!(
            "Quantity of '{}' must be at least 1",
            item.description
        )));
    }

    validate_non_negative_amount("Unit price", &item.unit_price)?;
    validate_non_negative_amount("Discount amount", &item.discount_amount)?;

    let line_total = item.line_total();
    if item.discount_amount > line_total {
        return Err(InvoiceError::Validation(format!(
            "Discount {} on '{}' exceeds line total {}",
            item.discount_amount, item.description, line_total
        )));
    }

    if let Some(classification) = &item.classification {
        validate_non_negative_amount("GST rate", &classification.gst_rate)?;
        if classification.hsn_code.trim().is_empty() {
            return Err(InvoiceError::Validation(format!(
                "HSN code of '{}' cannot be empty",
                item.description
            )));
        }
    }

    Ok(())
}
