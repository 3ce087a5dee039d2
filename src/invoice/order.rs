//! Intake of point-of-sale orders
//!
//! Orders arrive as loosely typed JSON from the order subsystem. Missing or
//! malformed details never fail a sale: they are replaced with defaults and
//! each replacement is logged and recorded as a `DefaultedField` warning.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::invoice::request::InvoiceRequestBuilder;
use crate::settings::InvoiceSettings;
use crate::tax::HsnClassification;
use crate::types::*;
use crate::utils::money::round2;

/// One item of an incoming order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemInput {
    #[serde(alias = "name")]
    pub title: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<BigDecimal>,
    pub discount_amount: Option<BigDecimal>,
    pub discount_percentage: Option<BigDecimal>,
    pub product_type: Option<String>,
    pub hsn_code: Option<String>,
    pub gst_rate: Option<BigDecimal>,
}

/// Store location as sent with the order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderLocation {
    pub id: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub gst_number: Option<String>,
}

/// An order from the point-of-sale system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderInput {
    pub invoice_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_gst_number: Option<String>,
    pub items: Vec<OrderItemInput>,
    pub subtotal: Option<BigDecimal>,
    pub tax: Option<BigDecimal>,
    pub total: Option<BigDecimal>,
    pub payment_method: Option<String>,
    pub location: OrderLocation,
    /// State of the buyer; a different state from the store means IGST
    pub place_of_supply: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl OrderInput {
    /// Parse an order from JSON
    pub fn from_json(json: &str) -> InvoiceResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| InvoiceError::Validation(format!("Malformed order: {}", e)))
    }

    /// Caller-supplied invoice number, if any
    pub fn supplied_invoice_number(&self) -> Option<&str> {
        self.invoice_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Store location with placeholders for missing fields
    pub fn to_location(&self, settings: &InvoiceSettings) -> Location {
        let placeholder = || settings.placeholder_text.clone();
        Location {
            id: self.location.id.clone(),
            city: self.location.city.clone().unwrap_or_else(placeholder),
            state: self.location.state.clone().unwrap_or_else(placeholder),
            gst_number: self.location.gst_number.clone().unwrap_or_else(placeholder),
        }
    }

    /// Convert into a request builder, recovering from missing fields
    pub fn to_request_builder(
        &self,
        invoice_number: String,
        settings: &InvoiceSettings,
    ) -> InvoiceRequestBuilder {
        let mut recovered = Vec::new();
        let location = self.to_location(settings);

        let customer = Customer {
            name: non_empty(&self.customer_name).unwrap_or_else(|| {
                recovered.push(format!(
                    "customer name missing, using '{}'",
                    settings.placeholder_customer
                ));
                settings.placeholder_customer.clone()
            }),
            phone: non_empty(&self.customer_phone),
            gst_number: non_empty(&self.customer_gst_number),
        };

        let timestamp = self.timestamp.unwrap_or_else(|| {
            recovered.push("order timestamp missing, using current time".to_string());
            Utc::now()
        });

        let inter_state = self
            .place_of_supply
            .as_deref()
            .map(|state| location.is_inter_state(state))
            .unwrap_or(false);

        let items: Vec<ItemDraft> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| item_draft(index, item, settings, &mut recovered))
            .collect();

        let payment_method =
            non_empty(&self.payment_method).unwrap_or_else(|| settings.placeholder_text.clone());

        let mut builder = InvoiceRequestBuilder::with_settings(
            invoice_number,
            timestamp.date_naive(),
            location,
            settings,
        )
        .customer(customer)
        .payment_method(payment_method)
        .inter_state(inter_state)
        .items(items);

        // zero means the order subsystem did not send the figure
        let zero = BigDecimal::from(0);
        if let Some(total) = self.total.as_ref().filter(|t| **t > zero) {
            builder = builder.expected_grand_total(round2(total));
        }
        if let Some(subtotal) = self.subtotal.as_ref().filter(|s| **s > zero) {
            builder = builder.expected_subtotal(round2(subtotal));
        }
        if let Some(tax) = self.tax.as_ref().filter(|t| **t > zero) {
            builder = builder.expected_total_tax(round2(tax));
        }

        for message in recovered {
            warn!("{}", message);
            builder = builder.warning(InvoiceWarning::new(WarningKind::DefaultedField, message));
        }

        builder
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn item_draft(
    index: usize,
    input: &OrderItemInput,
    settings: &InvoiceSettings,
    recovered: &mut Vec<String>,
) -> ItemDraft {
    let zero = BigDecimal::from(0);

    let title = non_empty(&input.title).unwrap_or_else(|| {
        recovered.push(format!("item {} has no title", index + 1));
        settings.placeholder_text.clone()
    });

    let quantity = match input.quantity {
        Some(q) if q >= 1 => u32::try_from(q).unwrap_or_else(|_| {
            recovered.push(format!(
                "item '{}' quantity {} capped at {}",
                title,
                q,
                u32::MAX
            ));
            u32::MAX
        }),
        other => {
            recovered.push(format!(
                "item '{}' quantity {:?} replaced with 1",
                title, other
            ));
            1
        }
    };

    let unit_price = match &input.price {
        Some(price) if *price >= zero => round2(price),
        other => {
            recovered.push(format!(
                "item '{}' price {:?} replaced with 0",
                title,
                other.as_ref().map(|p| p.to_string())
            ));
            BigDecimal::from(0)
        }
    };

    let line_total = round2(&(&unit_price * BigDecimal::from(quantity)));
    let requested_discount = match (&input.discount_amount, &input.discount_percentage) {
        (Some(amount), _) => round2(amount),
        (None, Some(percentage)) => round2(&(&line_total * percentage / BigDecimal::from(100))),
        (None, None) => BigDecimal::from(0),
    };
    let discount_amount = if requested_discount < zero {
        recovered.push(format!("item '{}' negative discount ignored", title));
        zero
    } else if requested_discount > line_total {
        recovered.push(format!(
            "item '{}' discount {} capped at line total {}",
            title, requested_discount, line_total
        ));
        line_total
    } else {
        requested_discount
    };

    let description = match non_empty(&input.product_type) {
        Some(product_type) if !title.to_lowercase().contains(&product_type.to_lowercase()) => {
            format!("{} ({})", title, product_type)
        }
        _ => title,
    };

    let draft = ItemDraft::new(description, quantity, unit_price).with_discount(discount_amount);

    match (&input.gst_rate, non_empty(&input.hsn_code)) {
        (Some(rate), Some(hsn_code)) => {
            draft.classified(HsnClassification::new(hsn_code, rate.clone()))
        }
        (Some(rate), None) => {
            recovered.push(format!(
                "item '{}' GST rate {} without HSN code ignored",
                draft.description, rate
            ));
            draft
        }
        _ => draft,
    }
}
