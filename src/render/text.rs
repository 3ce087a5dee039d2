//! Plain-text receipt renderer

use std::fmt::Write;

use crate::traits::InvoiceRenderer;
use crate::types::*;
use crate::utils::money::{format_amount, format_inr};

/// Renders a fixed-width text tax invoice
#[derive(Debug, Clone)]
pub struct PlainTextRenderer {
    width: usize,
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self { width: 64 }
    }
}

impl PlainTextRenderer {
    pub fn with_width(width: usize) -> Self {
        Self {
            width: width.max(40),
        }
    }

    fn rule(&self, out: &mut String) {
        out.push_str(&"-".repeat(self.width));
        out.push('\n');
    }

    fn row(&self, out: &mut String, label: &str, value: &str) -> std::fmt::Result {
        let pad = self.width.saturating_sub(label.chars().count());
        writeln!(out, "{}{:>pad$}", label, value, pad = pad)
    }
}

impl InvoiceRenderer for PlainTextRenderer {
    type Output = String;

    fn render(&self, record: &InvoiceRecord) -> InvoiceResult<String> {
        self.write_invoice(record)
            .map_err(|e| InvoiceError::Render(e.to_string()))
    }
}

impl PlainTextRenderer {
    fn write_invoice(&self, record: &InvoiceRecord) -> Result<String, std::fmt::Error> {
        let mut out = String::new();

        writeln!(out, "TAX INVOICE")?;
        writeln!(out, "Invoice No: {}", record.invoice_number)?;
        writeln!(out, "Date: {}", record.date.format("%d-%m-%Y"))?;
        writeln!(
            out,
            "Store: {}, {} (GSTIN {})",
            record.location.city, record.location.state, record.location.gst_number
        )?;
        writeln!(out, "Customer: {}", record.customer.name)?;
        if let Some(gst_number) = &record.customer.gst_number {
            writeln!(out, "Customer GSTIN: {}", gst_number)?;
        }
        writeln!(out, "Payment: {}", record.payment_method)?;
        self.rule(&mut out);

        for (index, line) in record.items.iter().enumerate() {
            writeln!(
                out,
                "{}. {} [HSN {} @ {}%]",
                index + 1,
                line.item.description,
                line.item.hsn_code,
                line.item.gst_rate_percent
            )?;
            self.row(
                &mut out,
                &format!(
                    "   {} x {}",
                    line.item.quantity,
                    format_amount(&line.display_unit_price)
                ),
                &format_inr(&line.unit_price_total),
            )?;
            if line.discount > bigdecimal::BigDecimal::from(0) {
                self.row(&mut out, "   Discount", &format!("-{}", format_inr(&line.discount)))?;
            }
        }
        self.rule(&mut out);

        self.row(&mut out, "Subtotal", &format_inr(&record.subtotal_before_discount))?;
        self.row(&mut out, "Discount", &format_inr(&record.total_discount))?;
        self.row(&mut out, "Taxable value", &format_inr(&record.total_taxable_value))?;
        if record.inter_state {
            self.row(&mut out, "IGST", &format_inr(&record.total_igst))?;
        } else {
            self.row(&mut out, "CGST", &format_inr(&record.total_cgst))?;
            self.row(&mut out, "SGST", &format_inr(&record.total_sgst))?;
        }
        self.row(&mut out, "Grand total", &format_inr(&record.grand_total))?;
        self.rule(&mut out);

        writeln!(out, "HSN summary")?;
        for group in record.hsn_groups.values() {
            self.row(
                &mut out,
                &format!(
                    "  {} @ {}% on {}",
                    group.hsn_code,
                    group.gst_rate_percent,
                    format_amount(&group.taxable_value)
                ),
                &format_inr(&group.total_tax()),
            )?;
        }
        self.rule(&mut out);

        writeln!(out, "Amount in words: {} Only", record.amount_in_words)?;
        writeln!(out, "Tax in words: {} Only", record.tax_amount_in_words)?;

        Ok(out)
    }
}
