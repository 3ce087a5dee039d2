//! # GST Invoice Core
//!
//! Turns a point-of-sale order into a GST-compliant tax invoice record,
//! ready for any document renderer.
//!
//! ## Features
//!
//! - **HSN classification**: keyword rules mapping product descriptions to HSN codes and GST rates
//! - **Inclusive tax derivation**: taxable value and CGST/SGST/IGST from tax-inclusive prices
//! - **Target reconciliation**: discount or price adjustment to hit a supplied grand total
//! - **Amount in words**: Indian-English words with crore/lakh grouping and paise
//! - **Sequence numbering**: atomic per-location invoice counters behind a storage trait
//! - **Synthetic invoices**: random, seedable splitting of a unit count across products
//!
//! ## Quick Start
//!
//! ```rust
//! use gst_invoice_core::{InvoiceAssembler, InvoiceRequestBuilder, ItemDraft, Location};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let request = InvoiceRequestBuilder::new(
//!     "PUNEEYE0001",
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     Location::new("Pune", "Maharashtra", "27ABCDE1234F1Z5"),
//! )
//! .item(ItemDraft::new("Aviator Sunglasses", 2, BigDecimal::from(1000)))
//! .build()
//! .unwrap();
//!
//! let record = InvoiceAssembler::default().assemble(request).unwrap();
//! assert_eq!(record.grand_total, BigDecimal::from(2000));
//! ```

pub mod invoice;
pub mod render;
pub mod settings;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use invoice::*;
pub use render::*;
pub use settings::*;
pub use tax::*;
pub use traits::*;
pub use types::*;

pub use utils::{FileSequenceStore, MemorySequenceStore};
