//! Invoice service tying sequence numbering to the pure assembler

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use rand::Rng;
use tracing::info;

use crate::invoice::allocator::{CandidateProduct, QuantityAllocator};
use crate::invoice::assembler::InvoiceAssembler;
use crate::invoice::numbering::synthetic_invoice_number;
use crate::invoice::order::OrderInput;
use crate::invoice::request::InvoiceRequestBuilder;
use crate::settings::InvoiceSettings;
use crate::tax::TaxClassifier;
use crate::traits::*;
use crate::types::*;

/// Parameters for generating a synthetic invoice from a product pool
#[derive(Debug, Clone)]
pub struct SyntheticInvoiceParams {
    pub total_quantity: u32,
    pub pool: Vec<CandidateProduct>,
    pub target_grand_total: Option<BigDecimal>,
    pub customer: Customer,
    pub location: Location,
    pub payment_method: String,
    pub date: NaiveDate,
}

/// Issues invoice numbers and assembles invoices
pub struct InvoiceService<S: SequenceStore> {
    store: S,
    assembler: InvoiceAssembler,
    allocator: QuantityAllocator,
}

impl<S: SequenceStore> InvoiceService<S> {
    /// Create a new service with default settings and classification
    pub fn new(store: S) -> Self {
        Self::with_settings(store, InvoiceSettings::default(), TaxClassifier::default())
    }

    /// Create a new service with custom settings and classifier
    pub fn with_settings(store: S, settings: InvoiceSettings, classifier: TaxClassifier) -> Self {
        let allocator = QuantityAllocator::new(settings.max_item_types);
        Self {
            store,
            assembler: InvoiceAssembler::new(classifier, settings),
            allocator,
        }
    }

    pub fn assembler(&self) -> &InvoiceAssembler {
        &self.assembler
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn settings(&self) -> &InvoiceSettings {
        self.assembler.settings()
    }

    /// Invoice an order as charged
    pub async fn create_invoice(&self, order: &OrderInput) -> InvoiceResult<InvoiceRecord> {
        let builder = self.order_builder(order).await?;
        self.assembler.assemble(builder.build()?)
    }

    /// Invoice an order, reconciling it to a given grand total
    pub async fn create_invoice_with_target(
        &self,
        order: &OrderInput,
        target_grand_total: BigDecimal,
    ) -> InvoiceResult<InvoiceRecord> {
        let builder = self
            .order_builder(order)
            .await?
            .target_grand_total(target_grand_total);
        self.assembler.assemble(builder.build()?)
    }

    /// Generate an invoice by spreading a unit count over a product pool
    pub async fn generate_synthetic<R: Rng + ?Sized>(
        &self,
        params: SyntheticInvoiceParams,
        rng: &mut R,
    ) -> InvoiceResult<InvoiceRecord> {
        let allocations = self
            .allocator
            .allocate(params.total_quantity, &params.pool, rng)?;

        let invoice_number = self.next_invoice_number(&params.location).await?;

        let mut builder = InvoiceRequestBuilder::with_settings(
            invoice_number,
            params.date,
            params.location,
            self.settings(),
        )
        .customer(params.customer)
        .payment_method(params.payment_method)
        .items(allocations.iter().map(|a| a.to_item_draft()));
        if let Some(target) = params.target_grand_total {
            builder = builder.target_grand_total(target);
        }

        self.assembler.assemble(builder.build()?)
    }

    async fn order_builder(&self, order: &OrderInput) -> InvoiceResult<InvoiceRequestBuilder> {
        let invoice_number = match order.supplied_invoice_number() {
            Some(number) => number.to_string(),
            None => {
                let location = order.to_location(self.settings());
                self.next_invoice_number(&location).await?
            }
        };
        Ok(order.to_request_builder(invoice_number, self.settings()))
    }

    async fn next_invoice_number(&self, location: &Location) -> InvoiceResult<String> {
        let key = location.sequence_key();
        let sequence = self.store.next_sequence(&key).await?;
        let number = synthetic_invoice_number(&location.city, sequence, self.settings());
        info!(location = %key, sequence, invoice_number = %number, "Issued invoice number");
        Ok(number)
    }
}
