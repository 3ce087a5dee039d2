//! Random partitioning of a unit count across candidate products

use bigdecimal::BigDecimal;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tax::HsnClassification;
use crate::types::{InvoiceError, InvoiceResult, ItemDraft};

/// A product that may be picked for a synthetic invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub name: String,
    /// Tax-inclusive unit price
    pub price: BigDecimal,
    /// Known classification, if the catalogue carries one
    pub classification: Option<HsnClassification>,
}

impl CandidateProduct {
    pub fn new(name: impl Into<String>, price: BigDecimal) -> Self {
        Self {
            name: name.into(),
            price,
            classification: None,
        }
    }
}

/// A product paired with the number of units assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub product: CandidateProduct,
    pub quantity: u32,
}

impl Allocation {
    /// Turn the allocation into an invoice line
    pub fn to_item_draft(&self) -> ItemDraft {
        let draft = ItemDraft::new(
            self.product.name.clone(),
            self.quantity,
            self.product.price.clone(),
        );
        match &self.product.classification {
            Some(classification) => draft.classified(classification.clone()),
            None => draft,
        }
    }
}

/// Splits a total unit count into 1..=N product groups of random size
#[derive(Debug, Clone)]
pub struct QuantityAllocator {
    max_types: u32,
}

impl Default for QuantityAllocator {
    fn default() -> Self {
        Self::new(5)
    }
}

impl QuantityAllocator {
    /// Create an allocator producing at most `max_types` groups
    pub fn new(max_types: u32) -> Self {
        Self {
            max_types: max_types.max(1),
        }
    }

    /// Partition `total_quantity` across distinct products from `pool`
    ///
    /// The number of groups is drawn from `1..=min(total_quantity, max_types,
    /// eligible products)`. Each group but the last receives between 1 and
    /// `remaining - (groups_left - 1)` units so every later group can still
    /// get one; the last group takes the remainder.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        total_quantity: u32,
        pool: &[CandidateProduct],
        rng: &mut R,
    ) -> InvoiceResult<Vec<Allocation>> {
        if total_quantity == 0 {
            return Err(InvoiceError::Validation(
                "Total quantity must be at least 1".to_string(),
            ));
        }

        let zero = BigDecimal::from(0);
        let eligible: Vec<&CandidateProduct> = pool.iter().filter(|p| p.price > zero).collect();
        if eligible.is_empty() {
            return Err(InvoiceError::NoEligibleProducts(format!(
                "none of {} candidate products has a positive price",
                pool.len()
            )));
        }

        let upper = total_quantity
            .min(self.max_types)
            .min(eligible.len() as u32);
        let number_of_types = rng.gen_range(1..=upper);

        let products: Vec<&CandidateProduct> = eligible
            .choose_multiple(rng, number_of_types as usize)
            .copied()
            .collect();

        let mut allocations = Vec::with_capacity(products.len());
        let mut remaining = total_quantity;
        let last = products.len() - 1;

        for (index, product) in products.into_iter().enumerate() {
            let quantity = if index == last {
                remaining
            } else {
                let types_left = (last - index + 1) as u32;
                let max_quantity = remaining - (types_left - 1);
                rng.gen_range(1..=max_quantity)
            };
            remaining -= quantity;
            allocations.push(Allocation {
                product: product.clone(),
                quantity,
            });
        }

        debug!(
            total_quantity,
            groups = allocations.len(),
            "Allocated quantities across products"
        );

        Ok(allocations)
    }
}
