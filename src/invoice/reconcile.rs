//! Reconciling a cart against an externally supplied grand total

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{InvoiceError, InvoiceResult};
use crate::utils::money::round2;

/// Which way the cart had to move to hit the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    /// Unit-price total exceeded the target; a lump discount closes the gap
    Discount,
    /// Unit-price total fell short; the displayed unit-price total is raised
    PriceIncrease,
    /// Unit-price total already equals the target
    Unchanged,
}

/// Result of reconciling a cart with its target grand total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub real_total: BigDecimal,
    pub target_grand_total: BigDecimal,
    /// Lump discount; never negative
    pub discount: BigDecimal,
    /// New displayed unit-price total, set only when prices go up
    pub adjusted_unit_price_total: Option<BigDecimal>,
}

impl Reconciliation {
    pub fn outcome(&self) -> ReconcileOutcome {
        if self.adjusted_unit_price_total.is_some() {
            ReconcileOutcome::PriceIncrease
        } else if self.discount > BigDecimal::from(0) {
            ReconcileOutcome::Discount
        } else {
            ReconcileOutcome::Unchanged
        }
    }
}

/// Decides between discount, price increase, or no change
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetReconciler;

impl TargetReconciler {
    /// Reconcile the unit-price line totals (`unit_price * quantity`) with
    /// `target_grand_total`
    pub fn reconcile(
        unit_price_totals: &[BigDecimal],
        target_grand_total: &BigDecimal,
    ) -> InvoiceResult<Reconciliation> {
        let zero = BigDecimal::from(0);
        if *target_grand_total < zero {
            return Err(InvoiceError::Validation(format!(
                "Target grand total cannot be negative: {}",
                target_grand_total
            )));
        }

        let real_total = round2(&unit_price_totals.iter().sum::<BigDecimal>());
        let target = round2(target_grand_total);
        let diff = &real_total - &target;

        let (discount, adjusted_unit_price_total) = if diff > zero {
            (diff, None)
        } else if diff < zero {
            (zero, Some(target.clone()))
        } else {
            (zero, None)
        };

        debug!(
            real_total = %real_total,
            target = %target,
            discount = %discount,
            "Reconciled cart against target total"
        );

        Ok(Reconciliation {
            real_total,
            target_grand_total: target,
            discount,
            adjusted_unit_price_total,
        })
    }

    /// Spread a non-negative `total` over lines in proportion to `weights`
    ///
    /// Works in whole paise: every line first gets the floor of its exact
    /// share, then the leftover paise go one each to the lines with the
    /// largest fractional parts, earlier lines first on ties. Shares are
    /// never negative and always sum exactly to `round2(total)`. All-zero
    /// weights split the total evenly.
    pub fn allocate(weights: &[BigDecimal], total: &BigDecimal) -> Vec<BigDecimal> {
        if weights.is_empty() {
            return Vec::new();
        }

        let zero = BigDecimal::from(0);
        let one = BigDecimal::from(1);
        let hundred = BigDecimal::from(100);
        let total_paise = round2(total) * &hundred;

        let weight_sum: BigDecimal = weights.iter().sum();
        let even = weight_sum == zero;
        let count = BigDecimal::from(weights.len() as u64);

        let mut paise = Vec::with_capacity(weights.len());
        let mut fractions = Vec::with_capacity(weights.len());
        for weight in weights {
            let exact = if even {
                &total_paise / &count
            } else {
                &total_paise * weight / &weight_sum
            };
            let floor = exact.with_scale_round(0, RoundingMode::Floor);
            fractions.push(&exact - &floor);
            paise.push(floor);
        }

        let mut leftover = &total_paise - paise.iter().sum::<BigDecimal>();
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.sort_by(|&a, &b| fractions[b].cmp(&fractions[a]));
        for index in order {
            if leftover <= zero {
                break;
            }
            paise[index] += &one;
            leftover -= &one;
        }

        paise.iter().map(|p| round2(&(p / &hundred))).collect()
    }
}
