//! Builds the complete invoice record from a request

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::invoice::reconcile::{ReconcileOutcome, TargetReconciler};
use crate::invoice::request::InvoiceRequest;
use crate::invoice::words::AmountInWordsConverter;
use crate::settings::InvoiceSettings;
use crate::tax::{GstRate, InclusiveTaxCalculator, TaxClassifier, TaxComponents};
use crate::types::*;
use crate::utils::money::{difference, round2};
use crate::utils::validation::validate_item_draft;

/// A classified line before any amounts are computed
struct PricedLine {
    item: LineItem,
    rate: GstRate,
    /// Unit price times quantity
    unit_price_total: BigDecimal,
    /// Unit-price total less the item discount
    net_amount: BigDecimal,
}

/// Display totals and charged amounts per line after reconciliation
struct LineAmounts {
    unit_price_totals: Vec<BigDecimal>,
    charged: Vec<BigDecimal>,
}

/// Orchestrates classification, tax derivation, reconciliation and words
///
/// `assemble` is synchronous and pure: it does no I/O and holds no shared
/// state, so independent invoices can be assembled in parallel.
///
/// Without a target every line is charged its net amount and taxed on its
/// own. With a target the cart is reconciled once, tax is re-derived for
/// each HSN code and rate from its reconciled amount, and the item-level
/// values are pro-rated from those group figures.
#[derive(Debug, Clone, Default)]
pub struct InvoiceAssembler {
    classifier: TaxClassifier,
    settings: InvoiceSettings,
}

impl InvoiceAssembler {
    /// Create an assembler with a custom classifier and settings
    pub fn new(classifier: TaxClassifier, settings: InvoiceSettings) -> Self {
        Self {
            classifier,
            settings,
        }
    }

    pub fn classifier(&self) -> &TaxClassifier {
        &self.classifier
    }

    pub fn settings(&self) -> &InvoiceSettings {
        &self.settings
    }

    /// Compute the full invoice record for a request
    pub fn assemble(&self, request: InvoiceRequest) -> InvoiceResult<InvoiceRecord> {
        let InvoiceRequest {
            id,
            invoice_number,
            date,
            customer,
            location,
            payment_method,
            inter_state,
            items,
            target_grand_total,
            expected_grand_total,
            expected_subtotal,
            expected_total_tax,
            mut warnings,
        } = request;

        let lines = self.price_lines(items, inter_state)?;

        let (amounts, taxes) = match &target_grand_total {
            Some(target) => {
                let amounts = reconcile_lines(&lines, target, &mut warnings)?;
                let taxes = derive_group_taxes(&lines, &amounts.charged)?;
                (amounts, taxes)
            }
            None => {
                let charged: Vec<BigDecimal> =
                    lines.iter().map(|l| l.net_amount.clone()).collect();
                let taxes = lines
                    .iter()
                    .zip(&charged)
                    .map(|(line, amount)| InclusiveTaxCalculator::compute(amount, &line.rate))
                    .collect::<InvoiceResult<Vec<_>>>()?;
                let amounts = LineAmounts {
                    unit_price_totals: lines.iter().map(|l| l.unit_price_total.clone()).collect(),
                    charged,
                };
                (amounts, taxes)
            }
        };

        let mut computed = Vec::with_capacity(lines.len());
        let mut hsn_groups: BTreeMap<String, HsnTaxGroup> = BTreeMap::new();
        let mut charged_by_rate: BTreeMap<BigDecimal, BigDecimal> = BTreeMap::new();

        for (((line, unit_price_total), charged), tax) in lines
            .into_iter()
            .zip(amounts.unit_price_totals)
            .zip(amounts.charged)
            .zip(taxes)
        {
            let group = hsn_groups
                .entry(line.item.hsn_code.clone())
                .or_insert_with(|| {
                    HsnTaxGroup::new(line.item.hsn_code.clone(), line.item.gst_rate_percent.clone())
                });
            if group.gst_rate_percent != line.item.gst_rate_percent {
                let message = format!(
                    "HSN {} carries rates {}% and {}%",
                    group.hsn_code, group.gst_rate_percent, line.item.gst_rate_percent
                );
                warn!(invoice_number = %invoice_number, "{}", message);
                warnings.push(InvoiceWarning::new(WarningKind::MixedHsnRates, message));
            }
            group.accumulate(&tax);

            *charged_by_rate
                .entry(line.item.gst_rate_percent.clone())
                .or_insert_with(|| BigDecimal::from(0)) += &charged;

            let quantity = BigDecimal::from(line.item.quantity);
            computed.push(ComputedLineItem {
                display_unit_price: round2(&(&unit_price_total / quantity)),
                discount: &unit_price_total - &charged,
                unit_price_total,
                amount_after_discount: charged,
                tax,
                item: line.item,
            });
        }

        let mut totals = TaxComponents::zero();
        for item in &computed {
            totals += &item.tax;
        }

        let subtotal_before_discount: BigDecimal =
            computed.iter().map(|i| &i.unit_price_total).sum();
        let total_discount: BigDecimal = computed.iter().map(|i| &i.discount).sum();
        let subtotal_after_discount: BigDecimal =
            computed.iter().map(|i| &i.amount_after_discount).sum();
        let total_tax = totals.total_tax();
        let grand_total = subtotal_after_discount.clone();

        self.check_drift(
            &invoice_number,
            &charged_by_rate,
            &totals,
            inter_state,
            &mut warnings,
        )?;

        let order_checks = [
            ("total", &expected_grand_total, &grand_total),
            ("subtotal", &expected_subtotal, &subtotal_before_discount),
            ("tax", &expected_total_tax, &total_tax),
        ];
        for (label, expected, computed_value) in order_checks {
            if let Some(expected) = expected {
                if difference(expected, computed_value) > self.settings.drift_tolerance {
                    let message = format!(
                        "Order {} {} differs from computed {} {}",
                        label, expected, label, computed_value
                    );
                    warn!(invoice_number = %invoice_number, "{}", message);
                    warnings.push(InvoiceWarning::new(WarningKind::OrderTotalMismatch, message));
                }
            }
        }

        let amount_in_words = AmountInWordsConverter::convert(&grand_total)?;
        let tax_amount_in_words = AmountInWordsConverter::convert(&total_tax)?;

        info!(
            invoice_number = %invoice_number,
            items = computed.len(),
            grand_total = %grand_total,
            total_tax = %total_tax,
            warnings = warnings.len(),
            "Invoice assembled"
        );

        Ok(InvoiceRecord {
            id,
            invoice_number,
            date,
            customer,
            location,
            payment_method,
            inter_state,
            items: computed,
            hsn_groups,
            subtotal_before_discount,
            total_discount,
            subtotal_after_discount,
            total_taxable_value: totals.taxable_value,
            total_cgst: totals.cgst,
            total_sgst: totals.sgst,
            total_igst: totals.igst,
            total_tax,
            grand_total,
            amount_in_words,
            tax_amount_in_words,
            warnings,
        })
    }

    fn price_lines(
        &self,
        items: Vec<ItemDraft>,
        inter_state: bool,
    ) -> InvoiceResult<Vec<PricedLine>> {
        items
            .into_iter()
            .map(|draft| {
                validate_item_draft(&draft)?;
                let classification = match draft.classification {
                    Some(classification) => classification,
                    None => self.classifier.classify(&draft.description),
                };
                let rate = GstRate::for_supply(classification.gst_rate.clone(), inter_state)?;
                let unit_price_total =
                    round2(&(&draft.unit_price * BigDecimal::from(draft.quantity)));
                let net_amount = &unit_price_total - &draft.discount_amount;

                debug!(
                    description = %draft.description,
                    hsn_code = %classification.hsn_code,
                    gst_rate = %classification.gst_rate,
                    "Classified line item"
                );

                Ok(PricedLine {
                    item: LineItem {
                        description: draft.description,
                        hsn_code: classification.hsn_code,
                        gst_rate_percent: classification.gst_rate,
                        quantity: draft.quantity,
                        unit_price: draft.unit_price,
                        discount_amount: draft.discount_amount,
                    },
                    rate,
                    unit_price_total,
                    net_amount,
                })
            })
            .collect()
    }

    /// Compare item-level sums with a per-rate aggregate recomputation
    fn check_drift(
        &self,
        invoice_number: &str,
        charged_by_rate: &BTreeMap<BigDecimal, BigDecimal>,
        item_totals: &TaxComponents,
        inter_state: bool,
        warnings: &mut Vec<InvoiceWarning>,
    ) -> InvoiceResult<()> {
        let mut aggregate = TaxComponents::zero();
        for (rate, charged) in charged_by_rate {
            let rate = GstRate::for_supply(rate.clone(), inter_state)?;
            aggregate += &InclusiveTaxCalculator::compute(charged, &rate)?;
        }

        let taxable_drift = difference(&aggregate.taxable_value, &item_totals.taxable_value);
        let tax_drift = difference(&aggregate.total_tax(), &item_totals.total_tax());
        let tolerance = &self.settings.drift_tolerance;

        if taxable_drift > *tolerance || tax_drift > *tolerance {
            let message = format!(
                "Item-level sums drift from aggregate: taxable {} vs {}, tax {} vs {}",
                item_totals.taxable_value,
                aggregate.taxable_value,
                item_totals.total_tax(),
                aggregate.total_tax()
            );
            warn!(invoice_number = %invoice_number, "{}", message);
            warnings.push(InvoiceWarning::new(WarningKind::RoundingDrift, message));
        }

        Ok(())
    }
}

/// Reconcile the unit-price totals to the target and spread it over lines
///
/// A target supersedes item-level discounts: every line is charged its
/// pro-rated share of the target by unit-price total.
fn reconcile_lines(
    lines: &[PricedLine],
    target: &BigDecimal,
    warnings: &mut Vec<InvoiceWarning>,
) -> InvoiceResult<LineAmounts> {
    let unit_price_totals: Vec<BigDecimal> =
        lines.iter().map(|l| l.unit_price_total.clone()).collect();
    let reconciliation = TargetReconciler::reconcile(&unit_price_totals, target)?;
    let outcome = reconciliation.outcome();

    if lines.is_empty() {
        if reconciliation.target_grand_total > BigDecimal::from(0) {
            let message = format!(
                "Target total {} supplied for an invoice without items",
                reconciliation.target_grand_total
            );
            warn!("{}", message);
            warnings.push(InvoiceWarning::new(WarningKind::UnallocatableTarget, message));
        }
        return Ok(LineAmounts {
            unit_price_totals: Vec::new(),
            charged: Vec::new(),
        });
    }

    let charged = match outcome {
        ReconcileOutcome::Unchanged => unit_price_totals.clone(),
        ReconcileOutcome::Discount | ReconcileOutcome::PriceIncrease => {
            TargetReconciler::allocate(&unit_price_totals, &reconciliation.target_grand_total)
        }
    };

    let unit_price_totals = match outcome {
        // Raised display prices show no discount
        ReconcileOutcome::PriceIncrease => charged.clone(),
        ReconcileOutcome::Discount | ReconcileOutcome::Unchanged => unit_price_totals,
    };

    info!(
        outcome = ?outcome,
        real_total = %reconciliation.real_total,
        target = %reconciliation.target_grand_total,
        discount = %reconciliation.discount,
        "Applied target reconciliation"
    );

    Ok(LineAmounts {
        unit_price_totals,
        charged,
    })
}

/// Derive tax once per HSN code and rate, then pro-rate it to the lines
///
/// Each group's taxable value and tax come from its reconciled amount, so
/// a single-rate cart carries exactly the split of the target itself.
/// Line values are shares of the group figures by charged amount and sum
/// back to them exactly.
fn derive_group_taxes(
    lines: &[PricedLine],
    charged: &[BigDecimal],
) -> InvoiceResult<Vec<TaxComponents>> {
    let mut groups: BTreeMap<(&str, &BigDecimal), Vec<usize>> = BTreeMap::new();
    for (index, line) in lines.iter().enumerate() {
        groups
            .entry((line.item.hsn_code.as_str(), &line.item.gst_rate_percent))
            .or_default()
            .push(index);
    }

    let mut taxes = vec![TaxComponents::zero(); lines.len()];
    for indices in groups.values() {
        let weights: Vec<BigDecimal> = indices.iter().map(|&i| charged[i].clone()).collect();
        let group_amount: BigDecimal = weights.iter().sum();
        let group_tax = InclusiveTaxCalculator::compute(&group_amount, &lines[indices[0]].rate)?;

        let taxable = TargetReconciler::allocate(&weights, &group_tax.taxable_value);
        let cgst = TargetReconciler::allocate(&weights, &group_tax.cgst);
        let sgst = TargetReconciler::allocate(&weights, &group_tax.sgst);
        let igst = TargetReconciler::allocate(&weights, &group_tax.igst);

        for (position, &index) in indices.iter().enumerate() {
            taxes[index] = TaxComponents {
                taxable_value: taxable[position].clone(),
                cgst: cgst[position].clone(),
                sgst: sgst[position].clone(),
                igst: igst[position].clone(),
            };
        }
    }

    Ok(taxes)
}
