//! GST (Goods and Services Tax) reverse calculation for tax-inclusive prices

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::types::{InvoiceError, InvoiceResult};
use crate::utils::money::round2;

/// Whether a supply stays within one state or crosses a state border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyType {
    /// Same state: CGST + SGST
    IntraState,
    /// Different states: IGST
    InterState,
}

/// GST rate structure for Indian taxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRate {
    /// Total GST rate percentage (e.g., 18 for 18%)
    pub total_rate: BigDecimal,
    /// CGST rate percentage (Central GST)
    pub cgst_rate: BigDecimal,
    /// SGST rate percentage (State GST)
    pub sgst_rate: BigDecimal,
    /// IGST rate percentage (Integrated GST)
    pub igst_rate: BigDecimal,
    pub supply: SupplyType,
}

impl GstRate {
    /// Create a new GST rate with intra-state rates (CGST + SGST)
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            total_rate,
            cgst_rate: half_rate.clone(),
            sgst_rate: half_rate,
            igst_rate: BigDecimal::from(0),
            supply: SupplyType::IntraState,
        }
    }

    /// Create a new GST rate with inter-state rates (IGST)
    pub fn inter_state(total_rate: BigDecimal) -> Self {
        Self {
            total_rate: total_rate.clone(),
            cgst_rate: BigDecimal::from(0),
            sgst_rate: BigDecimal::from(0),
            igst_rate: total_rate,
            supply: SupplyType::InterState,
        }
    }

    /// Build and validate the rate for the given supply
    pub fn for_supply(total_rate: BigDecimal, inter_state: bool) -> InvoiceResult<Self> {
        let rate = if inter_state {
            Self::inter_state(total_rate)
        } else {
            Self::intra_state(total_rate)
        };
        rate.validate()?;
        Ok(rate)
    }

    /// Validate that the GST rate structure is correct
    pub fn validate(&self) -> InvoiceResult<()> {
        let zero = BigDecimal::from(0);

        if self.total_rate < zero {
            return Err(InvoiceError::Validation(format!(
                "GST rate cannot be negative: {}",
                self.total_rate
            )));
        }

        let calculated_total = &self.cgst_rate + &self.sgst_rate + &self.igst_rate;
        if calculated_total != self.total_rate {
            return Err(InvoiceError::Validation(format!(
                "GST components don't add up to total rate: {} != {}",
                calculated_total, self.total_rate
            )));
        }

        match self.supply {
            SupplyType::IntraState => {
                if self.igst_rate != zero || self.cgst_rate != self.sgst_rate {
                    return Err(InvoiceError::Validation(
                        "CGST and SGST rates must be equal for intra-state supplies".to_string(),
                    ));
                }
            }
            SupplyType::InterState => {
                if self.cgst_rate != zero || self.sgst_rate != zero {
                    return Err(InvoiceError::Validation(
                        "Only IGST should be applicable for inter-state supplies".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn is_inter_state(&self) -> bool {
        self.supply == SupplyType::InterState
    }
}

/// Tax breakdown of a tax-inclusive amount, each part rounded to paise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxComponents {
    /// Value before GST
    pub taxable_value: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
}

impl TaxComponents {
    /// All components zero
    pub fn zero() -> Self {
        Self {
            taxable_value: BigDecimal::from(0),
            cgst: BigDecimal::from(0),
            sgst: BigDecimal::from(0),
            igst: BigDecimal::from(0),
        }
    }

    /// CGST + SGST + IGST
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }

    /// Taxable value plus all tax
    pub fn gross(&self) -> BigDecimal {
        &self.taxable_value + self.total_tax()
    }
}

impl AddAssign<&TaxComponents> for TaxComponents {
    fn add_assign(&mut self, other: &TaxComponents) {
        self.taxable_value += &other.taxable_value;
        self.cgst += &other.cgst;
        self.sgst += &other.sgst;
        self.igst += &other.igst;
    }
}

/// Reverse-derives taxable value and tax from tax-inclusive amounts
///
/// Rounding happens at each step, never deferred:
///
/// ```text
/// taxable = round2(amount / (1 + rate / 100))
/// igst    = round2(taxable * rate / 100)          (inter-state)
/// cgst    = sgst = round2(taxable * rate / 2 / 100) (intra-state)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InclusiveTaxCalculator;

impl InclusiveTaxCalculator {
    /// Break a tax-inclusive amount into taxable value and tax components
    pub fn compute(
        amount_inclusive_of_tax: &BigDecimal,
        gst_rate: &GstRate,
    ) -> InvoiceResult<TaxComponents> {
        gst_rate.validate()?;

        let zero = BigDecimal::from(0);
        if *amount_inclusive_of_tax < zero {
            return Err(InvoiceError::Validation(format!(
                "Tax-inclusive amount cannot be negative: {}",
                amount_inclusive_of_tax
            )));
        }

        let hundred = BigDecimal::from(100);
        if gst_rate.total_rate == zero {
            let mut components = TaxComponents::zero();
            components.taxable_value = round2(amount_inclusive_of_tax);
            return Ok(components);
        }

        let divisor = BigDecimal::from(1) + &gst_rate.total_rate / &hundred;
        let taxable_value = round2(&(amount_inclusive_of_tax / divisor));

        let mut components = TaxComponents::zero();
        match gst_rate.supply {
            SupplyType::InterState => {
                components.igst = round2(&(&taxable_value * &gst_rate.igst_rate / &hundred));
            }
            SupplyType::IntraState => {
                let half = round2(&(&taxable_value * &gst_rate.cgst_rate / &hundred));
                components.cgst = half.clone();
                components.sgst = half;
            }
        }
        components.taxable_value = taxable_value;

        Ok(components)
    }

    /// Shorthand taking the total rate and supply flag directly
    pub fn compute_for(
        amount_inclusive_of_tax: &BigDecimal,
        gst_rate_percent: &BigDecimal,
        inter_state: bool,
    ) -> InvoiceResult<TaxComponents> {
        let rate = GstRate::for_supply(gst_rate_percent.clone(), inter_state)?;
        Self::compute(amount_inclusive_of_tax, &rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_gst_rate_intra_state() {
        let rate = GstRate::intra_state(BigDecimal::from(18));
        assert_eq!(rate.total_rate, BigDecimal::from(18));
        assert_eq!(rate.cgst_rate, BigDecimal::from(9));
        assert_eq!(rate.sgst_rate, BigDecimal::from(9));
        assert_eq!(rate.igst_rate, BigDecimal::from(0));
        assert!(rate.validate().is_ok());
    }

    #[test]
    fn test_gst_rate_inter_state() {
        let rate = GstRate::inter_state(BigDecimal::from(18));
        assert_eq!(rate.cgst_rate, BigDecimal::from(0));
        assert_eq!(rate.sgst_rate, BigDecimal::from(0));
        assert_eq!(rate.igst_rate, BigDecimal::from(18));
        assert!(rate.is_inter_state());
        assert!(rate.validate().is_ok());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = GstRate::for_supply(BigDecimal::from(-5), false);
        assert!(matches!(result, Err(InvoiceError::Validation(_))));

        let result =
            InclusiveTaxCalculator::compute_for(&BigDecimal::from(100), &BigDecimal::from(-1), true);
        assert!(matches!(result, Err(InvoiceError::Validation(_))));
    }

    #[test]
    fn test_unequal_halves_rejected() {
        let mut rate = GstRate::intra_state(BigDecimal::from(18));
        rate.cgst_rate = BigDecimal::from(10);
        rate.sgst_rate = BigDecimal::from(8);
        assert!(rate.validate().is_err());
    }

    #[test]
    fn test_intra_state_reverse_calculation() {
        let tax =
            InclusiveTaxCalculator::compute_for(&BigDecimal::from(2000), &BigDecimal::from(18), false)
                .unwrap();

        assert_eq!(tax.taxable_value, dec("1694.92"));
        assert_eq!(tax.cgst, dec("152.54"));
        assert_eq!(tax.sgst, dec("152.54"));
        assert_eq!(tax.igst, BigDecimal::from(0));
        assert_eq!(tax.total_tax(), dec("305.08"));
    }

    #[test]
    fn test_inter_state_reverse_calculation() {
        let tax =
            InclusiveTaxCalculator::compute_for(&BigDecimal::from(2000), &BigDecimal::from(18), true)
                .unwrap();

        assert_eq!(tax.taxable_value, dec("1694.92"));
        assert_eq!(tax.cgst, BigDecimal::from(0));
        assert_eq!(tax.sgst, BigDecimal::from(0));
        // 1694.92 * 0.18 = 305.0856
        assert_eq!(tax.igst, dec("305.09"));
    }

    #[test]
    fn test_five_percent_slab() {
        let tax =
            InclusiveTaxCalculator::compute_for(&BigDecimal::from(1050), &BigDecimal::from(5), false)
                .unwrap();
        assert_eq!(tax.taxable_value, BigDecimal::from(1000));
        assert_eq!(tax.cgst, dec("25.00"));
        assert_eq!(tax.sgst, dec("25.00"));
    }

    #[test]
    fn test_zero_rate() {
        let tax =
            InclusiveTaxCalculator::compute_for(&dec("499.99"), &BigDecimal::from(0), false)
                .unwrap();
        assert_eq!(tax.taxable_value, dec("499.99"));
        assert_eq!(tax.total_tax(), BigDecimal::from(0));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result =
            InclusiveTaxCalculator::compute_for(&BigDecimal::from(-1), &BigDecimal::from(5), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_taxable_round_trips_to_amount() {
        let rates = [0, 3, 5, 12, 18, 28];
        let tolerance = dec("0.02");

        for rate in rates {
            let rate = BigDecimal::from(rate);
            let multiplier = BigDecimal::from(1) + &rate / BigDecimal::from(100);
            for paise in (1..2_000_000i64).step_by(7919) {
                let amount = BigDecimal::new(paise.into(), 2);
                for inter_state in [false, true] {
                    let tax = InclusiveTaxCalculator::compute_for(&amount, &rate, inter_state)
                        .unwrap();
                    let back = round2(&(&tax.taxable_value * &multiplier));
                    assert!(
                        (&back - &amount).abs() <= tolerance,
                        "amount {} rate {} came back as {}",
                        amount,
                        rate,
                        back
                    );
                }
            }
        }
    }

    #[test]
    fn test_components_accumulate() {
        let mut total = TaxComponents::zero();
        let a =
            InclusiveTaxCalculator::compute_for(&BigDecimal::from(1180), &BigDecimal::from(18), false)
                .unwrap();
        let b =
            InclusiveTaxCalculator::compute_for(&BigDecimal::from(105), &BigDecimal::from(5), false)
                .unwrap();
        total += &a;
        total += &b;

        assert_eq!(total.taxable_value, BigDecimal::from(1100));
        assert_eq!(total.cgst, dec("92.50"));
        assert_eq!(total.gross(), BigDecimal::from(1285));
    }
}
