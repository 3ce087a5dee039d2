//! Rupee amounts in Indian-English words (crore / lakh / thousand / hundred)

use bigdecimal::{BigDecimal, ToPrimitive};

use crate::types::{InvoiceError, InvoiceResult};
use crate::utils::money::round2;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;
const THOUSAND: u64 = 1_000;

/// Converts amounts like `1500.50` into
/// `"One Thousand Five Hundred Rupees and Fifty Paise"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountInWordsConverter;

impl AmountInWordsConverter {
    /// Convert a non-negative amount; exactly zero becomes `"Zero"`
    pub fn convert(amount: &BigDecimal) -> InvoiceResult<String> {
        if *amount < BigDecimal::from(0) {
            return Err(InvoiceError::Validation(format!(
                "Cannot convert negative amount to words: {}",
                amount
            )));
        }

        let total_paise = (round2(amount) * BigDecimal::from(100))
            .to_u64()
            .ok_or_else(|| {
                InvoiceError::Validation(format!("Amount too large to convert: {}", amount))
            })?;
        let rupees = total_paise / 100;
        let paise = total_paise % 100;

        if rupees == 0 && paise == 0 {
            return Ok("Zero".to_string());
        }

        let rupee_words = if rupees == 0 {
            "Zero".to_string()
        } else {
            indian_words(rupees)
        };

        let mut words = format!("{} Rupees", rupee_words);
        if paise > 0 {
            words.push_str(&format!(" and {} Paise", below_hundred(paise)));
        }
        Ok(words)
    }
}

fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    let n = n as usize;
    if n < 20 {
        return ONES[n].to_string();
    }
    match n % 10 {
        0 => TENS[n / 10].to_string(),
        ones => format!("{} {}", TENS[n / 10], ONES[ones]),
    }
}

fn below_thousand(n: u64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, _) => below_hundred(rest),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], below_hundred(r)),
    }
}

// Crore counts above 99 recurse, e.g. "One Hundred Twenty Three Crore".
fn indian_words(n: u64) -> String {
    let mut parts = Vec::new();

    let crores = n / CRORE;
    if crores > 0 {
        parts.push(format!("{} Crore", indian_words(crores)));
    }

    let rest = n % CRORE;
    let lakhs = rest / LAKH;
    if lakhs > 0 {
        parts.push(format!("{} Lakh", below_hundred(lakhs)));
    }

    let thousands = (rest % LAKH) / THOUSAND;
    if thousands > 0 {
        parts.push(format!("{} Thousand", below_hundred(thousands)));
    }

    let units = rest % THOUSAND;
    if units > 0 {
        parts.push(below_thousand(units));
    }

    parts.join(" ")
}
