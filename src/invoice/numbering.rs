//! Invoice number formatting

use crate::settings::InvoiceSettings;

/// Upper-case letters of the city, cut or padded with `X` to `len`
pub fn city_prefix(city: &str, len: usize) -> String {
    let mut prefix: String = city
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(len)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while prefix.len() < len {
        prefix.push('X');
    }
    prefix
}

/// `<CITY><SUFFIX><sequence>`, e.g. `PUNEEYE0042`
pub fn synthetic_invoice_number(city: &str, sequence: u64, settings: &InvoiceSettings) -> String {
    format!(
        "{}{}{:0width$}",
        city_prefix(city, settings.city_prefix_len),
        settings.company_suffix,
        sequence,
        width = settings.sequence_width
    )
}

/// Replace path separators so the number can be used as a file name
pub fn file_safe(invoice_number: &str) -> String {
    invoice_number.replace('/', "_")
}
