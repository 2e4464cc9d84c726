//! Indonesian (`id-ID`) formatting for dates, timestamps and Rupiah amounts.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Currency symbol prefixed to formatted amounts
pub const CURRENCY_SYMBOL: &str = "Rp";

/// Locale settings used when printing values into contract text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndonesianLocale {
    offset: FixedOffset,
}

impl IndonesianLocale {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Western Indonesia Time (UTC+7)
    pub fn wib() -> Self {
        Self::new(FixedOffset::east_opt(7 * 3600).unwrap_or_else(|| Utc.fix()))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// `D/M/YYYY`, no zero padding
    pub fn format_date(&self, timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format("%-d/%-m/%Y")
            .to_string()
    }

    /// `D/M/YYYY, HH.MM.SS`
    pub fn format_datetime(&self, timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format("%-d/%-m/%Y, %H.%M.%S")
            .to_string()
    }

    /// Rupiah with dot grouping and no fraction digits
    pub fn format_currency(&self, amount: f64) -> String {
        format_rupiah(amount)
    }
}

impl Default for IndonesianLocale {
    fn default() -> Self {
        Self::wib()
    }
}

/// Format an amount as `Rp50.000.000`; fractions are rounded half away from zero
pub fn format_rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{CURRENCY_SYMBOL}0");
    }

    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-{CURRENCY_SYMBOL}{grouped}")
    } else {
        format!("{CURRENCY_SYMBOL}{grouped}")
    }
}
