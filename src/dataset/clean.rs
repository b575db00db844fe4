use chrono::NaiveDate;

/// Raw `MM/DD/YYYY` date pattern used by the travel dataset.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Cell spellings that count as missing, matching the default NA markers of
/// common CSV exporters. Comparison is exact and case-sensitive.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Trimmed cell text, or `None` when the cell is blank or an NA marker.
pub fn non_missing(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !NA_TOKENS.contains(s))
}

/// A cost cell as it arrives from the raw dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCost {
    Missing,
    Number(f64),
    Text(String),
}

impl RawCost {
    /// Classifies a raw cell: plain numbers stay numeric, anything else is text.
    pub fn from_field(raw: Option<&str>) -> Self {
        match non_missing(raw) {
            None => RawCost::Missing,
            Some(text) => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => RawCost::Number(value),
                _ => RawCost::Text(text.to_string()),
            },
        }
    }
}

/// Normalizes a cost cell to a number.
///
/// Text keeps only its ASCII digits, so `"$1,200"` becomes `1200.0`. Decimal
/// points are dropped along with every other non-digit: `"$1,234.56"` becomes
/// `123456.0`.
pub fn clean_cost(raw: &RawCost) -> f64 {
    match raw {
        RawCost::Missing => 0.0,
        RawCost::Number(value) => *value,
        RawCost::Text(text) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            if digits.is_empty() {
                0.0
            } else {
                digits.parse::<f64>().unwrap_or(0.0)
            }
        }
    }
}

/// Parses `raw` with `pattern`; missing or unparsable input yields `None`.
pub fn parse_date(raw: Option<&str>, pattern: &str) -> Option<NaiveDate> {
    let text = non_missing(raw)?;
    NaiveDate::parse_from_str(text, pattern).ok()
}
