//! Display codecs for raw payroll fields.
//!
//! Payroll master data arrives in legacy shapes: fixed-width padded text,
//! dates packed into `YYYYMMDD` integers and money as integer cents. Every
//! function here is pure, so the same input always renders the same way.

/// Rendering used whenever an SSN cannot be partially shown.
pub const MASKED_SSN: &str = "XXX-XX-XXXX";

const ZERO_DOLLARS: &str = "$0.00";

/// Trim a padded field. Absent input becomes an empty string.
pub fn clean(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}

/// Join name parts with single spaces, skipping empty parts.
///
/// Whitespace inside a part is collapsed as well, so a blank middle name
/// never leaves a double space behind.
pub fn full_name(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> String {
    [first, middle, last]
        .into_iter()
        .flat_map(|part| part.unwrap_or_default().split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode an IBM `YYYYMMDD` date code into `MM/DD/YYYY`.
///
/// `None`, zero and negative codes mean "unset". The digits are rearranged
/// without calendar validation: `20231332` decodes to `13/32/2023`.
pub fn decode_date(code: Option<i64>) -> Option<String> {
    let code = code.filter(|code| *code > 0)?;
    let digits = format!("{code:08}");
    let year = &digits[0..4];
    let month = &digits[4..6];
    let day = &digits[6..8];
    Some(format!("{month}/{day}/{year}"))
}

/// Year component of a date code, if the code is set.
pub fn date_year(code: Option<i64>) -> Option<i32> {
    let code = code.filter(|code| *code > 0)?;
    format!("{code:08}")[0..4].parse().ok()
}

/// Render integer cents as US dollars, e.g. `-$1,234.56`.
pub fn encode_currency(cents: Option<i64>) -> String {
    let Some(cents) = cents else {
        return ZERO_DOLLARS.to_string();
    };
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!(
        "{sign}${}.{:02}",
        group_thousands(magnitude / 100),
        magnitude % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Reduce an SSN to `XXX-XX-` plus its last four digits.
///
/// Inputs with fewer than four digits are fully masked.
pub fn mask_ssn(raw: Option<&str>) -> String {
    let digits = ascii_digits(raw.unwrap_or_default());
    if digits.len() < 4 {
        return MASKED_SSN.to_string();
    }
    format!("XXX-XX-{}", &digits[digits.len() - 4..])
}

pub(crate) fn ascii_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
