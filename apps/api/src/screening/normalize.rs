//! Field normalization shared by the bias aggregator.

/// Placeholder values that resumes (and form-filled PDFs) carry instead of real data.
const JUNK_VALUES: &[&str] = &[
    "name",
    "unknown",
    "location",
    "loc",
    "city",
    "state",
    "institute",
    "college",
    "university",
    "null",
    "nil",
    "none",
];

pub const LOCATION_PREFIXES: &[&str] = &["location:", "loc:", "city:"];
pub const INSTITUTE_PREFIXES: &[&str] = &["institute:", "university:", "college:"];

/// Trims and lowercases a raw field, strips at most one leading label prefix,
/// and rejects placeholder values.
///
/// Returns `None` for absent, blank, or junk input.
pub fn normalize_field(value: Option<&str>, unwanted_prefixes: &[&str]) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    let mut normalized = value.trim().to_lowercase();

    if let Some(rest) = unwanted_prefixes
        .iter()
        .find_map(|prefix| normalized.strip_prefix(prefix))
    {
        normalized = rest.to_string();
    }
    let normalized = normalized.trim();

    if normalized.is_empty() || JUNK_VALUES.contains(&normalized) {
        return None;
    }

    Some(normalized.to_string())
}

/// Capitalizes the first letter of every alphabetic run, lowercasing the rest.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_is_alpha = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}
