//! Lookup collaborators used by the attribute extractor.
//!
//! Both are traits so the extractor can be driven by test doubles. The default
//! implementations are deliberately small: a region-aware phone number scanner and a
//! fixed city-name gazetteer.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

// ────────────────────────────────────────────────────────────────────────────
// Phone numbers
// ────────────────────────────────────────────────────────────────────────────

/// A phone number found in free text, borrowed from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneMatch<'t> {
    pub raw: &'t str,
}

pub trait PhoneMatcher: Send + Sync {
    /// Lazily yields phone numbers in document order.
    fn find_matches<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = PhoneMatch<'a>> + 'a>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRegion {
    India,
    UnitedStates,
}

impl FromStr for PhoneRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(PhoneRegion::India),
            "US" => Ok(PhoneRegion::UnitedStates),
            other => Err(format!("unsupported phone region '{other}' (expected IN or US)")),
        }
    }
}

impl PhoneRegion {
    /// Checks whether a bare digit string is a dialable national number in this region,
    /// accepting the country calling code or trunk prefix in front of it.
    fn is_valid_number(self, digits: &str) -> bool {
        match self {
            PhoneRegion::India => {
                let national = match digits.len() {
                    12 if digits.starts_with("91") => &digits[2..],
                    11 if digits.starts_with('0') => &digits[1..],
                    10 => digits,
                    _ => return false,
                };
                matches!(national.as_bytes()[0], b'2'..=b'9')
            }
            PhoneRegion::UnitedStates => {
                let national = match digits.len() {
                    11 if digits.starts_with('1') => &digits[1..],
                    10 => digits,
                    _ => return false,
                };
                let bytes = national.as_bytes();
                matches!(bytes[0], b'2'..=b'9') && matches!(bytes[3], b'2'..=b'9')
            }
        }
    }
}

/// Digit runs that may contain common phone separators.
static PHONE_CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\(?\d[\d \t().\-]{6,}\d").expect("valid phone candidate regex")
});

/// Scans for phone numbers valid in a single region.
pub struct RegionPhoneMatcher {
    region: PhoneRegion,
}

impl RegionPhoneMatcher {
    pub fn new(region: PhoneRegion) -> Self {
        Self { region }
    }

    /// First valid number inside `run`, trying group starts left to right and, for each
    /// start, the longest span that ends on a digit group.
    /// A run can glue a phone number to unrelated figures on either side (PIN codes, years).
    fn first_valid_span<'t>(&self, run: &'t str) -> Option<&'t str> {
        let bytes = run.as_bytes();
        let group_ends: Vec<usize> = (0..bytes.len())
            .filter(|&i| {
                bytes[i].is_ascii_digit() && bytes.get(i + 1).map_or(true, |b| !b.is_ascii_digit())
            })
            .collect();

        group_starts(bytes).into_iter().find_map(|start| {
            group_ends
                .iter()
                .rev()
                .take_while(|&&end| end > start)
                .map(|&end| &run[start..=end])
                .find(|candidate| {
                    let digits: String = candidate.chars().filter(char::is_ascii_digit).collect();
                    self.region.is_valid_number(&digits)
                })
        })
    }
}

/// Byte offsets where a digit group begins, pulled back over a leading `+` or `(`.
fn group_starts(bytes: &[u8]) -> Vec<usize> {
    (0..bytes.len())
        .filter(|&i| bytes[i].is_ascii_digit() && (i == 0 || !bytes[i - 1].is_ascii_digit()))
        .map(|mut i| {
            while i > 0 && matches!(bytes[i - 1], b'+' | b'(') {
                i -= 1;
            }
            i
        })
        .collect()
}

impl PhoneMatcher for RegionPhoneMatcher {
    fn find_matches<'a>(&'a self, text: &'a str) -> Box<dyn Iterator<Item = PhoneMatch<'a>> + 'a> {
        Box::new(PHONE_CANDIDATE_RE.find_iter(text).filter_map(move |m| {
            self.first_valid_span(m.as_str())
                .map(|raw| PhoneMatch { raw })
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// City names
// ────────────────────────────────────────────────────────────────────────────

pub trait CityGazetteer: Send + Sync {
    /// Recognised city names in document order.
    fn cities(&self, text: &str) -> Vec<String>;
}

const CITY_NAMES: &[&str] = &[
    // India
    "Agra", "Ahmedabad", "Allahabad", "Amritsar", "Aurangabad", "Bangalore", "Bengaluru",
    "Bhopal", "Bhubaneswar", "Chandigarh", "Chennai", "Coimbatore", "Dehradun", "Delhi",
    "Dhanbad", "Durgapur", "Faridabad", "Ghaziabad", "Gurgaon", "Gurugram", "Guwahati",
    "Gwalior", "Howrah", "Hyderabad", "Indore", "Jabalpur", "Jaipur", "Jalandhar",
    "Jamshedpur", "Jodhpur", "Kanpur", "Kharagpur", "Kochi", "Kolkata", "Kota", "Kozhikode",
    "Lucknow", "Ludhiana", "Madurai", "Mangalore", "Mangaluru", "Manipal", "Meerut", "Mumbai",
    "Mysore", "Mysuru", "Nagpur", "Nashik", "Navi Mumbai", "New Delhi", "Noida", "Patna",
    "Pilani", "Prayagraj", "Puducherry", "Pune", "Raipur", "Rajkot", "Ranchi", "Roorkee",
    "Rourkela", "Shimla", "Silchar", "Srinagar", "Surat", "Thane", "Thiruvananthapuram",
    "Tiruchirappalli", "Udaipur", "Vadodara", "Varanasi", "Vellore", "Vijayawada",
    "Visakhapatnam", "Warangal",
    // Elsewhere
    "Amsterdam", "Austin", "Berlin", "Boston", "Chicago", "Dubai", "Dublin", "Hong Kong",
    "London", "Los Angeles", "New York", "Paris", "San Francisco", "Seattle", "Singapore",
    "Sydney", "Tokyo", "Toronto", "Zurich",
];

static CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut names: Vec<&str> = CITY_NAMES.to_vec();
    // Longer names first so "Navi Mumbai" beats "Mumbai" at the same position.
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    let alternation = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("valid city regex")
});

/// Fixed list of capitalised city names, matched case-sensitively like proper nouns.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticGazetteer;

impl CityGazetteer for StaticGazetteer {
    fn cities(&self, text: &str) -> Vec<String> {
        CITY_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
