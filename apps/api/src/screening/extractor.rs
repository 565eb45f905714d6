//! Attribute extraction: turns raw resume text into a `CandidateRecord`.
//!
//! Every field is found heuristically. Absence is the only failure signal; nothing here
//! returns an error. Location and institute are resolved through ordered strategy chains,
//! where the first strategy that finds something wins.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::screening::collaborators::{CityGazetteer, PhoneMatcher};
use crate::screening::models::{CandidateRecord, NAME_NOT_FOUND};
use crate::screening::normalize::title_case;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

static STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:Andhra Pradesh|Arunachal Pradesh|Assam|Bihar|Chhattisgarh|Goa|Gujarat|Haryana|Himachal Pradesh|Jharkhand|Karnataka|Kerala|Madhya Pradesh|Maharashtra|Manipur|Meghalaya|Mizoram|Nagaland|Odisha|Punjab|Rajasthan|Sikkim|Tamil Nadu|Telangana|Tripura|Uttar Pradesh|Uttarakhand|West Bengal)\b",
    )
    .expect("valid state regex")
});

static INSTITUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:B\.?Tech|M\.?Tech|Degree|Graduate|Education at|Student at|Indian Institute of|National Institute of|[A-Z][a-zA-Z]+ University|[A-Z][a-zA-Z]+ College|IIT|NIT|IIIT)[^\n,.]{2,100}",
    )
    .expect("valid institute regex")
});

static EDUCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bachelor|master)(?:'s)?\s+(?:of|in)\s+[^\n,.]{2,80}")
        .expect("valid education regex")
});

/// Words that mark an education-looking phrase as belonging to some other section.
const INSTITUTE_EXCLUSIONS: &[&str] = &[
    "address",
    "contact",
    "phone",
    "email",
    "certification",
    "course",
    "achievement",
    "exam",
    "test",
    "score",
];

const NAME_SCAN_LINES: usize = 5;
const NAME_MAX_TOKENS: usize = 4;
const NAME_MIN_CHARS: usize = 3;

/// One step of a fallback chain.
pub trait FieldStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn find(&self, text: &str) -> Option<String>;
}

/// Runs strategies in order and returns the first hit.
pub fn first_found(chain: &[Box<dyn FieldStrategy>], text: &str) -> Option<String> {
    chain.iter().find_map(|strategy| {
        let found = strategy.find(text);
        if found.is_some() {
            tracing::trace!(strategy = strategy.name(), "strategy matched");
        }
        found
    })
}

/// First city the gazetteer recognises.
pub struct GazetteerCity {
    gazetteer: Arc<dyn CityGazetteer>,
}

impl GazetteerCity {
    pub fn new(gazetteer: Arc<dyn CityGazetteer>) -> Self {
        Self { gazetteer }
    }
}

impl FieldStrategy for GazetteerCity {
    fn name(&self) -> &'static str {
        "gazetteer_city"
    }

    fn find(&self, text: &str) -> Option<String> {
        self.gazetteer.cities(text).into_iter().next()
    }
}

/// Indian state names, whole-word and case-insensitive, returned in title case.
pub struct StateName;

impl FieldStrategy for StateName {
    fn name(&self) -> &'static str {
        "state_name"
    }

    fn find(&self, text: &str) -> Option<String> {
        STATE_RE.find(text).map(|m| title_case(m.as_str()))
    }
}

/// First education phrase with at least two words and no exclusion word.
pub struct EducationPhrase;

impl FieldStrategy for EducationPhrase {
    fn name(&self) -> &'static str {
        "education_phrase"
    }

    fn find(&self, text: &str) -> Option<String> {
        INSTITUTE_RE
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .find(|candidate| is_acceptable_institute(candidate))
            .map(str::to_string)
    }
}

fn is_acceptable_institute(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    candidate.split_whitespace().count() >= 2
        && !INSTITUTE_EXCLUSIONS.iter().any(|word| lower.contains(word))
}

pub struct AttributeExtractor {
    phone_matcher: Arc<dyn PhoneMatcher>,
    location_chain: Vec<Box<dyn FieldStrategy>>,
    institute_chain: Vec<Box<dyn FieldStrategy>>,
}

impl AttributeExtractor {
    /// Default chains: gazetteer city → state name for location, education phrase for institute.
    pub fn new(phone_matcher: Arc<dyn PhoneMatcher>, gazetteer: Arc<dyn CityGazetteer>) -> Self {
        Self {
            phone_matcher,
            location_chain: vec![Box::new(GazetteerCity::new(gazetteer)), Box::new(StateName)],
            institute_chain: vec![Box::new(EducationPhrase)],
        }
    }

    pub fn extract(&self, text: &str) -> CandidateRecord {
        CandidateRecord {
            name: guess_name(text),
            email: extract_email(text),
            phone: self.first_phone(text),
            location: first_found(&self.location_chain, text),
            institute: first_found(&self.institute_chain, text),
            education: extract_education(text),
        }
    }

    fn first_phone(&self, text: &str) -> Option<String> {
        self.phone_matcher
            .find_matches(text)
            .next()
            .map(|m| m.raw.to_string())
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Takes the first short line near the top of the document.
/// Headers like "Curriculum Vitae" qualify just as well as real names.
pub fn guess_name(text: &str) -> String {
    text.trim()
        .split('\n')
        .take(NAME_SCAN_LINES)
        .map(str::trim)
        .find(|line| {
            line.split_whitespace().count() <= NAME_MAX_TOKENS
                && line.chars().count() > NAME_MIN_CHARS
        })
        .map(str::to_string)
        .unwrap_or_else(|| NAME_NOT_FOUND.to_string())
}

pub fn extract_education(text: &str) -> Option<String> {
    EDUCATION_RE.find(text).map(|m| m.as_str().trim().to_string())
}
