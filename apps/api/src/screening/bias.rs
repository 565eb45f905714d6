//! Bias aggregation: flags locations and institutes that dominate a batch.
//!
//! Both ratios share one denominator: the number of records with a usable location.
//! Institute shares can therefore exceed 100% when many candidates list an institute
//! but few list a location. Keep it that way; reports are compared against this behavior.

use std::collections::HashMap;
use std::str::FromStr;

use crate::screening::models::{BiasReport, CandidateRecord};
use crate::screening::normalize::{
    normalize_field, title_case, INSTITUTE_PREFIXES, LOCATION_PREFIXES,
};

/// Longer "locations" are usually a sentence fragment, not a place.
const MAX_LOCATION_TOKENS: usize = 3;

pub const DEFAULT_THRESHOLD: f64 = 0.3;
pub const DEFAULT_DOMINANT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasPolicyKind {
    /// Report every value whose share exceeds the threshold.
    Threshold,
    /// Report only the most frequent value, and only if its share exceeds the threshold.
    Dominant,
}

impl FromStr for BiasPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold" => Ok(BiasPolicyKind::Threshold),
            "dominant" => Ok(BiasPolicyKind::Dominant),
            other => Err(format!(
                "unknown bias policy '{other}' (expected threshold or dominant)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasPolicy {
    pub kind: BiasPolicyKind,
    pub threshold: f64,
}

impl Default for BiasPolicy {
    fn default() -> Self {
        Self::new(BiasPolicyKind::Threshold, None)
    }
}

impl BiasPolicy {
    /// Uses the kind's default threshold when none is given.
    pub fn new(kind: BiasPolicyKind, threshold: Option<f64>) -> Self {
        let threshold = threshold.unwrap_or(match kind {
            BiasPolicyKind::Threshold => DEFAULT_THRESHOLD,
            BiasPolicyKind::Dominant => DEFAULT_DOMINANT_THRESHOLD,
        });
        Self { kind, threshold }
    }

    fn flag(
        &self,
        tally: &FrequencyTally,
        total_valid: usize,
        display: fn(&str) -> String,
    ) -> Vec<String> {
        let share = |count: usize| count as f64 / total_valid as f64;
        let statement = |value: &str, count: usize| {
            format!("Bias towards {} ({:.0}%)", display(value), share(count) * 100.0)
        };

        match self.kind {
            BiasPolicyKind::Threshold => tally
                .iter()
                .filter(|(_, count)| share(*count) > self.threshold)
                .map(|(value, count)| statement(value, count))
                .collect(),
            BiasPolicyKind::Dominant => tally
                .most_frequent()
                .filter(|(_, count)| share(*count) > self.threshold)
                .map(|(value, count)| statement(value, count))
                .into_iter()
                .collect(),
        }
    }
}

/// Counts values, remembering first-seen order for stable reports.
#[derive(Debug, Default)]
struct FrequencyTally {
    counts: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl FrequencyTally {
    fn add(&mut self, value: String) {
        match self.positions.get(&value) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(value.clone(), self.counts.len());
                self.counts.push((value, 1));
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(value, count)| (value.as_str(), *count))
    }

    /// Highest count; ties go to the value seen first.
    fn most_frequent(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (value, count) in self.iter() {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((value, count));
            }
        }
        best
    }
}

fn upper_case(value: &str) -> String {
    value.to_uppercase()
}

pub fn aggregate_bias<'a, I>(records: I, policy: &BiasPolicy) -> BiasReport
where
    I: IntoIterator<Item = &'a CandidateRecord>,
{
    let mut locations = FrequencyTally::default();
    let mut institutes = FrequencyTally::default();
    let mut total_valid = 0;

    for record in records {
        let location = normalize_field(record.location.as_deref(), LOCATION_PREFIXES)
            .filter(|loc| loc.split_whitespace().count() <= MAX_LOCATION_TOKENS);
        let institute = normalize_field(record.institute.as_deref(), INSTITUTE_PREFIXES);

        if let Some(location) = location {
            locations.add(location);
            total_valid += 1;
        }
        if let Some(institute) = institute {
            institutes.add(institute);
        }
    }

    if total_valid == 0 {
        return BiasReport::insufficient_data();
    }

    let location_biases = policy.flag(&locations, total_valid, title_case);
    let institute_biases = policy.flag(&institutes, total_valid, upper_case);

    if location_biases.is_empty() && institute_biases.is_empty() {
        return BiasReport::no_bias();
    }

    BiasReport {
        location_biases: (!location_biases.is_empty()).then_some(location_biases),
        institute_biases: (!institute_biases.is_empty()).then_some(institute_biases),
        message: None,
    }
}
