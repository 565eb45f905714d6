//! Score calculation: heuristic 0 to 100 suitability score.
//!
//! The rules below are biased on purpose: the point of the product is to show recruiters
//! what a naive ATS rewards. They live in a table so each one can be listed and tested
//! on its own. Do not tune them away.

use serde::Serialize;

use crate::screening::models::CandidateRecord;

pub const BASE_SCORE: u32 = 50;
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    Name,
    Email,
    Location,
    Institute,
    Education,
}

impl CandidateField {
    fn value(self, record: &CandidateRecord) -> Option<&str> {
        match self {
            CandidateField::Name => Some(record.name.as_str()),
            CandidateField::Email => record.email.as_deref(),
            CandidateField::Location => record.location.as_deref(),
            CandidateField::Institute => record.institute.as_deref(),
            CandidateField::Education => record.education.as_deref(),
        }
    }
}

/// Case-insensitive test applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTest {
    ContainsAny(&'static [&'static str]),
    StartsWithAny(&'static [char]),
}

impl FieldTest {
    fn matches(self, value: &str) -> bool {
        let lower = value.to_lowercase();
        match self {
            FieldTest::ContainsAny(needles) => needles.iter().any(|n| lower.contains(n)),
            FieldTest::StartsWithAny(initials) => lower
                .chars()
                .next()
                .is_some_and(|first| initials.contains(&first)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreRule {
    pub id: &'static str,
    pub field: CandidateField,
    pub test: FieldTest,
    pub bonus: u32,
    /// Rules sharing a group are alternatives: only the first matching one in table order applies.
    pub exclusive_group: Option<&'static str>,
}

impl ScoreRule {
    fn applies_to(&self, record: &CandidateRecord) -> bool {
        self.field
            .value(record)
            .is_some_and(|value| self.test.matches(value))
    }
}

pub const METRO_CITIES: &[&str] = &["delhi", "bengaluru", "mumbai", "chennai", "kolkata"];

pub const DEFAULT_RULES: &[ScoreRule] = &[
    ScoreRule {
        id: "email_iit_domain",
        field: CandidateField::Email,
        test: FieldTest::ContainsAny(&["iit"]),
        bonus: 15,
        exclusive_group: Some("email"),
    },
    ScoreRule {
        id: "email_gmail",
        field: CandidateField::Email,
        test: FieldTest::ContainsAny(&["gmail.com"]),
        bonus: 5,
        exclusive_group: Some("email"),
    },
    ScoreRule {
        id: "metro_location",
        field: CandidateField::Location,
        test: FieldTest::ContainsAny(METRO_CITIES),
        bonus: 10,
        exclusive_group: None,
    },
    ScoreRule {
        id: "top_institute",
        field: CandidateField::Institute,
        test: FieldTest::ContainsAny(&["iit", "iiit", "nit"]),
        bonus: 15,
        exclusive_group: None,
    },
    ScoreRule {
        id: "degree_level",
        field: CandidateField::Education,
        test: FieldTest::ContainsAny(&["bachelor", "master"]),
        bonus: 5,
        exclusive_group: None,
    },
    ScoreRule {
        id: "name_initial",
        field: CandidateField::Name,
        test: FieldTest::StartsWithAny(&['a', 's']),
        bonus: 5,
        exclusive_group: None,
    },
];

#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    rules: Vec<ScoreRule>,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl ScoreCalculator {
    pub fn new(rules: Vec<ScoreRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    /// Rules that award their bonus to this record, in table order.
    pub fn applied_rules(&self, record: &CandidateRecord) -> Vec<&ScoreRule> {
        let mut claimed_groups: Vec<&str> = Vec::new();
        let mut applied = Vec::new();
        for rule in &self.rules {
            if let Some(group) = rule.exclusive_group {
                if claimed_groups.contains(&group) {
                    continue;
                }
                if rule.applies_to(record) {
                    claimed_groups.push(group);
                    applied.push(rule);
                }
            } else if rule.applies_to(record) {
                applied.push(rule);
            }
        }
        applied
    }

    /// Base score plus every applied bonus, capped at `MAX_SCORE`.
    pub fn score(&self, record: &CandidateRecord) -> u32 {
        let bonus: u32 = self.applied_rules(record).iter().map(|r| r.bonus).sum();
        (BASE_SCORE + bonus).min(MAX_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::NAME_NOT_FOUND;

    fn record(
        name: &str,
        email: Option<&str>,
        location: Option<&str>,
        institute: Option<&str>,
    ) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            email: email.map(String::from),
            phone: None,
            location: location.map(String::from),
            institute: institute.map(String::from),
            education: None,
        }
    }

    fn applied_ids(record: &CandidateRecord) -> Vec<&'static str> {
        ScoreCalculator::default()
            .applied_rules(record)
            .iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn test_empty_record_scores_base() {
        let calc = ScoreCalculator::default();
        assert_eq!(calc.score(&CandidateRecord::default()), BASE_SCORE);
    }

    #[test]
    fn test_gmail_and_name_initial() {
        let r = record("Ankit Kumar", Some("x@gmail.com"), None, None);
        assert_eq!(ScoreCalculator::default().score(&r), 60);
        assert_eq!(applied_ids(&r), vec!["email_gmail", "name_initial"]);
    }

    #[test]
    fn test_iit_profile_without_name_bonus() {
        let r = record(
            "Rohan",
            Some("x@iit.ac.in"),
            Some("Delhi NCR"),
            Some("IIT Delhi"),
        );
        assert_eq!(ScoreCalculator::default().score(&r), 90);
    }

    #[test]
    fn test_email_rules_are_exclusive() {
        // both "iit" and "gmail.com" present: only the iit bonus applies
        let r = record("Rohan", Some("iitian@gmail.com"), None, None);
        assert_eq!(applied_ids(&r), vec!["email_iit_domain"]);
        assert_eq!(ScoreCalculator::default().score(&r), 65);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let r = record("Sara", Some("X@GMAIL.COM"), Some("MUMBAI"), Some("nit trichy"));
        assert_eq!(
            applied_ids(&r),
            vec!["email_gmail", "metro_location", "top_institute", "name_initial"]
        );
    }

    #[test]
    fn test_education_rule() {
        let mut r = CandidateRecord::default();
        r.education = Some("Master of Science in Physics".to_string());
        assert_eq!(applied_ids(&r), vec!["degree_level"]);
        assert_eq!(ScoreCalculator::default().score(&r), 55);
    }

    #[test]
    fn test_sentinel_name_gets_no_bonus() {
        let r = record(NAME_NOT_FOUND, None, None, None);
        assert!(applied_ids(&r).is_empty());
    }

    #[test]
    fn test_each_rule_fires_alone() {
        let calc = ScoreCalculator::default();
        for rule in calc.rules() {
            let mut r = record("Zed", None, None, None);
            let sample = match rule.test {
                FieldTest::ContainsAny(needles) => needles[0].to_string(),
                FieldTest::StartsWithAny(initials) => format!("{}bc", initials[0]),
            };
            match rule.field {
                CandidateField::Name => r.name = sample,
                CandidateField::Email => r.email = Some(sample),
                CandidateField::Location => r.location = Some(sample),
                CandidateField::Institute => r.institute = Some(sample),
                CandidateField::Education => r.education = Some(sample),
            }
            assert_eq!(calc.score(&r), BASE_SCORE + rule.bonus, "rule {}", rule.id);
        }
    }

    #[test]
    fn test_score_is_capped() {
        let generous = ScoreRule {
            id: "always",
            field: CandidateField::Name,
            test: FieldTest::ContainsAny(&[""]),
            bonus: 80,
            exclusive_group: None,
        };
        let calc = ScoreCalculator::new(vec![generous]);
        assert_eq!(calc.score(&CandidateRecord::default()), MAX_SCORE);
    }

    #[test]
    fn test_score_bounds_and_monotonicity() {
        let calc = ScoreCalculator::default();
        let steps = [
            record("Zed", None, None, None),
            record("Zed", Some("z@gmail.com"), None, None),
            record("Zed", Some("z@gmail.com"), Some("Kolkata"), None),
            record("Zed", Some("z@gmail.com"), Some("Kolkata"), Some("NIT Durgapur")),
            record("Sam", Some("z@gmail.com"), Some("Kolkata"), Some("NIT Durgapur")),
        ];
        let scores: Vec<u32> = steps.iter().map(|r| calc.score(r)).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{scores:?}");
        assert!(scores.iter().all(|s| (BASE_SCORE..=MAX_SCORE).contains(s)));
    }
}
