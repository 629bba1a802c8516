//! Rule-based resume quality rating.
//!
//! Independent of the trained model. Operates on the lowercased raw text.
//!
//! Algorithm:
//! 1. Each section keyword found as a substring adds its weight (max 100).
//! 2. Each achievement indicator present adds 5 points, once per indicator (max 40).
//! 3. Fixed absolute thresholds: ≥85 best, ≥70 good, ≥50 average, else poor.
//!
//! Thresholds are absolute points, not a share of the maximum, so adding
//! indicators later does not move existing buckets.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::classifier::models::QualityRating;

pub const SECTION_WEIGHTS: &[(&str, u32)] = &[
    ("experience", 25),
    ("education", 20),
    ("skills", 15),
    ("projects", 15),
    ("achievements", 10),
    ("summary", 5),
    ("certifications", 10),
];

pub const INDICATOR_POINTS: u32 = 5;

const BEST_THRESHOLD: u32 = 85;
const GOOD_THRESHOLD: u32 = 70;
const AVERAGE_THRESHOLD: u32 = 50;

/// How an achievement indicator is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Regex,
    Literal,
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementIndicator {
    pub kind: IndicatorKind,
    pub pattern: &'static str,
}

pub const ACHIEVEMENT_INDICATORS: &[AchievementIndicator] = &[
    AchievementIndicator { kind: IndicatorKind::Regex, pattern: r"\d+%" },
    AchievementIndicator { kind: IndicatorKind::Regex, pattern: r"\d+ years" },
    AchievementIndicator { kind: IndicatorKind::Literal, pattern: "increased" },
    AchievementIndicator { kind: IndicatorKind::Literal, pattern: "decreased" },
    AchievementIndicator { kind: IndicatorKind::Literal, pattern: "improved" },
    AchievementIndicator { kind: IndicatorKind::Literal, pattern: "led" },
    AchievementIndicator { kind: IndicatorKind::Literal, pattern: "managed" },
    AchievementIndicator { kind: IndicatorKind::Literal, pattern: "developed" },
];

enum Matcher {
    Regex(Regex),
    Literal(&'static str),
}

impl Matcher {
    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(text),
            Matcher::Literal(word) => text.contains(word),
        }
    }
}

lazy_static! {
    static ref INDICATOR_MATCHERS: Vec<(AchievementIndicator, Matcher)> = ACHIEVEMENT_INDICATORS
        .iter()
        .map(|indicator| {
            let matcher = match indicator.kind {
                IndicatorKind::Regex => Matcher::Regex(
                    Regex::new(indicator.pattern).expect("achievement indicator regex is valid"),
                ),
                IndicatorKind::Literal => Matcher::Literal(indicator.pattern),
            };
            (*indicator, matcher)
        })
        .collect();
}

/// Breakdown of how a resume earned its rating.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QualityReport {
    pub points: u32,
    pub rating: QualityRating,
    pub sections_found: Vec<String>,
    pub indicators_found: Vec<String>,
}

/// Scores `text` and returns the full breakdown.
pub fn assess(text: &str) -> QualityReport {
    let lowered = text.to_lowercase();

    let sections_found: Vec<String> = SECTION_WEIGHTS
        .iter()
        .filter(|(keyword, _)| lowered.contains(keyword))
        .map(|(keyword, _)| keyword.to_string())
        .collect();

    let section_points: u32 = SECTION_WEIGHTS
        .iter()
        .filter(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, weight)| weight)
        .sum();

    let indicators_found: Vec<String> = INDICATOR_MATCHERS
        .iter()
        .filter(|(_, matcher)| matcher.is_match(&lowered))
        .map(|(indicator, _)| indicator.pattern.to_string())
        .collect();

    let points = section_points + INDICATOR_POINTS * indicators_found.len() as u32;

    QualityReport {
        points,
        rating: rating_for_points(points),
        sections_found,
        indicators_found,
    }
}

/// Quality bucket for `text`.
pub fn score(text: &str) -> QualityRating {
    assess(text).rating
}

pub fn rating_for_points(points: u32) -> QualityRating {
    if points >= BEST_THRESHOLD {
        QualityRating::Best
    } else if points >= GOOD_THRESHOLD {
        QualityRating::Good
    } else if points >= AVERAGE_THRESHOLD {
        QualityRating::Average
    } else {
        QualityRating::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_poor() {
        let report = assess("");
        assert_eq!(report.points, 0);
        assert_eq!(report.rating, QualityRating::Poor);
        assert_eq!(score("   \n\t "), QualityRating::Poor);
    }

    #[test]
    fn test_all_sections_is_best() {
        let text = "Summary. Experience. Education. Skills. Projects. Achievements. Certifications.";
        let report = assess(text);
        assert_eq!(report.points, 100);
        assert_eq!(report.rating, QualityRating::Best);
    }

    #[test]
    fn test_all_sections_plus_indicator_is_best() {
        let text = "summary experience education skills projects achievements certifications \
                    increased revenue by 40%";
        let report = assess(text);
        assert_eq!(report.points, 110);
        assert_eq!(report.rating, QualityRating::Best);
    }

    #[test]
    fn test_section_matching_is_case_insensitive_substring() {
        // "experiences" still contains "experience"
        let report = assess("PROFESSIONAL EXPERIENCES");
        assert_eq!(report.sections_found, vec!["experience"]);
        assert_eq!(report.points, 25);
    }

    #[test]
    fn test_indicator_counts_once() {
        let once = assess("increased sales");
        let many = assess("increased sales, increased margin, increased retention");
        assert_eq!(once.points, many.points);
        assert_eq!(once.points, INDICATOR_POINTS);
    }

    #[test]
    fn test_regex_indicators() {
        let report = assess("cut latency 35% over 4 years");
        assert_eq!(report.indicators_found, vec![r"\d+%", r"\d+ years"]);
        assert_eq!(report.points, 10);
    }

    #[test]
    fn test_literal_indicator_is_substring() {
        // "skilled" contains "led"
        let report = assess("skilled");
        assert_eq!(report.indicators_found, vec!["led"]);
    }

    #[test]
    fn test_percent_needs_digits() {
        let report = assess("a % sign alone");
        assert!(report.indicators_found.is_empty());
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(rating_for_points(0), QualityRating::Poor);
        assert_eq!(rating_for_points(49), QualityRating::Poor);
        assert_eq!(rating_for_points(50), QualityRating::Average);
        assert_eq!(rating_for_points(69), QualityRating::Average);
        assert_eq!(rating_for_points(70), QualityRating::Good);
        assert_eq!(rating_for_points(84), QualityRating::Good);
        assert_eq!(rating_for_points(85), QualityRating::Best);
        assert_eq!(rating_for_points(140), QualityRating::Best);
    }

    #[test]
    fn test_typical_resume_is_good() {
        // experience 25 + education 20 + skills 15 = 60, managed + improved = 10
        let text = "Experience: managed a team and improved onboarding.\n\
                    Education: BSc Computer Science.\nSkills: Rust, SQL.";
        let report = assess(text);
        assert_eq!(report.points, 70);
        assert_eq!(report.rating, QualityRating::Good);
    }

    #[test]
    fn test_adding_section_never_decreases_score() {
        let base = "worked at a shop; increased sales";
        let base_points = assess(base).points;
        for (keyword, weight) in SECTION_WEIGHTS {
            let extended = format!("{base} {keyword}");
            let points = assess(&extended).points;
            assert!(points >= base_points, "{keyword} lowered the score");
            assert_eq!(points, base_points + weight);
        }
    }

    #[test]
    fn test_maximum_score() {
        let text = "summary experience education skills projects achievements certifications \
                    10% 3 years increased decreased improved led managed developed";
        assert_eq!(assess(text).points, 140);
    }
}
