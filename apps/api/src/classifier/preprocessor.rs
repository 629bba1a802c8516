//! Text normalisation shared by training and inference.

/// Lowercases, blanks every non-alphanumeric, non-whitespace character, then
/// collapses whitespace runs to one space and trims.
///
/// Digits survive; only punctuation and symbols are removed.
pub fn normalize(text: &str) -> String {
    let blanked: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    blanked.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokens longer than three characters, in order, duplicates kept.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|word| word.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(
            normalize("Senior Engineer @ ACME, Inc. (2019-2023)!"),
            "senior engineer acme inc 2019 2023"
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  rust\t\tgo \n\n python  "), "rust go python");
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(normalize("Grew revenue 45%"), "grew revenue 45");
    }

    #[test]
    fn test_blanks_underscores() {
        assert_eq!(normalize("snake_case"), "snake case");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t"), "");
        assert_eq!(normalize("!!!---"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "Led a team of 12 engineers; increased throughput by 30%.",
            "ÉCOLE Polytechnique — M.Sc. Informatique",
            "  C++ / C# / F#  ",
            "",
            "already normalized text",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_keywords_keep_long_tokens_in_order() {
        let keywords = extract_keywords("led rust team and built rust services");
        assert_eq!(keywords, vec!["rust", "team", "built", "rust", "services"]);
    }

    #[test]
    fn test_keywords_empty() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("a an the").is_empty());
    }
}
