use crate::censoring::domain::profanity_classifier::ProfanityClassifier;

/// Weighted lexicon of profane terms with their broadcast severity, expressed
/// as the probability the classifier reports. The high-severity entries sit
/// above the default 0.98 decision threshold; milder terms stay below it so
/// they only trip a deliberately lowered threshold.
const LEXICON: &[(&str, f32)] = &[
    ("fuck", 0.999),
    ("fucker", 0.999),
    ("motherfucker", 0.999),
    ("shit", 0.995),
    ("bullshit", 0.995),
    ("cunt", 0.999),
    ("cock", 0.99),
    ("cocksucker", 0.999),
    ("pussy", 0.99),
    ("tits", 0.99),
    ("piss", 0.985),
    ("asshole", 0.99),
    ("bitch", 0.985),
    ("bastard", 0.97),
    ("dick", 0.96),
    ("slut", 0.97),
    ("whore", 0.97),
    ("damn", 0.9),
    ("goddamn", 0.95),
    ("hell", 0.6),
    ("ass", 0.55),
    ("crap", 0.4),
];

/// Suffixes stripped before lookup so simple inflections still match.
const SUFFIXES: &[&str] = &["ing", "ers", "er", "ed", "es", "s", "y"];

/// Lexicon-backed profanity classifier.
///
/// Words are normalized (lowercased, common character obfuscations folded
/// back to letters, inflectional suffixes stripped) and looked up in the
/// weighted lexicon; unknown words score 0.0. Stateless and infallible, but
/// kept behind the `ProfanityClassifier` seam so a model-backed
/// implementation can replace it without touching the pipeline.
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    fn lookup(word: &str) -> Option<f32> {
        LEXICON
            .iter()
            .find(|(term, _)| *term == word)
            .map(|(_, p)| *p)
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfanityClassifier for LexiconClassifier {
    fn score(&self, text: &str) -> Result<f32, Box<dyn std::error::Error>> {
        let folded = fold_obfuscations(text);

        if let Some(p) = Self::lookup(&folded) {
            return Ok(p);
        }

        for suffix in SUFFIXES {
            if let Some(stem) = folded.strip_suffix(suffix) {
                if stem.len() >= 3 {
                    if let Some(p) = Self::lookup(stem) {
                        return Ok(p);
                    }
                }
            }
        }

        Ok(0.0)
    }
}

/// Fold the usual censorship-dodging substitutions back to letters.
fn fold_obfuscations(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            '@' => 'a',
            '$' => 's',
            '0' => 'o',
            '1' | '!' => 'i',
            '3' => 'e',
            '4' => 'a',
            '*' => 'u',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn score(text: &str) -> f32 {
        LexiconClassifier::new().score(text).unwrap()
    }

    #[test]
    fn test_known_profanity_scores_above_default_threshold() {
        assert!(score("shit") >= 0.98);
    }

    #[test]
    fn test_clean_word_scores_zero() {
        assert_eq!(score("sunshine"), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score("DAMN"), score("damn"));
    }

    #[rstest]
    #[case("sh!t")]
    #[case("sh1t")]
    #[case("$hit")]
    fn test_obfuscated_spellings_fold_back(#[case] spelled: &str) {
        assert_eq!(score(spelled), score("shit"));
    }

    #[test]
    fn test_inflected_forms_match_stem() {
        assert_eq!(score("fucking"), score("fuck"));
        assert_eq!(score("bitches"), score("bitch"));
        assert_eq!(score("damned"), score("damn"));
    }

    #[test]
    fn test_short_stems_do_not_false_positive() {
        // "as" after stripping the plural 's' must not match "ass"
        assert_eq!(score("ass"), 0.55);
        assert_eq!(score("gas"), 0.0);
    }

    #[test]
    fn test_milder_terms_stay_below_default_threshold() {
        assert!(score("hell") < 0.98);
        assert!(score("crap") < 0.98);
    }

    #[test]
    fn test_classifier_is_infallible() {
        assert!(LexiconClassifier::new().score("anything at all").is_ok());
    }
}
