use crate::error::LoadError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Cleans free-text fragments into suggestion-sized phrases. The stopword
/// set is loaded once at startup; a missing or unreadable word list is a
/// fatal configuration error.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: HashSet<String>,
}

impl TextNormalizer {
    /// Load the stopword set from a word list file, one word per line.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Stopwords {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_words(raw.lines()))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { stopwords }
    }

    /// Lowercase, drop stopword tokens, rejoin, trim, and strip one
    /// trailing period. A fragment of only stopwords comes back empty;
    /// callers discard empty and >2-word results as unusable suggestions.
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let kept: Vec<&str> = lowered
            .split(' ')
            .filter(|token| !self.stopwords.contains(*token))
            .collect();
        let mut result = kept.join(" ").trim().to_string();
        if result.ends_with('.') {
            result.pop();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::TextNormalizer;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn clean_removes_stopwords_and_lowercases() {
        let normalizer = TextNormalizer::from_words(["and"]);
        assert_eq!(
            normalizer.clean("Grilled Chicken and Stopword"),
            "grilled chicken stopword"
        );
    }

    #[test]
    fn clean_strips_one_trailing_period() {
        let normalizer = TextNormalizer::from_words(["a", "of"]);
        assert_eq!(normalizer.clean("plate of nachos."), "plate nachos");
    }

    #[test]
    fn clean_is_idempotent() {
        let normalizer = TextNormalizer::from_words(["a", "and", "of", "the"]);
        for input in [
            "Grilled Chicken",
            "spicy cheese.",
            "a big plate of nachos",
            "  padded  phrase ",
            "",
        ] {
            let once = normalizer.clean(input);
            assert_eq!(normalizer.clean(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn only_stopwords_yields_empty() {
        let normalizer = TextNormalizer::from_words(["a", "the", "of"]);
        assert_eq!(normalizer.clean("a the of"), "");
    }

    #[test]
    fn from_file_reads_one_word_per_line() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("stopwords.txt");
        fs::write(&path, "and\nthe\n")?;

        let normalizer = TextNormalizer::from_file(&path)?;
        assert_eq!(normalizer.clean("Fish and the Chips"), "fish chips");
        Ok(())
    }

    #[test]
    fn missing_word_list_is_fatal() {
        let result = TextNormalizer::from_file(std::path::Path::new("no/such/list.txt"));
        assert!(result.is_err());
    }
}
