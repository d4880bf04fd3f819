//! Sentence decomposition.

/// Default sentence delimiters.
pub(crate) const DEFAULT_DELIMITERS: &[char] = &['.', '!', '?', ';'];

/// Splits normalized text into independent sentences.
///
/// ```text
/// "NAME. RANK. SERIAL NUMBER" ──> ["NAME", "RANK", "SERIAL NUMBER"]
/// ```
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    delimiters: Vec<char>,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        SentenceSplitter::new(DEFAULT_DELIMITERS.iter().copied())
    }
}

impl SentenceSplitter {
    pub fn new(delimiters: impl IntoIterator<Item = char>) -> Self {
        let mut delimiters: Vec<char> = delimiters.into_iter().collect();
        delimiters.sort_unstable();
        delimiters.dedup();
        SentenceSplitter { delimiters }
    }

    pub fn delimiters(&self) -> &[char] {
        &self.delimiters
    }

    /// Split on any delimiter, trim each segment and drop empty ones.
    pub fn split(&self, input: &str) -> Vec<String> {
        input
            .split(|c: char| self.delimiters.contains(&c))
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_drops_empty_segments() {
        let splitter = SentenceSplitter::default();
        assert_eq!(splitter.split("NAME. RANK. SERIAL NUMBER"), vec!["NAME", "RANK", "SERIAL NUMBER"]);
        assert_eq!(splitter.split("WHAT?! REALLY..."), vec!["WHAT", "REALLY"]);
        assert_eq!(splitter.split("  ...  "), Vec::<String>::new());
        assert_eq!(splitter.split(""), Vec::<String>::new());
    }

    #[test]
    fn custom_delimiters() {
        let splitter = SentenceSplitter::new([',', ',']);
        assert_eq!(splitter.delimiters(), &[',']);
        assert_eq!(splitter.split("A, B. C"), vec!["A", "B. C"]);
    }
}
