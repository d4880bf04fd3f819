//! Dictionary-driven word substitution.
//!
//! A [`SettingsDictionary`] is an ordered list of `name -> value` pairs with
//! case-insensitive name lookup. Substitution walks the entries in insertion
//! order and replaces whole-word, case-insensitive occurrences of each name.
//!
//! ## The marker
//!
//! A match is not replaced by its value directly. It is replaced by a
//! placeholder `MARKER + index + MARKER`, a single run of word characters, so
//! the `\b...\b` pattern of any later entry can find neither a word boundary
//! inside it nor any word of the hidden value. Placeholders are expanded to
//! the values in one final pass:
//!
//! ```text
//! entries: [YOU -> ME, ME -> YOU]
//! input:   "you like me"
//! pass 1:  "QXZSUBSTQXZ0QXZSUBSTQXZ like me"
//! pass 2:  "QXZSUBSTQXZ0QXZSUBSTQXZ like QXZSUBSTQXZ1QXZSUBSTQXZ"
//! expand:  "me like you"
//! ```
//!
//! The result is the same as if every entry had been applied to the original
//! input independently and simultaneously, earlier entries winning where two
//! names overlap. Multi-word values are protected as a whole.

use regex::{NoExpand, Regex, RegexBuilder};

/// Reserved token wrapped around substituted values while the dictionary is
/// being applied. Stripped from the final output.
pub const MARKER: &str = "QXZSUBSTQXZ";

#[derive(Debug, Clone)]
struct Entry {
    /// Name as authored (trimmed).
    name: String,
    /// Upper-cased name used for case-insensitive lookup.
    key: String,
    value: String,
    /// `None` when the name could not be compiled; the entry is kept for
    /// lookup but never applied.
    pattern: Option<Regex>,
}

/// Ordered, case-insensitive `name -> value` mapping.
///
/// Built once from configuration and treated as immutable afterwards; the
/// compiled per-entry regexes make it cheap to share across threads.
#[derive(Debug, Clone, Default)]
pub struct SettingsDictionary {
    entries: Vec<Entry>,
}

impl SettingsDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name -> value`.
    ///
    /// Re-inserting a name that already exists (in any case) removes the old
    /// entry and appends the new one, so the latest definition is applied
    /// last. Returns `false` when the entry was skipped because the name is
    /// blank.
    pub fn insert(&mut self, name: &str, value: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            tracing::warn!(value, "skipping substitution with an empty name");
            return false;
        }

        let key = name.to_uppercase();
        self.entries.retain(|e| e.key != key);

        let pattern = match compile_name(name) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(name, error = %err, "substitution name is not a valid pattern; entry will be skipped");
                None
            }
        };

        self.entries.push(Entry { name: name.to_string(), key, value: value.to_string(), pattern });
        true
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = name.trim().to_uppercase();
        self.entries.iter().find(|e| e.key == key).map(|e| e.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove an entry by name (case-insensitive). Returns the removed value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let key = name.trim().to_uppercase();
        let idx = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(idx).value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.value.as_str()))
    }

    /// Apply every entry to `input`; see the module docs for the algorithm.
    pub fn substitute(&self, input: &str) -> String {
        if self.entries.is_empty() {
            return input.to_string();
        }

        let mut working = input.replace(MARKER, "");
        for (idx, entry) in self.entries.iter().enumerate() {
            let Some(re) = &entry.pattern else {
                continue;
            };
            let placeholder = format!("{MARKER}{idx}{MARKER}");
            working = re.replace_all(&working, NoExpand(&placeholder)).into_owned();
        }

        regex!(r"QXZSUBSTQXZ(\d+)QXZSUBSTQXZ")
            .replace_all(&working, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.entries.get(idx))
                    .map(|entry| entry.value.trim().to_string())
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for SettingsDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = SettingsDictionary::new();
        for (name, value) in iter {
            dict.insert(name.as_ref(), value.as_ref());
        }
        dict
    }
}

/// Substitute with an optional dictionary; `None` leaves `input` unchanged.
pub fn substitute(dictionary: Option<&SettingsDictionary>, input: &str) -> String {
    match dictionary {
        Some(dict) => dict.substitute(input),
        None => input.to_string(),
    }
}

/// Escape the characters that authored names commonly contain but that carry
/// regex meaning. Other metacharacters are left alone and may make the entry
/// invalid.
fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if matches!(c, '\\' | '(' | ')' | '.') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn compile_name(name: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\b{}\b", escape_name(name))).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dictionary_is_a_no_op() {
        let dict = SettingsDictionary::new();
        assert_eq!(dict.substitute("hi bob"), "hi bob");
        assert_eq!(substitute(Some(&dict), "hi bob"), "hi bob");
        assert_eq!(substitute(None, "hi bob"), "hi bob");
    }

    #[test]
    fn replaces_whole_words_case_insensitively() {
        let dict: SettingsDictionary = [("BOB", "ROBERT")].into_iter().collect();
        assert_eq!(dict.substitute("hi bob"), "hi ROBERT");
        assert_eq!(dict.substitute("Bob and BOB"), "ROBERT and ROBERT");
        assert_eq!(dict.substitute("bobby"), "bobby");
    }

    #[test]
    fn substituted_values_are_not_rematched() {
        let dict: SettingsDictionary = [("you", "me"), ("me", "you")].into_iter().collect();
        assert_eq!(dict.substitute("you like me"), "me like you");

        let chained: SettingsDictionary = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(chained.substitute("a b"), "b c");
    }

    #[test]
    fn values_are_trimmed_and_inserted_literally() {
        let dict: SettingsDictionary = [("cost", "  $1 each  ")].into_iter().collect();
        assert_eq!(dict.substitute("the cost"), "the $1 each");
    }

    #[test]
    fn escapes_dots_and_parentheses() {
        let dict: SettingsDictionary = [("u.s", "united states"), ("(c)", "copyright")].into_iter().collect();
        assert_eq!(dict.substitute("the u.s flag"), "the united states flag");
        // "." must not behave as a wildcard.
        assert_eq!(dict.substitute("the uxs flag"), "the uxs flag");
        // Parentheses are literal, so the bare "c" is never a match.
        assert_eq!(dict.substitute("a b c"), "a b c");
        // `\b` before "(" needs a word character on its left.
        assert_eq!(dict.substitute("the (c) mark"), "the (c) mark");
        assert_eq!(dict.substitute("x(c)y"), "xcopyrighty");
    }

    #[test]
    fn interior_words_of_values_are_not_rematched() {
        let dict: SettingsDictionary = [("x", "a b c"), ("b", "z")].into_iter().collect();
        assert_eq!(dict.substitute("x"), "a b c");
        assert_eq!(dict.substitute("x b"), "a b c z");

        let dict: SettingsDictionary = [("i'm", "i am happy"), ("am", "are")].into_iter().collect();
        assert_eq!(dict.substitute("i'm"), "i am happy");
        assert_eq!(dict.substitute("i'm sure i am"), "i am happy sure i are");
    }

    #[test]
    fn marker_text_in_the_input_is_dropped() {
        let dict: SettingsDictionary = [("cat", "dog")].into_iter().collect();
        assert_eq!(dict.substitute("cat QXZSUBSTQXZ0QXZSUBSTQXZ"), "dog 0");
    }

    #[test]
    fn invalid_names_are_skipped_without_affecting_others() {
        let mut dict = SettingsDictionary::new();
        assert!(dict.insert("[oops", "broken"));
        assert!(dict.insert("cat", "dog"));
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.substitute("[oops cat"), "[oops dog");
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut dict = SettingsDictionary::new();
        assert!(!dict.insert("   ", "x"));
        assert!(dict.is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive_and_reinsert_moves_to_end() {
        let mut dict = SettingsDictionary::new();
        dict.insert("one", "1");
        dict.insert("two", "2");
        dict.insert("ONE", "uno");

        assert_eq!(dict.get("One"), Some("uno"));
        assert!(dict.contains("TWO"));
        let names: Vec<&str> = dict.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["two", "ONE"]);

        assert_eq!(dict.remove("two"), Some("2".to_string()));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn marker_never_leaks_into_output() {
        let dict: SettingsDictionary = [("i'm", "i am"), ("am", "are")].into_iter().collect();
        let out = dict.substitute("i'm here and i am there");
        assert_eq!(out, "i am here and i are there");
        assert!(!out.contains(MARKER));
    }
}
