//! Tab-completion candidates.

/// Completes command names by prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixCompleter {
    candidates: Vec<String>,
}

impl PrefixCompleter {
    /// Build a completer over the given names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut candidates: Vec<String> = names.into_iter().map(Into::into).collect();
        candidates.sort();
        candidates.dedup();
        Self { candidates }
    }

    /// All candidates, sorted.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Candidates starting with `prefix`, sorted.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }
}
