//! Conversion options.

use serde::{Deserialize, Serialize};

/// Options applied to every converted block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// MTZ title; the container default (empty) when absent.
    pub title: Option<String>,

    /// Lines appended to the MTZ history.
    pub history: Vec<String>,

    /// Write unmerged files even from `_refln` data.
    pub force_unmerged: bool,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_history<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.history.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn with_force_unmerged(mut self, force: bool) -> Self {
        self.force_unmerged = force;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = ConvertOptions::new()
            .with_title("t")
            .with_history(["a"])
            .with_history(vec!["b".to_string()])
            .with_force_unmerged(true);
        assert_eq!(options.title.as_deref(), Some("t"));
        assert_eq!(options.history, vec!["a", "b"]);
        assert!(options.force_unmerged);
        assert_eq!(ConvertOptions::default().title, None);
    }
}
