//! Exclude hint: user free text plus one "<name> 제외" fragment per removed place
//!
//! The two halves are stored separately and only merged by [`ExcludeHint::compose`].
//! [`ExcludeHint::absorb_edit`] recovers the user half from a merged string the
//! user has edited by hand.

use serde::{Deserialize, Serialize};

/// Separator between hint fragments
pub const FRAGMENT_DELIMITER: &str = ", ";

/// Suffix marking a fragment generated from a removed place
pub const EXCLUDED_SUFFIX: &str = " 제외";

/// Removed-place set and the user-authored part of the hint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeHint {
    /// User-authored text, never containing generated fragments
    user_text: String,
    /// Removed display names in the order they were removed
    removed: Vec<String>,
}

impl ExcludeHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn is_removed(&self, name: &str) -> bool {
        self.removed.iter().any(|n| n == name)
    }

    /// Flip removal of `name`; returns true when the name is now removed
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.removed.iter().position(|n| n == name) {
            self.removed.remove(pos);
            false
        } else {
            self.removed.push(name.to_string());
            true
        }
    }

    /// Replace the user half with whatever is left of `text` once generated
    /// fragments are stripped
    ///
    /// A fragment the user typed that happens to end in the suffix is dropped
    /// as if it had been generated.
    pub fn absorb_edit(&mut self, text: &str) {
        self.user_text = text
            .split(FRAGMENT_DELIMITER)
            .filter(|part| !part.ends_with(EXCLUDED_SUFFIX) && !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(FRAGMENT_DELIMITER);
    }

    /// Forget both halves (new plan)
    pub fn clear(&mut self) {
        self.user_text.clear();
        self.removed.clear();
    }

    /// Merged display string
    pub fn compose(&self) -> String {
        let user_parts = self
            .user_text
            .split(FRAGMENT_DELIMITER)
            .filter(|part| !part.trim().is_empty())
            .map(str::to_string);
        let excluded_parts = self
            .removed
            .iter()
            .map(|name| format!("{}{}", name, EXCLUDED_SUFFIX));

        user_parts
            .chain(excluded_parts)
            .collect::<Vec<_>>()
            .join(FRAGMENT_DELIMITER)
    }
}
