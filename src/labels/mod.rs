//! PR label sets and required-combination matching.
//!
//! A [`LabelSet`] is what a pull request carries; a combination table is an
//! ordered list of label sets, satisfied when the PR carries every label of at
//! least one entry (OR across entries, AND within an entry).

mod source;

pub use source::{LabelSource, PR_LABEL_NAMES_VAR, PR_LABELS_JSON_VAR, PR_LABELS_VAR};

use std::collections::BTreeSet;
use std::fmt;

/// A set of PR labels. Duplicates collapse, order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: BTreeSet<String>,
}

impl LabelSet {
    /// Build a label set, dropping blank entries.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = names
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.trim().is_empty())
            .collect();
        Self { labels }
    }

    /// Trimmed, lower-cased copy.
    pub fn normalized(&self) -> Self {
        Self::from_names(self.labels.iter().map(|l| l.trim().to_lowercase()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// True if at least one label of `other` is present.
    pub fn intersects(&self, other: &LabelSet) -> bool {
        !self.labels.is_disjoint(&other.labels)
    }

    /// True if every label of `required` is present.
    pub fn satisfies(&self, required: &LabelSet) -> bool {
        required.labels.is_subset(&self.labels)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", label)?;
        }
        write!(f, "]")
    }
}

/// Returns true iff any combination is a subset of `labels`.
pub fn has_match(labels: &LabelSet, combinations: &[LabelSet]) -> bool {
    combinations.iter().any(|combo| labels.satisfies(combo))
}

/// Convert a configured combination table into label sets.
pub fn combinations_from_config(table: &[Vec<String>]) -> Vec<LabelSet> {
    table
        .iter()
        .map(|combo| LabelSet::from_names(combo.iter().cloned()))
        .collect()
}
