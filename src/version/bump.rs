//! Label-driven version bump.

use super::Version;
use crate::config::{LabelsSection, VersionSection};
use crate::labels::{self, LabelSet};

/// Which labels trigger which bump.
#[derive(Debug, Clone)]
pub struct BumpPolicy {
    /// At least one of these must be fully present for any bump.
    pub combinations: Vec<LabelSet>,
    /// Bumps major and resets minor. Wins over `development`.
    pub production: String,
    /// Bumps minor.
    pub development: String,
    /// Lower-case labels and markers before matching.
    pub normalize: bool,
}

impl BumpPolicy {
    pub fn from_config(version: &VersionSection, labels: &LabelsSection) -> Self {
        Self {
            combinations: labels::combinations_from_config(&version.bump_combinations),
            production: version.production_label.clone(),
            development: version.development_label.clone(),
            normalize: labels.normalize,
        }
    }
}

/// The kind of bump applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
}

/// Result of evaluating a bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpOutcome {
    /// No required combination is present.
    NoCombination,
    /// A combination matched but it carries neither marker.
    NoMarker,
    /// The version changed.
    Bumped { kind: BumpKind, from: Version, to: Version },
}

impl BumpOutcome {
    /// The version after the transform.
    pub fn resulting(&self, current: Version) -> Version {
        match self {
            BumpOutcome::Bumped { to, .. } => *to,
            _ => current,
        }
    }
}

/// Decide the next version for `current` given the PR's labels.
pub fn bump(current: Version, labels: &LabelSet, policy: &BumpPolicy) -> BumpOutcome {
    let (labels, combinations, production, development) = if policy.normalize {
        (
            labels.normalized(),
            policy.combinations.iter().map(LabelSet::normalized).collect::<Vec<_>>(),
            policy.production.trim().to_lowercase(),
            policy.development.trim().to_lowercase(),
        )
    } else {
        (
            labels.clone(),
            policy.combinations.clone(),
            policy.production.clone(),
            policy.development.clone(),
        )
    };

    if !labels::has_match(&labels, &combinations) {
        return BumpOutcome::NoCombination;
    }

    let (kind, to) = if labels.contains(&production) {
        (BumpKind::Major, Version::new(current.major.saturating_add(1), 0))
    } else if labels.contains(&development) {
        (BumpKind::Minor, Version::new(current.major, current.minor.saturating_add(1)))
    } else {
        return BumpOutcome::NoMarker;
    };

    BumpOutcome::Bumped {
        kind,
        from: current,
        to,
    }
}
