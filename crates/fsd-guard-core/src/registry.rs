//! Rule bundle registration.
//!
//! Derived rules are handed to the enforcement side grouped per slice,
//! one named registration each. Names embed the setup cycle so repeated
//! cycles never collide, and installing a cycle replaces everything a
//! sink held before.

use crate::rules::SliceRules;
use serde::Serialize;
use tracing::info;

/// A named registration unit: one slice's rules under a cycle-unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleBundle {
    /// Registration name, unique across slices and setup cycles.
    pub name: String,
    /// The slice's rules.
    pub rules: SliceRules,
}

/// Receives rule bundles, one sink per bundler backend.
pub trait EnforcementSink {
    /// Replaces every previously installed bundle with `bundles`.
    fn install(&mut self, bundles: &[RuleBundle]);
}

/// Hands per-slice bundles to enforcement sinks under cycle-unique names.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    cycle: u64,
}

impl RuleRegistry {
    /// Creates a registry with no published cycles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cycles published so far.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Publishes one setup cycle's rules to every sink.
    ///
    /// Each slice becomes one bundle named `fsd:<layer>/<slice>#<cycle>`.
    /// Every sink receives the same bundle set. Returns the cycle number
    /// used for this publication.
    pub fn publish(
        &mut self,
        rules: &[SliceRules],
        sinks: &mut [&mut dyn EnforcementSink],
    ) -> u64 {
        self.cycle += 1;
        let bundles: Vec<RuleBundle> = rules
            .iter()
            .map(|slice_rules| RuleBundle {
                name: format!("fsd:{}#{}", slice_rules.slice, self.cycle),
                rules: slice_rules.clone(),
            })
            .collect();
        for sink in sinks.iter_mut() {
            sink.install(&bundles);
        }
        info!(
            cycle = self.cycle,
            bundles = bundles.len(),
            "rule bundles published"
        );
        self.cycle
    }
}

/// An in-memory sink that keeps the last installed cycle.
///
/// The reference collaborator for tests and for hosts that serialize
/// bundles instead of enforcing them directly.
#[derive(Debug, Default)]
pub struct RecordingSink {
    installed: Vec<RuleBundle>,
    installs: usize,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bundles from the most recent install.
    #[must_use]
    pub fn bundles(&self) -> &[RuleBundle] {
        &self.installed
    }

    /// Returns how many times install was called.
    #[must_use]
    pub fn installs(&self) -> usize {
        self.installs
    }
}

impl EnforcementSink for RecordingSink {
    fn install(&mut self, bundles: &[RuleBundle]) {
        self.installed = bundles.to_vec();
        self.installs += 1;
    }
}
