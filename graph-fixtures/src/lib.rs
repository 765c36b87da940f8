// SPDX-License-Identifier: MIT OR Apache-2.0

//! A small synthetic [`Oracle`] and a handful of canned package universes, used by
//! `pkgraph`'s own test suite and available for downstream integration tests.
//!
//! Mirrors the role `fixtures` plays for `guppy`: a place to keep test data out of
//! the library crate's own `src/unit_tests` so it can be reused by the CLI crate
//! too.

use std::collections::HashMap;

use indexmap::IndexSet;
use pkgraph::oracle::{DepsolveError, MarkingError, Oracle};
use pkgraph::package::Package;

/// What simulating an install of a given token does, in [`InMemoryOracle`].
enum InstallOutcome {
    /// The token can't be marked for install at all.
    Marking,
    /// The token marks fine but the solver can't produce a transaction.
    Depsolve,
    /// The token marks fine and the solver settles on this install set.
    Installs(Vec<Package>),
}

/// An in-memory [`Oracle`] over a fixed package universe, with a configurable
/// transaction simulation keyed by the token that triggered the simulated install.
pub struct InMemoryOracle {
    packages: Vec<Package>,
    install_outcomes: HashMap<String, InstallOutcome>,
    goal: Vec<String>,
}

impl InMemoryOracle {
    /// Creates an Oracle over the given universe. By default, any token not
    /// registered via `installable`/`not_installable`/`depsolve_failure` fails the
    /// transaction fallback with a depsolve error once marked.
    pub fn new(packages: Vec<Package>) -> Self {
        Self {
            packages,
            install_outcomes: HashMap::new(),
            goal: Vec::new(),
        }
    }

    /// Registers that simulating an install of `token` succeeds with the given
    /// install set.
    pub fn installable(mut self, token: impl Into<String>, install_set: Vec<Package>) -> Self {
        self.install_outcomes
            .insert(token.into(), InstallOutcome::Installs(install_set));
        self
    }

    /// Registers that `token` can't be marked for install at all.
    pub fn not_installable(mut self, token: impl Into<String>) -> Self {
        self.install_outcomes.insert(token.into(), InstallOutcome::Marking);
        self
    }

    /// Registers that marking `token` succeeds but solving the transaction fails.
    pub fn depsolve_failure(mut self, token: impl Into<String>) -> Self {
        self.install_outcomes.insert(token.into(), InstallOutcome::Depsolve);
        self
    }
}

impl Oracle for InMemoryOracle {
    fn iterate_available(&self) -> Vec<Package> {
        self.packages.clone()
    }

    fn filter_by_name(&self, name: &str) -> Vec<Package> {
        self.packages.iter().filter(|p| p.name() == name).cloned().collect()
    }

    fn filter_by_provides(&self, token: &str) -> Vec<Package> {
        self.packages
            .iter()
            .filter(|p| p.provides().iter().any(|pr| pr.as_ref() == token))
            .cloned()
            .collect()
    }

    fn filter_by_file(&self, path: &str) -> Vec<Package> {
        self.packages.iter().filter(|p| p.files().contains(path)).cloned().collect()
    }

    fn filter_by_provides_within(&self, token: &str, install_set: &[Package]) -> Vec<Package> {
        install_set
            .iter()
            .filter(|p| p.provides().iter().any(|pr| pr.as_ref() == token))
            .cloned()
            .collect()
    }

    fn filter_by_file_within(&self, path: &str, install_set: &[Package]) -> Vec<Package> {
        install_set.iter().filter(|p| p.files().contains(path)).cloned().collect()
    }

    fn try_install(&mut self, token: &str) -> Result<(), MarkingError> {
        match self.install_outcomes.get(token) {
            Some(InstallOutcome::Marking) => Err(MarkingError),
            _ => {
                self.goal.push(token.to_owned());
                Ok(())
            }
        }
    }

    fn try_install_package(&mut self, package: &Package) -> Result<(), MarkingError> {
        self.goal.push(package.name().to_owned());
        Ok(())
    }

    fn resolve_transaction(&mut self) -> Result<Vec<Package>, DepsolveError> {
        let primary = self.goal.first().cloned();
        match primary.and_then(|token| self.install_outcomes.get(&token)) {
            Some(InstallOutcome::Installs(set)) => Ok(set.clone()),
            _ => Err(DepsolveError),
        }
    }

    fn reset_goal(&mut self) {
        self.goal.clear();
    }
}

fn no_files() -> IndexSet<Box<str>> {
    IndexSet::new()
}

/// `spec.md` §8 scenario 1: a unique provider.
///
/// Binary `A` provides `libfoo`; resolving `libfoo` should hit the provides probe
/// exactly once.
pub fn unique_provider() -> InMemoryOracle {
    let a = Package::binary("A", "A-src", vec!["libfoo".into()], vec![], no_files());
    InMemoryOracle::new(vec![a])
}

/// `spec.md` §8 scenario 2: two same-named packages both providing `libfoo`; the
/// provides probe should dedup down to one.
pub fn duplicate_name_single_dedup() -> InMemoryOracle {
    let a1 = Package::binary("A", "A-src", vec!["libfoo".into()], vec![], no_files());
    let a2 = Package::binary("A", "A-src", vec!["libfoo".into()], vec![], no_files());
    InMemoryOracle::new(vec![a1, a2])
}

/// `spec.md` §8 scenario 3: file-path resolution with no provides match.
pub fn file_resolution() -> InMemoryOracle {
    let mut files = no_files();
    files.insert("/usr/bin/bar".into());
    let b = Package::binary("B", "B-src", vec![], vec![], files);
    InMemoryOracle::new(vec![b])
}

/// `spec.md` §8 scenario 4: `virt` has no direct providers in the primary
/// repository, but a simulated install pulls in binary `C`, which provides it.
pub fn solver_fallback() -> InMemoryOracle {
    let c = Package::binary("C", "C-src", vec!["virt".into()], vec![], no_files());
    InMemoryOracle::new(vec![]).installable("virt", vec![c])
}

/// `spec.md` §8 scenario 5: source `S` provides binary `B` and build-requires
/// `libfoo`, resolved to binary `A`.
pub fn source_builds_binary() -> InMemoryOracle {
    let a = Package::binary("A", "A-src", vec!["libfoo".into()], vec![], no_files());
    let b = Package::binary("B", "S", vec![], vec![], no_files());
    let s = Package::source("S", vec!["B".into()], vec!["libfoo".into()], no_files());
    InMemoryOracle::new(vec![s, a, b])
}

/// `spec.md` §8 scenario 6: source `S1` build-requires a token that resolves to
/// source `S2`. Building this universe must raise a fatal ontology violation.
pub fn source_requires_source() -> InMemoryOracle {
    let s2 = Package::source("S2", vec!["weird-build-input".into()], vec![], no_files());
    let s1 = Package::source("S1", vec![], vec!["weird-build-input".into()], no_files());
    InMemoryOracle::new(vec![s1, s2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgraph::graph::{EdgeColor, GraphBuilder};
    use pkgraph::resolver::CapabilityResolver;
    use pkgraph::stats::StatTag;
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_1_unique_provider() {
        let mut resolver = CapabilityResolver::new(unique_provider());
        let resolved = resolver.resolve("libfoo", None).unwrap();
        assert_eq!(resolved.map(|p| p.name().to_owned()), Some("A".to_owned()));
        assert_eq!(resolver.stats().get(StatTag::Provide), 1);
    }

    #[test]
    fn scenario_2_duplicate_name_dedup() {
        let mut resolver = CapabilityResolver::new(duplicate_name_single_dedup());
        let resolved = resolver.resolve("libfoo", None).unwrap();
        assert_eq!(resolved.map(|p| p.name().to_owned()), Some("A".to_owned()));
        assert_eq!(resolver.stats().get(StatTag::ProvideDuplicated), 1);
    }

    #[test]
    fn scenario_3_file_resolution() {
        let mut resolver = CapabilityResolver::new(file_resolution());
        let resolved = resolver.resolve("/usr/bin/bar", None).unwrap();
        assert_eq!(resolved.map(|p| p.name().to_owned()), Some("B".to_owned()));
        assert_eq!(resolver.stats().get(StatTag::File), 1);
    }

    #[test]
    fn scenario_4_solver_fallback_resets_goal() {
        let mut resolver = CapabilityResolver::new(solver_fallback());
        let resolved = resolver.resolve("virt", None).unwrap();
        assert_eq!(resolved.map(|p| p.name().to_owned()), Some("C".to_owned()));
        assert_eq!(resolver.stats().get(StatTag::TransactionProvide), 1);
    }

    #[test]
    fn scenario_5_source_builds_binary() {
        let mut builder = GraphBuilder::new(source_builds_binary());
        let graph = builder.build().unwrap();
        let edges: Vec<_> = graph.edges().collect();
        assert!(edges.contains(&("S", "B", EdgeColor::Blue)));
        assert!(edges.contains(&("A", "S", EdgeColor::Green)));
    }

    #[test]
    fn scenario_6_source_requires_source_is_fatal() {
        let mut builder = GraphBuilder::new(source_requires_source());
        let err = builder.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "ontology violation: source package 'S1' cannot require source package 'S2'"
        );
    }
}
