// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drives the resolver and extractor across the whole package universe to produce a
//! [`PackageGraph`].

use std::time::Instant;

use tracing::{info, warn};

use crate::errors::Error;
use crate::extractor::DependencyExtractor;
use crate::oracle::Oracle;
use crate::package::contains_source;
use crate::resolver::CapabilityResolver;

use super::{EdgeColor, PackageGraph};

/// The Builder's lifecycle. Enforced so that a `GraphBuilder` can only ever run
/// `build()` once: the Oracle's mutable solver goal isn't safe to drive from two
/// concurrent builds, and a `Done` builder's resolver cache is stale anyway.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuilderState {
    /// No build has started yet.
    Idle,
    /// A build is in progress.
    Building,
    /// A build has completed; the graph has been handed back to the caller.
    Done,
}

/// Builds a [`PackageGraph`] by enumerating the Oracle's package universe exactly
/// once and extracting resolved provides/requires per package.
///
/// See `spec.md` §4.3 for the per-package edge rules and §5 for why this type must
/// not be driven concurrently.
pub struct GraphBuilder<O: Oracle> {
    resolver: CapabilityResolver<O>,
    with_structural_check: bool,
    state: BuilderState,
}

impl<O: Oracle> GraphBuilder<O> {
    /// Creates a builder around a fresh resolver over `oracle`.
    pub fn new(oracle: O) -> Self {
        Self {
            resolver: CapabilityResolver::new(oracle),
            with_structural_check: false,
            state: BuilderState::Idle,
        }
    }

    /// Enables the optional structural check from `spec.md` §4.2: after each
    /// extractor call, logs (does not abort on) a source package appearing where
    /// only binaries are expected.
    pub fn with_structural_check(mut self, enabled: bool) -> Self {
        self.with_structural_check = enabled;
        self
    }

    /// The current lifecycle state.
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// The resolver's stats, whether or not a build has completed.
    pub fn stats(&self) -> &crate::stats::ResolverStats {
        self.resolver.stats()
    }

    /// Enumerates every available package exactly once and builds the graph.
    ///
    /// Fails fast on the first fatal error (`spec.md` §4.3): no partial graph is
    /// returned. Calling this more than once, or on a builder that's already
    /// `Done`, is a programmer error.
    pub fn build(&mut self) -> Result<PackageGraph, Error> {
        match self.state {
            BuilderState::Building => return Err(Error::ConcurrentBuild),
            BuilderState::Done => return Err(Error::BuilderAlreadyDone),
            BuilderState::Idle => {}
        }

        self.state = BuilderState::Building;
        let result = self.build_inner();
        self.state = BuilderState::Done;
        result
    }

    fn build_inner(&mut self) -> Result<PackageGraph, Error> {
        let start = Instant::now();
        let mut graph = PackageGraph::new();

        let packages = self.resolver.oracle().iterate_available();
        let total = packages.len();
        info!(total, "packages to process");

        for (i, pkg) in packages.iter().enumerate() {
            let mut extractor = DependencyExtractor::new(&mut self.resolver);

            if pkg.is_source() {
                let provides = extractor.provides(pkg)?;
                if self.with_structural_check && contains_source(provides.iter()) {
                    warn!(package = pkg.name(), "source's provides contains a source package");
                }
                for provided in &provides {
                    graph.add_edge(pkg.name(), provided.name(), EdgeColor::Blue);
                }

                let requires = extractor.requires(pkg)?;
                if self.with_structural_check && contains_source(requires.iter()) {
                    warn!(package = pkg.name(), "source's build-requires contains a source package");
                }
                for required in &requires {
                    graph.add_edge(required.name(), pkg.name(), EdgeColor::Green);
                }
            } else {
                let requires = extractor.requires(pkg)?;
                if self.with_structural_check && contains_source(requires.iter()) {
                    warn!(package = pkg.name(), "binary's requires contains a source package");
                }
                for required in &requires {
                    graph.add_edge(required.name(), pkg.name(), EdgeColor::Red);
                }
            }

            if i % 1000 == 0 {
                info!(
                    cache_size = self.resolver.cache_size(),
                    stats = %self.resolver.stats(),
                    processed = i,
                    "progress snapshot"
                );
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            cache_size = self.resolver.cache_size(),
            stats = %self.resolver.stats(),
            "graph build complete"
        );

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{DepsolveError, MarkingError};
    use crate::package::Package;
    use indexmap::IndexSet;

    #[derive(Default)]
    struct FixedOracle {
        packages: Vec<Package>,
    }

    impl Oracle for FixedOracle {
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
        fn filter_by_provides_within(&self, _token: &str, _set: &[Package]) -> Vec<Package> {
            vec![]
        }
        fn filter_by_file_within(&self, _path: &str, _set: &[Package]) -> Vec<Package> {
            vec![]
        }
        fn try_install(&mut self, _token: &str) -> Result<(), MarkingError> {
            Err(MarkingError)
        }
        fn try_install_package(&mut self, _package: &Package) -> Result<(), MarkingError> {
            Err(MarkingError)
        }
        fn resolve_transaction(&mut self) -> Result<Vec<Package>, DepsolveError> {
            Err(DepsolveError)
        }
        fn reset_goal(&mut self) {}
    }

    #[test]
    fn source_builds_binary_yields_blue_and_green_edges() {
        let a = Package::binary("A", "S", vec![], vec![], IndexSet::new());
        let s = Package::source("S", vec!["B".into()], vec!["libfoo".into()], IndexSet::new());
        let a_provider = Package::binary("A2", "S", vec!["libfoo".into()], vec![], IndexSet::new());

        let oracle = FixedOracle {
            packages: vec![s.clone(), a.clone(), a_provider.clone()],
        };
        let mut builder = GraphBuilder::new(oracle);
        let graph = builder.build().unwrap();

        let edges: Vec<_> = graph.edges().collect();
        assert!(edges.contains(&("S", "B", EdgeColor::Blue)));
        assert!(edges.contains(&("A2", "S", EdgeColor::Green)));
    }

    #[test]
    fn source_requires_source_aborts_the_build() {
        let s2 = Package::source("S2", vec!["foo".into()], vec![], IndexSet::new());
        let s1 = Package::source("S1", vec![], vec!["foo".into()], IndexSet::new());
        let oracle = FixedOracle {
            packages: vec![s1, s2],
        };
        let mut builder = GraphBuilder::new(oracle);
        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::SourceRequiresSource { .. }));
    }

    #[test]
    fn concurrent_build_is_a_programmer_error() {
        let oracle = FixedOracle::default();
        let mut builder = GraphBuilder::new(oracle);
        builder.state = BuilderState::Building;
        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::ConcurrentBuild));
    }

    #[test]
    fn rebuilding_a_done_builder_is_a_programmer_error() {
        let oracle = FixedOracle::default();
        let mut builder = GraphBuilder::new(oracle);
        builder.build().unwrap();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::BuilderAlreadyDone));
    }
}
