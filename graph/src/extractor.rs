// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a package's raw `provides`/`requires` token lists into resolved package
//! sets.

use std::collections::HashSet;

use tracing::error;

use crate::errors::Error;
use crate::oracle::Oracle;
use crate::package::Package;
use crate::resolver::CapabilityResolver;

/// Resolves a package's capability tokens against a [`CapabilityResolver`].
pub struct DependencyExtractor<'a, O: Oracle> {
    resolver: &'a mut CapabilityResolver<O>,
}

impl<'a, O: Oracle> DependencyExtractor<'a, O> {
    /// Borrows a resolver to extract dependencies with.
    pub fn new(resolver: &'a mut CapabilityResolver<O>) -> Self {
        Self { resolver }
    }

    /// Resolves every token in `pkg.provides()`, dropping unresolved tokens.
    ///
    /// Only meaningful for source packages: a binary package's provides list feeds
    /// into the graph's blue edges only when the package producing it is a source.
    pub fn provides(&mut self, pkg: &Package) -> Result<HashSet<Package>, Error> {
        let mut resolved = HashSet::new();
        for token in pkg.provides() {
            if let Some(provider) = self.resolver.resolve(token, None)? {
                resolved.insert(provider);
            }
        }
        Ok(resolved)
    }

    /// Resolves every token in `pkg.requires()`, dropping unresolved tokens,
    /// deduplicating by package name, and rejecting a source-requires-source result
    /// as a fatal ontology violation.
    pub fn requires(&mut self, pkg: &Package) -> Result<Vec<Package>, Error> {
        let mut seen_names = HashSet::new();
        let mut resolved = Vec::new();
        for token in pkg.requires() {
            let provider = match self.resolver.resolve(token, Some(pkg))? {
                Some(provider) => provider,
                None => continue,
            };

            if pkg.is_source() && provider.is_source() {
                error!(
                    package = pkg.name(),
                    provider = provider.name(),
                    "ontology violation: source package requires another source package"
                );
                return Err(Error::source_requires_source(pkg.name(), provider.name()));
            }

            if seen_names.insert(provider.name().to_owned()) {
                resolved.push(provider);
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{DepsolveError, MarkingError};
    use indexmap::IndexSet;

    #[derive(Default)]
    struct StaticOracle {
        packages: Vec<Package>,
    }

    impl Oracle for StaticOracle {
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
        fn filter_by_file(&self, _path: &str) -> Vec<Package> {
            vec![]
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
    fn requires_dedups_by_name() {
        let a = Package::binary("A", "src-a", vec!["foo".into(), "foo".into()], vec![], IndexSet::new());
        let s = Package::source("S", vec![], vec!["foo".into(), "foo".into()], IndexSet::new());
        let oracle = StaticOracle { packages: vec![a.clone(), s.clone()] };
        let mut resolver = CapabilityResolver::new(oracle);
        let mut extractor = DependencyExtractor::new(&mut resolver);

        let requires = extractor.requires(&s).unwrap();
        assert_eq!(requires.len(), 1);
        assert_eq!(requires[0], a);
    }

    #[test]
    fn source_requiring_source_is_fatal() {
        let s2 = Package::source("S2", vec!["foo".into()], vec![], IndexSet::new());
        let s1 = Package::source("S1", vec![], vec!["foo".into()], IndexSet::new());
        let oracle = StaticOracle { packages: vec![s1.clone(), s2.clone()] };
        let mut resolver = CapabilityResolver::new(oracle);
        let mut extractor = DependencyExtractor::new(&mut resolver);

        let err = extractor.requires(&s1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ontology violation: source package 'S1' cannot require source package 'S2'"
        );
    }
}
