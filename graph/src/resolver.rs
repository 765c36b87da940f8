// SPDX-License-Identifier: MIT OR Apache-2.0

//! The capability resolver: `token -> package | unresolved`.

use std::collections::HashMap;

use tracing::{error, trace};

use crate::errors::Error;
use crate::oracle::Oracle;
use crate::package::{filter_duplicates, Package};
use crate::stats::{ResolverStats, StatTag};
use crate::token::{is_file_token, strip_version};

/// A pipeline of probes over an [`Oracle`], memoizing results and classifying how
/// each resolution succeeded.
///
/// See `spec.md` §4.1 for the full probe order. The resolver owns the Oracle: the
/// Oracle's mutable solver goal is never safe to interleave with other resolutions,
/// and the resolver is the single place that drives it.
pub struct CapabilityResolver<O: Oracle> {
    oracle: O,
    cache: HashMap<Box<str>, Option<Package>>,
    stats: ResolverStats,
}

enum TransactionOutcome {
    Installed(Vec<Package>),
    MarkingError,
    DepsolveError,
}

/// Guarantees `Oracle::reset_goal` runs exactly once, on every exit path out of the
/// transaction fallback, including early returns and panics during that scope.
struct SolverSession<'o, O: Oracle> {
    oracle: &'o mut O,
}

impl<'o, O: Oracle> Drop for SolverSession<'o, O> {
    fn drop(&mut self) {
        self.oracle.reset_goal();
    }
}

impl<O: Oracle> CapabilityResolver<O> {
    /// Creates a resolver with an empty cache and zeroed stats.
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            cache: HashMap::new(),
            stats: ResolverStats::default(),
        }
    }

    /// The Oracle this resolver drives.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The current stats snapshot.
    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    /// The number of entries in the memoization cache.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Resolves a capability token to a single package, or `None` if it is
    /// unresolved. `for_package` is the package on whose behalf this token is being
    /// resolved (used only by the transaction fallback); pass `None` when resolving
    /// a `provides` entry.
    ///
    /// Returns `Err` only for the fatal "resolution exhausted" condition in
    /// `spec.md` §4.1 step 8: every other failure mode is swallowed and counted.
    pub fn resolve(
        &mut self,
        token: &str,
        for_package: Option<&Package>,
    ) -> Result<Option<Package>, Error> {
        let key = strip_version(token);

        if let Some(cached) = self.cache.get(key) {
            self.stats.record(StatTag::Cache);
            return Ok(cached.clone());
        }

        if let Some(pkg) = self.provides_probe(key, StatTag::Provide, StatTag::ProvideDuplicated) {
            self.cache.insert(key.into(), Some(pkg.clone()));
            return Ok(Some(pkg));
        }

        let by_name = self.oracle.filter_by_name(key);
        if let Some(pkg) = by_name.into_iter().next() {
            self.stats.record(StatTag::Name);
            self.cache.insert(key.into(), Some(pkg.clone()));
            return Ok(Some(pkg));
        }

        if is_file_token(key) {
            if let Some(pkg) = self.file_probe(key, StatTag::File, StatTag::FileDuplicated) {
                self.cache.insert(key.into(), Some(pkg.clone()));
                return Ok(Some(pkg));
            }
        }

        trace!(token = key, "falling back to transaction resolution");
        let install_set = match self.run_transaction(key, for_package) {
            TransactionOutcome::MarkingError => {
                self.stats.record(StatTag::MarkingError);
                return Ok(None);
            }
            TransactionOutcome::DepsolveError => {
                self.stats.record(StatTag::DepsolveError);
                return Ok(None);
            }
            TransactionOutcome::Installed(set) => set,
        };

        let candidates = self.oracle.filter_by_provides_within(key, &install_set);
        if let Some(pkg) = self.classify(candidates, StatTag::TransactionProvide, StatTag::TransactionProvideDuplicate) {
            return Ok(Some(pkg));
        }

        let candidates = self.oracle.filter_by_file_within(key, &install_set);
        if let Some(pkg) = self.classify(candidates, StatTag::TransactionFile, StatTag::TransactionFileDuplicate) {
            return Ok(Some(pkg));
        }

        for p in &install_set {
            if p.files().iter().any(|f| f.as_ref() == key) {
                self.stats.record(StatTag::TransactionFileLoop);
                return Ok(Some(p.clone()));
            }
        }
        for p in &install_set {
            if p.provides().iter().any(|pr| strip_version(pr) == key) {
                self.stats.record(StatTag::TransactionProvideLoop);
                return Ok(Some(p.clone()));
            }
        }

        error!(token = key, "resolution exhausted: no probe could resolve this capability token");
        Err(Error::resolution_exhausted(key))
    }

    /// Packages whose provides list uniquely names `key`, after name-deduplication.
    fn provides_probe(&mut self, key: &str, unique: StatTag, duplicated: StatTag) -> Option<Package> {
        let candidates = self.oracle.filter_by_provides(key);
        self.classify(candidates, unique, duplicated)
    }

    /// Packages whose files set uniquely contains `key`, after name-deduplication.
    fn file_probe(&mut self, key: &str, unique: StatTag, duplicated: StatTag) -> Option<Package> {
        let candidates = self.oracle.filter_by_file(key);
        self.classify(candidates, unique, duplicated)
    }

    /// Accepts `candidates` if it's already a single package, or if it dedups to a
    /// single package by name; otherwise falls through to the next probe tier.
    fn classify(&mut self, mut candidates: Vec<Package>, unique: StatTag, duplicated: StatTag) -> Option<Package> {
        if candidates.len() == 1 {
            self.stats.record(unique);
            return candidates.pop();
        }
        if candidates.len() > 1 {
            let mut deduped = filter_duplicates(candidates);
            if deduped.len() == 1 {
                self.stats.record(duplicated);
                return deduped.pop();
            }
        }
        None
    }

    fn run_transaction(&mut self, token: &str, for_package: Option<&Package>) -> TransactionOutcome {
        let mut session = SolverSession {
            oracle: &mut self.oracle,
        };

        if session.oracle.try_install(token).is_err() {
            return TransactionOutcome::MarkingError;
        }

        if let Some(pkg) = for_package {
            if pkg.is_source() && session.oracle.try_install_package(pkg).is_err() {
                return TransactionOutcome::MarkingError;
            }
        }

        match session.oracle.resolve_transaction() {
            Ok(install_set) => TransactionOutcome::Installed(install_set),
            Err(_) => TransactionOutcome::DepsolveError,
        }
    }
}
