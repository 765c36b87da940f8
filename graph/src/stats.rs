// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolver statistics: a fixed set of monotonic counters classifying *how* each
//! capability resolution succeeded (or was swallowed as unresolved).

use std::fmt;

/// One tag per way a [`crate::resolver::CapabilityResolver::resolve`] call can be
/// classified. Exactly one tag is recorded per call that doesn't end in a fatal
/// error (`spec.md` §8, "Stats conservation").
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatTag {
    /// Resolved from the memoization cache.
    Cache,
    /// Resolved uniquely via the provides probe.
    Provide,
    /// Resolved via the provides probe after name-deduplication.
    ProvideDuplicated,
    /// Resolved via an exact package-name match.
    Name,
    /// Resolved uniquely via the file probe.
    File,
    /// Resolved via the file probe after name-deduplication.
    FileDuplicated,
    /// The transaction fallback's install simulation raised a marking error.
    MarkingError,
    /// The transaction fallback's install simulation raised a depsolve error.
    DepsolveError,
    /// Resolved via the provides probe restricted to the simulated install set.
    TransactionProvide,
    /// As above, after name-deduplication.
    TransactionProvideDuplicate,
    /// Resolved via the file probe restricted to the simulated install set.
    TransactionFile,
    /// As above, after name-deduplication.
    TransactionFileDuplicate,
    /// Resolved by walking the install set directly and matching a file path.
    TransactionFileLoop,
    /// Resolved by walking the install set directly and matching a provides entry.
    TransactionProvideLoop,
}

impl StatTag {
    /// All tags, in the fixed order from `spec.md` §4.1.
    pub const ALL: [StatTag; 14] = [
        StatTag::Cache,
        StatTag::Provide,
        StatTag::ProvideDuplicated,
        StatTag::Name,
        StatTag::File,
        StatTag::FileDuplicated,
        StatTag::MarkingError,
        StatTag::DepsolveError,
        StatTag::TransactionProvide,
        StatTag::TransactionProvideDuplicate,
        StatTag::TransactionFile,
        StatTag::TransactionFileDuplicate,
        StatTag::TransactionProvideLoop,
        StatTag::TransactionFileLoop,
    ];

    fn as_str(self) -> &'static str {
        match self {
            StatTag::Cache => "cache",
            StatTag::Provide => "provide",
            StatTag::ProvideDuplicated => "provide_duplicated",
            StatTag::Name => "name",
            StatTag::File => "file",
            StatTag::FileDuplicated => "file_duplicated",
            StatTag::MarkingError => "markingerror",
            StatTag::DepsolveError => "depsolveerror",
            StatTag::TransactionProvide => "transaction_provide",
            StatTag::TransactionProvideDuplicate => "transaction_provide_duplicate",
            StatTag::TransactionFile => "transaction_file",
            StatTag::TransactionFileDuplicate => "transaction_file_duplicate",
            StatTag::TransactionProvideLoop => "transaction_provide_loop",
            StatTag::TransactionFileLoop => "transaction_file_loop",
        }
    }
}

impl fmt::Display for StatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolver's stat counters for a single build run.
#[derive(Clone, Debug, Default)]
pub struct ResolverStats {
    cache: u64,
    provide: u64,
    provide_duplicated: u64,
    name: u64,
    file: u64,
    file_duplicated: u64,
    markingerror: u64,
    depsolveerror: u64,
    transaction_provide: u64,
    transaction_provide_duplicate: u64,
    transaction_file: u64,
    transaction_file_duplicate: u64,
    transaction_provide_loop: u64,
    transaction_file_loop: u64,
}

impl ResolverStats {
    /// Increments the counter for the given tag.
    pub fn record(&mut self, tag: StatTag) {
        let counter = match tag {
            StatTag::Cache => &mut self.cache,
            StatTag::Provide => &mut self.provide,
            StatTag::ProvideDuplicated => &mut self.provide_duplicated,
            StatTag::Name => &mut self.name,
            StatTag::File => &mut self.file,
            StatTag::FileDuplicated => &mut self.file_duplicated,
            StatTag::MarkingError => &mut self.markingerror,
            StatTag::DepsolveError => &mut self.depsolveerror,
            StatTag::TransactionProvide => &mut self.transaction_provide,
            StatTag::TransactionProvideDuplicate => &mut self.transaction_provide_duplicate,
            StatTag::TransactionFile => &mut self.transaction_file,
            StatTag::TransactionFileDuplicate => &mut self.transaction_file_duplicate,
            StatTag::TransactionProvideLoop => &mut self.transaction_provide_loop,
            StatTag::TransactionFileLoop => &mut self.transaction_file_loop,
        };
        *counter += 1;
    }

    /// Returns the value of a single counter.
    pub fn get(&self, tag: StatTag) -> u64 {
        match tag {
            StatTag::Cache => self.cache,
            StatTag::Provide => self.provide,
            StatTag::ProvideDuplicated => self.provide_duplicated,
            StatTag::Name => self.name,
            StatTag::File => self.file,
            StatTag::FileDuplicated => self.file_duplicated,
            StatTag::MarkingError => self.markingerror,
            StatTag::DepsolveError => self.depsolveerror,
            StatTag::TransactionProvide => self.transaction_provide,
            StatTag::TransactionProvideDuplicate => self.transaction_provide_duplicate,
            StatTag::TransactionFile => self.transaction_file,
            StatTag::TransactionFileDuplicate => self.transaction_file_duplicate,
            StatTag::TransactionProvideLoop => self.transaction_provide_loop,
            StatTag::TransactionFileLoop => self.transaction_file_loop,
        }
    }

    /// Sum of all counters. Used by the "stats conservation" property
    /// (`spec.md` §8): every non-fatal `resolve` call is accounted for by exactly
    /// one counter.
    pub fn total(&self) -> u64 {
        StatTag::ALL.iter().map(|&tag| self.get(tag)).sum()
    }
}

impl fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, &tag) in StatTag::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", tag, self.get(tag))?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_independently() {
        let mut stats = ResolverStats::default();
        stats.record(StatTag::Provide);
        stats.record(StatTag::Provide);
        stats.record(StatTag::Cache);
        assert_eq!(stats.get(StatTag::Provide), 2);
        assert_eq!(stats.get(StatTag::Cache), 1);
        assert_eq!(stats.get(StatTag::Name), 0);
        assert_eq!(stats.total(), 3);
    }
}

#[cfg(all(test, feature = "proptest1"))]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn tag_strategy() -> impl Strategy<Value = StatTag> {
        (0..StatTag::ALL.len()).prop_map(|i| StatTag::ALL[i])
    }

    proptest! {
        #[test]
        fn total_equals_number_of_records(tags in prop::collection::vec(tag_strategy(), 0..64)) {
            let mut stats = ResolverStats::default();
            for &tag in &tags {
                stats.record(tag);
            }
            prop_assert_eq!(stats.total(), tags.len() as u64);
        }

        #[test]
        fn per_tag_count_matches_occurrences(tags in prop::collection::vec(tag_strategy(), 0..64)) {
            let mut stats = ResolverStats::default();
            for &tag in &tags {
                stats.record(tag);
            }
            for &tag in &StatTag::ALL {
                let expected = tags.iter().filter(|&&t| t == tag).count() as u64;
                prop_assert_eq!(stats.get(tag), expected);
            }
        }
    }
}
