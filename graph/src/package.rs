// SPDX-License-Identifier: MIT OR Apache-2.0

//! The package data model.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexSet;

/// An immutable package record.
///
/// `is_source` is a tag, not a subtype: a source package and a binary package share
/// this one representation rather than living in a class hierarchy. Binary packages
/// carry a `source_name` pointing back to the source package that produced them;
/// source packages leave it unset.
///
/// `Package` is a cheaply-clonable handle (an `Arc` around the immutable data).
/// Equality and hashing are by *identity*, not by name: two packages can legitimately
/// share a name (e.g. two builds of the same source at different versions), and the
/// resolver's deduplication logic operates explicitly on `name()`, not on `Package`
/// identity.
#[derive(Clone)]
pub struct Package(Arc<PackageData>);

struct PackageData {
    name: Box<str>,
    is_source: bool,
    source_name: Option<Box<str>>,
    provides: Vec<Box<str>>,
    requires: Vec<Box<str>>,
    files: IndexSet<Box<str>>,
}

impl Package {
    /// Builds a new package record.
    pub fn new(
        name: impl Into<Box<str>>,
        is_source: bool,
        source_name: Option<Box<str>>,
        provides: Vec<Box<str>>,
        requires: Vec<Box<str>>,
        files: IndexSet<Box<str>>,
    ) -> Self {
        Package(Arc::new(PackageData {
            name: name.into(),
            is_source,
            source_name,
            provides,
            requires,
            files,
        }))
    }

    /// A convenience constructor for a source package.
    pub fn source(
        name: impl Into<Box<str>>,
        provides: Vec<Box<str>>,
        requires: Vec<Box<str>>,
        files: IndexSet<Box<str>>,
    ) -> Self {
        Self::new(name, true, None, provides, requires, files)
    }

    /// A convenience constructor for a binary package.
    pub fn binary(
        name: impl Into<Box<str>>,
        source_name: impl Into<Box<str>>,
        provides: Vec<Box<str>>,
        requires: Vec<Box<str>>,
        files: IndexSet<Box<str>>,
    ) -> Self {
        Self::new(
            name,
            false,
            Some(source_name.into()),
            provides,
            requires,
            files,
        )
    }

    /// The package's unique name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// True if this is a source package (a build input), false if it's a binary.
    pub fn is_source(&self) -> bool {
        self.0.is_source
    }

    /// For binary packages, the name of the source package that produced them.
    pub fn source_name(&self) -> Option<&str> {
        self.0.source_name.as_deref()
    }

    /// The ordered list of capability tokens this package advertises.
    pub fn provides(&self) -> &[Box<str>] {
        &self.0.provides
    }

    /// The ordered list of capability tokens this package requires (runtime for
    /// binaries, build-time for sources).
    pub fn requires(&self) -> &[Box<str>] {
        &self.0.requires
    }

    /// The set of absolute file paths this package owns.
    pub fn files(&self) -> &IndexSet<Box<str>> {
        &self.0.files
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Package {}

impl Hash for Package {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state)
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.0.name)
            .field("is_source", &self.0.is_source)
            .field("source_name", &self.0.source_name)
            .finish()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

/// Deduplicates a collection of packages, keeping the first package seen for each
/// distinct package *name* (not identity). Mirrors `lib.py::filter_duplicates`.
pub fn filter_duplicates(packages: Vec<Package>) -> Vec<Package> {
    let mut included = std::collections::HashSet::new();
    let mut res = Vec::new();
    for pkg in packages {
        if included.insert(pkg.name().to_owned()) {
            res.push(pkg);
        }
    }
    res
}

/// Returns true if any package in the set is a source package. Used for the optional
/// structural check described in `spec.md` §4.2 (`lib.py::contains_SRPM`).
pub fn contains_source<'a>(packages: impl IntoIterator<Item = &'a Package>) -> bool {
    packages.into_iter().any(|pkg| pkg.is_source())
}
