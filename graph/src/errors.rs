// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contains the error type returned by `pkgraph`.

use std::error;
use std::fmt;

use Error::*;

/// Error type describing the sorts of errors `pkgraph` can return.
///
/// Only the conditions in `spec.md` §7 tagged "fatal" ever surface here: unresolved
/// capabilities and solver refusals are counted by [`crate::stats::ResolverStats`]
/// instead of raised.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A source package's build-requires (or a binary's runtime-requires) resolved to
    /// another source package. The ontology guarantees this never happens; seeing it
    /// means the Oracle's data is inconsistent with the core's assumptions.
    SourceRequiresSource {
        /// The source package whose requires list produced the violation.
        package: Box<str>,
        /// The source package it was resolved to.
        provider: Box<str>,
    },
    /// Every probe, including the final install-set sweep, failed to resolve a
    /// capability token that the transaction fallback had already agreed was
    /// installable.
    ResolutionExhausted {
        /// The capability token that could not be resolved.
        token: Box<str>,
    },
    /// A package name was not known to the graph this query was run against.
    UnknownPackage(Box<str>),
    /// `GraphBuilder::build` was called while a build was already in progress.
    ConcurrentBuild,
    /// `GraphBuilder::build` was called on a builder that already produced a graph.
    BuilderAlreadyDone,
}

impl Error {
    pub(crate) fn source_requires_source(package: &str, provider: &str) -> Self {
        SourceRequiresSource {
            package: package.into(),
            provider: provider.into(),
        }
    }

    pub(crate) fn resolution_exhausted(token: &str) -> Self {
        ResolutionExhausted {
            token: token.into(),
        }
    }

    pub(crate) fn unknown_package(name: &str) -> Self {
        UnknownPackage(name.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRequiresSource { package, provider } => write!(
                f,
                "ontology violation: source package '{}' cannot require source package '{}'",
                package, provider
            ),
            ResolutionExhausted { token } => write!(
                f,
                "resolution exhausted: no probe could resolve capability token '{}'",
                token
            ),
            UnknownPackage(name) => write!(f, "unknown package: '{}'", name),
            ConcurrentBuild => write!(f, "concurrent build() calls on the same GraphBuilder"),
            BuilderAlreadyDone => write!(f, "build() called on a GraphBuilder that is already done"),
        }
    }
}

impl error::Error for Error {}
