// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Oracle interface: the read-only, transaction-simulating view of the package
//! universe that the core consumes. A real implementation talks to a repository
//! metadata backend; `pkgraph-fixtures` provides an in-memory one for tests.

use std::error;
use std::fmt;

use crate::package::Package;

/// The simulated install failed outright: the token isn't installable at all.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MarkingError;

impl fmt::Display for MarkingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("marking error: token is not installable")
    }
}

impl error::Error for MarkingError {}

/// The simulated install was marked successfully, but the dependency solver could not
/// produce a consistent transaction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DepsolveError;

impl fmt::Display for DepsolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("depsolve error: no consistent transaction")
    }
}

impl error::Error for DepsolveError {}

/// Read-only view of the package universe, plus a transaction simulator.
///
/// Implementations own whatever mutable "solver goal" state a real dependency solver
/// needs; `reset_goal` must always succeed and must be idempotent. Every path through
/// [`crate::resolver::CapabilityResolver`]'s transaction fallback calls `reset_goal`
/// exactly once, on every exit path, via an RAII guard — see `resolver.rs`.
pub trait Oracle {
    /// All available packages, in a fixed, reproducible order.
    fn iterate_available(&self) -> Vec<Package>;

    /// Packages whose name equals `name`, scoped to the primary repository.
    fn filter_by_name(&self, name: &str) -> Vec<Package>;

    /// Packages whose provides list contains `token`, scoped to the primary
    /// repository.
    fn filter_by_provides(&self, token: &str) -> Vec<Package>;

    /// Packages whose files set contains `path`, scoped to the primary repository.
    fn filter_by_file(&self, path: &str) -> Vec<Package>;

    /// As `filter_by_provides`, but restricted to `install_set`.
    fn filter_by_provides_within(&self, token: &str, install_set: &[Package]) -> Vec<Package>;

    /// As `filter_by_file`, but restricted to `install_set`.
    fn filter_by_file_within(&self, path: &str, install_set: &[Package]) -> Vec<Package>;

    /// Marks `token` for install in the current solver goal.
    fn try_install(&mut self, token: &str) -> Result<(), MarkingError>;

    /// Marks a specific package for install in the current solver goal.
    fn try_install_package(&mut self, package: &Package) -> Result<(), MarkingError>;

    /// Runs the dependency solver against the current goal and returns the resulting
    /// install set.
    fn resolve_transaction(&mut self) -> Result<Vec<Package>, DepsolveError>;

    /// Clears the current solver goal. Always succeeds; idempotent.
    fn reset_goal(&mut self);
}
