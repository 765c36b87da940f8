// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds and queries a dependency graph over a package ecosystem in which binary
//! packages (installable, with provides/requires) and source packages (build inputs
//! that produce binaries and build-require other binaries) coexist.
//!
//! The hard part is [`resolver::CapabilityResolver`]: mapping a capability token
//! (a name, a versioned constraint, or an absolute file path) onto a single concrete
//! binary package, falling back to a transaction solver when simpler probes don't
//! produce a unique answer. [`graph::GraphBuilder`] drives that resolver once per
//! package in the universe to produce a [`graph::PackageGraph`], which in turn
//! supports radius-bounded neighborhood queries.
//!
//! # Example
//!
//! ```
//! use pkgraph::graph::{EdgeColor, GraphBuilder, NeighborhoodDirection};
//! use pkgraph::oracle::{DepsolveError, MarkingError, Oracle};
//! use pkgraph::package::Package;
//! use indexmap::IndexSet;
//!
//! # struct ToyOracle { packages: Vec<Package> }
//! # impl Oracle for ToyOracle {
//! #     fn iterate_available(&self) -> Vec<Package> { self.packages.clone() }
//! #     fn filter_by_name(&self, name: &str) -> Vec<Package> {
//! #         self.packages.iter().filter(|p| p.name() == name).cloned().collect()
//! #     }
//! #     fn filter_by_provides(&self, token: &str) -> Vec<Package> {
//! #         self.packages.iter().filter(|p| p.provides().iter().any(|pr| pr.as_ref() == token)).cloned().collect()
//! #     }
//! #     fn filter_by_file(&self, _path: &str) -> Vec<Package> { vec![] }
//! #     fn filter_by_provides_within(&self, _token: &str, _set: &[Package]) -> Vec<Package> { vec![] }
//! #     fn filter_by_file_within(&self, _path: &str, _set: &[Package]) -> Vec<Package> { vec![] }
//! #     fn try_install(&mut self, _token: &str) -> Result<(), MarkingError> { Err(MarkingError) }
//! #     fn try_install_package(&mut self, _package: &Package) -> Result<(), MarkingError> { Err(MarkingError) }
//! #     fn resolve_transaction(&mut self) -> Result<Vec<Package>, DepsolveError> { Err(DepsolveError) }
//! #     fn reset_goal(&mut self) {}
//! # }
//! let bin = Package::binary("libfoo", "libfoo-src", vec!["libfoo".into()], vec![], IndexSet::new());
//! let src = Package::source("libfoo-src", vec!["libfoo".into()], vec![], IndexSet::new());
//! let oracle = ToyOracle { packages: vec![src, bin] };
//!
//! let mut builder = GraphBuilder::new(oracle);
//! let graph = builder.build().unwrap();
//! assert!(graph.edges().any(|(_, _, color)| color == EdgeColor::Blue));
//!
//! let neighborhood = graph.neighborhood("libfoo-src", 1, NeighborhoodDirection::Directed).unwrap();
//! assert!(neighborhood.contains_node("libfoo"));
//! ```

#![warn(missing_docs)]

pub mod errors;
pub mod extractor;
pub mod graph;
pub mod oracle;
pub mod package;
pub mod resolver;
pub mod stats;
pub mod token;

pub use errors::Error;
pub use graph::PackageGraph;
pub use package::Package;
