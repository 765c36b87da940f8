// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reads a package universe from a JSON dump file, the CLI's substitute for talking
//! to a real repository metadata backend.
//!
//! The on-disk shape is deliberately close to the in-memory [`pkgraph::package::Package`]
//! record plus [`pkgraph_fixtures::InMemoryOracle`]'s configurable transaction
//! outcomes, so a dump can encode any of the scenarios in `pkgraph-fixtures` as plain
//! JSON.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexSet;
use serde::Deserialize;

use pkgraph::package::Package;
use pkgraph_fixtures::InMemoryOracle;

#[derive(Debug, Deserialize)]
struct PackageDump {
    packages: Vec<PackageDef>,
    #[serde(default)]
    installs: Vec<InstallDef>,
}

#[derive(Debug, Deserialize)]
struct PackageDef {
    name: String,
    #[serde(default)]
    is_source: bool,
    source_name: Option<String>,
    #[serde(default)]
    provides: Vec<String>,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum InstallDef {
    NotInstallable { token: String },
    DepsolveFailure { token: String },
    Installs { token: String, packages: Vec<String> },
}

/// Loads an [`InMemoryOracle`] from a JSON dump at `path`.
///
/// Package names referenced from an `installs` entry must appear among
/// `packages`; this is checked eagerly so a malformed dump fails before any graph
/// building starts, not mid-build.
pub fn load_oracle(path: &Path) -> Result<InMemoryOracle> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading package dump at {}", path.display()))?;
    let dump: PackageDump = serde_json::from_str(&raw)
        .with_context(|| format!("parsing package dump at {}", path.display()))?;

    let mut by_name: HashMap<String, Package> = HashMap::new();
    let mut packages = Vec::with_capacity(dump.packages.len());
    for def in &dump.packages {
        let files: IndexSet<Box<str>> = def.files.iter().map(|f| f.as_str().into()).collect();
        let provides: Vec<Box<str>> = def.provides.iter().map(|p| p.as_str().into()).collect();
        let requires: Vec<Box<str>> = def.requires.iter().map(|r| r.as_str().into()).collect();

        let package = if def.is_source {
            Package::source(def.name.as_str(), provides, requires, files)
        } else {
            let source_name = def
                .source_name
                .as_deref()
                .with_context(|| format!("binary package '{}' is missing source_name", def.name))?;
            Package::binary(def.name.as_str(), source_name, provides, requires, files)
        };

        by_name.insert(def.name.clone(), package.clone());
        packages.push(package);
    }

    let mut oracle = InMemoryOracle::new(packages);
    for install in dump.installs {
        oracle = match install {
            InstallDef::NotInstallable { token } => oracle.not_installable(token),
            InstallDef::DepsolveFailure { token } => oracle.depsolve_failure(token),
            InstallDef::Installs { token, packages } => {
                let mut set = Vec::with_capacity(packages.len());
                for name in &packages {
                    let package = by_name
                        .get(name)
                        .with_context(|| format!("installs entry references unknown package '{}'", name))?;
                    set.push(package.clone());
                }
                oracle.installable(token, set)
            }
        };
    }

    if dump.packages.is_empty() {
        bail!("package dump at {} has no packages", path.display());
    }

    Ok(oracle)
}
