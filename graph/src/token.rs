// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability token parsing.
//!
//! A capability token is a bare name (`foo`), a versioned constraint
//! (`foo >= 1.2`), or an absolute file path (`/usr/bin/foo`).

/// Strips a trailing version constraint off a capability token by splitting on the
/// first occurrence of a space, `<`, `=`, or `>` and keeping the left part.
///
/// ```
/// assert_eq!(pkgraph::token::strip_version("foo >= 1.2"), "foo");
/// assert_eq!(pkgraph::token::strip_version("foo=1.2"), "foo");
/// assert_eq!(pkgraph::token::strip_version("foo"), "foo");
/// assert_eq!(pkgraph::token::strip_version("/usr/bin/foo"), "/usr/bin/foo");
/// ```
pub fn strip_version(token: &str) -> &str {
    let end = token
        .find(|c: char| c == ' ' || c == '<' || c == '=' || c == '>')
        .unwrap_or(token.len());
    &token[..end]
}

/// Returns true if a (already-stripped) token names an absolute file path.
pub fn is_file_token(token: &str) -> bool {
    token.starts_with('/')
}
