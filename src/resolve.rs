// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Alias-chain resolution.
//!
//! The renderer, the suggestion filter, and the listing view all call [`resolve`];
//! the three surfaces must agree on which names count as displayable.

use std::collections::HashSet;
use std::fmt;

use crate::model::catalog::{is_terminal_url, Catalog, ALIAS_PREFIX};
use crate::model::shortcode::ShortcodeName;

/// Upper bound on alias hops before resolution gives up.
pub const MAX_ALIAS_HOPS: usize = 10;

/// Resolves a shortcode name to a terminal image URL, or `None`.
///
/// Total and pure: never panics, never mutates the catalog, and identical inputs
/// always produce identical results. Every failure class collapses to `None`;
/// callers on the render path must not distinguish them.
pub fn resolve<'a>(name: &str, catalog: &'a Catalog) -> Option<&'a str> {
    resolve_detailed(name, catalog).ok()
}

/// [`resolve`] with the failure class preserved for diagnostics.
///
/// The class must never surface in rendered output; it exists so hosts can count
/// or log cycles and dangling aliases.
pub fn resolve_detailed<'a>(
    name: &str,
    catalog: &'a Catalog,
) -> Result<&'a str, ResolveFailure> {
    let Some(mut value) = catalog.get(name) else {
        return Err(ResolveFailure::NotFound);
    };

    let mut current = name;
    let mut visited: HashSet<&str> = HashSet::new();

    // The query name itself is only marked visited once it takes a hop, so a
    // direct terminal value can never be mistaken for a cycle.
    while visited.len() < MAX_ALIAS_HOPS {
        if is_terminal_url(value) {
            return Ok(value);
        }

        if visited.contains(current) {
            return Err(ResolveFailure::Cycle {
                at: ShortcodeName::new(current),
            });
        }

        if let Some(target) = value.strip_prefix(ALIAS_PREFIX) {
            let Some(next) = catalog.get(target) else {
                return Err(ResolveFailure::DanglingAlias {
                    target: ShortcodeName::new(target),
                });
            };
            visited.insert(current);
            current = target;
            value = next;
            continue;
        }

        // Bare-name self-reference: the value is itself a catalog key.
        if let Some(next) = catalog.get(value) {
            visited.insert(current);
            current = value;
            value = next;
            continue;
        }

        break;
    }

    if is_terminal_url(value) {
        Ok(value)
    } else {
        Err(ResolveFailure::Unresolvable)
    }
}

/// Why a name failed to resolve. Diagnostic only; all classes render as absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFailure {
    /// The catalog has no entry for the queried name.
    NotFound,
    /// The chain revisited a name it had already passed through.
    Cycle { at: ShortcodeName },
    /// An `alias:` entry points at a name absent from the catalog.
    DanglingAlias { target: ShortcodeName },
    /// The chain ended on a value that is neither a URL, an alias, nor a key,
    /// or ran out of hops.
    Unresolvable,
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("name not found in catalog"),
            Self::Cycle { at } => write!(f, "circular alias detected at '{at}'"),
            Self::DanglingAlias { target } => {
                write!(f, "alias target '{target}' not found in catalog")
            }
            Self::Unresolvable => f.write_str("entry does not resolve to an image URL"),
        }
    }
}

impl std::error::Error for ResolveFailure {}

#[cfg(test)]
mod tests {
    use super::{resolve, resolve_detailed, ResolveFailure, MAX_ALIAS_HOPS};
    use crate::model::{Catalog, ShortcodeName};

    fn catalog(entries: &[(&str, &str)]) -> Catalog {
        entries.iter().copied().collect()
    }

    #[test]
    fn direct_url_resolves() {
        let catalog = catalog(&[("a", "http://x/a.png")]);
        assert_eq!(resolve("a", &catalog), Some("http://x/a.png"));
    }

    #[test]
    fn data_uri_is_terminal() {
        let catalog = catalog(&[("dot", "data:image/png;base64,AAAA")]);
        assert_eq!(resolve("dot", &catalog), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn missing_name_is_not_found() {
        let catalog = catalog(&[("a", "http://x/a.png")]);
        assert_eq!(
            resolve_detailed("b", &catalog),
            Err(ResolveFailure::NotFound)
        );
    }

    #[test]
    fn alias_prefix_chain_resolves() {
        let catalog = catalog(&[("a", "alias:b"), ("b", "alias:c"), ("c", "http://x/c.png")]);
        assert_eq!(resolve("a", &catalog), Some("http://x/c.png"));
    }

    #[test]
    fn bare_name_reference_resolves() {
        let catalog = catalog(&[("thumbs", "thumbsup"), ("thumbsup", "http://x/up.png")]);
        assert_eq!(resolve("thumbs", &catalog), Some("http://x/up.png"));
    }

    #[test]
    fn mixed_alias_and_bare_chain_resolves() {
        let catalog = catalog(&[
            ("a", "alias:b"),
            ("b", "c"),
            ("c", "http://x/c.png"),
        ]);
        assert_eq!(resolve("a", &catalog), Some("http://x/c.png"));
    }

    #[test]
    fn two_node_cycle_fails() {
        let catalog = catalog(&[("a", "alias:b"), ("b", "alias:a")]);
        assert_eq!(resolve("a", &catalog), None);
        assert!(matches!(
            resolve_detailed("a", &catalog),
            Err(ResolveFailure::Cycle { .. })
        ));
    }

    #[test]
    fn self_cycle_fails() {
        let catalog = catalog(&[("a", "alias:a")]);
        assert!(matches!(
            resolve_detailed("a", &catalog),
            Err(ResolveFailure::Cycle { at }) if at == ShortcodeName::new("a")
        ));
    }

    #[test]
    fn bare_name_cycle_fails() {
        let catalog = catalog(&[("a", "b"), ("b", "a")]);
        assert_eq!(resolve("a", &catalog), None);
    }

    #[test]
    fn dangling_alias_fails() {
        let catalog = catalog(&[("a", "alias:ghost")]);
        assert_eq!(
            resolve_detailed("a", &catalog),
            Err(ResolveFailure::DanglingAlias {
                target: ShortcodeName::new("ghost")
            })
        );
    }

    #[test]
    fn malformed_value_fails_without_error() {
        let catalog = catalog(&[("a", "not a url and not a key")]);
        assert_eq!(
            resolve_detailed("a", &catalog),
            Err(ResolveFailure::Unresolvable)
        );
    }

    #[test]
    fn chain_of_nine_hops_to_terminal_resolves() {
        let mut entries: Vec<(String, String)> = Vec::new();
        for hop in 0..9 {
            entries.push((format!("n{hop}"), format!("alias:n{}", hop + 1)));
        }
        entries.push(("n9".to_owned(), "http://x/end.png".to_owned()));
        let catalog: Catalog = entries.into_iter().collect();

        assert_eq!(resolve("n0", &catalog), Some("http://x/end.png"));
    }

    #[test]
    fn unterminated_chain_hits_hop_limit() {
        let mut entries: Vec<(String, String)> = Vec::new();
        for hop in 0..30 {
            entries.push((format!("n{hop}"), format!("alias:n{}", hop + 1)));
        }
        entries.push(("n30".to_owned(), "also-not-a-url".to_owned()));
        let catalog: Catalog = entries.into_iter().collect();

        assert_eq!(resolve("n0", &catalog), None);
        assert!(MAX_ALIAS_HOPS < 30);
    }

    #[test]
    fn resolution_is_pure() {
        let catalog = catalog(&[("a", "alias:b"), ("b", "http://x/b.png")]);
        let before = catalog.clone();
        let first = resolve("a", &catalog);
        let second = resolve("a", &catalog);
        assert_eq!(first, second);
        assert_eq!(catalog, before);
    }
}
