// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Passive substitution pass.
//!
//! Token grammar (bit-exact): a colon, one or more of `[A-Za-z0-9_+-]`, a colon.
//! Matching is global per text node; repeats are deduplicated before substitution
//! and every literal occurrence of a resolvable token is replaced.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::{Engine, EMOJI_CLASS, EXEMPT_ATTR, OVERLAY_CLASS};
use crate::model::{Document, NodeId};
use crate::resolve::resolve;

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r":([A-Za-z0-9_+-]+):").expect("token grammar compiles"))
}

/// Unique shortcode names found in `text`, in first-occurrence order.
pub(crate) fn shortcode_tokens(text: &str) -> SmallVec<[SmolStr; 4]> {
    let mut out: SmallVec<[SmolStr; 4]> = SmallVec::new();
    if memchr::memchr(b':', text.as_bytes()).is_none() {
        return out;
    }
    for captures in token_regex().captures_iter(text) {
        let name = &captures[1];
        if !out.iter().any(|seen| seen == name) {
            out.push(SmolStr::new(name));
        }
    }
    out
}

impl Engine {
    /// One full pass over every text node under the root.
    pub(crate) fn scan_all(&mut self, doc: &mut Document) {
        let root = doc.root();
        for node in doc.text_nodes_under(root) {
            self.scan_text_node(doc, node);
        }
    }

    /// Per-node scan used by the mutation path. Skips nodes already processed,
    /// anything inside the overlay, and exempt-marked subtrees.
    pub(crate) fn process_node(&mut self, doc: &mut Document, node: NodeId) {
        if self.is_processed(node) || is_exempt(doc, node) {
            return;
        }
        self.mark_processed(node);

        if doc.text(node).is_some() {
            self.substitute_text_node(doc, node);
            return;
        }
        for text_node in doc.text_nodes_under(node) {
            self.scan_text_node(doc, text_node);
        }
    }

    fn scan_text_node(&mut self, doc: &mut Document, node: NodeId) {
        if self.is_processed(node) || is_exempt(doc, node) {
            return;
        }
        self.mark_processed(node);
        self.substitute_text_node(doc, node);
    }

    /// Replaces every occurrence of each unique resolvable token in the node with
    /// an inline image carrying the token text as its alt label. Unresolvable
    /// tokens stay literal; a node without resolvable tokens is left untouched.
    fn substitute_text_node(&mut self, doc: &mut Document, node: NodeId) {
        let Some(text) = doc.text(node).map(str::to_owned) else {
            return;
        };

        let tokens = shortcode_tokens(&text);
        if tokens.is_empty() {
            return;
        }

        let mut resolved: HashMap<&str, &str> = HashMap::new();
        for name in &tokens {
            if let Some(url) = resolve(name, &self.catalog) {
                resolved.insert(name.as_str(), url);
            }
        }
        if resolved.is_empty() {
            return;
        }

        let Some(parent) = doc.parent(node) else {
            return;
        };

        let mut pending = String::new();
        let mut cursor = 0;
        let mut new_children: Vec<NodeId> = Vec::new();

        let matches: Vec<(usize, usize, SmolStr)> = token_regex()
            .captures_iter(&text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let name = captures.get(1)?.as_str();
                resolved
                    .contains_key(name)
                    .then(|| (whole.start(), whole.end(), SmolStr::new(name)))
            })
            .collect();

        for (start, end, name) in &matches {
            pending.push_str(&text[cursor..*start]);
            if !pending.is_empty() {
                new_children.push(doc.create_text(std::mem::take(&mut pending)));
            }
            let url = resolved.get(name.as_str()).copied().unwrap_or_default();
            new_children.push(create_emoji_image(doc, name, url));
            cursor = *end;
        }
        pending.push_str(&text[cursor..]);
        if !pending.is_empty() {
            new_children.push(doc.create_text(pending));
        }

        for &child in &new_children {
            doc.insert_before(parent, child, node);
            self.mark_processed(child);
        }
        doc.remove(node);
    }

    /// Reverses every substitution under `region`, restoring the literal token
    /// text each image was created from.
    pub(crate) fn revert_under(&mut self, doc: &mut Document, region: NodeId) -> usize {
        let images: Vec<NodeId> = doc
            .descendants(region)
            .into_iter()
            .filter(|&node| doc.has_class(node, EMOJI_CLASS))
            .collect();

        let mut reverted = 0;
        for image in images {
            let Some(parent) = doc.parent(image) else {
                continue;
            };
            let alt = doc.attr(image, "alt").unwrap_or_default().to_owned();
            let restored = doc.create_text(alt);
            doc.insert_before(parent, restored, image);
            doc.remove(image);
            reverted += 1;
        }
        reverted
    }
}

fn create_emoji_image(doc: &mut Document, name: &str, url: &str) -> NodeId {
    let token = format!(":{name}:");
    let image = doc.create_element("img");
    doc.set_attr(image, "src", url);
    doc.set_attr(image, "alt", token.clone());
    doc.set_attr(image, "title", token);
    doc.add_class(image, EMOJI_CLASS);
    image
}

/// Inside the overlay, or under a node carrying the exemption attribute.
pub(crate) fn is_exempt(doc: &Document, node: NodeId) -> bool {
    doc.closest(node, |doc, id| {
        doc.has_class(id, OVERLAY_CLASS) || doc.attr(id, EXEMPT_ATTR).is_some()
    })
    .is_some()
}

#[cfg(test)]
mod tests {
    use super::shortcode_tokens;

    #[test]
    fn finds_tokens_in_grammar() {
        let tokens = shortcode_tokens("hi :party: and :+1: and :a_b-c:");
        let names: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, ["party", "+1", "a_b-c"]);
    }

    #[test]
    fn deduplicates_repeats_in_first_occurrence_order() {
        let tokens = shortcode_tokens(":b: :a: :b: :a:");
        let names: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn rejects_out_of_grammar_text() {
        assert!(shortcode_tokens("no tokens here").is_empty());
        assert!(shortcode_tokens("::").is_empty());
        assert!(shortcode_tokens(":has space:").is_empty());
        assert!(shortcode_tokens("plain text without colons").is_empty());
    }

    #[test]
    fn colon_free_text_short_circuits() {
        assert!(shortcode_tokens("").is_empty());
        assert!(shortcode_tokens("abc").is_empty());
    }
}
