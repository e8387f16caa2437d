// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edit-affordance detection.
//!
//! Host pages swap rendered content for editable forms in wildly different
//! markup. Detection is an ordered list of matcher strategies so new site
//! patterns are additive; the engine asks each in turn for "is this an edit
//! affordance" and "which content region belongs to it".

use crate::model::{Document, NodeId};

/// One detection strategy.
pub trait EditMatcher {
    /// Whether the pressed node is (or sits inside) an edit affordance.
    fn is_edit_affordance(&self, doc: &Document, node: NodeId) -> bool;

    /// The content region the affordance would make editable.
    fn content_region(&self, doc: &Document, affordance: NodeId) -> Option<NodeId>;
}

/// The built-in strategy order: verb labels, site-specific markup, then the
/// generic contains-an-editable-field fallback.
pub fn default_matchers() -> Vec<Box<dyn EditMatcher>> {
    vec![
        Box::new(VerbLabelMatcher::default()),
        Box::new(SiteMarkupMatcher),
        Box::new(EditableFieldFallback),
    ]
}

const BUTTON_TAGS: &[&str] = &["button", "a"];

/// Known content-region classes, exact match.
const CONTENT_CLASSES: &[&str] = &[
    "comment-body",
    "js-comment-body",
    "markdown-body",
    "messageContent",
    "markup",
    "md",
    "usertext-body",
    "c-message__body",
    "p-rich_text_section",
    "tweet-text",
];

/// Generic content-region class fragments, substring match.
const CONTENT_CLASS_FRAGMENTS: &[&str] = &["content", "message", "comment", "post"];

/// Class fragments that mark an element as an editor area.
const EDIT_AREA_CLASS_FRAGMENTS: &[&str] =
    &["ql-editor", "tox-edit-area", "CodeMirror", "editor", "input"];

fn is_button_like(doc: &Document, node: NodeId) -> bool {
    doc.tag(node).is_some_and(|tag| BUTTON_TAGS.contains(&tag))
        || doc.attr(node, "role") == Some("button")
}

fn closest_button(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.closest(node, is_button_like)
}

/// Concatenated descendant text, lowercased.
fn text_content_lower(doc: &Document, node: NodeId) -> String {
    doc.text_nodes_under(node)
        .into_iter()
        .filter_map(|text| doc.text(text))
        .collect::<String>()
        .to_lowercase()
}

fn attr_lower(doc: &Document, node: NodeId, name: &str) -> String {
    doc.attr(node, name).unwrap_or_default().to_lowercase()
}

fn is_content_region(doc: &Document, node: NodeId) -> bool {
    let Some(element) = doc.get(node).and_then(|n| n.as_element()) else {
        return false;
    };
    element.classes().any(|class| {
        CONTENT_CLASSES.contains(&class)
            || CONTENT_CLASS_FRAGMENTS
                .iter()
                .any(|fragment| class.contains(fragment))
    })
}

/// Walks up from the affordance looking for a descendant content region of each
/// ancestor, nearest ancestor first.
fn find_content_region(doc: &Document, affordance: NodeId) -> Option<NodeId> {
    let mut current = doc.parent(affordance);
    while let Some(ancestor) = current {
        let hit = doc
            .descendants(ancestor)
            .into_iter()
            .find(|&node| is_content_region(doc, node));
        if hit.is_some() {
            return hit;
        }
        current = doc.parent(ancestor);
    }
    None
}

/// Whether the node is an editable control in its own right.
pub fn is_editable_element(doc: &Document, node: NodeId) -> bool {
    let Some(tag) = doc.tag(node) else {
        return false;
    };
    tag == "textarea"
        || (tag == "input" && doc.attr(node, "type") == Some("text"))
        || doc.attr(node, "contenteditable").is_some()
}

pub(crate) fn has_editable_descendants(doc: &Document, node: NodeId) -> bool {
    doc.descendants(node)
        .into_iter()
        .any(|id| id != node && is_editable_element(doc, id))
}

/// The editor control inside a region that just entered edit mode.
pub(crate) fn find_active_edit_area(doc: &Document, region: NodeId) -> Option<NodeId> {
    doc.descendants(region).into_iter().find(|&node| {
        is_editable_element(doc, node)
            || doc.attr(node, "role") == Some("textbox")
            || doc
                .get(node)
                .and_then(|n| n.as_element())
                .is_some_and(|element| {
                    element.classes().any(|class| {
                        EDIT_AREA_CLASS_FRAGMENTS
                            .iter()
                            .any(|fragment| class.contains(fragment))
                    })
                })
    })
}

/// Verb-text detection: button/label text, title, or aria-label naming a known
/// edit verb in any supported language.
pub struct VerbLabelMatcher {
    verbs: Vec<String>,
}

impl Default for VerbLabelMatcher {
    fn default() -> Self {
        Self {
            verbs: ["edit", "編集", "修改"].map(str::to_owned).to_vec(),
        }
    }
}

impl VerbLabelMatcher {
    pub fn new(verbs: Vec<String>) -> Self {
        Self { verbs }
    }
}

impl EditMatcher for VerbLabelMatcher {
    fn is_edit_affordance(&self, doc: &Document, node: NodeId) -> bool {
        let Some(button) = closest_button(doc, node) else {
            return false;
        };
        let text = text_content_lower(doc, button);
        let title = attr_lower(doc, button, "title");
        let aria = attr_lower(doc, button, "aria-label");
        self.verbs.iter().any(|verb| {
            let verb = verb.to_lowercase();
            text.contains(&verb) || title.contains(&verb) || aria.contains(&verb)
        })
    }

    fn content_region(&self, doc: &Document, affordance: NodeId) -> Option<NodeId> {
        find_content_region(doc, affordance)
    }
}

/// Site-specific markup patterns: known edit-button classes, pencil icons,
/// tooltip labels.
pub struct SiteMarkupMatcher;

impl EditMatcher for SiteMarkupMatcher {
    fn is_edit_affordance(&self, doc: &Document, node: NodeId) -> bool {
        let Some(button) = closest_button(doc, node) else {
            return false;
        };

        if doc.has_class(button, "js-comment-edit-button") {
            return true;
        }

        let has_icon = doc.descendants(button).into_iter().any(|id| {
            doc.attr(id, "data-octicon") == Some("pencil")
                || doc
                    .get(id)
                    .and_then(|n| n.as_element())
                    .is_some_and(|element| {
                        element
                            .classes()
                            .any(|class| class.contains("edit") || class.contains("pencil"))
                    })
        });
        if has_icon {
            return true;
        }

        attr_lower(doc, button, "aria-label").contains("edit")
            || attr_lower(doc, button, "data-tooltip").contains("edit")
    }

    fn content_region(&self, doc: &Document, affordance: NodeId) -> Option<NodeId> {
        find_content_region(doc, affordance)
    }
}

/// Fallback: no affordance opinion of its own, but locates the nearest ancestor
/// that contains an editable control when the class-based lookup found nothing.
pub struct EditableFieldFallback;

impl EditMatcher for EditableFieldFallback {
    fn is_edit_affordance(&self, _doc: &Document, _node: NodeId) -> bool {
        false
    }

    fn content_region(&self, doc: &Document, affordance: NodeId) -> Option<NodeId> {
        let mut current = doc.parent(affordance);
        while let Some(ancestor) = current {
            if has_editable_descendants(doc, ancestor) {
                return Some(ancestor);
            }
            current = doc.parent(ancestor);
        }
        None
    }
}
