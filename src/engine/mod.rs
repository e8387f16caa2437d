// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Live renderer and suggestion controller.
//!
//! The engine owns all mutable feature state (catalog, enabled flag, processed-node
//! markers, active suggestion session) and mutates the host document from event
//! handlers. Resolution failures never escape as errors: unresolvable tokens stay
//! literal text.

use std::collections::HashSet;

use smol_str::SmolStr;

use crate::model::{Catalog, Document, NodeId};

pub mod edit_mode;
mod scan;
mod session;

pub use edit_mode::{default_matchers, EditMatcher};
pub use session::{CaretMetrics, SuggestionSession};

/// Class stamped on every inline image the renderer inserts.
pub const EMOJI_CLASS: &str = "galatea-emoji";
/// Class of the floating suggestion overlay root.
pub const OVERLAY_CLASS: &str = "galatea-suggestions";
/// Class of one row inside the overlay.
pub const ITEM_CLASS: &str = "suggestion-item";
/// Class marking the currently selected overlay row.
pub const SELECTED_CLASS: &str = "selected";
/// Attribute excluding a subtree from the passive scan.
pub const EXEMPT_ATTR: &str = "data-galatea-exempt";

/// Keys the engine cares about while a suggestion session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Tab,
    Escape,
}

/// Result of feeding a key to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The key was handled and must not reach the host's own editing.
    pub consumed: bool,
    /// A suggestion was committed; the host should re-dispatch an input event.
    pub committed: Option<CommitNotice>,
}

/// Synthesized change notification after a programmatic text commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitNotice {
    pub field: NodeId,
    pub inserted: SmolStr,
}

/// The live renderer / suggestion controller.
///
/// Single-owner by construction: handlers take `&mut self` plus the document, so
/// there are never concurrent writers to catalog, session, or marker state.
pub struct Engine {
    catalog: Catalog,
    enabled: bool,
    processed: HashSet<NodeId>,
    session: Option<SuggestionSession>,
    matchers: Vec<Box<dyn EditMatcher>>,
    metrics: CaretMetrics,
}

impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            enabled: true,
            processed: HashSet::new(),
            session: None,
            matchers: default_matchers(),
            metrics: CaretMetrics::default(),
        }
    }

    pub fn with_matchers(mut self, matchers: Vec<Box<dyn EditMatcher>>) -> Self {
        self.matchers = matchers;
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> Option<&SuggestionSession> {
        self.session.as_ref()
    }

    pub(crate) fn metrics(&self) -> &CaretMetrics {
        &self.metrics
    }

    /// Catalog names that resolve to a displayable image, in catalog order.
    ///
    /// This is the candidate set for ranking; the listing surface uses the same
    /// filter so all surfaces agree on what counts as a valid emoji.
    pub fn resolvable_names(&self) -> Vec<SmolStr> {
        self.catalog
            .names()
            .filter(|name| crate::resolve::resolve(name.as_str(), &self.catalog).is_some())
            .map(|name| SmolStr::new(name.as_str()))
            .collect()
    }

    /// Initial pass over a document the engine was just attached to.
    pub fn document_ready(&mut self, doc: &mut Document) {
        if self.enabled {
            self.scan_all(doc);
        }
    }

    /// Mutation notification: these nodes were just inserted into the tree.
    pub fn nodes_added(&mut self, doc: &mut Document, added: &[NodeId]) {
        if !self.enabled {
            return;
        }
        for &node in added {
            self.process_node(doc, node);
        }
    }

    /// Wholesale catalog replacement. Idempotent to repeat delivery.
    ///
    /// Replacement is one assignment; the marker set is invalidated afterwards so
    /// the next scan sees every node against the new mapping.
    pub fn catalog_updated(&mut self, doc: &mut Document, catalog: Catalog) {
        self.catalog = catalog;
        self.processed.clear();
        if self.enabled {
            self.scan_all(doc);
        }
    }

    /// Feature toggle. Idempotent to repeat delivery.
    ///
    /// Disabling reverses every inline substitution and drops the overlay;
    /// enabling rescans from scratch.
    pub fn set_enabled(&mut self, doc: &mut Document, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.processed.clear();
            self.scan_all(doc);
        } else {
            self.close_session(doc);
            let root = doc.root();
            self.revert_under(doc, root);
            self.processed.clear();
        }
    }

    /// Settled input event: the host has applied the edit and re-read the caret.
    ///
    /// A trailing unterminated `:partial` before the caret opens or refreshes the
    /// suggestion session; anything else closes it. Stale deliveries for removed
    /// or non-editable nodes only ever close state, never resurrect it.
    pub fn input_settled(&mut self, doc: &mut Document, field: NodeId) {
        if !self.enabled {
            return;
        }
        let Some(input) = doc.input(field).cloned() else {
            if self.session.as_ref().is_some_and(|s| s.field() == field) {
                self.close_session(doc);
            }
            return;
        };
        self.track_input(doc, field, &input.value, input.caret);
    }

    /// Key event, capture-phase. Only meaningful while a session is open.
    pub fn key_pressed(&mut self, doc: &mut Document, key: Key) -> KeyOutcome {
        self.handle_session_key(doc, key)
    }

    /// Pointer hover over `node` moves the overlay selection when applicable.
    pub fn pointer_hover(&mut self, doc: &mut Document, node: NodeId) {
        self.hover_suggestion(doc, node);
    }

    /// Pointer press on `node`.
    ///
    /// Inside the overlay this commits the pressed row; outside it closes any open
    /// session, and an edit affordance additionally reverts its content region so
    /// the user edits literal markup, not substituted images.
    pub fn pointer_press(&mut self, doc: &mut Document, node: NodeId) -> Option<CommitNotice> {
        if let Some(notice) = self.press_suggestion(doc, node) {
            return Some(notice);
        }
        if self.session.is_some() {
            self.close_session(doc);
        }
        if self.enabled {
            self.handle_edit_affordance(doc, node);
        }
        None
    }

    /// Focus entered `node`: editable targets get their region reverted first.
    pub fn focus_entered(&mut self, doc: &mut Document, node: NodeId) {
        if !self.enabled {
            return;
        }
        if edit_mode::is_editable_element(doc, node) {
            self.revert_under(doc, node);
        }
    }

    /// Deferred counterpart of [`Engine::focus_entered`]: the host calls this
    /// after focus left an editable region and its own handlers settled.
    pub fn reprocess(&mut self, doc: &mut Document, node: NodeId) {
        if !self.enabled {
            return;
        }
        for id in doc.descendants(node) {
            self.processed.remove(&id);
        }
        self.process_node(doc, node);
    }

    /// Deferred second pass after an edit affordance press: the host page has had
    /// time to swap in its editor; revert whatever landed inside it.
    pub fn revert_active_edit_area(&mut self, doc: &mut Document, region: NodeId) {
        if !self.enabled {
            return;
        }
        if let Some(area) = edit_mode::find_active_edit_area(doc, region) {
            self.revert_under(doc, area);
        }
    }

    fn handle_edit_affordance(&mut self, doc: &mut Document, node: NodeId) {
        if !self.matchers.iter().any(|matcher| matcher.is_edit_affordance(doc, node)) {
            return;
        }
        // Region lookup consults every strategy in order; the generic fallback
        // only answers when the class-based lookups found nothing.
        let region = self
            .matchers
            .iter()
            .find_map(|matcher| matcher.content_region(doc, node));
        if let Some(region) = region {
            self.revert_under(doc, region);
        }
    }

    pub(crate) fn is_processed(&self, node: NodeId) -> bool {
        self.processed.contains(&node)
    }

    pub(crate) fn mark_processed(&mut self, node: NodeId) {
        self.processed.insert(node);
    }
}
