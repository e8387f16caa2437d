// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Suggestion sessions.
//!
//! One session per focused input: opened when the text before the caret ends in an
//! unterminated `:partial`, refreshed on every settled keystroke, torn down on
//! commit, Escape, caret escape, or outside interaction. A superseded session is
//! discarded wholesale (overlay removed), never patched in place.

use std::sync::OnceLock;

use regex::Regex;
use smol_str::SmolStr;

use super::{
    CommitNotice, Engine, Key, KeyOutcome, EXEMPT_ATTR, ITEM_CLASS, OVERLAY_CLASS, SELECTED_CLASS,
};
use crate::model::{Document, NodeId};
use crate::rank::{rank, DEFAULT_LIMIT};
use crate::resolve::resolve;

/// Vertical gap between the estimated caret position and the overlay, in px.
const OVERLAY_CARET_GAP: f64 = 20.0;

fn partial_token_regex() -> &'static Regex {
    static PARTIAL_RE: OnceLock<Regex> = OnceLock::new();
    PARTIAL_RE.get_or_init(|| {
        Regex::new(r":([A-Za-z0-9_+-]*)$").expect("partial token grammar compiles")
    })
}

/// Approximate text metrics used to anchor the overlay near the caret.
///
/// Deliberately an estimate (glyph width × column, line height × row), not a text
/// measurement pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CaretMetrics {
    pub font_size: f64,
}

impl Default for CaretMetrics {
    fn default() -> Self {
        Self { font_size: 14.0 }
    }
}

impl CaretMetrics {
    pub fn glyph_width(&self) -> f64 {
        self.font_size * 0.6
    }

    pub fn line_height(&self) -> f64 {
        self.font_size * 1.2
    }

    /// Estimated (x, y) pixel offset of the caret inside its field.
    pub fn caret_offset(&self, before_caret: &str) -> (f64, f64) {
        let lines: Vec<&str> = before_caret.split('\n').collect();
        let current_line = lines.last().copied().unwrap_or("");
        let column = current_line.chars().count() as f64;
        let row = (lines.len() - 1) as f64;
        (column * self.glyph_width(), row * self.line_height())
    }
}

/// Live autocomplete state for one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSession {
    field: NodeId,
    caret: usize,
    query: String,
    items: Vec<SmolStr>,
    selected: usize,
    overlay: NodeId,
}

impl SuggestionSession {
    pub fn field(&self) -> NodeId {
        self.field
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[SmolStr] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn overlay(&self) -> NodeId {
        self.overlay
    }
}

/// The unterminated shortcode prefix at the end of `before_caret`, if any.
///
/// Returns (char offset of the opening colon, partial name after it).
pub(crate) fn trailing_partial(before_caret: &str) -> Option<(usize, &str)> {
    let captures = partial_token_regex().captures(before_caret)?;
    let whole = captures.get(0)?;
    let start_chars = before_caret[..whole.start()].chars().count();
    Some((start_chars, captures.get(1).map(|m| m.as_str()).unwrap_or("")))
}

fn byte_offset_of_char(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(at, _)| at)
        .unwrap_or(text.len())
}

impl Engine {
    /// Core of the settled-input handler: decides between open/refresh/close.
    pub(crate) fn track_input(
        &mut self,
        doc: &mut Document,
        field: NodeId,
        value: &str,
        caret: usize,
    ) {
        let before_caret = &value[..byte_offset_of_char(value, caret)];
        match trailing_partial(before_caret) {
            Some((_, query)) => {
                let query = query.to_owned();
                self.open_session(doc, field, caret, before_caret.to_owned(), &query);
            }
            None => self.close_session(doc),
        }
    }

    fn open_session(
        &mut self,
        doc: &mut Document,
        field: NodeId,
        caret: usize,
        before_caret: String,
        query: &str,
    ) {
        // Rank against the resolvable subset only; aliases that do not terminate
        // in an image must never be suggested.
        let candidates = self.resolvable_names();
        let ranked = rank(query, &candidates, DEFAULT_LIMIT);

        self.close_session(doc);
        if ranked.is_empty() {
            return;
        }

        let items: Vec<SmolStr> = ranked.into_iter().map(|m| m.name).collect();
        let overlay = self.build_overlay(doc, field, &before_caret, &items);
        self.session.replace(SuggestionSession {
            field,
            caret,
            query: query.to_owned(),
            items,
            selected: 0,
            overlay,
        });
    }

    pub(crate) fn close_session(&mut self, doc: &mut Document) {
        if let Some(session) = self.session.take() {
            doc.remove(session.overlay());
        }
    }

    fn build_overlay(
        &self,
        doc: &mut Document,
        field: NodeId,
        before_caret: &str,
        items: &[SmolStr],
    ) -> NodeId {
        let overlay = doc.create_element("div");
        doc.add_class(overlay, OVERLAY_CLASS);
        doc.set_attr(overlay, EXEMPT_ATTR, "true");

        let (origin_x, origin_y) = field_origin(doc, field);
        let (caret_x, caret_y) = self.metrics().caret_offset(before_caret);
        doc.set_attr(
            overlay,
            "style",
            format!(
                "position:fixed;left:{:.1}px;top:{:.1}px",
                origin_x + caret_x,
                origin_y + caret_y + OVERLAY_CARET_GAP
            ),
        );

        for (index, name) in items.iter().enumerate() {
            let item = doc.create_element("div");
            doc.add_class(item, ITEM_CLASS);
            if index == 0 {
                doc.add_class(item, SELECTED_CLASS);
            }

            let icon = doc.create_element("img");
            if let Some(url) = resolve(name, self.catalog()) {
                doc.set_attr(icon, "src", url);
            }
            doc.set_attr(icon, "alt", format!(":{name}:"));
            doc.add_class(icon, "suggestion-icon");

            let label = doc.create_element("span");
            doc.add_class(label, "suggestion-name");
            let label_text = doc.create_text(format!(":{name}:"));
            doc.append_child(label, label_text);

            doc.append_child(item, icon);
            doc.append_child(item, label);
            doc.append_child(overlay, item);
        }

        let root = doc.root();
        doc.append_child(root, overlay);
        overlay
    }

    pub(crate) fn handle_session_key(&mut self, doc: &mut Document, key: Key) -> KeyOutcome {
        let Some(session) = self.session.as_ref() else {
            return KeyOutcome::default();
        };
        let count = session.items().len();
        let selected = session.selected();

        match key {
            Key::Down => {
                let next = if selected + 1 < count { selected + 1 } else { 0 };
                self.select_suggestion(doc, next);
                KeyOutcome { consumed: true, committed: None }
            }
            Key::Up => {
                let next = if selected > 0 { selected - 1 } else { count - 1 };
                self.select_suggestion(doc, next);
                KeyOutcome { consumed: true, committed: None }
            }
            Key::Enter | Key::Tab => {
                let committed = self.commit_selected(doc);
                KeyOutcome { consumed: true, committed }
            }
            Key::Escape => {
                self.close_session(doc);
                KeyOutcome { consumed: true, committed: None }
            }
        }
    }

    /// Moves the selection and mirrors it onto the overlay rows.
    pub(crate) fn select_suggestion(&mut self, doc: &mut Document, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if index >= session.items.len() {
            return;
        }
        session.selected = index;
        let overlay = session.overlay;

        let rows: Vec<NodeId> = doc
            .children(overlay)
            .iter()
            .copied()
            .filter(|&row| doc.has_class(row, ITEM_CLASS))
            .collect();
        for (at, row) in rows.into_iter().enumerate() {
            if at == index {
                doc.add_class(row, SELECTED_CLASS);
            } else {
                doc.remove_class(row, SELECTED_CLASS);
            }
        }
    }

    /// Commits the selected suggestion into the tracked field.
    ///
    /// The trailing token (opening colon through caret) becomes `name + " "`, the
    /// caret lands after the space, and the returned notice is the synthesized
    /// change notification for the host to re-dispatch.
    pub(crate) fn commit_selected(&mut self, doc: &mut Document) -> Option<CommitNotice> {
        let session = self.session.take()?;
        doc.remove(session.overlay());

        let name = session.items().get(session.selected())?.clone();
        let field = session.field();
        let input = doc.input(field)?.clone();

        let caret_byte = byte_offset_of_char(&input.value, session.caret);
        let before_caret = &input.value[..caret_byte];
        let after_caret = &input.value[caret_byte..];

        // The pattern may have moved since the session opened; a stale commit
        // must not clobber unrelated text.
        let (token_start_chars, _) = trailing_partial(before_caret)?;
        let token_start_byte = byte_offset_of_char(before_caret, token_start_chars);
        let kept = &before_caret[..token_start_byte];

        let new_value = format!("{kept}{name} {after_caret}");
        let new_caret = kept.chars().count() + name.chars().count() + 1;
        doc.set_input(field, new_value, new_caret);

        Some(CommitNotice { field, inserted: name })
    }

    /// Hover inside the overlay selects the hovered row.
    pub(crate) fn hover_suggestion(&mut self, doc: &mut Document, node: NodeId) {
        let Some(index) = self.suggestion_index_of(doc, node) else {
            return;
        };
        self.select_suggestion(doc, index);
    }

    /// Press inside the overlay commits the pressed row.
    pub(crate) fn press_suggestion(
        &mut self,
        doc: &mut Document,
        node: NodeId,
    ) -> Option<CommitNotice> {
        let index = self.suggestion_index_of(doc, node)?;
        self.select_suggestion(doc, index);
        self.commit_selected(doc)
    }

    fn suggestion_index_of(&self, doc: &Document, node: NodeId) -> Option<usize> {
        let session = self.session.as_ref()?;
        let overlay = session.overlay();
        let row = doc.closest(node, |doc, id| doc.has_class(id, ITEM_CLASS))?;
        if doc.parent(row) != Some(overlay) {
            return None;
        }
        doc.children(overlay).iter().position(|&child| child == row)
    }
}

fn field_origin(doc: &Document, field: NodeId) -> (f64, f64) {
    let x = doc
        .attr(field, "data-x")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0.0);
    let y = doc
        .attr(field, "data-y")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0.0);
    (x, y)
}
