// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end flows through the public API: passive rendering, alias failure,
//! ranking, and the full type-navigate-commit suggestion loop.

use galatea::engine::{Engine, Key, EMOJI_CLASS};
use galatea::model::{Catalog, Document};
use galatea::rank::{rank, DEFAULT_LIMIT};
use galatea::resolve::resolve;

#[test]
fn text_node_becomes_text_image_text() {
    let catalog: Catalog = [("a", "http://x/a.png")].into_iter().collect();
    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text("hi :a: there");
    let root = doc.root();
    doc.append_child(root, paragraph);
    doc.append_child(paragraph, text);

    let mut engine = Engine::new(catalog);
    engine.document_ready(&mut doc);

    let children = doc.children(paragraph).to_vec();
    assert_eq!(children.len(), 3);
    assert_eq!(doc.text(children[0]), Some("hi "));
    assert!(doc.has_class(children[1], EMOJI_CLASS));
    assert_eq!(doc.attr(children[1], "alt"), Some(":a:"));
    assert_eq!(doc.text(children[2]), Some(" there"));
}

#[test]
fn alias_cycle_resolves_to_absence() {
    let catalog: Catalog = [("a", "alias:b"), ("b", "alias:a")].into_iter().collect();
    assert_eq!(resolve("a", &catalog), None);
    assert_eq!(resolve("b", &catalog), None);
}

#[test]
fn prefix_hits_outrank_the_substring_hit() {
    // Candidate order is the catalog's sorted enumeration.
    let matches = rank("par", ["part", "party", "sparkle"], DEFAULT_LIMIT);
    let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["part", "party", "sparkle"]);
}

#[test]
fn type_navigate_commit_round_trip() {
    let catalog: Catalog = [
        ("part", "http://x/part.png"),
        ("party", "http://x/party.png"),
        ("sparkle", "http://x/sparkle.png"),
    ]
    .into_iter()
    .collect();

    let mut doc = Document::new();
    let field = doc.create_input("textarea");
    let root = doc.root();
    doc.append_child(root, field);

    let mut engine = Engine::new(catalog);

    // The host applies the keystrokes, then reports the settled state.
    doc.set_input(field, ":par", 4);
    engine.input_settled(&mut doc, field);

    let session = engine.session().expect("session open");
    assert_eq!(session.selected(), 0);
    assert_eq!(session.items()[0], "part");

    let outcome = engine.key_pressed(&mut doc, Key::Down);
    assert!(outcome.consumed);
    assert_eq!(engine.session().expect("session").selected(), 1);
    assert_eq!(engine.session().expect("session").items()[1], "party");

    let outcome = engine.key_pressed(&mut doc, Key::Enter);
    let notice = outcome.committed.expect("commit notice");
    assert_eq!(notice.field, field);

    let input = doc.input(field).expect("input state");
    assert_eq!(input.value, "party ");
    assert_eq!(input.caret, 6);
    assert!(engine.session().is_none());

    // Synthesized change notification loops back through the input path.
    engine.input_settled(&mut doc, field);
    assert!(engine.session().is_none());
}

#[test]
fn substitutions_revert_to_the_exact_original_tokens() {
    let catalog: Catalog = [
        ("a", "http://x/a.png"),
        ("b", "alias:a"),
    ]
    .into_iter()
    .collect();

    let mut doc = Document::new();
    let paragraph = doc.create_element("p");
    let text = doc.create_text(":a: then :b: then :a: again");
    let root = doc.root();
    doc.append_child(root, paragraph);
    doc.append_child(paragraph, text);

    let mut engine = Engine::new(catalog);
    engine.document_ready(&mut doc);

    let images: Vec<_> = doc
        .descendants(paragraph)
        .into_iter()
        .filter(|&n| doc.has_class(n, EMOJI_CLASS))
        .collect();
    assert_eq!(images.len(), 3);

    engine.set_enabled(&mut doc, false);

    let restored: String = doc
        .descendants(paragraph)
        .into_iter()
        .filter_map(|n| doc.text(n))
        .collect();
    assert_eq!(restored, ":a: then :b: then :a: again");
}
