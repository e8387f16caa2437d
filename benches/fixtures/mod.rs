// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use galatea::model::{Catalog, Document, NodeId};

/// A synthetic catalog of `size` entries covering every entry shape:
/// direct URLs, alias chains, bare-name references, and a few dead ends.
pub fn catalog(size: usize) -> Catalog {
    let mut entries: Vec<(String, String)> = Vec::with_capacity(size);
    for index in 0..size {
        let name = format!("emoji_{index:04}");
        let value = match index % 10 {
            0 => format!("alias:emoji_{:04}", (index + 1) % size),
            1 => format!("emoji_{:04}", (index + 2) % size),
            2 if index % 20 == 2 => "alias:nowhere".to_owned(),
            _ => format!("http://emoji.test/{name}.png"),
        };
        entries.push((name, value));
    }
    entries.into_iter().collect()
}

/// A catalog holding one alias chain of `depth` hops ending in a terminal URL.
pub fn chain_catalog(depth: usize) -> Catalog {
    let mut entries: Vec<(String, String)> = Vec::with_capacity(depth + 1);
    for hop in 0..depth {
        entries.push((format!("hop_{hop}"), format!("alias:hop_{}", hop + 1)));
    }
    entries.push((format!("hop_{depth}"), "http://emoji.test/end.png".to_owned()));
    entries.into_iter().collect()
}

/// All names of `catalog(size)`, for ranking candidates.
pub fn candidate_names(size: usize) -> Vec<String> {
    (0..size).map(|index| format!("emoji_{index:04}")).collect()
}

/// A document of `messages` paragraphs, every third one carrying shortcodes.
pub fn document(messages: usize) -> (Document, Vec<NodeId>) {
    let mut doc = Document::new();
    let mut added = Vec::with_capacity(messages);
    let root = doc.root();
    for index in 0..messages {
        let paragraph = doc.create_element("p");
        let text = if index % 3 == 0 {
            format!("message {index} with :emoji_0003: and :emoji_{:04}: inline", index % 50)
        } else {
            format!("message {index} with no shortcodes at all")
        };
        let text_node = doc.create_text(text);
        doc.append_child(root, paragraph);
        doc.append_child(paragraph, text_node);
        added.push(paragraph);
    }
    (doc, added)
}

pub fn checksum_names(names: &[String]) -> u64 {
    let mut acc = 0u64;
    for name in names {
        acc = acc.wrapping_mul(131).wrapping_add(name.len() as u64);
    }
    acc
}
