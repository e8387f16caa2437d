// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Catalogs map shortcode names to image resources (possibly through alias chains);
//! documents are the host tree the renderer mutates.

pub mod catalog;
pub mod document;
pub mod settings;
pub mod shortcode;

pub use catalog::{is_terminal_url, Catalog, ALIAS_PREFIX};
pub use document::{Document, ElementData, InputState, Node, NodeId, NodeKind};
pub use settings::Settings;
pub use shortcode::ShortcodeName;
