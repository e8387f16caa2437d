// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galatea — inline custom-emoji shortcode rendering with live autocomplete.
//!
//! The engine resolves `:name:` shortcodes against a workspace catalog, ranks catalog
//! entries against partial input, and runs a reversible substitution pass over a
//! mutating document tree.

pub mod engine;
pub mod fetch;
pub mod model;
pub mod rank;
pub mod resolve;
pub mod store;
pub mod tui;
