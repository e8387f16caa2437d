// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the catalog and settings on disk.
//!
//! A profile folder holds `catalog.json` and `settings.json`; writes replace the
//! files atomically so a concurrent reader sees old-or-new, never a torn file.

pub mod profile_folder;

pub use profile_folder::{ProfileFolder, StoreError};
