// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;

use smol_str::SmolStr;

/// A shortcode name as it appears between the colons of a `:name:` token.
///
/// Names are stored verbatim. Catalogs in the wild carry keys outside the token
/// grammar; those entries are still resolvable targets of alias hops, they just
/// can never be reached from a document scan, so the name type does not validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortcodeName(SmolStr);

impl ShortcodeName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The colon-delimited token form, e.g. `:party:`.
    pub fn token(&self) -> String {
        format!(":{}:", self.0)
    }
}

impl fmt::Display for ShortcodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortcodeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ShortcodeName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for ShortcodeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ShortcodeName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
