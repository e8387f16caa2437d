// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{ProfileFolder, StoreError};
use crate::model::{Catalog, Settings};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("galatea-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct ProfileFolderTestCtx {
    _tmp: TempDir,
    folder: ProfileFolder,
}

impl ProfileFolderTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let folder = ProfileFolder::new(tmp.path().join("profile"));
        Self { _tmp: tmp, folder }
    }
}

#[fixture]
fn ctx() -> ProfileFolderTestCtx {
    ProfileFolderTestCtx::new("profile-folder")
}

#[rstest]
fn catalog_round_trips(ctx: ProfileFolderTestCtx) {
    let catalog: Catalog = [
        ("party", "http://emoji.test/party.png"),
        ("thumbs", "alias:thumbsup"),
        ("thumbsup", "http://emoji.test/up.png"),
    ]
    .into_iter()
    .collect();

    ctx.folder.save_catalog(&catalog).expect("save catalog");
    let loaded = ctx.folder.load_catalog().expect("load catalog");
    assert_eq!(loaded, catalog);
}

#[rstest]
fn absent_catalog_loads_empty(ctx: ProfileFolderTestCtx) {
    let loaded = ctx.folder.load_catalog().expect("load catalog");
    assert!(loaded.is_empty());
}

#[rstest]
fn absent_settings_load_defaults(ctx: ProfileFolderTestCtx) {
    let settings = ctx.folder.load_settings().expect("load settings");
    assert_eq!(settings, Settings::default());
    assert!(settings.enabled);
}

#[rstest]
fn settings_round_trip(ctx: ProfileFolderTestCtx) {
    let settings = Settings {
        enabled: false,
        api_token: Some("xoxp-123".to_owned()),
    };
    ctx.folder.save_settings(&settings).expect("save settings");
    let loaded = ctx.folder.load_settings().expect("load settings");
    assert_eq!(loaded, settings);
}

#[rstest]
fn save_replaces_catalog_wholesale(ctx: ProfileFolderTestCtx) {
    let first: Catalog = [("a", "http://x/a.png"), ("b", "http://x/b.png")]
        .into_iter()
        .collect();
    ctx.folder.save_catalog(&first).expect("save first");

    let second: Catalog = [("c", "http://x/c.png")].into_iter().collect();
    ctx.folder.save_catalog(&second).expect("save second");

    let loaded = ctx.folder.load_catalog().expect("load catalog");
    assert_eq!(loaded, second);
    assert!(!loaded.contains("a"));
}

#[rstest]
fn corrupt_catalog_reports_json_error_with_path(ctx: ProfileFolderTestCtx) {
    std::fs::create_dir_all(ctx.folder.dir()).expect("mkdir");
    std::fs::write(ctx.folder.dir().join("catalog.json"), "{not json").expect("write");

    let err = ctx.folder.load_catalog().expect_err("expected json error");
    match err {
        StoreError::Json { path, .. } => {
            assert!(path.ends_with("catalog.json"));
        }
        other => panic!("expected Json error, got {other:?}"),
    }
}

#[rstest]
fn write_leaves_no_temp_file_behind(ctx: ProfileFolderTestCtx) {
    let catalog: Catalog = [("a", "http://x/a.png")].into_iter().collect();
    ctx.folder.save_catalog(&catalog).expect("save");

    let leftovers: Vec<_> = std::fs::read_dir(ctx.folder.dir())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
