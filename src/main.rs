// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galatea CLI entrypoint.
//!
//! By default this runs the interactive TUI against a profile folder holding
//! `catalog.json` and `settings.json`.
//!
//! Use `--fetch` to refresh the stored catalog from the workspace emoji API
//! (requires an `api_token` in settings) and exit.

use std::error::Error;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<profile-dir>] [--api-base <url>]\n  {program} [--profile <dir>] [--api-base <url>]\n  {program} --demo\n  {program} [<profile-dir>] --fetch [--api-base <url>]\n\nTUI mode (default) loads the catalog and settings from the profile folder.\nIf profile-dir/--profile is omitted, the current working directory is used.\n--demo uses a built-in demo catalog and cannot be combined with profile-dir/--profile.\n--fetch refreshes the stored catalog from the emoji API and exits; it needs an\napi_token in settings.json.\n--api-base overrides the API endpoint (default {default_base}).",
        default_base = galatea::fetch::DEFAULT_API_BASE
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    fetch: bool,
    profile_dir: Option<String>,
    api_base: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--fetch" => {
                if options.fetch {
                    return Err(());
                }
                options.fetch = true;
            }
            "--profile" => {
                if options.profile_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.profile_dir = Some(dir);
            }
            "--api-base" => {
                if options.api_base.is_some() {
                    return Err(());
                }
                let base = args.next().ok_or(())?;
                options.api_base = Some(base);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.profile_dir.is_some() {
                    return Err(());
                }
                options.profile_dir = Some(arg);
            }
        }
    }

    if options.demo && (options.profile_dir.is_some() || options.fetch) {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "galatea".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.demo {
            galatea::tui::run()?;
            return Ok(());
        }

        let dir = options.profile_dir.unwrap_or_else(|| ".".to_owned());
        let folder = galatea::store::ProfileFolder::new(dir);
        let settings = folder.load_settings()?;

        if options.fetch {
            let token = settings
                .api_token
                .clone()
                .ok_or(galatea::fetch::FetchError::MissingToken)?;
            let api_base = options
                .api_base
                .unwrap_or_else(|| galatea::fetch::DEFAULT_API_BASE.to_owned());

            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            let catalog = runtime.block_on(galatea::fetch::fetch_catalog(&api_base, &token))?;
            folder.save_catalog(&catalog)?;
            println!("fetched {} emojis into {}", catalog.len(), folder.dir().display());
            return Ok(());
        }

        let catalog = folder.load_catalog()?;
        galatea::tui::run_with(catalog, settings)?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("galatea: {err}");
        std::process::exit(1);
    }
}
