//! CLI command handler: resolve flags against saved preferences, then catalog.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::CatalogOpts;
use crate::catalog::{catalog_with_progress, install_interrupt_handler};
use crate::engine::ExtFilter;
use crate::engine::arg_parser::Cli;
use crate::utils::config::PackagePaths;
use crate::utils::{Preferences, setup_logging};

/// A fully resolved run plus the raw strings worth remembering.
pub struct ResolvedRun {
    pub opts: CatalogOpts,
    pub output_dir: PathBuf,
    pub ext_raw: String,
}

/// `~/spcatalog`, or `./spcatalog` when no home directory is known.
pub fn default_output_dir() -> PathBuf {
    let name = PackagePaths::get().output_dir_name();
    directories::UserDirs::new()
        .map(|d| d.home_dir().join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

/// Flags win; unset flags fall back to the last saved settings, then to defaults.
/// Does not touch the filesystem.
pub fn resolve_run(cli: &Cli, prefs: &Preferences) -> Result<ResolvedRun> {
    let root = match (&cli.root, non_empty(&prefs.last_root_path)) {
        (Some(r), _) => r.clone(),
        (None, Some(last)) => PathBuf::from(last),
        (None, None) => anyhow::bail!("No ROOT given and no previous root remembered"),
    };
    let output_dir = cli
        .out
        .clone()
        .or_else(|| non_empty(&prefs.last_output_dir).map(PathBuf::from))
        .unwrap_or_else(default_output_dir);
    let ext_raw = cli
        .ext
        .clone()
        .unwrap_or_else(|| prefs.last_ext_filter.clone());

    let db_path = output_dir.join(PackagePaths::get().store_filename());
    let opts = CatalogOpts {
        root,
        db_path,
        ext_filter: ExtFilter::parse(&ext_raw),
        with_hash: cli.hash.unwrap_or(prefs.last_hash_setting),
        follow_links: cli.follow_links.unwrap_or(false),
    };
    Ok(ResolvedRun {
        opts,
        output_dir,
        ext_raw,
    })
}

fn print_recent(prefs: &Preferences) {
    if prefs.recent_paths.is_empty() {
        info!("No recent roots");
        return;
    }
    for (i, p) in prefs.recent_paths.iter().enumerate() {
        println!("{} {}", i + 1, p);
    }
}

/// Run the CLI: `--recent` lists roots; otherwise catalog and remember the settings.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose.unwrap_or(false));
    let mut prefs = Preferences::load();
    if cli.recent {
        print_recent(&prefs);
        return Ok(());
    }

    let run = resolve_run(cli, &prefs)?;
    std::fs::create_dir_all(&run.output_dir)
        .with_context(|| format!("create output dir {}", run.output_dir.display()))?;

    prefs.remember_run(
        &run.opts.root.to_string_lossy(),
        &run.output_dir.to_string_lossy(),
        &run.ext_raw,
        run.opts.with_hash,
    );
    if let Err(e) = prefs.save() {
        warn!("Could not save preferences: {:#}", e);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&cancel))?;
    debug!("Cataloging directory...");
    catalog_with_progress(&run.opts, !cli.no_estimate, !cli.quiet, cancel)?;
    Ok(())
}
