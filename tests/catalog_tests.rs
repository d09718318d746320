//! End-to-end crawl tests against temporary trees.

use rusqlite::Connection;
use spcatalog::engine::{file_count, folder_count, open_db};
use spcatalog::pipeline::{self, CrawlParams, WalkScope, estimate_file_count};
use spcatalog::catalog::catalog_with_progress;
use spcatalog::utils::DB_INSERT_BATCH_SIZE;
use spcatalog::{
    CatalogEvent, CatalogOpts, CatalogStatus, ExtFilter, Progress, catalog_dir, estimate,
    spawn_catalog, spawn_catalog_with_cancel,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// root/ { file1.txt, file2.pdf, subdir/ { file3.txt } }
fn basic_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir(root.join("subdir")).unwrap();
    std::fs::write(root.join("file1.txt"), "content1").unwrap();
    std::fs::write(root.join("file2.pdf"), "content2").unwrap();
    std::fs::write(root.join("subdir").join("file3.txt"), "content3").unwrap();
    dir
}

/// `n` files spread across two directories.
fn wide_tree(n: usize) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("a")).unwrap();
    for i in 0..n {
        let sub = if i % 2 == 0 { "a" } else { "" };
        std::fs::write(dir.path().join(sub).join(format!("f{i}.dat")), "x").unwrap();
    }
    dir
}

fn opts_for(root: &Path, out: &Path) -> CatalogOpts {
    CatalogOpts::new(root, out.join("catalog.db"))
}

fn run(opts: &CatalogOpts) -> spcatalog::CatalogSummary {
    catalog_dir(opts, 0, None::<fn(Progress)>).unwrap()
}

fn conn(opts: &CatalogOpts) -> Connection {
    open_db(&opts.db_path).unwrap()
}

fn rows(conn: &Connection) -> Vec<(String, String, i64, String, String)> {
    let mut stmt = conn
        .prepare("SELECT abs_path, ext, size, mtime_utc, mime FROM files ORDER BY abs_path")
        .unwrap();
    stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
}

fn hashes(conn: &Connection) -> Vec<Option<String>> {
    let mut stmt = conn
        .prepare("SELECT sha256 FROM files ORDER BY abs_path")
        .unwrap();
    stmt.query_map([], |r| r.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
}

fn is_hex_sha256(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

fn recording_params(batch_size: usize) -> (CrawlParams, Arc<Mutex<Vec<Progress>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = Arc::clone(&seen);
    let params = CrawlParams {
        on_progress: Some(Box::new(move |p| seen_cb.lock().unwrap().push(p))),
        batch_size,
        ..CrawlParams::default()
    };
    (params, seen)
}

// --- basic scenario ---

#[test]
fn test_basic_tree_no_filter() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let summary = run(&opts);

    assert_eq!(summary.status, CatalogStatus::Completed);
    assert_eq!(summary.files, 3);
    assert_eq!(summary.folders, 2);
    let conn = conn(&opts);
    assert!(folder_count(&conn).unwrap() >= 2);
    assert_eq!(file_count(&conn).unwrap(), 3);
    assert!(hashes(&conn).iter().all(Option::is_none));
}

#[test]
fn test_rows_use_canonical_paths_and_parents() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    run(&opts);
    let root = tree.path().canonicalize().unwrap();
    let conn = conn(&opts);

    let sub = root.join("subdir");
    let (parent, mtime): (String, String) = conn
        .query_row(
            "SELECT parent_path, mtime_utc FROM folders WHERE path = ?1",
            [sub.to_string_lossy().into_owned()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(parent, root.to_string_lossy());
    assert!(mtime.ends_with('Z'));

    let (folder, name, ext, size, mime): (String, String, String, i64, String) = conn
        .query_row(
            "SELECT folder_path, name, ext, size, mime FROM files WHERE abs_path = ?1",
            [sub.join("file3.txt").to_string_lossy().into_owned()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .unwrap();
    assert_eq!(folder, sub.to_string_lossy());
    assert_eq!(name, "file3.txt");
    assert_eq!(ext, ".txt");
    assert_eq!(size, 8);
    assert_eq!(mime, "text/plain; charset=utf-8");
}

// --- filter ---

#[test]
fn test_filter_pdf_only() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let mut opts = opts_for(tree.path(), out.path());
    opts.ext_filter = ExtFilter::parse(".pdf");
    let summary = run(&opts);

    assert_eq!(summary.files, 1);
    let rows = rows(&conn(&opts));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, ".pdf");
    assert_eq!(rows[0].4, "application/pdf");
}

#[test]
fn test_filter_is_case_insensitive_and_never_filters_folders() {
    let tree = basic_tree();
    std::fs::write(tree.path().join("UPPER.PDF"), "u").unwrap();
    std::fs::create_dir(tree.path().join("empty")).unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut opts = opts_for(tree.path(), out.path());
    opts.ext_filter = ExtFilter::parse("PDF");
    let summary = run(&opts);

    assert_eq!(summary.files, 2);
    assert_eq!(summary.folders, 3);
    let conn = conn(&opts);
    assert!(rows(&conn).iter().all(|r| r.1 == ".pdf"));
    assert_eq!(folder_count(&conn).unwrap(), 3);
}

#[test]
fn test_filter_matching_nothing() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let mut opts = opts_for(tree.path(), out.path());
    opts.ext_filter = ExtFilter::parse(".docx");
    assert_eq!(estimate(&opts).unwrap(), 0);
    let summary = run(&opts);
    assert_eq!(summary.files, 0);
    assert_eq!(file_count(&conn(&opts)).unwrap(), 0);
}

// --- hashing ---

#[test]
fn test_hashing_populates_sha256() {
    let tree = basic_tree();
    std::fs::write(tree.path().join("hello.txt"), "Hello, World!").unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut opts = opts_for(tree.path(), out.path());
    opts.with_hash = true;
    run(&opts);

    let conn = conn(&opts);
    let hashes = hashes(&conn);
    assert_eq!(hashes.len(), 4);
    assert!(hashes.iter().all(|h| h.as_deref().is_some_and(is_hex_sha256)));
    let hello: String = conn
        .query_row(
            "SELECT sha256 FROM files WHERE name = 'hello.txt'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(
        hello,
        "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
    );
}

#[test]
fn test_hash_is_sticky_across_runs() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let mut opts = opts_for(tree.path(), out.path());

    run(&opts);
    let before = rows(&conn(&opts));
    assert!(hashes(&conn(&opts)).iter().all(Option::is_none));

    opts.with_hash = true;
    run(&opts);
    let hashed = hashes(&conn(&opts));
    assert!(hashed.iter().all(Option::is_some));
    assert_eq!(rows(&conn(&opts)), before);

    opts.with_hash = false;
    run(&opts);
    assert_eq!(hashes(&conn(&opts)), hashed);
    assert_eq!(rows(&conn(&opts)), before);
}

#[cfg(unix)]
#[test]
fn test_hashing_skips_pipes_and_unfollowed_links() {
    let tree = basic_tree();
    let root = tree.path();
    std::os::unix::fs::symlink(root.join("file1.txt"), root.join("link.txt")).unwrap();
    let have_fifo = std::process::Command::new("mkfifo")
        .arg(root.join("pipe.txt"))
        .status()
        .is_ok_and(|s| s.success());
    let out = tempfile::tempdir().unwrap();
    let mut opts = opts_for(root, out.path());
    opts.with_hash = true;
    let summary = run(&opts);

    let expected_files = if have_fifo { 5 } else { 4 };
    assert_eq!(summary.files, expected_files);
    let conn = conn(&opts);
    let unhashed: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM files WHERE sha256 IS NULL",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(unhashed, expected_files as i64 - 3);
    let link_hash: Option<String> = conn
        .query_row(
            "SELECT sha256 FROM files WHERE name = 'link.txt'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(link_hash, None);
}

// --- idempotence ---

#[test]
fn test_rerun_is_idempotent() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    run(&opts);
    let first = rows(&conn(&opts));
    let first_folders = folder_count(&conn(&opts)).unwrap();
    run(&opts);
    assert_eq!(rows(&conn(&opts)), first);
    assert_eq!(folder_count(&conn(&opts)).unwrap(), first_folders);
}

// --- estimator ---

#[test]
fn test_estimator_agrees_with_engine() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    for filter in ["", ".txt", "pdf,TXT", ".nope"] {
        let mut opts = opts_for(tree.path(), out.path());
        opts.ext_filter = ExtFilter::parse(filter);
        let estimated = estimate(&opts).unwrap();
        let summary = catalog_dir(&opts, estimated, None::<fn(Progress)>).unwrap();
        assert_eq!(summary.files, estimated, "filter {filter:?}");
    }
}

#[test]
fn test_estimator_counts_no_folders() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
    let scope = WalkScope::new(dir.path(), false).unwrap();
    assert_eq!(
        estimate_file_count(&scope, &ExtFilter::default(), None),
        Some(0)
    );
}

#[test]
fn test_estimate_stops_when_cancelled() {
    let tree = wide_tree(20);
    let scope = WalkScope::new(tree.path(), false).unwrap();
    let filter = ExtFilter::default();
    assert_eq!(
        estimate_file_count(&scope, &filter, Some(&AtomicBool::new(false))),
        Some(20)
    );
    assert_eq!(
        estimate_file_count(&scope, &filter, Some(&AtomicBool::new(true))),
        None
    );
}

#[cfg(unix)]
#[test]
fn test_estimator_agrees_with_engine_on_broken_links() {
    let tree = basic_tree();
    std::os::unix::fs::symlink(tree.path().join("gone.txt"), tree.path().join("dangling.txt"))
        .unwrap();
    std::os::unix::fs::symlink(tree.path().join("file1.txt"), tree.path().join("alias.txt"))
        .unwrap();
    let out = tempfile::tempdir().unwrap();
    for follow_links in [false, true] {
        let mut opts = opts_for(tree.path(), out.path());
        opts.follow_links = follow_links;
        let estimated = estimate(&opts).unwrap();
        let summary = catalog_dir(&opts, estimated, None::<fn(Progress)>).unwrap();
        assert_eq!(summary.files, estimated, "follow_links {follow_links}");
    }
}

#[test]
fn test_store_inside_root_is_not_cataloged() {
    let tree = basic_tree();
    let opts = CatalogOpts::new(tree.path(), tree.path().join("catalog.db"));
    let estimated = estimate(&opts).unwrap();
    assert_eq!(estimated, 3);
    run(&opts);
    // Second run sees catalog.db and its -wal/-shm on disk.
    assert_eq!(estimate(&opts).unwrap(), 3);
    let summary = run(&opts);
    assert_eq!(summary.files, 3);
    let conn = conn(&opts);
    let stray: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM files WHERE name LIKE 'catalog.db%'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stray, 0);
}

// --- batching and progress ---

#[test]
fn test_progress_at_batch_boundaries_and_completion() {
    let tree = wide_tree(25);
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let scope = pipeline::WalkScope::for_opts(&opts).unwrap();
    let mut conn = open_db(&opts.db_path).unwrap();
    let (mut params, seen) = recording_params(10);
    params.estimated_total = 25;

    // 2 folders + 25 files = 27 upserts: batches at 10 and 20, then the final snapshot.
    let summary = pipeline::crawl_into(&mut conn, &scope, &opts, &params).unwrap();
    assert_eq!(summary.files, 25);
    assert_eq!(summary.folders, 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].files_processed + seen[0].folders_processed, 10);
    assert_eq!(seen[1].files_processed + seen[1].folders_processed, 20);
    assert!(!seen[0].last_path.is_empty());
    assert!(seen.iter().all(|p| p.estimated_total == 25));
    let last = seen.last().unwrap();
    assert_eq!(last.files_processed, 25);
    assert_eq!(last.folders_processed, 2);
    assert_eq!(last.last_path, "");
}

#[test]
fn test_default_batch_commits_every_thousand_upserts() {
    let tree = wide_tree(1005);
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = Arc::clone(&seen);
    let params = CrawlParams {
        on_progress: Some(Box::new(move |p| seen_cb.lock().unwrap().push(p))),
        ..CrawlParams::default()
    };
    assert_eq!(params.batch_size, DB_INSERT_BATCH_SIZE);
    assert_eq!(DB_INSERT_BATCH_SIZE, 1000);

    // 2 folders + 1005 files = 1007 upserts: one full batch, then the final snapshot.
    let summary = pipeline::catalog_dir(&opts, &params).unwrap();
    assert_eq!(summary.files, 1005);
    assert_eq!(summary.folders, 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].files_processed + seen[0].folders_processed, 1000);
    assert!(!seen[0].last_path.is_empty());
    assert_eq!(seen[1].files_processed, 1005);
    assert_eq!(seen[1].last_path, "");
    assert_eq!(file_count(&conn(&opts)).unwrap(), 1005);
}

#[test]
fn test_cancel_stops_at_batch_boundary() {
    let tree = wide_tree(25);
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let scope = WalkScope::for_opts(&opts).unwrap();
    let mut db = open_db(&opts.db_path).unwrap();
    let (mut params, seen) = recording_params(10);
    params.cancel_check = Some(Arc::new(AtomicBool::new(true)));

    let summary = pipeline::crawl_into(&mut db, &scope, &opts, &params).unwrap();
    assert_eq!(summary.status, CatalogStatus::Cancelled);
    assert_eq!(summary.files + summary.folders, 10);
    assert_eq!(seen.lock().unwrap().len(), 1);
    drop(db);

    let conn = conn(&opts);
    assert_eq!(
        file_count(&conn).unwrap() + folder_count(&conn).unwrap(),
        10
    );
    let indexes: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_files_%'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(indexes, 0);
}

#[test]
fn test_completed_run_creates_query_indexes() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    run(&opts);
    let indexes: i64 = conn(&opts)
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_files_%'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(indexes, 3);
}

#[test]
fn test_write_error_keeps_committed_batches() {
    let tree = wide_tree(6);
    std::fs::write(tree.path().join("bad.txt"), "b").unwrap();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let scope = WalkScope::for_opts(&opts).unwrap();
    let mut db = open_db(&opts.db_path).unwrap();
    db.execute_batch(
        "CREATE TRIGGER reject_bad BEFORE INSERT ON files
         WHEN NEW.name = 'bad.txt'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();
    let (params, _seen) = recording_params(1);

    assert!(pipeline::crawl_into(&mut db, &scope, &opts, &params).is_err());
    assert!(folder_count(&db).unwrap() >= 1);
    let bad: i64 = db
        .query_row("SELECT COUNT(*) FROM files WHERE name = 'bad.txt'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(bad, 0);
    assert!(file_count(&db).unwrap() < 7);
}

// --- setup errors ---

#[test]
fn test_missing_root_fails_before_store_is_created() {
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(&PathBuf::from("/definitely/not/here"), out.path());
    assert!(catalog_dir(&opts, 0, None::<fn(Progress)>).is_err());
    assert!(estimate(&opts).is_err());
    assert!(!opts.db_path.exists());
}

#[test]
fn test_root_that_is_a_file_fails() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(&tree.path().join("file1.txt"), out.path());
    assert!(catalog_dir(&opts, 0, None::<fn(Progress)>).is_err());
}

#[test]
fn test_unopenable_store_fails() {
    let tree = basic_tree();
    let opts = CatalogOpts::new(tree.path(), tree.path().join("no/such/dir/catalog.db"));
    assert!(catalog_dir(&opts, 0, None::<fn(Progress)>).is_err());
}

// --- threaded runner ---

#[test]
fn test_spawn_catalog_event_order() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let handle = spawn_catalog(opts.clone(), true);

    let mut events = Vec::new();
    while let Ok(ev) = handle.events.recv() {
        let done = matches!(ev, CatalogEvent::Done(_));
        events.push(ev);
        if done {
            break;
        }
    }
    let rx = handle.events.clone();
    handle.join().unwrap();
    assert!(rx.try_recv().is_err());

    assert!(matches!(events.first(), Some(CatalogEvent::Estimated(3))));
    match events.last() {
        Some(CatalogEvent::Done(Ok(summary))) => {
            assert_eq!(summary.files, 3);
            assert_eq!(summary.status, CatalogStatus::Completed);
        }
        other => panic!("expected Done(Ok), got {other:?}"),
    }
    let progress: Vec<&Progress> = events
        .iter()
        .filter_map(|e| match e {
            CatalogEvent::Progress(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].estimated_total, 3);
    assert_eq!(progress[0].last_path, "");
}

#[test]
fn test_spawn_catalog_reports_setup_error_in_done() {
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(&PathBuf::from("/definitely/not/here"), out.path());
    let handle = spawn_catalog(opts, false);
    let ev = handle.events.recv().unwrap();
    assert!(matches!(ev, CatalogEvent::Done(Err(_))));
    handle.join().unwrap();
}

#[test]
fn test_spawn_catalog_cancelled_during_estimate() {
    let tree = wide_tree(50);
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let cancel = Arc::new(AtomicBool::new(true));
    let handle = spawn_catalog_with_cancel(opts.clone(), true, cancel);

    match handle.events.recv().unwrap() {
        CatalogEvent::Done(Ok(summary)) => {
            assert_eq!(summary.status, CatalogStatus::Cancelled);
            assert_eq!(summary.files + summary.folders, 0);
        }
        other => panic!("expected Done(Ok(Cancelled)), got {other:?}"),
    }
    handle.join().unwrap();
    assert!(!opts.db_path.exists());
}

#[test]
fn test_spawn_catalog_cancel_reaches_running_worker() {
    let tree = wide_tree(50);
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    let handle = spawn_catalog(opts, true);
    handle.cancel();
    assert!(handle.cancel_flag().load(std::sync::atomic::Ordering::Relaxed));

    let mut done = None;
    while let Ok(ev) = handle.events.recv() {
        if let CatalogEvent::Done(r) = ev {
            done = Some(r);
            break;
        }
    }
    handle.join().unwrap();
    // 52 upserts never reach a batch boundary: a crawl that began before the flag completes.
    let summary = done.unwrap().unwrap();
    assert!(summary.files == 0 || summary.status == CatalogStatus::Completed);
}

// --- interactive run ---

#[test]
fn test_catalog_with_progress_runs_twice_in_one_process() {
    let tree = basic_tree();
    let out = tempfile::tempdir().unwrap();
    let opts = opts_for(tree.path(), out.path());
    for _ in 0..2 {
        let summary =
            catalog_with_progress(&opts, true, false, Arc::new(AtomicBool::new(false))).unwrap();
        assert_eq!(summary.status, CatalogStatus::Completed);
        assert_eq!(summary.files, 3);
    }
    let summary =
        catalog_with_progress(&opts, true, false, Arc::new(AtomicBool::new(true))).unwrap();
    assert_eq!(summary.status, CatalogStatus::Cancelled);
}
