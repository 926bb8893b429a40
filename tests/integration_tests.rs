//! Integration tests for webpurge
//!
//! These tests verify end-to-end workflows and interactions between modules

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use webpurge::classifier::is_suspicious_name;
use webpurge::config::Config;
use webpurge::events::{CleanEvent, LogLevel, MemorySink};
use webpurge::session;
use webpurge::{CleanOptions, PatternSet, SanitizeOutcome, Sanitizer, TreeCleaner};

const YADRO_PAGE: &str = "<html><head><title>Shop</title>\n\
<script type=\"text/javascript\" src=\"//s200.ucoz.net/cgi/yadro.js\">\n</script>\n\
</head><body><p>Catalog</p></body></html>\n";
const YADRO_PAGE_CLEANED: &str = "<html><head><title>Shop</title>\n\n\
</head><body><p>Catalog</p></body></html>\n";
const GOOD_PAGE: &str = "<html><body><p>Hello</p><script>console.log(1)</script></body></html>\n";

fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// A 40 character name with a `-`, which makes it machine-generated.
fn random_name(seed: u32, ext: &str) -> String {
    format!("{:08x}-{:031x}.{}", seed, u128::from(seed) * 7919, ext)
}

/// Snapshot of every file under `root` (relative path -> contents).
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir_files(root)
        .into_iter()
        .map(|p| {
            let bytes = fs::read(&p).unwrap();
            (p.strip_prefix(root).unwrap().to_path_buf(), bytes)
        })
        .collect()
}

fn walkdir_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(walkdir_files(&path));
        } else {
            files.push(path);
        }
    }
    files
}

fn infected_site() -> TempDir {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    fs::write(root.join("good.html"), GOOD_PAGE).unwrap();
    fs::write(root.join("bad.html"), YADRO_PAGE).unwrap();
    fs::create_dir(root.join(".s")).unwrap();
    fs::write(root.join(".s/counter.js"), "var a = 1;").unwrap();
    fs::write(root.join(".s/img.gif"), [0x47, 0x49, 0x46]).unwrap();
    temp_dir
}

#[test]
fn test_end_to_end_clean() {
    let temp_dir = infected_site();
    let root = temp_dir.path();

    let sink = MemorySink::new();
    let summary = TreeCleaner::new(CleanOptions::default())
        .unwrap()
        .clean(root, &sink)
        .unwrap();

    assert_eq!(fs::read_to_string(root.join("good.html")).unwrap(), GOOD_PAGE);
    assert_eq!(
        fs::read_to_string(root.join("bad.html")).unwrap(),
        YADRO_PAGE_CLEANED
    );
    assert!(!root.join(".s").exists());
    assert!(root.exists());

    assert_eq!(summary.pages_modified, 1);
    assert_eq!(summary.suspicious_dirs_removed, 1);
    assert!(summary.errors.is_empty());
    assert!(sink
        .messages()
        .iter()
        .any(|m| m.starts_with("Removed suspicious directory:") && m.ends_with(".s")));
}

#[test]
fn test_background_session_end_to_end() {
    let temp_dir = infected_site();
    let root = temp_dir.path().to_path_buf();

    let cleaner = TreeCleaner::new(CleanOptions::default()).unwrap();
    let mut events = Vec::new();
    let summary = session::spawn(cleaner, root.clone())
        .wait(|event| events.push(event))
        .unwrap();

    assert_eq!(events.first(), Some(&CleanEvent::Started { total_files: 4 }));
    let percents: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            CleanEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(percents.last(), Some(&100));

    assert_eq!(summary.suspicious_dirs_removed, 1);
    assert!(!root.join(".s").exists());
}

#[test]
fn test_scan_leaves_tree_byte_identical() {
    let temp_dir = infected_site();
    let root = temp_dir.path();
    fs::create_dir(root.join("gen")).unwrap();
    fs::write(root.join("gen").join(random_name(1, "js")), "x").unwrap();
    fs::write(root.join(random_name(2, "tmp")), "y").unwrap();
    let before = snapshot(root);

    let sink = MemorySink::new();
    let summary = TreeCleaner::new(CleanOptions {
        dry_run: true,
        ..CleanOptions::default()
    })
    .unwrap()
    .clean(root, &sink)
    .unwrap();

    assert_eq!(snapshot(root), before);
    assert!(root.join(".s").is_dir());
    assert!(summary.dry_run);
    assert_eq!(summary.pages_modified, 1);
    // .s and gen; the generated file inside gen and the one at the root
    assert_eq!(summary.suspicious_dirs_removed, 2);
    assert_eq!(summary.suspicious_files_removed, 2);
    assert!(sink
        .messages()
        .iter()
        .any(|m| m.starts_with("Would remove suspicious directory:")));
}

#[test]
fn test_text_files_are_never_modified() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    let notes = "<script>var u_global_data = {};</script> plain notes";
    fs::write(root.join("notes.txt"), notes).unwrap();
    fs::write(root.join("style.css"), "body { color: red }").unwrap();

    let summary = webpurge::cleaner::clean(root, &MemorySink::new()).unwrap();

    assert_eq!(fs::read_to_string(root.join("notes.txt")).unwrap(), notes);
    assert_eq!(summary.files_skipped, 2);
    assert_eq!(summary.pages_modified, 0);
    assert!(root.join("style.css").exists());
}

#[test]
fn test_random_named_directory_removed_unless_it_has_an_index() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();

    let junk = root.join("junk");
    fs::create_dir(&junk).unwrap();
    for seed in 0..3 {
        fs::write(junk.join(random_name(seed, "html")), "<p>spam</p>").unwrap();
    }

    let site = root.join("site");
    fs::create_dir(&site).unwrap();
    fs::write(site.join(random_name(9, "html")), "<p>spam</p>").unwrap();
    fs::write(site.join("index.html"), "<p>home</p>").unwrap();

    let summary = webpurge::cleaner::clean(root, &MemorySink::new()).unwrap();

    assert!(!junk.exists());
    assert!(site.join("index.html").exists());
    // The loose-file pass still removes the generated page next to index.html
    assert!(!site.join(random_name(9, "html")).exists());
    assert_eq!(summary.suspicious_dirs_removed, 1);
}

#[test]
fn test_latin1_page_is_reencoded_as_utf8() {
    let temp_dir = create_test_dir();
    let path = temp_dir.path().join("cafe.htm");
    // "<p>café</p>" in ISO-8859-1 followed by an injected script
    let mut bytes = b"<p>caf\xe9</p>".to_vec();
    bytes.extend_from_slice(b"<script>var adbetnetshowed=1;</script>");
    fs::write(&path, &bytes).unwrap();

    let sink = MemorySink::new();
    let outcome = Sanitizer::default().sanitize(&path, &sink);

    assert!(outcome.modified());
    assert_eq!(fs::read_to_string(&path).unwrap(), "<p>café</p>");
    assert!(sink
        .messages()
        .iter()
        .any(|m| m.contains("with encoding utf-8. Trying next encoding.")));
}

#[test]
fn test_custom_patterns_through_cleaner() {
    let temp_dir = create_test_dir();
    let page = temp_dir.path().join("page.xml");
    fs::write(&page, "<feed><ad>buy</ad><item/></feed>").unwrap();

    let patterns = PatternSet::new(vec![
        webpurge::PatternRule::new("ad-tag", r"(?s)<ad>.*?</ad>").unwrap()
    ]);
    let cleaner = TreeCleaner::new(CleanOptions::default())
        .unwrap()
        .with_patterns(patterns);
    cleaner.clean(temp_dir.path(), &MemorySink::new()).unwrap();

    assert_eq!(fs::read_to_string(&page).unwrap(), "<feed><item/></feed>");
}

#[test]
fn test_exclusions_from_config_protect_subtree() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("vendor/.s")).unwrap();
    fs::write(root.join("vendor/.s/keep.js"), "x").unwrap();
    fs::write(root.join("vendor/lib.html"), YADRO_PAGE).unwrap();

    let config_path = root.join("webpurge.toml");
    fs::write(&config_path, "[exclusions]\npatterns = [\"vendor\"]\n").unwrap();
    let config = Config::load_from(&config_path).unwrap();

    let summary = TreeCleaner::new(CleanOptions::from_config(&config, false))
        .unwrap()
        .clean(root, &MemorySink::new())
        .unwrap();

    assert!(root.join("vendor/.s/keep.js").exists());
    assert_eq!(
        fs::read_to_string(root.join("vendor/lib.html")).unwrap(),
        YADRO_PAGE
    );
    assert_eq!(summary.excluded_paths, 1);
}

#[test]
fn test_vanished_page_is_reported_as_warning() {
    let temp_dir = create_test_dir();
    let root = temp_dir.path();
    let sink = MemorySink::new();
    let outcome = Sanitizer::default().sanitize(&root.join("gone.html"), &sink);
    assert_eq!(outcome, SanitizeOutcome::Failed);

    let events = sink.events();
    assert!(events.iter().any(|e| matches!(
        e,
        CleanEvent::Log {
            level: LogLevel::Warning,
            message,
        } if message.starts_with("Error opening file")
    )));
}

#[test]
fn test_classifier_edge_cases() {
    assert!(!is_suspicious_name(&"a".repeat(31)));
    assert!(is_suspicious_name(&format!("{}-x", "a".repeat(29))));
    assert!(!is_suspicious_name("short-name"));
    assert!(!is_suspicious_name(&format!("{}.html", "a".repeat(25))));
}
