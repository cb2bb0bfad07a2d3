use arranger::cli::{Cli, RunStatus, run_cli};
use arranger::report::{LineCollector, NullReporter};
use arranger::{
    Arranger, ArrangerConfig, FileError, FileStatus, OrganizeError, ProgressEvent,
    ProgressReporter,
};
use clap::Parser;
/// Integration tests for arranger
///
/// These tests simulate real-world usage scenarios, testing the complete
/// end-to-end functionality of classify, group and dedup.
///
/// Test categories:
/// 1. Classification workflows
/// 2. Keyword grouping
/// 3. Duplicate removal
/// 4. Dry-run mode verification
/// 5. Failure isolation and collisions
/// 6. Configuration and filtering
/// 7. Command-line entry point
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with configurable
/// file structure for testing.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a temporary directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    /// Get the path to the test directory.
    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content in the test directory.
    fn create_file(&self, name: &str, content: &[u8]) {
        let file_path = self.path().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    /// Create a file with specific content (string version).
    fn create_text_file(&self, name: &str, content: &str) {
        self.create_file(name, content.as_bytes());
    }

    /// Create a subdirectory in the test directory.
    fn create_subdir(&self, name: &str) {
        let dir_path = self.path().join(name);
        fs::create_dir(&dir_path).expect("Failed to create subdirectory");
    }

    /// Create multiple files at once.
    fn create_files(&self, files: &[(&str, &[u8])]) {
        for (name, content) in files {
            self.create_file(name, content);
        }
    }

    /// Write a configuration file outside the scanned directory's top level.
    fn write_config(&self, content: &str) -> PathBuf {
        self.create_subdir("config");
        let config_path = self.path().join("config").join("arranger.toml");
        fs::write(&config_path, content).expect("Failed to write config");
        config_path
    }

    /// Assert that a directory exists.
    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    /// Assert that a file exists at the given relative path.
    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    /// Assert that a file does NOT exist at the given relative path.
    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Count files in the directory (non-recursive).
    fn count_files(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|e| e.metadata().map(|m| m.is_file()).unwrap_or(false))
            .count()
    }

    /// Count directories in the directory (non-recursive).
    fn count_dirs(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|e| e.metadata().map(|m| m.is_dir()).unwrap_or(false))
            .count()
    }

    /// List all files in the directory recursively, relative to the root.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut relative: Vec<PathBuf> = files
            .into_iter()
            .filter_map(|p| p.strip_prefix(self.path()).ok().map(Path::to_path_buf))
            .collect();
        relative.sort();
        relative
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }
}

fn arranger() -> Arranger {
    Arranger::default()
}

fn dry_run_arranger() -> Arranger {
    Arranger::from_config(&ArrangerConfig::default(), true, false)
        .expect("default config compiles")
}

// ============================================================================
// Test Suite 1: Classification
// ============================================================================

#[test]
fn test_classify_empty_directory() {
    let fixture = TestFixture::new();

    let report = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("classify should succeed");

    assert_eq!(report.moved_count, 0);
    assert!(report.outcomes.is_empty());
    assert_eq!(fixture.count_dirs(), 0, "Should create no folders");
}

#[test]
fn test_classify_mixed_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("script.py", b"print('hi')"),
        ("photo.png", b"not really a png"),
        ("unknownfile.xyz", b"?"),
    ]);

    let report = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("classify should succeed");

    assert_eq!(report.moved_count, 2);
    fixture.assert_file_exists("python-code/script.py");
    fixture.assert_file_exists("images/photo.png");
    fixture.assert_file_exists("unknownfile.xyz");
    fixture.assert_file_not_exists("script.py");
    fixture.assert_file_not_exists("photo.png");
    assert_eq!(fixture.count_dirs(), 2, "Only python-code and images are created");
}

#[test]
fn test_classify_preserves_file_content() {
    let fixture = TestFixture::new();
    let content: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
    fixture.create_file("backup.zip", &content);

    arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("classify should succeed");

    let moved = fs::read(fixture.path().join("archives/backup.zip")).expect("moved file");
    assert_eq!(moved, content, "Content must be byte-identical after the move");
}

#[test]
fn test_classify_is_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.pdf", b"1"), ("b.mp3", b"2"), ("c.zip", b"3")]);

    let first = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("first run");
    assert_eq!(first.moved_count, 3);
    let after_first = fixture.list_files_recursive();

    let second = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("second run");
    assert_eq!(second.moved_count, 0);
    assert_eq!(fixture.list_files_recursive(), after_first);
}

#[test]
fn test_classify_uses_suffix_and_first_match() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("archive.tar.gz", b"gz"),
        ("report.final.pdf", b"pdf"),
        ("UPPER.PNG", b"png"),
    ]);

    arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("classify should succeed");

    fixture.assert_file_exists("archives/archive.tar.gz");
    fixture.assert_file_exists("documents/report.final.pdf");
    // Matching is case-sensitive.
    fixture.assert_file_exists("UPPER.PNG");
}

#[test]
fn test_classify_leaves_subdirectories_alone() {
    let fixture = TestFixture::new();
    fixture.create_subdir("photos.png");
    fixture.create_text_file("notes.txt", "hello");

    let report = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("classify should succeed");

    assert_eq!(report.outcomes.len(), 1, "Folders are never listed");
    fixture.assert_dir_exists("photos.png");
    fixture.assert_file_exists("text-files/notes.txt");
}

#[test]
fn test_classify_with_existing_category_folder() {
    let fixture = TestFixture::new();
    fixture.create_subdir("images");
    fixture.create_file("images/old.png", b"old");
    fixture.create_file("new.png", b"new");

    arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("classify should succeed");

    fixture.assert_file_exists("images/old.png");
    fixture.assert_file_exists("images/new.png");
}

#[test]
fn test_classify_reports_progress_lines() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo.png", "x");
    let mut lines = LineCollector::default();

    arranger()
        .classify(fixture.path(), &mut lines)
        .expect("classify should succeed");

    assert!(lines.lines.iter().any(|l| l == "Moved photo.png to images"));
    assert_eq!(lines.lines.last().map(String::as_str), Some("Moved 1 files."));
}

// ============================================================================
// Test Suite 2: Keyword Grouping
// ============================================================================

#[test]
fn test_group_by_keyword() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("report_q1.pdf", b"q1"),
        ("report_q2.pdf", b"q2"),
        ("notes.txt", b"notes"),
    ]);

    let report = arranger()
        .group_by_keyword(fixture.path(), "report", &mut NullReporter)
        .expect("group should succeed");

    assert_eq!(report.moved_count, 2);
    assert_eq!(report.summary_line(), "Moved 2 files to 'report' folder.");
    fixture.assert_file_exists("report/report_q1.pdf");
    fixture.assert_file_exists("report/report_q2.pdf");
    fixture.assert_file_exists("notes.txt");
}

#[test]
fn test_group_keyword_is_trimmed() {
    let fixture = TestFixture::new();
    fixture.create_text_file("invoice-march.txt", "x");

    let report = arranger()
        .group_by_keyword(fixture.path(), "  invoice \n", &mut NullReporter)
        .expect("group should succeed");

    assert_eq!(report.keyword, "invoice");
    fixture.assert_file_exists("invoice/invoice-march.txt");
}

#[test]
fn test_group_rejects_empty_keyword() {
    let fixture = TestFixture::new();
    fixture.create_text_file("anything.txt", "x");

    for keyword in ["", "   ", "\t\n"] {
        let result = arranger().group_by_keyword(fixture.path(), keyword, &mut NullReporter);
        assert!(
            matches!(result, Err(OrganizeError::EmptyKeyword)),
            "keyword {:?} should be rejected",
            keyword
        );
    }

    fixture.assert_file_exists("anything.txt");
    assert_eq!(fixture.count_dirs(), 0, "No folder may be created");
}

#[test]
fn test_group_rejects_path_like_keyword() {
    let fixture = TestFixture::new();

    for keyword in ["..", "a/b", "."] {
        let result = arranger().group_by_keyword(fixture.path(), keyword, &mut NullReporter);
        assert!(matches!(result, Err(OrganizeError::InvalidKeyword { .. })));
    }
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_group_without_matches_reports_nothing_found() {
    let fixture = TestFixture::new();
    fixture.create_text_file("notes.txt", "x");

    let report = arranger()
        .group_by_keyword(fixture.path(), "invoice", &mut NullReporter)
        .expect("group should succeed");

    assert!(!report.has_matches());
    assert_eq!(
        report.summary_line(),
        "No files containing 'invoice' were found."
    );
    fixture.assert_dir_exists("invoice");
    fixture.assert_file_exists("notes.txt");
}

#[test]
fn test_group_is_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_text_file("tax_2023.pdf", "x");

    arranger()
        .group_by_keyword(fixture.path(), "tax", &mut NullReporter)
        .expect("first run");
    let second = arranger()
        .group_by_keyword(fixture.path(), "tax", &mut NullReporter)
        .expect("second run");

    assert_eq!(second.moved_count, 0);
    fixture.assert_file_exists("tax/tax_2023.pdf");
}

// ============================================================================
// Test Suite 3: Duplicate Removal
// ============================================================================

#[test]
fn test_dedup_removes_one_of_two_copies() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"hello"), ("b.txt", b"hello"), ("c.jpg", b"jpeg")]);

    let report = arranger()
        .deduplicate(fixture.path(), &mut NullReporter)
        .expect("dedup should succeed");

    assert_eq!(report.groups_found, 1);
    assert_eq!(report.deleted_count, 1);
    assert_eq!(fixture.count_files(), 2);
    fixture.assert_file_exists("c.jpg");

    let remaining: Vec<_> = ["a.txt", "b.txt"]
        .iter()
        .filter(|name| fixture.path().join(name).exists())
        .collect();
    assert_eq!(remaining.len(), 1, "Exactly one copy survives");
    let survivor = fixture.path().join(remaining[0]);
    assert_eq!(fs::read(survivor).expect("survivor"), b"hello");
}

#[test]
fn test_dedup_keeps_distinct_content() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("one.bin", b"1"), ("two.bin", b"2"), ("three.bin", b"3")]);

    let report = arranger()
        .deduplicate(fixture.path(), &mut NullReporter)
        .expect("dedup should succeed");

    assert_eq!(report.groups_found, 0);
    assert_eq!(report.summary_line(), "No duplicate files found.");
    assert_eq!(fixture.count_files(), 3);
}

#[test]
fn test_dedup_sorted_keeps_first_path() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("c.txt", b"same"), ("a.txt", b"same"), ("b.txt", b"same")]);

    let arranger = Arranger::from_config(&ArrangerConfig::default(), false, true)
        .expect("default config compiles");
    let report = arranger
        .deduplicate(fixture.path(), &mut NullReporter)
        .expect("dedup should succeed");

    assert_eq!(report.deleted_count, 2);
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_not_exists("b.txt");
    fixture.assert_file_not_exists("c.txt");
    assert_eq!(report.groups[0].survivor(), fixture.path().join("a.txt"));
}

#[test]
fn test_dedup_ignores_subdirectories() {
    let fixture = TestFixture::new();
    fixture.create_subdir("nested");
    fixture.create_file("nested/copy.txt", b"hello");
    fixture.create_file("top.txt", b"hello");

    let report = arranger()
        .deduplicate(fixture.path(), &mut NullReporter)
        .expect("dedup should succeed");

    assert_eq!(report.groups_found, 0);
    fixture.assert_file_exists("nested/copy.txt");
    fixture.assert_file_exists("top.txt");
}

#[test]
fn test_dedup_empty_files_are_duplicates() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("empty1", b""), ("empty2", b"")]);

    let report = arranger()
        .deduplicate(fixture.path(), &mut NullReporter)
        .expect("dedup should succeed");

    assert_eq!(report.groups_found, 1);
    assert_eq!(report.deleted_count, 1);
}

#[test]
fn test_dedup_progress_announces_groups() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"hello"), ("b.txt", b"hello")]);
    let mut groups_seen = 0;
    let mut reporter = |event: &ProgressEvent<'_>| {
        if let ProgressEvent::DuplicateGroupFound(group) = event {
            assert_eq!(group.members.len(), 2);
            groups_seen += 1;
        }
    };

    arranger()
        .deduplicate(fixture.path(), &mut reporter)
        .expect("dedup should succeed");

    assert_eq!(groups_seen, 1);
}

// ============================================================================
// Test Suite 4: Dry Run
// ============================================================================

#[test]
fn test_dry_run_classify_changes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("photo.png", b"x"), ("song.mp3", b"y")]);
    let before = fixture.list_files_recursive();

    let report = dry_run_arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("dry run should succeed");

    assert_eq!(report.moved_count, 0);
    assert_eq!(report.planned_count(), 2);
    assert_eq!(fixture.list_files_recursive(), before);
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_dry_run_group_creates_no_folder() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report_q1.pdf", "x");

    let report = dry_run_arranger()
        .group_by_keyword(fixture.path(), "report", &mut NullReporter)
        .expect("dry run should succeed");

    assert!(report.matched[0].is_planned());
    assert_eq!(fixture.count_dirs(), 0);
    fixture.assert_file_exists("report_q1.pdf");
}

#[test]
fn test_dry_run_dedup_deletes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"hello"), ("b.txt", b"hello")]);

    let report = dry_run_arranger()
        .deduplicate(fixture.path(), &mut NullReporter)
        .expect("dry run should succeed");

    assert_eq!(report.groups_found, 1);
    assert_eq!(report.deleted_count, 0);
    assert!(report.deletions.is_empty());
    assert!(
        report
            .outcomes
            .iter()
            .any(|o| matches!(o.status, FileStatus::WouldDelete { .. }))
    );
    assert_eq!(fixture.count_files(), 2);
}

// ============================================================================
// Test Suite 5: Failure Isolation and Collisions
// ============================================================================

#[test]
fn test_classify_continues_when_folder_cannot_be_created() {
    let fixture = TestFixture::new();
    // A regular file occupies the place of the images folder.
    fixture.create_text_file("images", "not a folder");
    fixture.create_files(&[("photo.png", b"png"), ("song.mp3", b"mp3")]);

    let report = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("batch should still succeed");

    assert_eq!(report.moved_count, 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0].error(),
        Some(FileError::DirectoryCreationFailed { .. })
    ));
    fixture.assert_file_exists("photo.png");
    fixture.assert_file_exists("audio/song.mp3");
}

#[test]
fn test_classify_name_collision_keeps_both_files() {
    let fixture = TestFixture::new();
    fixture.create_subdir("images");
    fixture.create_file("images/photo.png", b"older");
    fixture.create_file("photo.png", b"newer");

    let report = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("batch should still succeed");

    assert_eq!(report.moved_count, 0);
    let failure = report.failures().next().expect("collision is reported");
    assert!(matches!(
        failure.error(),
        Some(FileError::NameCollision { .. })
    ));
    assert_eq!(fs::read(fixture.path().join("images/photo.png")).unwrap(), b"older");
    assert_eq!(fs::read(fixture.path().join("photo.png")).unwrap(), b"newer");
}

#[test]
fn test_missing_directory_is_rejected() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("does-not-exist");

    let result = arranger().classify(&missing, &mut NullReporter);
    assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));

    let result = arranger().deduplicate(Path::new(""), &mut NullReporter);
    assert!(matches!(result, Err(OrganizeError::NoDirectorySelected)));
}

#[test]
fn test_file_instead_of_directory_is_rejected() {
    let fixture = TestFixture::new();
    fixture.create_text_file("plain.txt", "x");

    let result = arranger().classify(&fixture.path().join("plain.txt"), &mut NullReporter);
    assert!(matches!(result, Err(OrganizeError::NotADirectory { .. })));
}

#[cfg(unix)]
#[test]
fn test_classify_continues_after_permission_denied_move() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    fixture.create_subdir("images");
    fixture.create_files(&[("photo.png", b"png"), ("song.mp3", b"mp3"), ("notes.txt", b"txt")]);
    let images = fixture.path().join("images");
    fs::set_permissions(&images, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users can still write; the scenario cannot be provoked.
    let check = images.join(".write-check");
    if fs::write(&check, b"").is_ok() {
        let _ = fs::remove_file(&check);
        fs::set_permissions(&images, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = arranger()
        .classify(fixture.path(), &mut NullReporter)
        .expect("batch should still succeed");
    fs::set_permissions(&images, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.moved_count, 2);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, fixture.path().join("photo.png"));
    assert!(matches!(
        failures[0].error(),
        Some(FileError::MoveFailed { .. })
    ));
    fixture.assert_file_exists("photo.png");
    fixture.assert_file_not_exists("images/photo.png");
    fixture.assert_file_exists("audio/song.mp3");
    fixture.assert_file_exists("text-files/notes.txt");
}

#[cfg(unix)]
#[test]
fn test_dedup_reports_undeletable_duplicates() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TestFixture::new();
    fixture.create_subdir("locked");
    let locked = fixture.path().join("locked");
    fs::write(locked.join("a.txt"), b"hello").unwrap();
    fs::write(locked.join("b.txt"), b"hello").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users can still write; the scenario cannot be provoked.
    let check = locked.join(".write-check");
    if fs::write(&check, b"").is_ok() {
        let _ = fs::remove_file(&check);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = arranger()
        .deduplicate(&locked, &mut NullReporter)
        .expect("batch should still succeed");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.groups_found, 1);
    assert_eq!(report.deleted_count, 0);
    assert!(matches!(
        report.failures().next().and_then(|o| o.error()),
        Some(FileError::DeleteFailed { .. })
    ));
    assert!(locked.join("a.txt").exists());
    assert!(locked.join("b.txt").exists());
}

// ============================================================================
// Test Suite 6: Configuration and Filtering
// ============================================================================

#[test]
fn test_classify_with_exclude_pattern() {
    let fixture = TestFixture::new();
    let config_path = fixture.write_config(
        r#"
[filters.exclude]
patterns = ["*.tmp.txt"]
filenames = [".DS_Store"]
"#,
    );
    fixture.create_files(&[
        ("draft.tmp.txt", b"tmp"),
        ("notes.txt", b"notes"),
        (".DS_Store", b"mac"),
    ]);

    let config = ArrangerConfig::load(Some(&config_path)).expect("config loads");
    let arranger = Arranger::from_config(&config, false, false).expect("filters compile");
    let report = arranger
        .classify(fixture.path(), &mut NullReporter)
        .expect("classify should succeed");

    assert_eq!(report.moved_count, 1);
    fixture.assert_file_exists("text-files/notes.txt");
    fixture.assert_file_exists("draft.tmp.txt");
    fixture.assert_file_exists(".DS_Store");
}

#[test]
fn test_hidden_files_can_be_excluded() {
    let fixture = TestFixture::new();
    let config_path = fixture.write_config("[filters]\nenable_hidden_files = false\n");
    fixture.create_files(&[(".a.txt", b"same"), ("b.txt", b"same")]);

    let config = ArrangerConfig::load(Some(&config_path)).expect("config loads");
    let arranger = Arranger::from_config(&config, false, false).expect("filters compile");
    let report = arranger
        .deduplicate(fixture.path(), &mut NullReporter)
        .expect("dedup should succeed");

    assert_eq!(report.groups_found, 0);
    fixture.assert_file_exists(".a.txt");
    fixture.assert_file_exists("b.txt");
}

#[test]
fn test_invalid_regex_in_config_is_rejected() {
    let fixture = TestFixture::new();
    let config_path = fixture.write_config("[filters.exclude]\nregex = [\"(unclosed\"]\n");

    let config = ArrangerConfig::load(Some(&config_path)).expect("toml parses");
    let result = Arranger::from_config(&config, false, false);
    assert!(matches!(result, Err(OrganizeError::Config(_))));
}

// ============================================================================
// Test Suite 7: Command-Line Entry Point
// ============================================================================

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("arranger").chain(args.iter().copied()))
}

#[test]
fn test_cli_classify_json() {
    let fixture = TestFixture::new();
    fixture.create_text_file("photo.png", "x");
    let dir = fixture.path().to_string_lossy().to_string();

    let status = run_cli(&cli(&["--json", "classify", &dir])).expect("cli run");

    assert_eq!(status, RunStatus::Complete);
    fixture.assert_file_exists("images/photo.png");
}

#[test]
fn test_cli_group_text_output() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report_q1.pdf", "x");
    let dir = fixture.path().to_string_lossy().to_string();

    let status =
        run_cli(&cli(&["group", &dir, "--keyword", "report"])).expect("cli run");

    assert_eq!(status, RunStatus::Complete);
    fixture.assert_file_exists("report/report_q1.pdf");
}

#[test]
fn test_cli_group_without_keyword_fails() {
    let fixture = TestFixture::new();
    let dir = fixture.path().to_string_lossy().to_string();

    let result = run_cli(&cli(&["--json", "group", &dir]));
    assert!(result.is_err());
    assert_eq!(fixture.count_dirs(), 0);
}

#[test]
fn test_cli_dedup_dry_run() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.txt", b"hello"), ("b.txt", b"hello")]);
    let dir = fixture.path().to_string_lossy().to_string();

    let status = run_cli(&cli(&["--json", "--dry-run", "dedup", &dir])).expect("cli run");

    assert_eq!(status, RunStatus::Complete);
    assert_eq!(fixture.count_files(), 2);
}

#[test]
fn test_cli_partial_failure_status() {
    let fixture = TestFixture::new();
    fixture.create_text_file("images", "not a folder");
    fixture.create_text_file("photo.png", "x");
    let dir = fixture.path().to_string_lossy().to_string();

    let status = run_cli(&cli(&["--json", "classify", &dir])).expect("cli run");
    assert_eq!(status, RunStatus::PartialFailure);
}

#[test]
fn test_cli_rules() {
    let status = run_cli(&cli(&["--json", "rules"])).expect("cli run");
    assert_eq!(status, RunStatus::Complete);
}

#[test]
fn test_reporter_trait_object_accepts_closures() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "x");
    let mut started = false;
    let mut reporter = |event: &ProgressEvent<'_>| {
        if matches!(event, ProgressEvent::Started { .. }) {
            started = true;
        }
    };
    let reporter: &mut dyn ProgressReporter = &mut reporter;

    arranger()
        .classify(fixture.path(), reporter)
        .expect("classify should succeed");
    assert!(started);
}
