use deskclean::cli::{CliOptions, OrganizeCommand, run_cli_with_config, run_cli_with_options};
use deskclean::path_resolver::CollisionPolicy;
/// Integration tests for deskclean
///
/// These tests drive the CLI entry points against temporary directories and
/// check the resulting layout on disk.
///
/// Test categories:
/// 1. Layout creation and basic sorting
/// 2. Collision handling
/// 3. Dry-run mode verification
/// 4. Configuration and filtering
/// 5. Edge cases and error scenarios
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

const CATEGORY_DIRS: [&str; 9] = [
    "Images",
    "Audio",
    "Video",
    "Folders",
    "Documents",
    "Programming",
    "Applications",
    "Zips",
    "Others",
];

/// A temporary target directory with helpers for building and checking it.
struct TestFixture {
    temp_dir: TempDir,
    config_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_dir = TempDir::new().expect("Failed to create config directory");
        TestFixture {
            temp_dir,
            config_dir,
        }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_file(&self, name: &str, content: &[u8]) {
        let file_path = self.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    fn create_sized_file(&self, name: &str, size: usize) {
        self.create_file(name, &vec![b'x'; size]);
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir_all(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    fn file_len(&self, rel_path: &str) -> u64 {
        fs::metadata(self.path().join(rel_path))
            .expect("Failed to stat file")
            .len()
    }

    /// Lists every file below the target, relative to it.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        fn walk(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) {
            for entry in fs::read_dir(dir).expect("Failed to read directory").flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, root, out);
                } else if let Ok(relative) = path.strip_prefix(root) {
                    out.push(relative.to_path_buf());
                }
            }
        }

        let mut files = Vec::new();
        walk(self.path(), self.path(), &mut files);
        files.sort();
        files
    }

    /// Organizes with an empty config file, so no host configuration leaks in.
    fn organize(&self) -> Result<(), String> {
        self.organize_with_config("")
    }

    fn organize_with_config(&self, config: &str) -> Result<(), String> {
        let config_path = self.write_config(config);
        run_cli_with_config(
            OrganizeCommand::Organize { dry_run: false },
            self.path(),
            Some(&config_path),
        )
    }

    /// Writes a config file outside the target so it is not organized itself.
    fn write_config(&self, config: &str) -> PathBuf {
        let config_path = self.config_dir.path().join("deskclean.toml");
        fs::write(&config_path, config).expect("Failed to write config");
        config_path
    }

    fn empty_config(&self) -> PathBuf {
        self.write_config("")
    }

    fn options(&self) -> CliOptions {
        CliOptions {
            config_path: Some(self.empty_config()),
            ..Default::default()
        }
    }
}

// ============================================================================
// 1. Layout creation and basic sorting
// ============================================================================

#[test]
fn test_creates_every_category_directory() {
    let fixture = TestFixture::new();

    fixture.organize().expect("Organize should succeed");

    fixture.assert_dir_exists("CleanedFiles");
    for dir in CATEGORY_DIRS {
        fixture.assert_dir_exists(&format!("CleanedFiles/{}", dir));
    }
}

#[test]
fn test_known_extensions_go_to_their_category() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", b"png");
    fixture.create_file("song.mp3", b"mp3");
    fixture.create_file("clip.mkv", b"mkv");
    fixture.create_file("report.pdf", b"pdf");
    fixture.create_file("main.go", b"package main");
    fixture.create_file("installer.dmg", b"dmg");
    fixture.create_file("backup.zip", b"zip");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Images/photo.png");
    fixture.assert_file_exists("CleanedFiles/Audio/song.mp3");
    fixture.assert_file_exists("CleanedFiles/Video/clip.mkv");
    fixture.assert_file_exists("CleanedFiles/Documents/report.pdf");
    fixture.assert_file_exists("CleanedFiles/Programming/main.go");
    fixture.assert_file_exists("CleanedFiles/Applications/installer.dmg");
    fixture.assert_file_exists("CleanedFiles/Zips/backup.zip");

    for name in ["photo.png", "song.mp3", "clip.mkv", "report.pdf", "main.go"] {
        fixture.assert_file_not_exists(name);
    }
}

#[test]
fn test_unknown_and_missing_extensions_go_to_others() {
    let fixture = TestFixture::new();
    fixture.create_file("notes.xyz", b"?");
    fixture.create_file("Makefile", b"all:");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Others/notes.xyz");
    fixture.assert_file_exists("CleanedFiles/Others/Makefile");
}

#[test]
fn test_extension_matching_ignores_case() {
    let fixture = TestFixture::new();
    fixture.create_file("IMAGE.PNG", b"png");
    fixture.create_file("Report.PdF", b"pdf");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Images/IMAGE.PNG");
    fixture.assert_file_exists("CleanedFiles/Documents/Report.PdF");
}

#[test]
fn test_compound_extension_uses_last_component() {
    let fixture = TestFixture::new();
    fixture.create_file("archive.tar.gz", b"gz");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Zips/archive.tar.gz");
}

#[test]
fn test_subdirectory_moves_to_folders_with_contents() {
    let fixture = TestFixture::new();
    fixture.create_subdir("projects");
    fixture.create_file("projects/readme.txt", b"hello");
    fixture.create_subdir("photos.png");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Folders/projects/readme.txt");
    fixture.assert_dir_exists("CleanedFiles/Folders/photos.png");
    fixture.assert_file_not_exists("projects");
}

#[test]
fn test_hidden_files_are_organized_by_default() {
    let fixture = TestFixture::new();
    fixture.create_file(".bashrc", b"export A=1");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Others/.bashrc");
}

#[test]
fn test_file_content_is_preserved() {
    let fixture = TestFixture::new();
    fixture.create_file("data.csv", b"a,b,c\n1,2,3\n");

    fixture.organize().expect("Organize should succeed");

    let content = fs::read(fixture.path().join("CleanedFiles/Documents/data.csv"))
        .expect("Failed to read moved file");
    assert_eq!(content, b"a,b,c\n1,2,3\n");
}

#[test]
fn test_names_with_spaces_and_unicode() {
    let fixture = TestFixture::new();
    fixture.create_file("my holiday photo.jpg", b"jpg");
    fixture.create_file("résumé (final).docx", b"docx");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Images/my holiday photo.jpg");
    fixture.assert_file_exists("CleanedFiles/Documents/résumé (final).docx");
}

#[test]
fn test_existing_arranged_directory_is_not_moved() {
    let fixture = TestFixture::new();
    fixture.create_file("CleanedFiles/Images/old.png", b"old");
    fixture.create_file("new.png", b"new");

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Images/old.png");
    fixture.assert_file_exists("CleanedFiles/Images/new.png");
    fixture.assert_file_not_exists("CleanedFiles/Folders/CleanedFiles");
}

#[test]
fn test_second_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", b"png");
    fixture.create_subdir("stuff");

    fixture.organize().expect("First run should succeed");
    let after_first = fixture.list_files_recursive();

    fixture.organize().expect("Second run should succeed");
    let after_second = fixture.list_files_recursive();

    assert_eq!(after_first, after_second);
    fixture.assert_dir_exists("CleanedFiles/Folders/stuff");
}

// ============================================================================
// 2. Collision handling
// ============================================================================

#[test]
fn test_same_size_collision_gets_numbered_name() {
    let fixture = TestFixture::new();
    fixture.create_sized_file("CleanedFiles/Images/photo.png", 1024);
    fixture.create_sized_file("photo.png", 1024);

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Images/photo.png");
    fixture.assert_file_exists("CleanedFiles/Images/photo_1.png");
    fixture.assert_file_not_exists("photo.png");
}

#[test]
fn test_numbering_skips_taken_names() {
    let fixture = TestFixture::new();
    fixture.create_sized_file("CleanedFiles/Documents/report.pdf", 10);
    fixture.create_sized_file("CleanedFiles/Documents/report_1.pdf", 10);
    fixture.create_sized_file("CleanedFiles/Documents/report_2.pdf", 10);
    fixture.create_sized_file("report.pdf", 10);

    fixture.organize().expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Documents/report_3.pdf");
    fixture.assert_file_not_exists("report.pdf");
}

#[test]
fn test_size_mismatch_overwrites_by_default() {
    let fixture = TestFixture::new();
    fixture.create_sized_file("CleanedFiles/Images/photo.png", 1024);
    fixture.create_sized_file("photo.png", 2048);

    fixture.organize().expect("Organize should succeed");

    assert_eq!(fixture.file_len("CleanedFiles/Images/photo.png"), 2048);
    fixture.assert_file_not_exists("CleanedFiles/Images/photo_1.png");
    fixture.assert_file_not_exists("photo.png");
}

#[test]
fn test_on_conflict_rename_keeps_both() {
    let fixture = TestFixture::new();
    fixture.create_sized_file("CleanedFiles/Images/photo.png", 1024);
    fixture.create_sized_file("photo.png", 2048);

    let options = CliOptions {
        on_conflict: Some(CollisionPolicy::Rename),
        ..fixture.options()
    };
    run_cli_with_options(
        OrganizeCommand::Organize { dry_run: false },
        fixture.path(),
        &options,
    )
    .expect("Organize should succeed");

    assert_eq!(fixture.file_len("CleanedFiles/Images/photo.png"), 1024);
    assert_eq!(fixture.file_len("CleanedFiles/Images/photo_1.png"), 2048);
}

#[test]
fn test_on_conflict_skip_leaves_source_in_place() {
    let fixture = TestFixture::new();
    fixture.create_sized_file("CleanedFiles/Images/photo.png", 1024);
    fixture.create_sized_file("photo.png", 2048);

    let options = CliOptions {
        on_conflict: Some(CollisionPolicy::Skip),
        ..fixture.options()
    };
    run_cli_with_options(
        OrganizeCommand::Organize { dry_run: false },
        fixture.path(),
        &options,
    )
    .expect("Organize should succeed");

    assert_eq!(fixture.file_len("CleanedFiles/Images/photo.png"), 1024);
    assert_eq!(fixture.file_len("photo.png"), 2048);
}

// ============================================================================
// 3. Dry-run mode verification
// ============================================================================

#[test]
fn test_dry_run_changes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", b"png");
    fixture.create_file("report.pdf", b"pdf");
    fixture.create_subdir("stuff");

    run_cli_with_config(
        OrganizeCommand::Organize { dry_run: true },
        fixture.path(),
        Some(&fixture.empty_config()),
    )
        .expect("Dry run should succeed");

    fixture.assert_file_exists("photo.png");
    fixture.assert_file_exists("report.pdf");
    fixture.assert_dir_exists("stuff");
    fixture.assert_file_not_exists("CleanedFiles");
}

#[test]
fn test_json_output_run_succeeds() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", b"png");

    let options = CliOptions {
        json: true,
        ..fixture.options()
    };
    run_cli_with_options(
        OrganizeCommand::Organize { dry_run: false },
        fixture.path(),
        &options,
    )
    .expect("JSON run should succeed");

    fixture.assert_file_exists("CleanedFiles/Images/photo.png");
}

// ============================================================================
// 4. Configuration and filtering
// ============================================================================

#[test]
fn test_config_excludes_are_left_in_place() {
    let fixture = TestFixture::new();
    fixture.create_file(".DS_Store", b"");
    fixture.create_file("download.part", b"partial");
    fixture.create_file("photo.png", b"png");

    fixture
        .organize_with_config(
            r#"
[filters.exclude]
filenames = [".DS_Store"]
patterns = ["*.part"]
"#,
        )
        .expect("Organize should succeed");

    fixture.assert_file_exists(".DS_Store");
    fixture.assert_file_exists("download.part");
    fixture.assert_file_exists("CleanedFiles/Images/photo.png");
}

#[test]
fn test_config_can_skip_hidden_files() {
    let fixture = TestFixture::new();
    fixture.create_file(".env", b"SECRET=1");

    fixture
        .organize_with_config("[filters]\nenable_hidden_files = false\n")
        .expect("Organize should succeed");

    fixture.assert_file_exists(".env");
}

#[test]
fn test_config_collision_policy() {
    let fixture = TestFixture::new();
    fixture.create_sized_file("CleanedFiles/Documents/notes.txt", 5);
    fixture.create_sized_file("notes.txt", 9);

    fixture
        .organize_with_config("[collision]\non_size_mismatch = \"rename\"\n")
        .expect("Organize should succeed");

    assert_eq!(fixture.file_len("CleanedFiles/Documents/notes.txt"), 5);
    assert_eq!(fixture.file_len("CleanedFiles/Documents/notes_1.txt"), 9);
}

#[test]
fn test_config_extension_overrides() {
    let fixture = TestFixture::new();
    fixture.create_file("picture.webp", b"webp");
    fixture.create_file("track.FLAC", b"flac");

    fixture
        .organize_with_config(
            r#"
[extensions]
Images = ["webp"]
Audio = [".flac"]
"#,
        )
        .expect("Organize should succeed");

    fixture.assert_file_exists("CleanedFiles/Images/picture.webp");
    fixture.assert_file_exists("CleanedFiles/Audio/track.FLAC");
}

#[test]
fn test_config_unknown_category_is_rejected() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", b"png");

    let result = fixture.organize_with_config("[extensions]\nPictures = [\"webp\"]\n");

    assert!(result.is_err());
    fixture.assert_file_exists("photo.png");
    fixture.assert_file_not_exists("CleanedFiles");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("nope.toml");

    let result = run_cli_with_config(
        OrganizeCommand::Organize { dry_run: false },
        fixture.path(),
        Some(&missing),
    );

    assert!(result.is_err());
}

// ============================================================================
// 5. Edge cases and error scenarios
// ============================================================================

#[test]
fn test_missing_target_is_fatal() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("Desktop");

    let result = run_cli_with_config(
        OrganizeCommand::Organize { dry_run: false },
        &missing,
        Some(&fixture.empty_config()),
    );

    let error = result.expect_err("Missing target should fail");
    assert!(error.contains("not found"), "unexpected error: {}", error);
    assert!(!missing.exists());
}

#[test]
fn test_target_that_is_a_file_is_fatal() {
    let fixture = TestFixture::new();
    fixture.create_file("not_a_dir.txt", b"text");

    let result = run_cli_with_config(
        OrganizeCommand::Organize { dry_run: false },
        &fixture.path().join("not_a_dir.txt"),
        Some(&fixture.empty_config()),
    );

    assert!(result.is_err());
}

#[test]
fn test_empty_directory_only_gets_layout() {
    let fixture = TestFixture::new();

    fixture.organize().expect("Organize should succeed");

    assert!(fixture.list_files_recursive().is_empty());
}

#[test]
fn test_list_categories() {
    let fixture = TestFixture::new();

    run_cli_with_config(
        OrganizeCommand::ListCategories,
        fixture.path(),
        Some(&fixture.empty_config()),
    )
        .expect("Listing categories should succeed");

    fixture.assert_file_not_exists("CleanedFiles");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_names_keep_their_bytes() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    let first = OsStr::from_bytes(b"a\xff.txt");
    let second = OsStr::from_bytes(b"a\xfe.txt");
    fs::write(fixture.path().join(first), vec![b'1'; 18]).expect("Failed to write file");
    fs::write(fixture.path().join(second), vec![b'2'; 6]).expect("Failed to write file");

    fixture.organize().expect("Organize should succeed");

    let documents = fixture.path().join("CleanedFiles/Documents");
    assert_eq!(
        fs::read(documents.join(first)).expect("Failed to read moved file"),
        vec![b'1'; 18]
    );
    assert_eq!(
        fs::read(documents.join(second)).expect("Failed to read moved file"),
        vec![b'2'; 6]
    );
    assert_eq!(fs::read_dir(&documents).expect("Failed to list").count(), 2);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_moved_as_links() {
    let fixture = TestFixture::new();
    let outside = TempDir::new().expect("Failed to create temp directory");
    fs::write(outside.path().join("big.bin"), vec![0u8; 4096]).expect("Failed to write file");
    std::os::unix::fs::symlink(outside.path(), fixture.path().join("linkdir"))
        .expect("Failed to create symlink");
    std::os::unix::fs::symlink(fixture.path().join("gone.pdf"), fixture.path().join("dangling.pdf"))
        .expect("Failed to create symlink");

    fixture.organize().expect("Organize should succeed");

    let arranged = fixture.path().join("CleanedFiles");
    let linkdir = fs::symlink_metadata(arranged.join("Others/linkdir")).expect("lstat");
    assert!(linkdir.file_type().is_symlink());
    let dangling = fs::symlink_metadata(arranged.join("Documents/dangling.pdf")).expect("lstat");
    assert!(dangling.file_type().is_symlink());
    assert!(outside.path().join("big.bin").is_file());
    fixture.assert_file_not_exists("CleanedFiles/Folders/linkdir");
}
