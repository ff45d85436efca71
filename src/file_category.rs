//! Category registry: the fixed set of destination categories and the
//! extension lists that feed them.
//!
//! The registry is built once per run and handed to the classifier by
//! reference, so tests can inject their own lists.
//!
//! # Examples
//!
//! ```
//! use deskclean::file_category::{Category, CategoryRegistry};
//!
//! let registry = CategoryRegistry::default();
//! assert_eq!(registry.extension_to_category("png"), Some(Category::Images));
//! assert_eq!(registry.extension_to_category("MP3"), Some(Category::Audio));
//! assert_eq!(registry.extension_to_category("xyz"), None);
//! ```
use serde::Serialize;
use std::collections::HashMap;

/// A destination bucket inside the arranged directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Image files (PNG, JPG, HEIC, etc.)
    Images,
    /// Audio files (MP3, WAV, M4A, etc.)
    Audio,
    /// Video files (MP4, MOV, MKV, etc.)
    Video,
    /// Every sub-directory of the target, regardless of content
    Folders,
    /// Documents, spreadsheets and presentations
    Documents,
    /// Source code, markup and data files
    Programming,
    /// Installers and application bundles
    Applications,
    /// Archives and compressed files
    Zips,
    /// Anything with an unknown or missing extension
    Others,
}

impl Category {
    /// Every category, in the order their directories are created.
    pub const ALL: [Category; 9] = [
        Category::Images,
        Category::Audio,
        Category::Video,
        Category::Folders,
        Category::Documents,
        Category::Programming,
        Category::Applications,
        Category::Zips,
        Category::Others,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use deskclean::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Zips.dir_name(), "Zips");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Audio => "Audio",
            Category::Video => "Video",
            Category::Folders => "Folders",
            Category::Documents => "Documents",
            Category::Programming => "Programming",
            Category::Applications => "Applications",
            Category::Zips => "Zips",
            Category::Others => "Others",
        }
    }

    /// Looks up a category by its directory name, ignoring case.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|category| category.dir_name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "raw", "heic"];

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "midi", "mid", "aiff", "aac", "wma", "logicx", "m4a",
];

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "mpeg", "wmv"];

const DOCUMENT_EXTENSIONS: &[&str] = &[
    "doc", "docx", "pdf", "txt", "rtf", "csv", "xls", "xlsx", "ppt", "pptx", "numbers",
];

const PROGRAMMING_EXTENSIONS: &[&str] = &[
    "php", "js", "html", "css", "ts", "tsx", "jsx", "json", "xml", "svg", "py", "jar", "java",
    "asm", "yml", "odb", "go", "pem", "sql",
];

const APPLICATION_EXTENSIONS: &[&str] = &["app", "dmg", "pkg", "vst"];

const ZIP_EXTENSIONS: &[&str] = &["zip", "rar", "tar", "tgz", "gzip", "gz"];

/// Built-in extension lists in registration order.
///
/// `Folders` and `Others` have no lists: they are assigned by the classifier.
pub const STANDARD_LISTS: &[(Category, &[&str])] = &[
    (Category::Images, IMAGE_EXTENSIONS),
    (Category::Audio, AUDIO_EXTENSIONS),
    (Category::Video, VIDEO_EXTENSIONS),
    (Category::Documents, DOCUMENT_EXTENSIONS),
    (Category::Programming, PROGRAMMING_EXTENSIONS),
    (Category::Applications, APPLICATION_EXTENSIONS),
    (Category::Zips, ZIP_EXTENSIONS),
];

/// An extension listed under two categories while building the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConflict {
    /// The normalized extension.
    pub extension: String,
    /// The category registered first, which keeps the extension.
    pub kept: Category,
    /// The later category whose entry was ignored.
    pub ignored: Category,
}

/// Maps lower-cased file extensions to categories.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    extension_map: HashMap<String, Category>,
    conflicts: Vec<ExtensionConflict>,
    unreachable: Vec<String>,
}

impl CategoryRegistry {
    /// Creates a registry from the built-in extension lists.
    pub fn new() -> Self {
        Self::from_lists(STANDARD_LISTS)
    }

    /// Creates a registry from the given per-category lists.
    ///
    /// When an extension appears under two categories, the first registered
    /// category keeps it and the clash is recorded in [`conflicts`].
    /// Compound entries such as `tar.gz` can never match a single extension
    /// segment; they are skipped and recorded in [`unreachable`].
    ///
    /// [`conflicts`]: CategoryRegistry::conflicts
    /// [`unreachable`]: CategoryRegistry::unreachable
    pub fn from_lists(lists: &[(Category, &[&str])]) -> Self {
        let mut registry = Self {
            extension_map: HashMap::new(),
            conflicts: Vec::new(),
            unreachable: Vec::new(),
        };

        for (category, extensions) in lists {
            for ext in extensions.iter() {
                registry.register(ext, *category);
            }
        }

        registry
    }

    fn register(&mut self, ext: &str, category: Category) {
        let ext = normalize_extension(ext);
        if ext.contains('.') {
            self.unreachable.push(ext);
            return;
        }

        match self.extension_map.get(&ext) {
            Some(&kept) if kept == category => {}
            Some(&kept) => self.conflicts.push(ExtensionConflict {
                extension: ext,
                kept,
                ignored: category,
            }),
            None => {
                self.extension_map.insert(ext, category);
            }
        }
    }

    /// Adds or replaces an extension mapping.
    ///
    /// Unlike list registration this always wins, so user configuration can
    /// move an extension to a different category.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(normalize_extension(ext), category);
    }

    /// Maps a file extension to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use deskclean::file_category::{Category, CategoryRegistry};
    ///
    /// let registry = CategoryRegistry::default();
    /// assert_eq!(registry.extension_to_category("pdf"), Some(Category::Documents));
    /// assert_eq!(registry.extension_to_category(".PDF"), Some(Category::Documents));
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&normalize_extension(ext)).copied()
    }

    /// Cross-category duplicates found while building from lists.
    pub fn conflicts(&self) -> &[ExtensionConflict] {
        &self.conflicts
    }

    /// Compound entries that were skipped while building from lists.
    pub fn unreachable(&self) -> &[String] {
        &self.unreachable
    }

    /// Returns the extensions mapped to `category`, sorted.
    pub fn extensions_for(&self, category: Category) -> Vec<&str> {
        let mut extensions: Vec<&str> = self
            .extension_map
            .iter()
            .filter(|&(_, mapped)| *mapped == category)
            .map(|(ext, _)| ext.as_str())
            .collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        let names: Vec<&str> = Category::ALL.iter().map(Category::dir_name).collect();
        assert_eq!(
            names,
            vec![
                "Images",
                "Audio",
                "Video",
                "Folders",
                "Documents",
                "Programming",
                "Applications",
                "Zips",
                "Others"
            ]
        );
    }

    #[test]
    fn test_from_dir_name() {
        assert_eq!(Category::from_dir_name("images"), Some(Category::Images));
        assert_eq!(Category::from_dir_name("ZIPS"), Some(Category::Zips));
        assert_eq!(Category::from_dir_name("fonts"), None);
    }

    #[test]
    fn test_standard_lists_have_no_cross_category_duplicates() {
        let registry = CategoryRegistry::new();
        assert!(
            registry.conflicts().is_empty(),
            "duplicate extensions: {:?}",
            registry.conflicts()
        );
        assert!(registry.unreachable().is_empty());
    }

    #[test]
    fn test_extension_to_category() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.extension_to_category("heic"), Some(Category::Images));
        assert_eq!(registry.extension_to_category("m4a"), Some(Category::Audio));
        assert_eq!(registry.extension_to_category("mkv"), Some(Category::Video));
        assert_eq!(
            registry.extension_to_category("numbers"),
            Some(Category::Documents)
        );
        assert_eq!(
            registry.extension_to_category("svg"),
            Some(Category::Programming)
        );
        assert_eq!(
            registry.extension_to_category("dmg"),
            Some(Category::Applications)
        );
        assert_eq!(registry.extension_to_category("tgz"), Some(Category::Zips));
        assert_eq!(registry.extension_to_category(""), None);
    }

    #[test]
    fn test_extension_to_category_case_insensitive() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.extension_to_category("PNG"), Some(Category::Images));
        assert_eq!(registry.extension_to_category("Mp3"), Some(Category::Audio));
    }

    #[test]
    fn test_first_registered_category_wins() {
        let lists: &[(Category, &[&str])] = &[
            (Category::Documents, &["csv", "txt"]),
            (Category::Programming, &["csv", "py"]),
        ];
        let registry = CategoryRegistry::from_lists(lists);

        assert_eq!(
            registry.extension_to_category("csv"),
            Some(Category::Documents)
        );
        assert_eq!(
            registry.conflicts(),
            &[ExtensionConflict {
                extension: "csv".to_string(),
                kept: Category::Documents,
                ignored: Category::Programming,
            }]
        );
    }

    #[test]
    fn test_same_category_repeat_is_not_a_conflict() {
        let lists: &[(Category, &[&str])] = &[(Category::Zips, &["rar", "zip", "RAR"])];
        let registry = CategoryRegistry::from_lists(lists);
        assert!(registry.conflicts().is_empty());
        assert_eq!(registry.extensions_for(Category::Zips), vec!["rar", "zip"]);
    }

    #[test]
    fn test_compound_extension_is_unreachable() {
        let lists: &[(Category, &[&str])] = &[(Category::Zips, &["tar.gz", "gz"])];
        let registry = CategoryRegistry::from_lists(lists);
        assert_eq!(registry.unreachable(), &["tar.gz".to_string()]);
        assert_eq!(registry.extension_to_category("tar.gz"), None);
        assert_eq!(registry.extension_to_category("gz"), Some(Category::Zips));
    }

    #[test]
    fn test_custom_mapping_overrides() {
        let mut registry = CategoryRegistry::default();
        registry.add_extension_mapping(".SVG", Category::Images);
        registry.add_extension_mapping("webp", Category::Images);

        assert_eq!(registry.extension_to_category("svg"), Some(Category::Images));
        assert_eq!(registry.extension_to_category("webp"), Some(Category::Images));
    }

    #[test]
    fn test_folders_and_others_have_no_extensions() {
        let registry = CategoryRegistry::default();
        assert!(registry.extensions_for(Category::Folders).is_empty());
        assert!(registry.extensions_for(Category::Others).is_empty());
    }
}
