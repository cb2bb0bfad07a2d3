//! Category registry mapping filename suffixes to category folders.
//!
//! The registry is an ordered list of `(extension, category)` rules. A file
//! belongs to the category of the *first* rule whose extension is a suffix of
//! its name. Matching is a plain, case-sensitive string suffix test, so
//! `archive.tar.gz` matches `.gz` and `Photo.PNG` matches nothing in the
//! default table.
//!
//! # Examples
//!
//! ```
//! use arranger::file_category::CategoryRegistry;
//!
//! let registry = CategoryRegistry::default();
//! assert_eq!(registry.resolve_category("script.py"), Some("python-code"));
//! assert_eq!(registry.resolve_category("photo.png"), Some("images"));
//! assert_eq!(registry.resolve_category("unknownfile.xyz"), None);
//! ```

use serde::Serialize;

/// Canonical rule table, in resolution order.
///
/// An extension listed under two categories keeps its first position but
/// takes the later category: `.json` and `.xml` sit in the web block yet
/// resolve to `data`, and `.yml` resolves to `docker-compose`.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    // Programming and scripting
    (".py", "python-code"),
    (".js", "js-code"),
    (".java", "java-code"),
    (".cpp", "cpp-code"),
    (".c", "c-code"),
    (".cs", "csharp-code"),
    (".go", "go-code"),
    (".rb", "ruby-code"),
    (".php", "php-code"),
    (".swift", "swift-code"),
    (".kt", "kotlin-code"),
    (".ts", "typescript-code"),
    (".sh", "shell-scripts"),
    (".pl", "perl-scripts"),
    (".lua", "lua-scripts"),
    (".r", "r-scripts"),
    (".sql", "sql-scripts"),
    (".hs", "haskell-code"),
    (".scala", "scala-code"),
    (".dart", "dart-code"),
    // Web development
    (".html", "html-code"),
    (".css", "css-files"),
    (".scss", "scss-files"),
    (".less", "less-files"),
    (".jsx", "react-jsx"),
    (".tsx", "react-tsx"),
    (".vue", "vue-files"),
    (".svelte", "svelte-files"),
    (".ejs", "ejs-templates"),
    (".pug", "pug-templates"),
    (".json", "data"),
    (".xml", "data"),
    (".yaml", "yaml-data"),
    (".yml", "docker-compose"),
    // Documents
    (".pdf", "documents"),
    (".doc", "documents"),
    (".docx", "documents"),
    (".xls", "documents"),
    (".xlsx", "documents"),
    (".ppt", "documents"),
    (".pptx", "documents"),
    (".odt", "documents"),
    (".ods", "documents"),
    (".odp", "documents"),
    (".rtf", "documents"),
    (".txt", "text-files"),
    (".md", "markdown-files"),
    (".tex", "latex-files"),
    // Images
    (".jpg", "images"),
    (".jpeg", "images"),
    (".png", "images"),
    (".gif", "images"),
    (".bmp", "images"),
    (".svg", "vector-images"),
    (".webp", "images"),
    (".tiff", "images"),
    (".ico", "icons"),
    (".psd", "photoshop-files"),
    (".ai", "illustrator-files"),
    (".eps", "vector-images"),
    // Audio
    (".mp3", "audio"),
    (".wav", "audio"),
    (".ogg", "audio"),
    (".flac", "audio"),
    (".aac", "audio"),
    (".m4a", "audio"),
    (".wma", "audio"),
    // Video
    (".mp4", "videos"),
    (".mkv", "videos"),
    (".avi", "videos"),
    (".mov", "videos"),
    (".wmv", "videos"),
    (".flv", "videos"),
    (".webm", "videos"),
    (".mpeg", "videos"),
    (".mpg", "videos"),
    (".3gp", "videos"),
    // Archives
    (".zip", "archives"),
    (".rar", "archives"),
    (".tar", "archives"),
    (".gz", "archives"),
    (".7z", "archives"),
    (".bz2", "archives"),
    (".xz", "archives"),
    (".iso", "disk-images"),
    // Data and databases
    (".csv", "data"),
    (".db", "databases"),
    (".sqlite", "databases"),
    (".mdb", "databases"),
    (".accdb", "databases"),
    // Executables and packages
    (".exe", "executables"),
    (".msi", "installers"),
    (".dmg", "mac-installers"),
    (".pkg", "mac-installers"),
    (".deb", "linux-packages"),
    (".rpm", "linux-packages"),
    (".apk", "android-apps"),
    (".app", "mac-apps"),
    // Fonts
    (".ttf", "fonts"),
    (".otf", "fonts"),
    (".woff", "fonts"),
    (".woff2", "fonts"),
    (".eot", "fonts"),
    // Virtual machines and containers
    (".ova", "virtual-machines"),
    (".ovf", "virtual-machines"),
    (".vmdk", "virtual-machines"),
    (".vdi", "virtual-machines"),
    (".dockerfile", "docker-files"),
    // Configuration
    (".ini", "config-files"),
    (".cfg", "config-files"),
    (".conf", "config-files"),
    (".env", "config-files"),
    (".properties", "config-files"),
    // Miscellaneous
    (".log", "logs"),
    (".bak", "backups"),
    (".tmp", "temporary-files"),
    (".lock", "lock-files"),
    (".pid", "process-id-files"),
    (".gitignore", "git-files"),
    (".gitattributes", "git-files"),
    (".dockerignore", "docker-files"),
];

/// A single `(extension, category)` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRule {
    /// Suffix tested against the filename, usually starting with a dot.
    pub extension: String,
    /// Name of the folder files matching this rule are moved into.
    pub category: String,
}

impl CategoryRule {
    pub fn new(extension: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            category: category.into(),
        }
    }

    /// Returns true if `file_name` ends with this rule's extension.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(self.extension.as_str())
    }
}

/// Ordered, immutable list of category rules.
///
/// The order given at construction is the resolution order and is never
/// re-sorted. Several rules may share a category, and the same extension may
/// appear more than once; only its first occurrence can ever win.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    rules: Vec<CategoryRule>,
}

impl CategoryRegistry {
    /// Creates a registry from rules in resolution order.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Creates a registry from `(extension, category)` pairs in resolution order.
    ///
    /// # Examples
    ///
    /// ```
    /// use arranger::file_category::CategoryRegistry;
    ///
    /// let registry = CategoryRegistry::from_pairs(&[(".gz", "archives"), (".tar.gz", "tarballs")]);
    /// assert_eq!(registry.resolve_category("backup.tar.gz"), Some("archives"));
    /// ```
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(extension, category)| CategoryRule::new(*extension, *category))
                .collect(),
        )
    }

    /// Returns the category of the first rule whose extension ends `file_name`.
    ///
    /// Returns `None` when no rule matches; such files are left untouched.
    pub fn resolve_category(&self, file_name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(file_name))
            .map(|rule| rule.category.as_str())
    }

    /// Rules in resolution order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_RULES)
    }
}
