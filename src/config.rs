use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gallery::DEFAULT_THUMBNAIL_SIZE;
use crate::gallery::scan::{DEFAULT_EXTENSIONS, normalize_extensions};

/// Gallery settings file looked up in the gallery directory.
pub const GALLERY_CONFIG_FILE: &str = "config.toml";

/// On-disk shape of the gallery settings file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GalleryConfigFile {
    pub gallery_title: Option<String>,
    pub thumbnail_size: Option<u32>,
    pub file_extensions: Option<Vec<String>>,
    pub default_caption: Option<String>,
    pub pretty_json: Option<bool>,
}

impl GalleryConfigFile {
    /// Template written by `--write-config`.
    pub fn template() -> Self {
        Self {
            gallery_title: Some("My Gallery".to_string()),
            thumbnail_size: Some(DEFAULT_THUMBNAIL_SIZE),
            file_extensions: Some(DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()),
            default_caption: Some("My Image".to_string()),
            pretty_json: Some(false),
        }
    }
}

/// Resolved gallery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    pub gallery_title: Option<String>,
    pub thumbnail_size: u32,
    pub file_extensions: Vec<String>,
    pub default_caption: Option<String>,
    pub pretty_json: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gallery_title: None,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            file_extensions: normalize_extensions(DEFAULT_EXTENSIONS),
            default_caption: None,
            pretty_json: false,
        }
    }
}

impl GalleryConfig {
    /// Apply the keys present in `file` over the defaults.
    pub fn from_file_contents(file: GalleryConfigFile) -> Self {
        let mut cfg = Self::default();
        if let Some(title) = file.gallery_title {
            cfg.gallery_title = Some(title);
        }
        if let Some(size) = file.thumbnail_size {
            cfg.thumbnail_size = size.max(1);
        }
        if let Some(exts) = file.file_extensions {
            cfg.file_extensions = normalize_extensions(exts);
        }
        if let Some(caption) = file.default_caption {
            cfg.default_caption = Some(caption);
        }
        if let Some(pretty) = file.pretty_json {
            cfg.pretty_json = pretty;
        }
        cfg
    }

    /// Read settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gallery config {}", path.display()))?;
        let file: GalleryConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse gallery config {}", path.display()))?;
        Ok(Self::from_file_contents(file))
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_path(path)
        } else {
            tracing::info!(path = %path.display(), "no gallery config, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, flags: &ConfigFlags) -> Self {
        if let Some(title) = &flags.title {
            self.gallery_title = Some(title.clone());
        }
        if let Some(size) = flags.thumb_size {
            self.thumbnail_size = size.max(1);
        }
        if let Some(caption) = &flags.default_caption {
            self.default_caption = Some(caption.clone());
        }
        self
    }
}

/// Write the settings template to `path`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_default_gallery_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&GalleryConfigFile::template())
        .context("Failed to serialize default gallery config")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write gallery config {}", path.display()))
}

/// Command-line defaults stored in a `.snekkjarc` file, one flag per line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_images: bool,
    pub no_preload: bool,
    pub perf: bool,
    pub force_half_cell: bool,
    pub thumb_size: Option<u32>,
    pub title: Option<String>,
    pub default_caption: Option<String>,
    pub render_debug_log: Option<PathBuf>,
}

/// Flags followed by a value, either `--flag value` or `--flag=value`.
const VALUE_FLAGS: &[&str] = &["thumb-size", "title", "default-caption", "render-debug-log"];

impl ConfigFlags {
    /// Merge `other` over `self`: switches accumulate, values in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        fn pick<T: Clone>(mine: &Option<T>, theirs: &Option<T>) -> Option<T> {
            theirs.as_ref().or(mine.as_ref()).cloned()
        }
        Self {
            no_images: self.no_images || other.no_images,
            no_preload: self.no_preload || other.no_preload,
            perf: self.perf || other.perf,
            force_half_cell: self.force_half_cell || other.force_half_cell,
            thumb_size: other.thumb_size.or(self.thumb_size),
            title: pick(&self.title, &other.title),
            default_caption: pick(&self.default_caption, &other.default_caption),
            render_debug_log: pick(&self.render_debug_log, &other.render_debug_log),
        }
    }

    fn apply(&mut self, name: &str, value: Option<&str>) {
        match (name, value) {
            ("no-images", _) => self.no_images = true,
            ("no-preload", _) => self.no_preload = true,
            ("perf", _) => self.perf = true,
            ("force-half-cell", _) => self.force_half_cell = true,
            ("thumb-size", Some(size)) => self.thumb_size = size.parse().ok(),
            ("title", Some(title)) => self.title = Some(title.to_owned()),
            ("default-caption", Some(caption)) => self.default_caption = Some(caption.to_owned()),
            ("render-debug-log", Some(path)) => self.render_debug_log = Some(PathBuf::from(path)),
            _ => {}
        }
    }

    /// Lines written by [`save_config_flags`].
    ///
    /// Title and default caption are not saved since they usually contain
    /// spaces.
    fn to_lines(&self) -> Vec<String> {
        let switches = [
            (self.no_images, "--no-images"),
            (self.no_preload, "--no-preload"),
            (self.perf, "--perf"),
            (self.force_half_cell, "--force-half-cell"),
        ];
        let mut lines: Vec<String> = switches
            .into_iter()
            .filter_map(|(on, flag)| on.then(|| flag.to_string()))
            .collect();
        if let Some(size) = self.thumb_size {
            lines.push(format!("--thumb-size {size}"));
        }
        if let Some(path) = &self.render_debug_log {
            lines.push(format!("--render-debug-log {}", path.display()));
        }
        lines
    }
}

/// Saved defaults: `$XDG_CONFIG_HOME/snekkja/config` or the platform
/// equivalent, falling back to the local override file.
pub fn global_config_path() -> PathBuf {
    user_config_dir().map_or_else(local_override_path, |dir| dir.join("snekkja").join("config"))
}

fn user_config_dir() -> Option<PathBuf> {
    let var = |name: &str| std::env::var_os(name).map(PathBuf::from);
    if cfg!(target_os = "windows") {
        var("APPDATA")
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| home.join("Library").join("Application Support"))
    } else {
        var("XDG_CONFIG_HOME").or_else(|| var("HOME").map(|home| home.join(".config")))
    }
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".snekkjarc")
}

/// Read a flags file. A missing file yields no flags; `#` starts a comment line.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ConfigFlags::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read config {}", path.display()));
        }
    };
    let tokens: Vec<String> = content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(ToOwned::to_owned)
        .collect();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let mut content = String::from("# snekkja defaults (saved with --save)\n");
    for line in flags.to_lines() {
        content.push_str(&line);
        content.push('\n');
    }
    fs::write(path, content).with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => {
            Err(err).with_context(|| format!("Failed to remove {}", path.display()))
        }
        _ => Ok(()),
    }
}

/// Extract known flags from raw arguments; everything else is skipped.
///
/// Title and default caption are accepted so command-line overrides merge
/// like every other flag.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        let Some(flag) = token.strip_prefix("--") else {
            continue;
        };
        if let Some((name, value)) = flag.split_once('=') {
            flags.apply(name, Some(value));
        } else if VALUE_FLAGS.contains(&flag) {
            let value = tokens.next();
            flags.apply(flag, value.map(String::as_str));
        } else {
            flags.apply(flag, None);
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "snekkja".to_string(),
            "--no-images".to_string(),
            "--thumb-size".to_string(),
            "64".to_string(),
            "--title=Summer".to_string(),
            "--render-debug-log=render.log".to_string(),
            "--force-half-cell".to_string(),
            "photos".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_images);
        assert_eq!(flags.thumb_size, Some(64));
        assert_eq!(flags.title.as_deref(), Some("Summer"));
        assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
        assert!(flags.force_half_cell);
        assert!(!flags.no_preload);
    }

    #[test]
    fn test_invalid_thumb_size_is_ignored() {
        let args = vec!["--thumb-size".to_string(), "big".to_string()];
        assert_eq!(parse_flag_tokens(&args).thumb_size, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            perf: true,
            thumb_size: Some(80),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_preload: true,
            thumb_size: Some(120),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.perf);
        assert!(merged.no_preload);
        assert_eq!(merged.thumb_size, Some(120));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".snekkjarc");
        let flags = ConfigFlags {
            no_images: true,
            no_preload: true,
            perf: true,
            force_half_cell: true,
            thumb_size: Some(72),
            render_debug_log: Some(PathBuf::from("render.log")),
            ..ConfigFlags::default()
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_gallery_config_defaults() {
        let cfg = GalleryConfig::default();
        assert_eq!(cfg.thumbnail_size, 100);
        assert!(cfg.file_extensions.contains(&"webp".to_string()));
        assert_eq!(cfg.gallery_title, None);
        assert!(!cfg.pretty_json);
    }

    #[test]
    fn test_gallery_config_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(GALLERY_CONFIG_FILE);
        fs::write(&path, "gallery_title = \"Birds\"\nfile_extensions = [\"PNG\", \".tif\"]\n")
            .unwrap();

        let cfg = GalleryConfig::from_path(&path).unwrap();
        assert_eq!(cfg.gallery_title.as_deref(), Some("Birds"));
        assert_eq!(cfg.file_extensions, vec!["png", "tif"]);
        assert_eq!(cfg.thumbnail_size, 100);
        assert_eq!(cfg.default_caption, None);
    }

    #[test]
    fn test_gallery_config_rejects_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(GALLERY_CONFIG_FILE);
        fs::write(&path, "thumbnail_size = \"huge\"").unwrap();
        assert!(GalleryConfig::from_path(&path).is_err());
    }

    #[test]
    fn test_write_default_config_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(GALLERY_CONFIG_FILE);
        write_default_gallery_config(&path).unwrap();

        let cfg = GalleryConfig::from_path(&path).unwrap();
        assert_eq!(cfg.gallery_title.as_deref(), Some("My Gallery"));
        assert_eq!(cfg.default_caption.as_deref(), Some("My Image"));
        assert_eq!(cfg.thumbnail_size, 100);
    }

    #[test]
    fn test_overrides_apply_over_file_settings() {
        let flags = ConfigFlags {
            title: Some("Override".into()),
            thumb_size: Some(0),
            ..ConfigFlags::default()
        };
        let cfg = GalleryConfig::default().with_overrides(&flags);
        assert_eq!(cfg.gallery_title.as_deref(), Some("Override"));
        assert_eq!(cfg.thumbnail_size, 1);
    }
}
