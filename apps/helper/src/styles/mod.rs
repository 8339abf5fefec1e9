//! Style Manager: discovers CSS styles on disk and tracks the user's selection.
//!
//! A style file declares its display name and author link on its first line:
//! `/* Cloyola Grey $https://github.com/cloyola */`

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;

const STYLE_EXTENSION: &str = "css";

/// Metadata for one style, keyed by display name in [`StyleManager::get_styles`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleInfo {
    pub file_name: String,
    pub author_link: String,
}

#[derive(Debug, Clone)]
pub struct StyleManager {
    styles_dir: PathBuf,
    selected: Option<String>,
}

impl StyleManager {
    pub fn new(styles_dir: impl Into<PathBuf>) -> Self {
        Self {
            styles_dir: styles_dir.into(),
            selected: None,
        }
    }

    /// Returns every valid style in the directory, sorted by display name.
    /// A missing or unreadable directory yields an empty map.
    pub fn get_styles(&self) -> BTreeMap<String, StyleInfo> {
        let mut styles = BTreeMap::new();

        let entries = match fs::read_dir(&self.styles_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Cannot read styles directory {}: {e}",
                    self.styles_dir.display()
                );
                return styles;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STYLE_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let content = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("Skipping unreadable style {}: {e}", path.display());
                    continue;
                }
            };
            match parse_style_header(content.lines().next().unwrap_or_default()) {
                Some((name, author_link)) => {
                    debug!("Found style '{name}' in {file_name}");
                    styles.insert(
                        name,
                        StyleInfo {
                            file_name: file_name.to_string(),
                            author_link,
                        },
                    );
                }
                None => warn!("Skipping style {file_name}: missing '/* Name$link */' header"),
            }
        }

        styles
    }

    pub fn set_selected_style(&mut self, name: &str) -> Result<(), AppError> {
        if !self.get_styles().contains_key(name) {
            return Err(AppError::NotFound(format!("Style '{name}' not found")));
        }
        self.selected = Some(name.to_string());
        Ok(())
    }

    #[cfg(test)]
    pub fn selected_style(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Reads the stylesheet of the selected style.
    pub fn selected_style_css(&self) -> Result<String, AppError> {
        let name = self
            .selected
            .as_deref()
            .ok_or_else(|| AppError::Validation("No style selected".to_string()))?;
        let styles = self.get_styles();
        let info = styles
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("Style '{name}' not found")))?;
        let path = self.styles_dir.join(&info.file_name);
        fs::read_to_string(&path).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to read style {}: {e}",
                path.display()
            ))
        })
    }
}

/// Parses `/* Name$link */` into `(name, link)`.
fn parse_style_header(line: &str) -> Option<(String, String)> {
    let inner = line
        .trim()
        .strip_prefix("/*")?
        .strip_suffix("*/")?
        .trim();
    let (name, link) = inner.split_once('$')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), link.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write_style(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_parse_style_header() {
        assert_eq!(
            parse_style_header("/* Cloyola Grey $https://github.com/cloyola */"),
            Some((
                "Cloyola Grey".to_string(),
                "https://github.com/cloyola".to_string()
            ))
        );
        assert_eq!(parse_style_header("body { color: red; }"), None);
        assert_eq!(parse_style_header("/* no separator */"), None);
        assert_eq!(parse_style_header("/* $https://x */"), None);
    }

    #[test]
    fn test_get_styles_skips_invalid_and_non_css() {
        let dir = tempfile::tempdir().unwrap();
        write_style(dir.path(), "modern.css", "/* Modern Blue $https://a.example */\nbody{}");
        write_style(dir.path(), "classic.css", "/* Classic $https://b.example */\n");
        write_style(dir.path(), "broken.css", "body { margin: 0 }");
        write_style(dir.path(), "notes.txt", "/* Not A Style $x */");

        let styles = StyleManager::new(dir.path()).get_styles();
        let names: Vec<_> = styles.keys().cloned().collect();
        assert_eq!(names, vec!["Classic".to_string(), "Modern Blue".to_string()]);
        assert_eq!(styles["Modern Blue"].file_name, "modern.css");
        assert_eq!(styles["Classic"].author_link, "https://b.example");
    }

    #[test]
    fn test_missing_directory_yields_no_styles() {
        let manager = StyleManager::new("/definitely/not/a/styles/dir");
        assert!(manager.get_styles().is_empty());
    }

    #[test]
    fn test_select_and_read_css() {
        let dir = tempfile::tempdir().unwrap();
        write_style(dir.path(), "modern.css", "/* Modern $https://a */\nh1 { color: navy; }");

        let mut manager = StyleManager::new(dir.path());
        manager.set_selected_style("Modern").unwrap();
        assert_eq!(manager.selected_style(), Some("Modern"));
        assert!(manager.selected_style_css().unwrap().contains("color: navy"));
    }

    #[test]
    fn test_select_unknown_style_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = StyleManager::new(dir.path());
        let err = manager.set_selected_style("Ghost").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(manager.selected_style().is_none());
    }

    #[test]
    fn test_css_without_selection_is_validation_error() {
        let manager = StyleManager::new("styles");
        assert!(matches!(
            manager.selected_style_css(),
            Err(AppError::Validation(_))
        ));
    }
}
