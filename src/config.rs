//! Project file (beadalize.yaml) parsing.
//!
//! The project file holds defaults for every `build` option so a pattern
//! can be rebuilt without retyping its placement. Command-line flags
//! override it.
//!
//! ```yaml
//! input: rocket.png
//! output: rocket.svg
//! scale: 0.8
//! xoffset: 20
//! yoffset: 9
//! rotation: 14
//! platform: hexagon
//! platform_kwargs:
//!   size: 16
//! palette: hama
//! palette_subset: [0, 2, 4, 28, 35, 54]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BeadError, Result};
use crate::types::{BeadShape, PlatformParams};

/// Default project file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "beadalize.yaml";

/// Build defaults loaded from a project file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Source image. Relative paths are relative to the project file.
    pub input: Option<PathBuf>,

    /// SVG output path. Relative paths are relative to the project file.
    pub output: Option<PathBuf>,

    pub scale: Option<f64>,
    pub xoffset: Option<f64>,
    pub yoffset: Option<f64>,
    pub rotation: Option<f64>,

    /// Platform name (e.g. "hexagon", "RectangularPlatform").
    pub platform: Option<String>,

    pub platform_kwargs: Option<PlatformParams>,

    /// Builtin palette name or palette file path.
    pub palette: Option<String>,

    pub palette_subset: Option<Vec<usize>>,

    pub bead: Option<BeadShape>,
}

impl ProjectConfig {
    /// Load a project file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BeadError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read project file: {}", e),
        })?;

        let mut config = Self::parse(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parse a project file from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file is a valid, empty config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| BeadError::Config {
            message: format!("Invalid project file: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Find the project file in `dir`, if there is one.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        let path = dir.join(CONFIG_FILENAME);
        path.is_file().then_some(path)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.input, &mut self.output].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full() {
        let yaml = r#"
input: rocket.png
scale: 0.8
xoffset: 20
rotation: -14
platform: HexagonPlatform
platform_kwargs:
  size: 16
palette: hama
palette_subset: [0, 2, 4]
bead: square
"#;
        let config = ProjectConfig::parse(yaml).unwrap();

        assert_eq!(config.input, Some(PathBuf::from("rocket.png")));
        assert_eq!(config.scale, Some(0.8));
        assert_eq!(config.xoffset, Some(20.0));
        assert_eq!(config.yoffset, None);
        assert_eq!(config.rotation, Some(-14.0));
        assert_eq!(config.platform.as_deref(), Some("HexagonPlatform"));
        assert_eq!(config.platform_kwargs.unwrap().size, Some(16));
        assert_eq!(config.palette_subset, Some(vec![0, 2, 4]));
        assert_eq!(config.bead, Some(BeadShape::Square));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProjectConfig::parse("").unwrap(), ProjectConfig::default());
    }

    #[test]
    fn test_parse_unknown_key() {
        let result = ProjectConfig::parse("zoom: 2\n");
        assert!(matches!(result, Err(BeadError::Config { .. })));
    }

    #[test]
    fn test_parse_unknown_platform_kwarg() {
        let result = ProjectConfig::parse("platform_kwargs:\n  radius: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "input: art/rocket.png\noutput: /tmp/rocket.svg\n").unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.input, Some(dir.path().join("art/rocket.png")));
        assert_eq!(config.output, Some(PathBuf::from("/tmp/rocket.svg")));
    }

    #[test]
    fn test_find() {
        let dir = tempdir().unwrap();
        assert_eq!(ProjectConfig::find(dir.path()), None);

        std::fs::write(dir.path().join(CONFIG_FILENAME), "scale: 2\n").unwrap();
        assert_eq!(
            ProjectConfig::find(dir.path()),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
