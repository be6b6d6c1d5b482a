use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use qrstyle_core::{Ecl, Version};
use qrstyle_render::Style;

const DEFAULT_MIN_VERSION: u8 = 4;
/// White frame around the finished image, on top of the quiet zone.
const DEFAULT_MARGIN: u32 = 20;

/// Everything configurable from a settings file.
///
/// ```toml
/// min_version = 4
/// ecl = "H"
///
/// [style]
/// module_size = 20
/// shape = { kind = "rounded", radius_ratio = 0.8 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Smallest symbol version; bigger ones are used when the data does not fit.
    pub min_version: Version,
    pub ecl: Ecl,
    /// A `[style]` table starts from the library defaults, where the margin is 0.
    #[serde(default = "default_style")]
    pub style: Style,
}

fn default_style() -> Style {
    Style {
        margin: DEFAULT_MARGIN,
        ..Default::default()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_version: Version::new(DEFAULT_MIN_VERSION).unwrap_or(Version::MIN),
            ecl: Ecl::H,
            style: default_style(),
        }
    }
}

impl Settings {
    /// Load settings from the TOML file at `path`. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read settings file '{}'", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("invalid settings file '{}'", path.display()))
    }
}

#[cfg(test)]
mod test {
    use qrstyle_render::{Color, ModuleShape};

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.min_version.number(), 4);
        // 33 modules plus the quiet zone, framed by the margin.
        assert_eq!(settings.style.margin, 20);
        assert_eq!(settings.style.canvas_side(33) + 2 * settings.style.margin, 860);
    }

    #[test]
    fn test_partial_file() {
        let settings: Settings = toml::from_str(
            r##"
            min_version = 2
            ecl = "Q"
            [style]
            foreground = { kind = "solid", color = "#1a73e8" }
            shape = { kind = "circle" }
            "##,
        )
        .unwrap();
        assert_eq!(settings.min_version.number(), 2);
        assert_eq!(settings.ecl, Ecl::Q);
        assert_eq!(settings.style.shape, ModuleShape::CIRCLE);
        assert_eq!(settings.style.foreground, Color::rgb(0x1a, 0x73, 0xe8).into());
        assert_eq!(settings.style.module_size, 20);
    }

    #[test]
    fn test_invalid_version() {
        assert!(toml::from_str::<Settings>("min_version = 41").is_err());
    }
}
