use serde::Deserialize;

use crate::{Color, Fill};

pub const DEFAULT_GAP_RATIO: f32 = 0.8;
pub const DEFAULT_CIRCLE_PADDING: f32 = 0.15;
pub const DEFAULT_RADIUS_RATIO: f32 = 1.0;
pub const DEFAULT_BAR_SHRINK: f32 = 0.8;

/// Upper bounds on the pixel geometry, which keep canvas sizes well inside `u32`.
pub const MAX_MODULE_SIZE: u32 = 256;
pub const MAX_BORDER: u32 = 64;
pub const MAX_MARGIN: u32 = 4096;

/// Shape each active module is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ModuleShape {
    /// The whole module box.
    Square,
    /// A centered square, `size_ratio` as wide as the module, so that neighbors never touch.
    GappedSquare {
        #[serde(default = "default_gap_ratio")]
        size_ratio: f32,
    },
    /// A centered dot, with `padding_ratio` of the module left blank on each side.
    Circle {
        #[serde(default = "default_circle_padding")]
        padding_ratio: f32,
    },
    /// Every convex corner rounded. With a `radius_ratio` of 1 an isolated module becomes a circle, with 0 it stays a
    /// square.
    Rounded {
        #[serde(default = "default_radius_ratio")]
        radius_ratio: f32,
    },
    /// Vertically contiguous modules merged into bars with rounded ends, `horizontal_shrink` as wide as a module.
    VerticalBars {
        #[serde(default = "default_bar_shrink")]
        horizontal_shrink: f32,
    },
    /// Horizontally contiguous modules merged into bars with rounded ends, `vertical_shrink` as tall as a module.
    HorizontalBars {
        #[serde(default = "default_bar_shrink")]
        vertical_shrink: f32,
    },
}

impl ModuleShape {
    pub const GAPPED_SQUARE: Self = Self::GappedSquare {
        size_ratio: DEFAULT_GAP_RATIO,
    };
    pub const CIRCLE: Self = Self::Circle {
        padding_ratio: DEFAULT_CIRCLE_PADDING,
    };
    pub const ROUNDED: Self = Self::Rounded {
        radius_ratio: DEFAULT_RADIUS_RATIO,
    };
    pub const VERTICAL_BARS: Self = Self::VerticalBars {
        horizontal_shrink: DEFAULT_BAR_SHRINK,
    };
    pub const HORIZONTAL_BARS: Self = Self::HorizontalBars {
        vertical_shrink: DEFAULT_BAR_SHRINK,
    };

    fn validate(&self) -> Result<(), StyleError> {
        match *self {
            Self::Square => Ok(()),
            Self::GappedSquare { size_ratio } => check_ratio("size_ratio", size_ratio, 0.0, 1.0, false),
            Self::Circle { padding_ratio } => {
                if (0.0..0.5).contains(&padding_ratio) {
                    Ok(())
                } else {
                    Err(StyleError::RatioOutOfRange {
                        name: "padding_ratio",
                        value: padding_ratio,
                    })
                }
            }
            Self::Rounded { radius_ratio } => check_ratio("radius_ratio", radius_ratio, 0.0, 1.0, true),
            Self::VerticalBars { horizontal_shrink } => {
                check_ratio("horizontal_shrink", horizontal_shrink, 0.0, 1.0, false)
            }
            Self::HorizontalBars { vertical_shrink } => {
                check_ratio("vertical_shrink", vertical_shrink, 0.0, 1.0, false)
            }
        }
    }
}

impl Default for ModuleShape {
    fn default() -> Self {
        Self::CIRCLE
    }
}

/// How the three finder patterns are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinderShape {
    /// Module by module, like the rest of the symbol.
    #[default]
    Standard,
    /// A ring around a dot.
    Circle,
}

/// Size of the logo itself, padding excluded.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LogoSize {
    /// Exact size in pixels.
    Exact { width: u32, height: u32 },
    /// A square region whose side is roughly `ratio` times the canvas side, aligned to the module grid. Padding is
    /// taken from inside the region.
    Ratio { ratio: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoStyle {
    pub size: LogoSize,
    /// Pixels of `padding_color` around the logo.
    pub padding: u32,
    pub padding_color: Color,
}

impl Default for LogoStyle {
    fn default() -> Self {
        Self {
            size: LogoSize::Exact {
                width: 155,
                height: 75,
            },
            padding: 10,
            padding_color: Color::WHITE,
        }
    }
}

impl LogoStyle {
    fn validate(&self) -> Result<(), StyleError> {
        match self.size {
            LogoSize::Exact { width, height } if width == 0 || height == 0 => Err(StyleError::EmptyLogo),
            LogoSize::Exact { .. } => Ok(()),
            LogoSize::Ratio { ratio } => check_ratio("ratio", ratio, 0.0, 1.0, false),
        }
    }
}

/// Everything that decides how a module grid turns into pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Style {
    /// Side of a module in pixels.
    pub module_size: u32,
    /// Quiet zone around the symbol, in modules.
    pub border: u32,
    /// Extra background pixels around the finished image.
    pub margin: u32,
    pub shape: ModuleShape,
    pub finder: FinderShape,
    pub foreground: Fill,
    pub background: Color,
    pub logo: LogoStyle,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            module_size: 20,
            border: 4,
            margin: 0,
            shape: ModuleShape::default(),
            finder: FinderShape::default(),
            foreground: Fill::default(),
            background: Color::WHITE,
            logo: LogoStyle::default(),
        }
    }
}

impl Style {
    pub fn validate(&self) -> Result<(), StyleError> {
        if self.module_size < 2 {
            return Err(StyleError::ModuleTooSmall(self.module_size));
        }
        check_max("module_size", self.module_size, MAX_MODULE_SIZE)?;
        check_max("border", self.border, MAX_BORDER)?;
        check_max("margin", self.margin, MAX_MARGIN)?;
        self.shape.validate()?;
        self.logo.validate()
    }

    /// Side in pixels of the canvas for a grid of `grid_size` modules, margin excluded.
    /// # Example
    /// ```
    /// use qrstyle_render::Style;
    /// assert_eq!(Style::default().canvas_side(33), 820);
    /// ```
    pub fn canvas_side(&self, grid_size: usize) -> u32 {
        (grid_size as u32 + 2 * self.border) * self.module_size
    }

    /// Pixel position of the upper-left corner of module `(i, j)`.
    #[inline]
    pub fn module_origin(&self, i: usize, j: usize) -> (u32, u32) {
        (
            (j as u32 + self.border) * self.module_size,
            (i as u32 + self.border) * self.module_size,
        )
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleError {
    #[error("module size must be at least 2 px, got {0}")]
    ModuleTooSmall(u32),
    #[error("{name} out of range: {value}")]
    RatioOutOfRange { name: &'static str, value: f32 },
    #[error("{name} of {value} exceeds the maximum of {max}")]
    TooLarge { name: &'static str, value: u32, max: u32 },
    #[error("logo size must not be empty")]
    EmptyLogo,
}

fn check_ratio(name: &'static str, value: f32, min: f32, max: f32, min_inclusive: bool) -> Result<(), StyleError> {
    let above_min = if min_inclusive { value >= min } else { value > min };
    if above_min && value <= max {
        Ok(())
    } else {
        Err(StyleError::RatioOutOfRange { name, value })
    }
}

fn check_max(name: &'static str, value: u32, max: u32) -> Result<(), StyleError> {
    if value <= max {
        Ok(())
    } else {
        Err(StyleError::TooLarge { name, value, max })
    }
}

fn default_gap_ratio() -> f32 {
    DEFAULT_GAP_RATIO
}

fn default_circle_padding() -> f32 {
    DEFAULT_CIRCLE_PADDING
}

fn default_radius_ratio() -> f32 {
    DEFAULT_RADIUS_RATIO
}

fn default_bar_shrink() -> f32 {
    DEFAULT_BAR_SHRINK
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Style::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_styles() {
        let style = Style {
            module_size: 1,
            ..Default::default()
        };
        assert_eq!(style.validate(), Err(StyleError::ModuleTooSmall(1)));

        let style = Style {
            shape: ModuleShape::Circle { padding_ratio: 0.5 },
            ..Default::default()
        };
        assert!(matches!(
            style.validate(),
            Err(StyleError::RatioOutOfRange {
                name: "padding_ratio",
                ..
            })
        ));

        let style = Style {
            shape: ModuleShape::Rounded { radius_ratio: 0.0 },
            ..Default::default()
        };
        assert_eq!(style.validate(), Ok(()));

        let style = Style {
            shape: ModuleShape::VerticalBars {
                horizontal_shrink: 0.0,
            },
            ..Default::default()
        };
        assert!(style.validate().is_err());

        let style = Style {
            module_size: u32::MAX / 8,
            ..Default::default()
        };
        assert!(matches!(
            style.validate(),
            Err(StyleError::TooLarge {
                name: "module_size",
                ..
            })
        ));
        let style = Style {
            module_size: MAX_MODULE_SIZE,
            border: MAX_BORDER,
            margin: MAX_MARGIN,
            ..Default::default()
        };
        assert_eq!(style.validate(), Ok(()));
        let style = Style {
            border: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            style.validate(),
            Err(StyleError::TooLarge { name: "border", .. })
        ));

        let mut style = Style::default();
        style.logo.size = LogoSize::Exact {
            width: 0,
            height: 10,
        };
        assert_eq!(style.validate(), Err(StyleError::EmptyLogo));
    }

    #[test]
    fn test_module_origin() {
        let style = Style::default();
        assert_eq!(style.module_origin(0, 0), (80, 80));
        assert_eq!(style.module_origin(2, 1), (100, 120));
    }

    #[test]
    fn test_deserialize() {
        let style: Style = toml::from_str(
            r##"
            module_size = 10
            border = 2
            background = "#fafafa"

            [shape]
            kind = "rounded"

            [foreground]
            kind = "radial"
            center = "#000000"
            edge = "#1a73e8"

            [logo]
            size = { ratio = 0.3 }
            padding = 0
            "##,
        )
        .unwrap();
        assert_eq!(style.module_size, 10);
        assert_eq!(style.shape, ModuleShape::ROUNDED);
        assert_eq!(style.finder, FinderShape::Standard);
        assert_eq!(style.background, Color::rgb(0xfa, 0xfa, 0xfa));
        assert_eq!(style.logo.size, LogoSize::Ratio { ratio: 0.3 });
        assert_eq!(style.logo.padding_color, Color::WHITE);
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        assert!(toml::from_str::<Style>("module_sise = 10").is_err());
    }
}
