use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::{LogoSize, LogoStyle, RenderError};

/// An image to embed at the center of the symbol.
#[derive(Debug, Clone)]
pub struct Logo {
    image: RgbaImage,
}

impl Logo {
    /// Open the image at `path`, in any format the enabled image codecs understand.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| RenderError::LogoOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(image.into())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl From<DynamicImage> for Logo {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.into_rgba8(),
        }
    }
}

impl From<RgbaImage> for Logo {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

/// Region of the canvas taken by the logo and its padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute where the padded logo goes on a square canvas of `canvas` pixels. The region is centered, with its
/// upper-left corner rounded down to the module grid so that it does not cut through modules.
/// # Example
/// ```
/// use qrstyle_render::{placement, LogoStyle, Placement};
/// let at = placement(820, 20, &LogoStyle::default()).unwrap();
/// assert_eq!(at, Placement { x: 320, y: 360, width: 175, height: 95 });
/// ```
pub fn placement(canvas: u32, module_size: u32, style: &LogoStyle) -> Result<Placement, RenderError> {
    let snap = |offset: u32| offset / module_size * module_size;
    let padding = style.padding.saturating_mul(2);
    let at = match style.size {
        LogoSize::Exact { width, height } => {
            let (width, height) = (width.saturating_add(padding), height.saturating_add(padding));
            if width > canvas || height > canvas {
                return Err(RenderError::LogoDoesNotFit {
                    width,
                    height,
                    canvas,
                });
            }
            Placement {
                x: snap(canvas / 2 - width / 2),
                y: snap(canvas / 2 - height / 2),
                width,
                height,
            }
        }
        LogoSize::Ratio { ratio } => {
            let approx = ((canvas as f32 * ratio) as u32).min(canvas);
            let offset = snap(canvas / 2 - approx / 2);
            let side = canvas - 2 * offset;
            if side <= padding {
                return Err(RenderError::LogoDoesNotFit {
                    width: side,
                    height: side,
                    canvas,
                });
            }
            Placement {
                x: offset,
                y: offset,
                width: side,
                height: side,
            }
        }
    };
    Ok(at)
}

/// Resize `logo`, pad it and composite it onto `canvas`.
pub(crate) fn embed(
    canvas: &mut RgbaImage,
    logo: &Logo,
    style: &LogoStyle,
    module_size: u32,
) -> Result<Placement, RenderError> {
    let at = placement(canvas.width(), module_size, style)?;
    let p = style.padding;
    let resized = imageops::resize(
        logo.image(),
        at.width - 2 * p,
        at.height - 2 * p,
        FilterType::Lanczos3,
    );
    if p > 0 {
        let padding = style.padding_color.into();
        for y in at.y..at.y + at.height {
            for x in at.x..at.x + at.width {
                canvas.put_pixel(x, y, padding);
            }
        }
    }
    imageops::overlay(canvas, &resized, (at.x + p) as i64, (at.y + p) as i64);
    debug!(?at, "embedded logo");
    Ok(at)
}
