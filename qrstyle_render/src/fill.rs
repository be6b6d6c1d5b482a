use image::Rgba;
use serde::Deserialize;

use crate::Color;

/// How the foreground of the symbol is colored. Gradients span the whole symbol canvas, quiet zone included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Fill {
    Solid { color: Color },
    /// From `center` at the middle of the canvas to `edge` at its corners.
    Radial { center: Color, edge: Color },
    Horizontal { left: Color, right: Color },
    Vertical { top: Color, bottom: Color },
}

impl Fill {
    /// Color of the pixel `(x, y)` on a `width` x `height` canvas.
    pub fn color_at(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba<u8> {
        let color = match *self {
            Fill::Solid { color } => color,
            Fill::Radial { center, edge } => {
                let cx = width.saturating_sub(1) as f32 / 2.0;
                let cy = height.saturating_sub(1) as f32 / 2.0;
                let max = cx.hypot(cy);
                let t = if max > 0.0 {
                    (x as f32 - cx).hypot(y as f32 - cy) / max
                } else {
                    0.0
                };
                center.lerp(edge, t)
            }
            Fill::Horizontal { left, right } => left.lerp(right, ramp(x, width)),
            Fill::Vertical { top, bottom } => top.lerp(bottom, ramp(y, height)),
        };
        color.into()
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Solid {
            color: Color::BLACK,
        }
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Fill::Solid { color }
    }
}

fn ramp(position: u32, extent: u32) -> f32 {
    match extent {
        0 | 1 => 0.0,
        _ => position as f32 / (extent - 1) as f32,
    }
}
