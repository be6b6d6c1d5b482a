//! Pre-rendered coverage bitmaps for the module shapes.
//!
//! Every bitmap is a [GrayImage] where 255 means fully covered by the shape and 0 means untouched. The bitmaps of a
//! [ShapeSet] are computed once for a module size and then pasted, possibly cropped, on every matching module.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use tracing::trace;

use qrstyle_core::{Neighbors, FINDER_SIZE};

use crate::select::{self, Caps, Corners};
use crate::ModuleShape;

/// Shapes are drawn this many times bigger and then shrunk down, which antialiases their edges.
pub const ANTIALIASING_FACTOR: u32 = 4;

/// A rectangle of a bitmap to paste at an offset from the upper-left corner of a module.
#[derive(Debug, Clone, Copy)]
pub struct Piece<'a> {
    pub bitmap: &'a GrayImage,
    /// Upper-left corner of the rectangle inside `bitmap`.
    pub src: (u32, u32),
    pub size: (u32, u32),
    /// Offset from the upper-left corner of the module.
    pub dst: (u32, u32),
}

impl<'a> Piece<'a> {
    /// The whole `bitmap`, pasted at `dst`.
    pub fn whole(bitmap: &'a GrayImage, dst: (u32, u32)) -> Self {
        Self {
            bitmap,
            src: (0, 0),
            size: bitmap.dimensions(),
            dst,
        }
    }

    /// Coverage of the pixel at `(dx, dy)` relative to the piece.
    #[inline]
    pub fn coverage(&self, dx: u32, dy: u32) -> u8 {
        self.bitmap.get_pixel(self.src.0 + dx, self.src.1 + dy)[0]
    }
}

#[derive(Debug, Clone)]
enum Bitmaps {
    /// The same bitmap on every module, regardless of neighbors.
    Single { bitmap: GrayImage, offset: u32 },
    /// Quadrants, each either solid or rounded. Rounded ones are ordered NW, NE, SE, SW.
    Corners {
        solid: GrayImage,
        rounded: [GrayImage; 4],
    },
    /// Upper and lower halves of a vertical bar, each either solid or capped.
    VerticalBars {
        solid: GrayImage,
        top: GrayImage,
        bottom: GrayImage,
        offset: u32,
    },
    /// Left and right halves of a horizontal bar, each either solid or capped.
    HorizontalBars {
        solid: GrayImage,
        left: GrayImage,
        right: GrayImage,
        offset: u32,
    },
}

/// The bitmaps needed to draw every module of one [ModuleShape] at one module size.
#[derive(Debug, Clone)]
pub struct ShapeSet {
    module_size: u32,
    bitmaps: Bitmaps,
}

impl ShapeSet {
    /// Render the bitmaps for `shape` with modules of `module_size` pixels. The shape parameters are expected to be
    /// valid.
    pub fn new(shape: ModuleShape, module_size: u32) -> Self {
        let m = module_size;
        // North and west halves take the extra pixel of odd sizes.
        let near = m - m / 2;
        let bitmaps = match shape {
            ModuleShape::Square => Bitmaps::Single {
                bitmap: solid(m, m),
                offset: 0,
            },
            ModuleShape::GappedSquare { size_ratio } => {
                let delta = (1.0 - size_ratio) * m as f32 / 2.0;
                let (lo, hi) = (delta, m as f32 - delta);
                let bitmap = oversample(m, m, |x, y| lo <= x && x < hi && lo <= y && y < hi);
                Bitmaps::Single { bitmap, offset: 0 }
            }
            ModuleShape::Circle { padding_ratio } => {
                let padding = (m as f32 * padding_ratio) as u32;
                let diameter = m - 2 * padding;
                let r = diameter as f32 / 2.0;
                let bitmap = oversample(diameter, diameter, |x, y| {
                    (x - r).powi(2) + (y - r).powi(2) <= r * r
                });
                Bitmaps::Single {
                    bitmap,
                    offset: padding,
                }
            }
            ModuleShape::Rounded { radius_ratio } => {
                let r = radius_ratio * near as f32;
                let nw = oversample(near, near, |x, y| {
                    x >= r || y >= r || (x - r).powi(2) + (y - r).powi(2) <= r * r
                });
                let rounded = [
                    imageops::flip_horizontal(&nw),
                    imageops::rotate180(&nw),
                    imageops::flip_vertical(&nw),
                ];
                let [ne, se, sw] = rounded;
                Bitmaps::Corners {
                    solid: solid(near, near),
                    rounded: [nw, ne, se, sw],
                }
            }
            ModuleShape::VerticalBars { horizontal_shrink } => {
                let width = ((m as f32 * horizontal_shrink) as u32).max(1);
                let top = half_ellipse(width, near, Orientation::Vertical);
                Bitmaps::VerticalBars {
                    solid: solid(width, near),
                    bottom: imageops::flip_vertical(&top),
                    top,
                    offset: (m - width) / 2,
                }
            }
            ModuleShape::HorizontalBars { vertical_shrink } => {
                let height = ((m as f32 * vertical_shrink) as u32).max(1);
                let left = half_ellipse(near, height, Orientation::Horizontal);
                Bitmaps::HorizontalBars {
                    solid: solid(near, height),
                    right: imageops::flip_horizontal(&left),
                    left,
                    offset: (m - height) / 2,
                }
            }
        };
        trace!(?shape, module_size, "rendered shape set");
        Self {
            module_size,
            bitmaps,
        }
    }

    /// Call `f` with every piece to paste on an active module with the given `neighbors`.
    pub fn for_each_piece<F>(&self, neighbors: Neighbors, mut f: F)
    where
        F: FnMut(Piece<'_>),
    {
        let m = self.module_size;
        let (near, far) = (m - m / 2, m / 2);
        // Rows and columns of a near-sized bitmap that are dropped to fit a far-sized half, taken from the inner side.
        let skip = near - far;
        match &self.bitmaps {
            Bitmaps::Single { bitmap, offset } => f(Piece::whole(bitmap, (*offset, *offset))),
            Bitmaps::Corners { solid, rounded } => {
                let Corners { nw, ne, se, sw } = select::rounded_corners(neighbors);
                let pick = |rounded_here: bool, k: usize| if rounded_here { &rounded[k] } else { solid };
                f(Piece {
                    bitmap: pick(nw, 0),
                    src: (0, 0),
                    size: (near, near),
                    dst: (0, 0),
                });
                f(Piece {
                    bitmap: pick(ne, 1),
                    src: (skip, 0),
                    size: (far, near),
                    dst: (near, 0),
                });
                f(Piece {
                    bitmap: pick(se, 2),
                    src: (skip, skip),
                    size: (far, far),
                    dst: (near, near),
                });
                f(Piece {
                    bitmap: pick(sw, 3),
                    src: (0, skip),
                    size: (near, far),
                    dst: (0, near),
                });
            }
            Bitmaps::VerticalBars {
                solid,
                top,
                bottom,
                offset,
            } => {
                let Caps { start, end } = select::vertical_caps(neighbors);
                let width = solid.width();
                f(Piece {
                    bitmap: if start { top } else { solid },
                    src: (0, 0),
                    size: (width, near),
                    dst: (*offset, 0),
                });
                f(Piece {
                    bitmap: if end { bottom } else { solid },
                    src: (0, skip),
                    size: (width, far),
                    dst: (*offset, near),
                });
            }
            Bitmaps::HorizontalBars {
                solid,
                left,
                right,
                offset,
            } => {
                let Caps { start, end } = select::horizontal_caps(neighbors);
                let height = solid.height();
                f(Piece {
                    bitmap: if start { left } else { solid },
                    src: (0, 0),
                    size: (near, height),
                    dst: (0, *offset),
                });
                f(Piece {
                    bitmap: if end { right } else { solid },
                    src: (skip, 0),
                    size: (far, height),
                    dst: (near, *offset),
                });
            }
        }
    }
}

/// Bitmap of a finder pattern drawn as a ring one module thick around a dot three modules wide.
pub fn finder_bitmap(module_size: u32) -> GrayImage {
    let side = FINDER_SIZE as u32 * module_size;
    let m = module_size as f32;
    let c = side as f32 / 2.0;
    let bitmap = oversample(side, side, |x, y| {
        let d = (x - c).hypot(y - c);
        (2.5 * m..=3.5 * m).contains(&d) || d <= 1.5 * m
    });
    trace!(module_size, "rendered finder bitmap");
    bitmap
}

enum Orientation {
    Vertical,
    Horizontal,
}

/// Bitmap of a bar end: half of an ellipse as wide and twice as tall as the bitmap (vertical), or twice as wide and
/// as tall (horizontal), with the round side towards the origin.
fn half_ellipse(width: u32, height: u32, orientation: Orientation) -> GrayImage {
    let (w, h) = (width as f32, height as f32);
    let (cx, cy, rx, ry) = match orientation {
        Orientation::Vertical => (w / 2.0, h, w / 2.0, h),
        Orientation::Horizontal => (w, h / 2.0, w, h / 2.0),
    };
    oversample(width, height, |x, y| {
        ((x - cx) / rx).powi(2) + ((y - cy) / ry).powi(2) <= 1.0
    })
}

fn solid(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([u8::MAX]))
}

/// Rasterize the shape described by `inside` into a `width` x `height` coverage bitmap. `inside` is given the
/// coordinates of a sample point in output pixels and is evaluated [ANTIALIASING_FACTOR] times more densely in each
/// direction.
fn oversample<F>(width: u32, height: u32, inside: F) -> GrayImage
where
    F: Fn(f32, f32) -> bool,
{
    let scale = ANTIALIASING_FACTOR as f32;
    let big = GrayImage::from_fn(
        width * ANTIALIASING_FACTOR,
        height * ANTIALIASING_FACTOR,
        |x, y| {
            let covered = inside((x as f32 + 0.5) / scale, (y as f32 + 0.5) / scale);
            Luma([if covered { u8::MAX } else { 0 }])
        },
    );
    imageops::resize(&big, width, height, FilterType::Lanczos3)
}

#[cfg(test)]
mod test {
    use super::*;

    fn pieces(set: &ShapeSet, neighbors: Neighbors) -> Vec<(u32, u32, u32, u32)> {
        let mut result = Vec::new();
        set.for_each_piece(neighbors, |piece| {
            result.push((piece.dst.0, piece.dst.1, piece.size.0, piece.size.1))
        });
        result
    }

    /// Paint all pieces on a module-sized bitmap.
    fn module(set: &ShapeSet, neighbors: Neighbors) -> GrayImage {
        let m = set.module_size;
        let mut out = GrayImage::new(m, m);
        set.for_each_piece(neighbors, |piece| {
            for dy in 0..piece.size.1 {
                for dx in 0..piece.size.0 {
                    let px = out.get_pixel_mut(piece.dst.0 + dx, piece.dst.1 + dy);
                    px[0] = px[0].max(piece.coverage(dx, dy));
                }
            }
        });
        out
    }

    #[test]
    fn test_quadrants_tile_odd_modules() {
        let set = ShapeSet::new(ModuleShape::ROUNDED, 9);
        assert_eq!(
            pieces(&set, Neighbors::ISOLATED),
            [(0, 0, 5, 5), (5, 0, 4, 5), (5, 5, 4, 4), (0, 5, 5, 4)]
        );
    }

    #[test]
    fn test_surrounded_rounded_module_is_square() {
        let set = ShapeSet::new(ModuleShape::ROUNDED, 20);
        let bitmap = module(&set, Neighbors::SURROUNDED);
        assert!(bitmap.pixels().all(|px| px[0] == u8::MAX));
    }

    #[test]
    fn test_isolated_rounded_module_is_round() {
        let set = ShapeSet::new(ModuleShape::ROUNDED, 20);
        let bitmap = module(&set, Neighbors::ISOLATED);
        for (x, y) in [(0, 0), (19, 0), (19, 19), (0, 19)] {
            assert!(bitmap.get_pixel(x, y)[0] < 64, "corner ({x}, {y}) is covered");
        }
        assert_eq!(bitmap.get_pixel(10, 10)[0], u8::MAX);
        // Symmetric under a half turn.
        assert_eq!(imageops::rotate180(&bitmap), bitmap);
    }

    #[test]
    fn test_zero_radius_is_square() {
        let set = ShapeSet::new(ModuleShape::Rounded { radius_ratio: 0.0 }, 20);
        let bitmap = module(&set, Neighbors::ISOLATED);
        assert!(bitmap.pixels().all(|px| px[0] == u8::MAX));
    }

    #[test]
    fn test_circle_is_padded() {
        let set = ShapeSet::new(ModuleShape::CIRCLE, 20);
        assert_eq!(pieces(&set, Neighbors::SURROUNDED), [(3, 3, 14, 14)]);
        let bitmap = module(&set, Neighbors::SURROUNDED);
        assert_eq!(bitmap.get_pixel(0, 0)[0], 0);
        assert_eq!(bitmap.get_pixel(2, 10)[0], 0);
        assert_eq!(bitmap.get_pixel(10, 10)[0], u8::MAX);
    }

    #[test]
    fn test_gapped_square_leaves_a_gap() {
        let set = ShapeSet::new(ModuleShape::GAPPED_SQUARE, 20);
        let bitmap = module(&set, Neighbors::SURROUNDED);
        assert!(bitmap.get_pixel(0, 10)[0] < 16);
        assert_eq!(bitmap.get_pixel(10, 10)[0], u8::MAX);
    }

    #[test]
    fn test_vertical_bars() {
        let set = ShapeSet::new(ModuleShape::VERTICAL_BARS, 20);
        assert_eq!(
            pieces(&set, Neighbors::ISOLATED),
            [(2, 0, 16, 10), (2, 10, 16, 10)]
        );
        // Inside a run the bar is solid from top to bottom.
        let bitmap = module(&set, Neighbors::SURROUNDED);
        assert_eq!(bitmap.get_pixel(10, 0)[0], u8::MAX);
        assert_eq!(bitmap.get_pixel(2, 0)[0], u8::MAX);
        assert_eq!(bitmap.get_pixel(0, 10)[0], 0);
        // At the top of a run the corners are rounded off.
        let bitmap = module(&set, Neighbors { south: true, ..Neighbors::ISOLATED });
        assert!(bitmap.get_pixel(2, 0)[0] < 64);
        assert_eq!(bitmap.get_pixel(2, 19)[0], u8::MAX);
    }

    #[test]
    fn test_horizontal_bars() {
        let set = ShapeSet::new(ModuleShape::HORIZONTAL_BARS, 20);
        let bitmap = module(&set, Neighbors { west: true, ..Neighbors::ISOLATED });
        assert_eq!(bitmap.get_pixel(0, 2)[0], u8::MAX);
        assert!(bitmap.get_pixel(19, 2)[0] < 64);
        assert_eq!(bitmap.get_pixel(10, 0)[0], 0);
    }

    #[test]
    fn test_finder_bitmap() {
        let bitmap = finder_bitmap(10);
        assert_eq!(bitmap.dimensions(), (70, 70));
        // Center dot, gap, ring, outside.
        assert_eq!(bitmap.get_pixel(35, 35)[0], u8::MAX);
        assert_eq!(bitmap.get_pixel(35, 15)[0], 0);
        assert_eq!(bitmap.get_pixel(35, 5)[0], u8::MAX);
        assert_eq!(bitmap.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let a = ShapeSet::new(ModuleShape::ROUNDED, 16);
        let b = ShapeSet::new(ModuleShape::ROUNDED, 16);
        assert_eq!(
            module(&a, Neighbors::ISOLATED),
            module(&b, Neighbors::ISOLATED)
        );
    }
}
