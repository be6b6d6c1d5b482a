use std::path::Path;

use image::imageops;
use image::{GrayImage, ImageFormat, RgbaImage};
use itertools::Itertools;
use tracing::debug;

use qrstyle_core::{ModuleGrid, FINDER_SIZE};

use crate::color::blend;
use crate::logo::{self, Logo};
use crate::shapes::{self, Piece, ShapeSet};
use crate::{Fill, FinderShape, RenderError, Style};

/// Renders module grids into images with one [Style]. The shape bitmaps are prepared once, when the renderer is
/// built, and shared by every render.
#[derive(Debug, Clone)]
pub struct Renderer {
    style: Style,
    shapes: ShapeSet,
    finder: Option<GrayImage>,
}

impl Renderer {
    /// Validate `style` and prepare its bitmaps.
    pub fn new(style: Style) -> Result<Self, RenderError> {
        style.validate()?;
        let shapes = ShapeSet::new(style.shape, style.module_size);
        let finder = match style.finder {
            FinderShape::Standard => None,
            FinderShape::Circle => Some(shapes::finder_bitmap(style.module_size)),
        };
        Ok(Self {
            style,
            shapes,
            finder,
        })
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Render `grid`, with `logo` at its center if any.
    /// # Example
    /// ```
    /// use qrstyle_core::{Module, ModuleGrid};
    /// use qrstyle_render::{Renderer, Style};
    /// let grid = ModuleGrid::filled(21, Module::Dark);
    /// let image = Renderer::new(Style::default()).unwrap().render(&grid, None).unwrap();
    /// assert_eq!(image.dimensions(), (580, 580));
    /// ```
    pub fn render<G>(&self, grid: G, logo: Option<&Logo>) -> Result<RgbaImage, RenderError>
    where
        G: AsRef<ModuleGrid>,
    {
        let grid = grid.as_ref();
        if self.finder.is_some() && grid.size() < FINDER_SIZE {
            return Err(RenderError::GridTooSmall {
                size: grid.size(),
                min: FINDER_SIZE,
            });
        }
        let mut canvas = self.draw_modules(grid);
        if let Some(logo) = logo {
            logo::embed(&mut canvas, logo, &self.style.logo, self.style.module_size)?;
        }
        Ok(self.add_margin(canvas))
    }

    /// Paint every active module of `grid` onto a fresh canvas.
    fn draw_modules(&self, grid: &ModuleGrid) -> RgbaImage {
        let side = self.style.canvas_side(grid.size());
        let mut canvas = RgbaImage::from_pixel(side, side, self.style.background.into());
        let size = grid.size();
        for (i, j) in (0..size).cartesian_product(0..size) {
            if !grid.is_dark(i, j) || (self.finder.is_some() && grid.is_finder(i, j)) {
                continue;
            }
            let origin = self.style.module_origin(i, j);
            self.shapes.for_each_piece(grid.neighbors(i, j), |piece| {
                paste(&mut canvas, &piece, origin, &self.style.foreground)
            });
        }
        if let Some(bitmap) = &self.finder {
            for (i, j) in grid.finder_origins() {
                let origin = self.style.module_origin(i, j);
                paste(&mut canvas, &Piece::whole(bitmap, (0, 0)), origin, &self.style.foreground);
            }
        }
        debug!(size, dark = grid.dark_count(), side, "painted modules");
        canvas
    }

    fn add_margin(&self, canvas: RgbaImage) -> RgbaImage {
        let margin = self.style.margin;
        if margin == 0 {
            return canvas;
        }
        let (width, height) = canvas.dimensions();
        let mut framed = RgbaImage::from_pixel(
            width + 2 * margin,
            height + 2 * margin,
            self.style.background.into(),
        );
        imageops::replace(&mut framed, &canvas, margin as i64, margin as i64);
        framed
    }
}

/// Paste `piece` on the module whose upper-left corner is at `origin`, coloring it with `fill`.
fn paste(canvas: &mut RgbaImage, piece: &Piece<'_>, origin: (u32, u32), fill: &Fill) {
    let (width, height) = canvas.dimensions();
    let (x0, y0) = (origin.0 + piece.dst.0, origin.1 + piece.dst.1);
    for dy in 0..piece.size.1 {
        for dx in 0..piece.size.0 {
            let coverage = piece.coverage(dx, dy);
            if coverage == 0 {
                continue;
            }
            let (x, y) = (x0 + dx, y0 + dy);
            let color = fill.color_at(x, y, width, height);
            let pixel = canvas.get_pixel_mut(x, y);
            *pixel = blend(*pixel, color, coverage);
        }
    }
}

/// Save `image` as a PNG file at `path`.
pub fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<(), RenderError> {
    let path = path.as_ref();
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| RenderError::Save {
            path: path.to_path_buf(),
            source,
        })
}
