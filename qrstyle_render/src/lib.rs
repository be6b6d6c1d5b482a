//! Styled rendering of QR code module grids: rounded or dotted modules, gradient fills and an embedded logo.
//!
//! ```
//! use qrstyle_core::{Ecl, Version};
//! use qrstyle_encode::Encoder;
//! use qrstyle_render::{ModuleShape, Renderer, Style};
//!
//! let code = Encoder::new()
//!     .with_version_in(Version::new(4).unwrap()..)
//!     .with_ecl(Ecl::H)
//!     .encode("https://example.com/")
//!     .unwrap();
//! let style = Style {
//!     shape: ModuleShape::ROUNDED,
//!     ..Default::default()
//! };
//! let image = Renderer::new(style).unwrap().render(&code, None).unwrap();
//! assert_eq!(image.dimensions(), (820, 820));
//! ```

mod ascii;
mod color;
mod compose;
mod error;
mod fill;
mod logo;
pub mod select;
pub mod shapes;
mod style;

pub use ascii::AsciiRenderer;
pub use color::{Color, ColorParseError};
pub use compose::{save_png, Renderer};
pub use error::RenderError;
pub use fill::Fill;
pub use logo::{placement, Logo, Placement};
pub use style::{FinderShape, LogoSize, LogoStyle, ModuleShape, Style, StyleError};
pub use style::{
    DEFAULT_BAR_SHRINK, DEFAULT_CIRCLE_PADDING, DEFAULT_GAP_RATIO, DEFAULT_RADIUS_RATIO,
    MAX_BORDER, MAX_MARGIN, MAX_MODULE_SIZE,
};
