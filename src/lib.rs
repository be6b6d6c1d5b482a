//! Styled QR codes: encode data with [`encode::Encoder`] and draw the result with [`render::Renderer`].

pub use qrstyle_core::{Ecl, Module, ModuleGrid, Neighbors, QrCode, Version};
pub use qrstyle_encode as encode;
pub use qrstyle_render as render;
