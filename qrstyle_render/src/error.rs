use std::path::PathBuf;

use image::ImageError;

use crate::StyleError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error("cannot open logo '{}'", path.display())]
    LogoOpen {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("grid of {size} modules is too small for circle finders, which need at least {min}")]
    GridTooSmall { size: usize, min: usize },
    #[error("logo region of {width}x{height} px does not fit a {canvas} px canvas")]
    LogoDoesNotFit { width: u32, height: u32, canvas: u32 },
    #[error("cannot save image to '{}'", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}
