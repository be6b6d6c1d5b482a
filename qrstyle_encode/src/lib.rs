mod encode;

pub use encode::{Encoder, EncodingError};
