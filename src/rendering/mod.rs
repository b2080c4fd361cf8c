pub mod decode;
pub mod encode;

pub use decode::{decode, resample};
pub use encode::encode_png;
