pub mod health;
pub mod image;

pub use health::*;
pub use image::*;
