//! CPU-side texture types.
//!
//! Provides [`CpuTexture`] for holding raw premultiplied pixel data, along
//! with [`TextureFormat`] and [`ColorSpace`], and conversion between
//! color spaces.

mod color_space;
mod types;

pub use types::{ColorSpace, CpuTexture, TextureError, TextureFormat};
