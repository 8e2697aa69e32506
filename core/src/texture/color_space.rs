//! Color-space conversion of [`CpuTexture`] pixels.
//!
//! Pixels are un-premultiplied, decoded to linear light, moved between
//! primaries with a 3x3 matrix through CIE XYZ (D65), encoded again and
//! re-premultiplied. Alpha is carried over unchanged.

use std::borrow::Cow;

use half::f16;
use nalgebra::{Matrix3, Vector3};

use super::types::{ColorSpace, CpuTexture, TextureError, TextureFormat};

#[rustfmt::skip]
fn srgb_to_xyz() -> Matrix3<f32> {
    Matrix3::new(
        0.412_456_4, 0.357_576_1, 0.180_437_5,
        0.212_672_9, 0.715_152_2, 0.072_175_0,
        0.019_333_9, 0.119_192_0, 0.950_304_1,
    )
}

#[rustfmt::skip]
fn xyz_to_srgb() -> Matrix3<f32> {
    Matrix3::new(
         3.240_454_2, -1.537_138_5, -0.498_531_4,
        -0.969_266_0,  1.876_010_8,  0.041_556_0,
         0.055_643_4, -0.204_025_9,  1.057_225_2,
    )
}

#[rustfmt::skip]
fn display_p3_to_xyz() -> Matrix3<f32> {
    Matrix3::new(
        0.486_570_9, 0.265_667_7, 0.198_217_3,
        0.228_974_6, 0.691_738_5, 0.079_286_9,
        0.000_000_0, 0.045_113_4, 1.043_944_4,
    )
}

#[rustfmt::skip]
fn xyz_to_display_p3() -> Matrix3<f32> {
    Matrix3::new(
         2.493_496_9, -0.931_383_6, -0.402_710_8,
        -0.829_489_0,  1.762_664_1,  0.023_624_7,
         0.035_845_8, -0.076_172_4,  0.956_884_5,
    )
}

impl ColorSpace {
    fn rgb_to_xyz(self) -> Matrix3<f32> {
        match self {
            Self::Srgb | Self::ExtendedSrgb | Self::LinearSrgb => srgb_to_xyz(),
            Self::DisplayP3 | Self::ExtendedDisplayP3 => display_p3_to_xyz(),
        }
    }

    fn xyz_to_rgb(self) -> Matrix3<f32> {
        match self {
            Self::Srgb | Self::ExtendedSrgb | Self::LinearSrgb => xyz_to_srgb(),
            Self::DisplayP3 | Self::ExtendedDisplayP3 => xyz_to_display_p3(),
        }
    }

    /// Encoded value to linear light.
    fn decode(self, value: f32) -> f32 {
        match self {
            Self::LinearSrgb => value,
            // Display P3 shares the sRGB curve. Extended spaces mirror it
            // around zero.
            _ => value.signum() * srgb_eotf(value.abs()),
        }
    }

    /// Linear light to encoded value.
    fn encode(self, value: f32) -> f32 {
        match self {
            Self::LinearSrgb => value,
            _ => value.signum() * srgb_inverse_eotf(value.abs()),
        }
    }
}

fn srgb_eotf(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn srgb_inverse_eotf(l: f32) -> f32 {
    if l <= 0.003_130_8 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

fn read_pixels(texture: &CpuTexture) -> Vec<[f32; 4]> {
    match texture.format {
        TextureFormat::Rgba8Unorm => bytemuck::cast_slice::<u8, [u8; 4]>(&texture.data)
            .iter()
            .map(|p| p.map(|c| f32::from(c) / 255.0))
            .collect(),
        TextureFormat::Rgba16Float => texture
            .data
            .chunks_exact(8)
            .map(|chunk| bytemuck::pod_read_unaligned::<[f16; 4]>(chunk).map(f16::to_f32))
            .collect(),
    }
}

fn write_pixels(pixels: &[[f32; 4]], format: TextureFormat) -> Vec<u8> {
    match format {
        TextureFormat::Rgba8Unorm => pixels
            .iter()
            .flat_map(|p| p.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8))
            .collect(),
        TextureFormat::Rgba16Float => {
            let halves: Vec<[f16; 4]> = pixels.iter().map(|p| p.map(f16::from_f32)).collect();
            bytemuck::cast_slice::<[f16; 4], u8>(&halves).to_vec()
        }
    }
}

impl CpuTexture {
    /// Returns this texture expressed in `target`.
    ///
    /// A texture already in `target` is returned borrowed. Otherwise a new
    /// texture is built in `target.preferred_format()`: extended targets
    /// keep out-of-range values in half floats, standard targets clamp to
    /// `[0, 1]` in 8 bits.
    pub fn convert_to(&self, target: ColorSpace) -> Result<Cow<'_, CpuTexture>, TextureError> {
        if self.color_space == target {
            return Ok(Cow::Borrowed(self));
        }
        self.validate()?;

        let source = self.color_space;
        let matrix = target.xyz_to_rgb() * source.rgb_to_xyz();
        let clamp = !target.is_extended();

        let mut pixels = read_pixels(self);
        for pixel in &mut pixels {
            let alpha = pixel[3];
            if alpha <= 0.0 {
                *pixel = [0.0; 4];
                continue;
            }

            let linear =
                Vector3::new(pixel[0], pixel[1], pixel[2]).map(|c| source.decode(c / alpha));
            let converted = matrix * linear;
            for (channel, value) in pixel[..3].iter_mut().zip(converted.iter()) {
                let mut encoded = target.encode(*value);
                if clamp {
                    encoded = encoded.clamp(0.0, 1.0);
                }
                *channel = encoded * alpha;
            }
        }

        let format = target.preferred_format();
        log::trace!(
            "Converted {}x{} texture from {source:?} to {target:?}",
            self.width,
            self.height
        );
        Ok(Cow::Owned(CpuTexture {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            format,
            color_space: target,
            data: write_pixels(&pixels, format),
        }))
    }

    pub fn convert_to_srgb(&self) -> Result<Cow<'_, CpuTexture>, TextureError> {
        self.convert_to(ColorSpace::Srgb)
    }

    pub fn convert_to_display_p3(&self) -> Result<Cow<'_, CpuTexture>, TextureError> {
        self.convert_to(ColorSpace::DisplayP3)
    }
}
