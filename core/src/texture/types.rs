//! CPU-side texture storage.

/// Pixel layout of a [`CpuTexture`].
///
/// Both formats hold four channels in RGBA order with premultiplied alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8 bits per channel, normalized to `[0, 1]`.
    Rgba8Unorm,
    /// 16-bit half floats in native byte order per channel. Values outside
    /// `[0, 1]` are allowed.
    Rgba16Float,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8Unorm => 4,
            Self::Rgba16Float => 8,
        }
    }
}

/// RGB color space the pixel values are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    #[default]
    Srgb,
    DisplayP3,
    /// sRGB primaries with values allowed beyond `[0, 1]`.
    ExtendedSrgb,
    /// Display P3 primaries with values allowed beyond `[0, 1]`.
    ExtendedDisplayP3,
    /// sRGB primaries without a transfer curve.
    LinearSrgb,
}

impl ColorSpace {
    /// Whether the space carries extended dynamic range values, which need a
    /// floating point format to survive.
    pub fn is_extended(self) -> bool {
        matches!(self, Self::ExtendedSrgb | Self::ExtendedDisplayP3)
    }

    /// Format a converted texture in this space is stored in.
    pub fn preferred_format(self) -> TextureFormat {
        if self.is_extended() {
            TextureFormat::Rgba16Float
        } else {
            TextureFormat::Rgba8Unorm
        }
    }
}

/// Errors from texture operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextureError {
    #[error("texture data is {actual} bytes but {width}x{height} {format:?} needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        format: TextureFormat,
        expected: usize,
        actual: usize,
    },
}

/// Raw pixel data held on the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTexture {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub color_space: ColorSpace,
    pub data: Vec<u8>,
}

impl CpuTexture {
    /// Creates an sRGB texture. Use [`with_color_space`](Self::with_color_space)
    /// for other spaces.
    pub fn new(width: u32, height: u32, format: TextureFormat, data: Vec<u8>) -> Self {
        Self {
            name: None,
            width,
            height,
            format,
            color_space: ColorSpace::Srgb,
            data,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size in bytes that `data` must have for the dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.pixel_count() * self.format.bytes_per_pixel()
    }

    /// Checks that `data` matches the dimensions and format.
    pub fn validate(&self) -> Result<(), TextureError> {
        let expected = self.expected_len();
        if self.data.len() != expected {
            return Err(TextureError::SizeMismatch {
                width: self.width,
                height: self.height,
                format: self.format,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Imports an image as premultiplied sRGB `Rgba8Unorm`.
    #[cfg(feature = "image")]
    pub fn from_image(img: &image::DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        for pixel in bytemuck::cast_slice_mut::<u8, [u8; 4]>(&mut data) {
            let alpha = u16::from(pixel[3]);
            for channel in &mut pixel[..3] {
                *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
            }
        }
        Self::new(width, height, TextureFormat::Rgba8Unorm, data)
    }
}
