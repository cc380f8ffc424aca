use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use image::{DynamicImage, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::backend::GlBackend;
use crate::consts;
use crate::context::Context;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2D,
    CubeMap,
}

impl TextureTarget {
    pub fn gl(self) -> u32 {
        match self {
            TextureTarget::Texture2D => consts::TEXTURE_2D,
            TextureTarget::CubeMap => consts::TEXTURE_CUBE_MAP,
        }
    }
}

/// One face of a cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn gl(self) -> u32 {
        match self {
            CubeFace::PositiveX => consts::TEXTURE_CUBE_MAP_POSITIVE_X,
            CubeFace::NegativeX => consts::TEXTURE_CUBE_MAP_NEGATIVE_X,
            CubeFace::PositiveY => consts::TEXTURE_CUBE_MAP_POSITIVE_Y,
            CubeFace::NegativeY => consts::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            CubeFace::PositiveZ => consts::TEXTURE_CUBE_MAP_POSITIVE_Z,
            CubeFace::NegativeZ => consts::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl TextureFilter {
    pub fn gl(self) -> u32 {
        match self {
            TextureFilter::Nearest => consts::NEAREST,
            TextureFilter::Linear => consts::LINEAR,
            TextureFilter::NearestMipmapNearest => consts::NEAREST_MIPMAP_NEAREST,
            TextureFilter::LinearMipmapNearest => consts::LINEAR_MIPMAP_NEAREST,
            TextureFilter::NearestMipmapLinear => consts::NEAREST_MIPMAP_LINEAR,
            TextureFilter::LinearMipmapLinear => consts::LINEAR_MIPMAP_LINEAR,
        }
    }

    pub fn uses_mipmaps(self) -> bool {
        !matches!(self, TextureFilter::Nearest | TextureFilter::Linear)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl TextureWrap {
    pub fn gl(self) -> u32 {
        match self {
            TextureWrap::Repeat => consts::REPEAT,
            TextureWrap::ClampToEdge => consts::CLAMP_TO_EDGE,
            TextureWrap::MirroredRepeat => consts::MIRRORED_REPEAT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Alpha,
    Luminance,
    LuminanceAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn gl(self) -> u32 {
        match self {
            PixelFormat::Alpha => consts::ALPHA,
            PixelFormat::Luminance => consts::LUMINANCE,
            PixelFormat::LuminanceAlpha => consts::LUMINANCE_ALPHA,
            PixelFormat::Rgb => consts::RGB,
            PixelFormat::Rgba => consts::RGBA,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Alpha | PixelFormat::Luminance => 1,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    UnsignedByte,
    UnsignedShort565,
    UnsignedShort4444,
    UnsignedShort5551,
    /// Needs `OES_texture_float`.
    Float,
}

impl PixelType {
    pub fn gl(self) -> u32 {
        match self {
            PixelType::UnsignedByte => consts::UNSIGNED_BYTE,
            PixelType::UnsignedShort565 => consts::UNSIGNED_SHORT_5_6_5,
            PixelType::UnsignedShort4444 => consts::UNSIGNED_SHORT_4_4_4_4,
            PixelType::UnsignedShort5551 => consts::UNSIGNED_SHORT_5_5_5_1,
            PixelType::Float => consts::FLOAT,
        }
    }

    /// Bytes one pixel occupies, or `None` if the pair is not valid in WebGL 1.
    pub fn bytes_per_pixel(self, format: PixelFormat) -> Option<usize> {
        match (self, format) {
            (PixelType::UnsignedByte, format) => Some(format.channels()),
            (PixelType::Float, format) => Some(format.channels() * 4),
            (PixelType::UnsignedShort565, PixelFormat::Rgb) => Some(2),
            (PixelType::UnsignedShort4444 | PixelType::UnsignedShort5551, PixelFormat::Rgba) => {
                Some(2)
            }
            _ => None,
        }
    }
}

/// Sampling and upload settings applied by [`Texture::apply`] and
/// [`Texture::from_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureParams {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub flip_y: bool,
    pub premultiply_alpha: bool,
    /// Generate a mipmap chain after the image is uploaded.
    pub mipmaps: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            wrap_s: TextureWrap::ClampToEdge,
            wrap_t: TextureWrap::ClampToEdge,
            flip_y: false,
            premultiply_alpha: false,
            mipmaps: false,
        }
    }
}

impl TextureParams {
    /// Nearest-neighbour sampling for pixel art and lookup tables.
    pub fn pixelated() -> Self {
        Self {
            min_filter: TextureFilter::Nearest,
            mag_filter: TextureFilter::Nearest,
            ..Self::default()
        }
    }

    /// Trilinear filtering over a generated, repeating mipmap chain.
    pub fn mipmapped() -> Self {
        Self {
            min_filter: TextureFilter::LinearMipmapLinear,
            mag_filter: TextureFilter::Linear,
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
            mipmaps: true,
            ..Self::default()
        }
    }

    pub fn with_flip_y(mut self, flip_y: bool) -> Self {
        self.flip_y = flip_y;
        self
    }
}

pub struct Texture<B: GlBackend> {
    gl: Rc<B>,
    handle: B::Texture,
    target: TextureTarget,
    size: Cell<(u32, u32)>,
}

impl<B: GlBackend> fmt::Debug for Texture<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("handle", &self.handle)
            .field("target", &self.target)
            .field("size", &self.size.get())
            .finish()
    }
}

impl<B: GlBackend> Texture<B> {
    pub fn new(ctx: &Context<B>, target: TextureTarget) -> Result<Self> {
        let handle = ctx.gl().create_texture()?;
        debug!("created {target:?} texture {handle:?}");
        Ok(Self {
            gl: ctx.shared(),
            handle,
            target,
            size: Cell::new((0, 0)),
        })
    }

    /// Creates a 2D texture from a decoded image, converting it to RGBA8.
    pub fn from_image(ctx: &Context<B>, image: &DynamicImage, params: &TextureParams) -> Result<Self> {
        let texture = Self::new(ctx, TextureTarget::Texture2D)?;
        texture.apply(params);
        texture.upload_rgba(&image.to_rgba8())?;
        if params.mipmaps {
            texture.generate_mipmap();
        }
        Ok(texture)
    }

    pub fn handle(&self) -> &B::Texture {
        &self.handle
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// Size of the last full upload.
    pub fn size(&self) -> (u32, u32) {
        self.size.get()
    }

    /// Makes `unit` the active texture unit and binds this texture to it.
    pub fn bind(&self, unit: u32) {
        self.gl.active_texture(consts::TEXTURE0 + unit);
        self.gl.bind_texture(self.target.gl(), Some(&self.handle));
    }

    pub fn unbind(&self) {
        self.gl.bind_texture(self.target.gl(), None);
    }

    fn bind_current(&self) {
        self.gl.bind_texture(self.target.gl(), Some(&self.handle));
    }

    pub fn set_filter(&self, min: TextureFilter, mag: TextureFilter) {
        self.bind_current();
        let target = self.target.gl();
        self.gl
            .tex_parameter_i32(target, consts::TEXTURE_MIN_FILTER, min.gl() as i32);
        self.gl
            .tex_parameter_i32(target, consts::TEXTURE_MAG_FILTER, mag.gl() as i32);
    }

    pub fn set_wrap(&self, s: TextureWrap, t: TextureWrap) {
        self.bind_current();
        let target = self.target.gl();
        self.gl
            .tex_parameter_i32(target, consts::TEXTURE_WRAP_S, s.gl() as i32);
        self.gl
            .tex_parameter_i32(target, consts::TEXTURE_WRAP_T, t.gl() as i32);
    }

    /// Applies filters and wraps, and sets the unpack state used by the next
    /// upload.
    pub fn apply(&self, params: &TextureParams) {
        self.gl
            .pixel_store_i32(consts::UNPACK_FLIP_Y_WEBGL, params.flip_y as i32);
        self.gl.pixel_store_i32(
            consts::UNPACK_PREMULTIPLY_ALPHA_WEBGL,
            params.premultiply_alpha as i32,
        );
        self.set_filter(params.min_filter, params.mag_filter);
        self.set_wrap(params.wrap_s, params.wrap_t);
    }

    /// Replaces level 0 of a 2D texture. `None` allocates uninitialised
    /// storage, as render targets need.
    pub fn image(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        pixels: Option<&[u8]>,
    ) -> Result<()> {
        if self.target != TextureTarget::Texture2D {
            return Err(Error::TextureUpload(
                "cube maps are uploaded per face".to_string(),
            ));
        }
        self.upload(self.target.gl(), width, height, format, ty, pixels)
    }

    /// Replaces level 0 of one cube map face.
    pub fn face_image(
        &self,
        face: CubeFace,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        pixels: Option<&[u8]>,
    ) -> Result<()> {
        if self.target != TextureTarget::CubeMap {
            return Err(Error::TextureUpload(format!(
                "{face:?} face upload on a 2D texture"
            )));
        }
        self.upload(face.gl(), width, height, format, ty, pixels)
    }

    fn upload(
        &self,
        image_target: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        pixels: Option<&[u8]>,
    ) -> Result<()> {
        if let Some(pixels) = pixels {
            check_len(width, height, format, ty, pixels)?;
        }
        self.bind_current();
        self.unpack_tightly();
        self.gl.tex_image_2d(
            image_target,
            0,
            format.gl() as i32,
            width as i32,
            height as i32,
            format.gl(),
            ty.gl(),
            pixels,
        )?;
        self.size.set((width, height));
        Ok(())
    }

    /// Overwrites a rectangle of level 0 of a 2D texture.
    #[allow(clippy::too_many_arguments)]
    pub fn sub_image(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        pixels: &[u8],
    ) -> Result<()> {
        if self.target != TextureTarget::Texture2D {
            return Err(Error::TextureUpload(
                "cube maps are updated per face".to_string(),
            ));
        }
        self.sub_upload(self.target.gl(), x, y, width, height, format, ty, pixels)
    }

    /// Overwrites a rectangle of level 0 of one cube map face.
    #[allow(clippy::too_many_arguments)]
    pub fn face_sub_image(
        &self,
        face: CubeFace,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        pixels: &[u8],
    ) -> Result<()> {
        if self.target != TextureTarget::CubeMap {
            return Err(Error::TextureUpload(format!(
                "{face:?} face update on a 2D texture"
            )));
        }
        self.sub_upload(face.gl(), x, y, width, height, format, ty, pixels)
    }

    #[allow(clippy::too_many_arguments)]
    fn sub_upload(
        &self,
        image_target: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        pixels: &[u8],
    ) -> Result<()> {
        check_len(width, height, format, ty, pixels)?;
        let (full_width, full_height) = self.size.get();
        let fits = |start: u32, len: u32, full: u32| {
            start.checked_add(len).is_some_and(|end| end <= full)
        };
        if !fits(x, width, full_width) || !fits(y, height, full_height) {
            return Err(Error::TextureUpload(format!(
                "{width}x{height} region at ({x}, {y}) exceeds {full_width}x{full_height} texture"
            )));
        }
        self.bind_current();
        self.unpack_tightly();
        self.gl.tex_sub_image_2d(
            image_target,
            0,
            x as i32,
            y as i32,
            width as i32,
            height as i32,
            format.gl(),
            ty.gl(),
            pixels,
        )
    }

    // Rows are tightly packed; the context defaults to 4-byte alignment.
    fn unpack_tightly(&self) {
        self.gl.pixel_store_i32(consts::UNPACK_ALIGNMENT, 1);
    }

    pub fn upload_rgba(&self, image: &RgbaImage) -> Result<()> {
        let (width, height) = image.dimensions();
        self.image(
            width,
            height,
            PixelFormat::Rgba,
            PixelType::UnsignedByte,
            Some(image.as_raw()),
        )
    }

    pub fn generate_mipmap(&self) {
        self.bind_current();
        self.gl.generate_mipmap(self.target.gl());
    }

    pub fn delete(self) {
        debug!("deleting texture {:?}", self.handle);
        self.gl.delete_texture(&self.handle);
    }
}

fn check_len(
    width: u32,
    height: u32,
    format: PixelFormat,
    ty: PixelType,
    pixels: &[u8],
) -> Result<()> {
    let Some(bytes_per_pixel) = ty.bytes_per_pixel(format) else {
        return Err(Error::TextureUpload(format!(
            "{ty:?} pixels cannot hold {format:?} data"
        )));
    };
    let expected = width as usize * height as usize * bytes_per_pixel;
    if pixels.len() != expected {
        return Err(Error::TextureUpload(format!(
            "expected {expected} bytes for {width}x{height} {format:?}, got {}",
            pixels.len()
        )));
    }
    Ok(())
}
