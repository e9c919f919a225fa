//! Texture definitions and texture sources of a node definition.

use bitflags::bitflags;

/// Where a texture referenced by name inside a node comes from.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum TextureSource {
    /// Texture is created and owned by the node itself.
    #[default]
    Local,
    /// Texture is handed to the node through one of its input channels.
    Input,
    /// Texture is owned by the workspace and shared between nodes.
    Global,
}

/// A texture name resolved to its source and the index within that source.
/// For [`TextureSource::Local`] this indexes the local texture definitions, for [`TextureSource::Input`]
/// the input channels. Global textures carry index 0.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct TextureSourceEntry {
    pub index: usize,
    pub source: TextureSource,
}

/// Pixel formats a compositor texture can be declared with.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum PixelFormat {
    /// Use the format of the render target the node is bound to.
    #[default]
    Unknown,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8UnormSrgb,
    Rgba16Float,
    Rgba32Float,
    R10G10B10A2Unorm,
    R11G11B10Float,
    D32Float,
    D24UnormS8Uint,
    D32FloatS8Uint,
}

bitflags! {
    /// Usage flags of a texture definition.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextureFlags: u32 {
        const RENDER_TO_TEXTURE = 1 << 0;
        const UAV = 1 << 1;
        const ALLOW_AUTOMIPMAPS = 1 << 2;
        const MSAA_EXPLICIT_RESOLVE = 1 << 3;
        const DISCARDABLE_CONTENT = 1 << 4;
    }
}

/// Describes a texture the node allocates itself.
///
/// A width or height of zero means the dimension is derived from the render target the node
/// is bound to, scaled by `width_factor` / `height_factor`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDefinition {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub depth_or_slices: u32,
    pub num_mipmaps: u8,
    pub width_factor: f32,
    pub height_factor: f32,
    pub format: PixelFormat,
    pub msaa: u8,
    pub flags: TextureFlags,
    /// Depth buffer pool the texture shares its depth buffer with.
    pub depth_buffer_id: u16,
    pub depth_buffer_format: PixelFormat,
}

impl TextureDefinition {
    /// Create a texture definition that matches the size and format of the bound render target.
    pub fn new(name: impl Into<String>) -> Self {
        TextureDefinition {
            name: name.into(),
            width: 0,
            height: 0,
            depth_or_slices: 1,
            num_mipmaps: 1,
            width_factor: 1.0,
            height_factor: 1.0,
            format: PixelFormat::Unknown,
            msaa: 1,
            flags: TextureFlags::RENDER_TO_TEXTURE,
            depth_buffer_id: 1,
            depth_buffer_format: PixelFormat::Unknown,
        }
    }

    /// Set a fixed size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the scale relative to the render target. Only used for dimensions that are zero.
    pub fn scale(mut self, width_factor: f32, height_factor: f32) -> Self {
        self.width_factor = width_factor;
        self.height_factor = height_factor;
        self
    }

    pub fn format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    pub fn msaa(mut self, samples: u8) -> Self {
        self.msaa = samples;
        self
    }

    pub fn flags(mut self, flags: TextureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether the size of this texture follows the bound render target.
    pub fn is_relative(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
