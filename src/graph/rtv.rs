//! Render target views group the colour, depth and stencil attachments a target pass renders into.
//!
//! # Example
//!
//! ```
//! use ember::prelude::*;
//!
//! let mut rtv = RenderTargetViewDef::default();
//! rtv.colour_attachments.push(RenderTargetViewEntry::new("msaa_colour").resolve("colour"));
//! rtv.depth_attachment = RenderTargetViewEntry::new("depth");
//! assert_eq!(rtv.texture_names().collect::<Vec<_>>(), ["msaa_colour", "colour", "depth"]);
//! ```

/// One attachment of a render target view.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderTargetViewEntry {
    pub texture_name: Option<String>,
    pub resolve_texture_name: Option<String>,
    pub mip_level: u8,
    pub resolve_mip_level: u8,
    pub slice: u16,
    pub resolve_slice: u16,
    pub colour_all_layers: bool,
}

impl RenderTargetViewEntry {
    /// Create an attachment rendering into the given texture.
    pub fn new(texture: impl Into<String>) -> Self {
        RenderTargetViewEntry {
            texture_name: Some(texture.into()),
            ..Default::default()
        }
    }

    /// Resolve this attachment into another texture.
    pub fn resolve(mut self, texture: impl Into<String>) -> Self {
        self.resolve_texture_name = Some(texture.into());
        self
    }

    /// Render into a specific mip level and array slice.
    pub fn subresource(mut self, mip_level: u8, slice: u16) -> Self {
        self.mip_level = mip_level;
        self.slice = slice;
        self
    }

    /// Whether this attachment references no texture at all.
    pub fn is_empty(&self) -> bool {
        self.texture_names().next().is_none()
    }

    /// The texture names referenced by this attachment. Empty names are skipped, and the resolve texture
    /// is only yielded when it differs from the primary texture.
    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        let primary = self.texture_name.as_deref().filter(|name| !name.is_empty());
        let resolve = self
            .resolve_texture_name
            .as_deref()
            .filter(|resolve| !resolve.is_empty() && Some(*resolve) != primary);
        primary.into_iter().chain(resolve)
    }
}

/// A named set of attachments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderTargetViewDef {
    pub colour_attachments: Vec<RenderTargetViewEntry>,
    pub depth_attachment: RenderTargetViewEntry,
    pub stencil_attachment: RenderTargetViewEntry,
    pub depth_read_only: bool,
    pub stencil_read_only: bool,
    /// Barriers for this view are resolved when the pass executes instead of ahead of time.
    pub is_runtime_analyzed: bool,
}

impl RenderTargetViewDef {
    /// All attachments in order: colour attachments, then depth, then stencil.
    pub fn attachments(&self) -> impl Iterator<Item = &RenderTargetViewEntry> {
        self.colour_attachments
            .iter()
            .chain(std::iter::once(&self.depth_attachment))
            .chain(std::iter::once(&self.stencil_attachment))
    }

    /// Every texture name referenced by this view, in attachment order. Names are not deduplicated
    /// across attachments.
    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        self.attachments().flat_map(|entry| entry.texture_names())
    }
}
