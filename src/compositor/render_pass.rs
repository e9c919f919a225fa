use crate::graph::rtv::{RenderTargetViewDef, RenderTargetViewEntry};

/// One bound attachment of a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDesc {
    pub texture: String,
    pub resolve_texture: Option<String>,
    pub mip_level: u8,
    pub slice: u16,
}

impl AttachmentDesc {
    fn from_entry(entry: &RenderTargetViewEntry) -> Option<Self> {
        let texture = entry.texture_name.clone().filter(|name| !name.is_empty())?;
        Some(AttachmentDesc {
            texture,
            resolve_texture: entry.resolve_texture_name.clone().filter(|name| !name.is_empty()),
            mip_level: entry.mip_level,
            slice: entry.slice,
        })
    }
}

/// What a pass renders into, resolved from a render target view when the pass is created.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderPassDescriptor {
    pub colour: Vec<AttachmentDesc>,
    pub depth: Option<AttachmentDesc>,
    pub stencil: Option<AttachmentDesc>,
    pub depth_read_only: bool,
    pub stencil_read_only: bool,
}

impl RenderPassDescriptor {
    /// Resolve a render target view. Empty attachments are left out. The view's read-only flags are
    /// combined with the pass's own.
    pub fn from_rtv(rtv: &RenderTargetViewDef, read_only_depth: bool, read_only_stencil: bool) -> Self {
        RenderPassDescriptor {
            colour: rtv
                .colour_attachments
                .iter()
                .filter_map(AttachmentDesc::from_entry)
                .collect(),
            depth: AttachmentDesc::from_entry(&rtv.depth_attachment),
            stencil: AttachmentDesc::from_entry(&rtv.stencil_attachment),
            depth_read_only: rtv.depth_read_only || read_only_depth,
            stencil_read_only: rtv.stencil_read_only || read_only_stencil,
        }
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.colour.is_empty() && self.depth.is_none() && self.stencil.is_none()
    }
}
