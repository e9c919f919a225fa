//! Node definitions: the textures a node owns or receives, its render target views, and its target passes.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;

use crate::Error;
use crate::graph::rtv::RenderTargetViewDef;
use crate::graph::target::TargetPassDef;
use crate::graph::texture::{TextureDefinition, TextureSource, TextureSourceEntry};

/// Definition of a compositor node. Instances of a node are created per workspace from this definition.
///
/// Every texture name used inside the node resolves to exactly one [`TextureSourceEntry`]:
/// a local texture definition, an input channel or a global texture.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDef {
    name: String,
    input_channels: Vec<String>,
    local_textures: Vec<TextureDefinition>,
    texture_sources: HashMap<String, TextureSourceEntry>,
    render_target_views: BTreeMap<String, RenderTargetViewDef>,
    target_passes: Vec<TargetPassDef>,
}

impl NodeDef {
    /// Create an empty node definition.
    pub fn new(name: impl Into<String>) -> Self {
        NodeDef {
            name: name.into(),
            input_channels: vec![],
            local_textures: vec![],
            texture_sources: HashMap::new(),
            render_target_views: BTreeMap::new(),
            target_passes: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an input channel and return its index.
    pub fn add_input_channel(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        let index = self.input_channels.len();
        self.input_channels.push(name.clone());
        self.add_texture_source_name(name, index, TextureSource::Input);
        index
    }

    pub fn input_channels(&self) -> &[String] {
        &self.input_channels
    }

    /// Reference a texture owned by the workspace.
    pub fn add_global_texture(&mut self, name: impl Into<String>) {
        self.add_texture_source_name(name, 0, TextureSource::Global);
    }

    /// Register a name resolving to `index` within `source`. Used for textures this node does not own, and
    /// to give a local texture definition a second name: with [`TextureSource::Local`], `index` must point
    /// into [`NodeDef::local_textures()`], and the alias resolves to that definition.
    /// Registering a name again replaces the previous entry.
    pub fn add_texture_source_name(&mut self, name: impl Into<String>, index: usize, source: TextureSource) {
        self.texture_sources.insert(name.into(), TextureSourceEntry {
            index,
            source,
        });
    }

    /// Add a local texture and return a reference to the stored definition. A local texture with the same
    /// name is replaced in place.
    pub fn add_texture_definition(&mut self, definition: TextureDefinition) -> &mut TextureDefinition {
        let index = match self.texture_sources.get(&definition.name) {
            Some(TextureSourceEntry {
                index,
                source: TextureSource::Local,
            }) => {
                self.local_textures[*index] = definition;
                *index
            }
            _ => {
                let index = self.local_textures.len();
                self.texture_sources.insert(definition.name.clone(), TextureSourceEntry {
                    index,
                    source: TextureSource::Local,
                });
                self.local_textures.push(definition);
                index
            }
        };
        &mut self.local_textures[index]
    }

    pub fn local_textures(&self) -> &[TextureDefinition] {
        &self.local_textures
    }

    /// Look up a local texture by name.
    pub fn local_texture(&self, name: &str) -> Option<&TextureDefinition> {
        match self.texture_sources.get(name) {
            Some(TextureSourceEntry {
                index,
                source: TextureSource::Local,
            }) => self.local_textures.get(*index),
            _ => None,
        }
    }

    /// Resolve a texture name to where the texture comes from.
    /// # Errors
    /// * Fails with [`Error::TextureNotFound`] if the name is unknown to this node.
    pub fn texture_source(&self, name: &str) -> Result<TextureSourceEntry> {
        self.texture_sources
            .get(name)
            .copied()
            .ok_or_else(|| anyhow::Error::from(Error::TextureNotFound(name.to_owned())))
    }

    /// Iterate over every texture name known to the node and its source.
    pub fn texture_sources(&self) -> impl Iterator<Item = (&str, &TextureSourceEntry)> {
        self.texture_sources.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of texture names known to the node, including inputs and globals.
    pub fn num_texture_names(&self) -> usize {
        self.texture_sources.len()
    }

    /// Get the render target view with this name, creating an empty one if it does not exist yet.
    pub fn add_render_target_view(&mut self, name: impl Into<String>) -> &mut RenderTargetViewDef {
        self.render_target_views.entry(name.into()).or_default()
    }

    /// # Errors
    /// * Fails with [`Error::RenderTargetViewNotFound`] if no view with this name exists.
    pub fn render_target_view(&self, name: &str) -> Result<&RenderTargetViewDef> {
        self.render_target_views
            .get(name)
            .ok_or_else(|| anyhow::Error::from(Error::RenderTargetViewNotFound(name.to_owned())))
    }

    /// All render target views, ordered by name.
    pub fn render_target_views(&self) -> impl Iterator<Item = (&str, &RenderTargetViewDef)> {
        self.render_target_views.iter().map(|(name, rtv)| (name.as_str(), rtv))
    }

    /// Reserve space for `count` target passes.
    pub fn set_num_target_passes(&mut self, count: usize) {
        self.target_passes.reserve(count.saturating_sub(self.target_passes.len()));
    }

    /// Append a target pass rendering into the render target view `render_target_name`.
    pub fn add_target_pass(&mut self, render_target_name: impl Into<String>, rt_index: u32) -> &mut TargetPassDef {
        let index = self.target_passes.len();
        self.target_passes.push(TargetPassDef::new(render_target_name, rt_index));
        &mut self.target_passes[index]
    }

    pub fn target_passes(&self) -> &[TargetPassDef] {
        &self.target_passes
    }

    pub fn target_pass(&self, index: usize) -> Option<&TargetPassDef> {
        self.target_passes.get(index)
    }

    pub(crate) fn target_passes_mut(&mut self) -> &mut [TargetPassDef] {
        &mut self.target_passes
    }

    pub fn num_target_passes(&self) -> usize {
        self.target_passes.len()
    }
}
