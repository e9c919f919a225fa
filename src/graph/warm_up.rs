//! Derives warm-up node definitions from existing scene-rendering node definitions.
//!
//! A warm-up node mirrors the target passes of a reference node that contain scene passes. Each scene pass
//! is replaced by a warm-up pass looking at the same part of the scene, so executing the warm-up node
//! requests compilation of every shader pipeline the reference node would need, without rendering at full
//! resolution. Local textures are shrunk to a tiny placeholder size, textures coming from outside the node
//! are referenced as-is.
//!
//! Every warm-up pass collects. Only the very last one also triggers, flushing everything collected by
//! the passes before it in one go.
//!
//! # Example
//!
//! ```
//! use ember::prelude::*;
//!
//! let mut registry = NodeDefRegistry::new();
//! let node = registry.add_node_definition("main_render")?;
//! node.add_texture_definition(TextureDefinition::new("colour").format(PixelFormat::Rgba16Float));
//! node.add_render_target_view("colour").colour_attachments.push(RenderTargetViewEntry::new("colour"));
//! let target = node.add_target_pass("colour", 0);
//! target.add_pass(PassBuilder::clear().build());
//! target.add_pass(PassBuilder::scene().render_queues(0, 100)?.build());
//!
//! let warm_up = WarmUpGraphBuilder::new().create_from(&mut registry, "main_render/warm_up", "main_render")?;
//! assert_eq!(warm_up.num_target_passes(), 1);
//! assert_eq!(warm_up.local_texture("colour").unwrap().width, 4);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::HashSet;

use anyhow::Result;

use crate::Error;
use crate::graph::node::NodeDef;
use crate::graph::pass::{PassDef, PassDefCommon, PassKind, PassType, ScenePassDef, WarmUpMode, WarmUpPassDef};
use crate::graph::registry::NodeDefRegistry;
use crate::graph::target::TargetPassDef;
use crate::graph::texture::TextureSource;

/// Size local textures are given inside a warm-up node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WarmUpSettings {
    pub width: u32,
    pub height: u32,
    /// Applied to both the width and height factor.
    pub scale: f32,
}

impl Default for WarmUpSettings {
    fn default() -> Self {
        WarmUpSettings {
            width: 4,
            height: 4,
            scale: 1.0,
        }
    }
}

/// Builds warm-up node definitions. See the [module level documentation](crate::graph::warm_up).
#[derive(Debug, Default, Clone)]
pub struct WarmUpGraphBuilder {
    settings: WarmUpSettings,
}

impl WarmUpGraphBuilder {
    /// Create a builder using the default 4x4 placeholder textures.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: WarmUpSettings) -> Self {
        WarmUpGraphBuilder {
            settings,
        }
    }

    pub fn settings(&self) -> &WarmUpSettings {
        &self.settings
    }

    /// Count the target passes of `reference` that contain at least one scene pass.
    /// # Errors
    /// * Fails with [`Error::NoScenePasses`] if there are none.
    pub fn num_target_passes_needed(reference: &NodeDef) -> Result<usize> {
        let count = reference
            .target_passes()
            .iter()
            .filter(|target| target.num_scene_passes() > 0)
            .count();
        if count == 0 {
            return Err(anyhow::Error::from(Error::NoScenePasses(reference.name().to_owned())));
        }
        Ok(count)
    }

    /// Build the warm-up node for `reference` and name it `name`. The reference is left untouched.
    /// # Errors
    /// * Fails with [`Error::NoScenePasses`] if `reference` has no scene passes.
    /// * Fails if a scene target pass renders into a render target view that `reference` does not define,
    ///   or if that view references a texture unknown to `reference`.
    pub fn build(&self, reference: &NodeDef, name: impl Into<String>) -> Result<NodeDef> {
        let num_target_passes = Self::num_target_passes_needed(reference)?;

        let mut warm_up = NodeDef::new(name);
        warm_up.set_num_target_passes(num_target_passes);

        let mut seen_textures = HashSet::new();
        let mut seen_rtvs = HashSet::new();

        for ref_target in reference.target_passes() {
            let num_scene_passes = ref_target.num_scene_passes();
            if num_scene_passes == 0 {
                trace!("Skipping target pass `{}`: no scene passes", ref_target.render_target_name());
                continue;
            }

            let rt_name = ref_target.render_target_name();
            if seen_rtvs.insert(rt_name) {
                let ref_rtv = reference.render_target_view(rt_name)?;
                *warm_up.add_render_target_view(rt_name) = ref_rtv.clone();
                for texture in ref_rtv.texture_names() {
                    self.copy_texture(&mut warm_up, reference, texture, &mut seen_textures)?;
                }
            }

            let target = warm_up.add_target_pass(rt_name, ref_target.rt_index());
            Self::copy_scene_passes(target, ref_target, num_scene_passes)?;
        }

        // The last warm-up pass flushes everything collected before it.
        let last = warm_up
            .target_passes_mut()
            .last_mut()
            .and_then(|target| target.passes.last_mut())
            .and_then(PassDef::as_warm_up_mut);
        if let Some(last) = last {
            last.mode = WarmUpMode::COLLECT_AND_TRIGGER;
        }

        debug!(
            "Built warm-up node `{}` from `{}`: {} target passes, {} textures",
            warm_up.name(),
            reference.name(),
            warm_up.num_target_passes(),
            warm_up.num_texture_names()
        );
        Ok(warm_up)
    }

    /// Build the warm-up node for the registered node `reference_name` and register it as `name`.
    /// Nothing is registered on failure.
    /// # Errors
    /// * Fails with [`Error::NodeDefinitionNotFound`] if there is no node called `reference_name`.
    /// * Fails with [`Error::NodeDefinitionExists`] if `name` is already taken.
    /// * Fails for the same reasons as [`WarmUpGraphBuilder::build()`].
    pub fn create_from<'r>(
        &self,
        registry: &'r mut NodeDefRegistry,
        name: &str,
        reference_name: &str,
    ) -> Result<&'r mut NodeDef> {
        if registry.has_node_definition(name) {
            return Err(anyhow::Error::from(Error::NodeDefinitionExists(name.to_owned())));
        }
        let node = self.build(registry.node_definition(reference_name)?, name)?;
        info!("Created warm-up node definition `{name}` from `{reference_name}`");
        registry.insert(node)
    }

    fn copy_scene_passes(target: &mut TargetPassDef, ref_target: &TargetPassDef, num_scene_passes: usize) -> Result<()> {
        target.set_num_passes(num_scene_passes);
        target.target_level_barrier = ref_target.target_level_barrier.clone();

        for ref_pass in ref_target.passes_of_type(PassType::Scene) {
            let scene = ScenePassDef::from_def(ref_pass)?;
            let common = &ref_pass.common;
            let pass = target.add_pass(PassDef {
                common: PassDefCommon {
                    identifier: common.identifier,
                    profiling_id: common.profiling_id.clone(),
                    execution_mask: common.execution_mask,
                    skip_load_store_semantics: common.skip_load_store_semantics,
                    colour_write: common.colour_write,
                    read_only_depth: common.read_only_depth,
                    read_only_stencil: common.read_only_stencil,
                    include_overlays: common.include_overlays,
                    shadow_map_full_viewport: common.shadow_map_full_viewport,
                    exposed_textures: common.exposed_textures.clone(),
                    ..Default::default()
                },
                kind: PassKind::WarmUp(WarmUpPassDef {
                    scope: scene.scope.clone(),
                    camera_name: None,
                    mode: WarmUpMode::COLLECT,
                }),
            });
            trace!("Created warm-up pass {} for target `{}`", pass.common.identifier, ref_target.render_target_name());
        }
        Ok(())
    }

    fn copy_texture<'a>(
        &self,
        warm_up: &mut NodeDef,
        reference: &NodeDef,
        name: &'a str,
        seen: &mut HashSet<&'a str>,
    ) -> Result<()> {
        if !seen.insert(name) {
            return Ok(());
        }

        let entry = reference.texture_source(name)?;
        match entry.source {
            TextureSource::Local => {
                let mut definition = reference
                    .local_textures()
                    .get(entry.index)
                    .cloned()
                    .ok_or_else(|| Error::TextureNotFound(name.to_owned()))?;
                // Registered under the name the view uses, which may be an alias.
                definition.name = name.to_owned();
                // Only the pipeline matters, not the resolution.
                definition.width = self.settings.width;
                definition.height = self.settings.height;
                definition.width_factor = self.settings.scale;
                definition.height_factor = self.settings.scale;
                warm_up.add_texture_definition(definition);
                trace!("Copied local texture `{name}` into warm-up node `{}`", warm_up.name());
            }
            source => {
                warm_up.add_texture_source_name(name, entry.index, source);
                trace!("Aliased {source:?} texture `{name}` in warm-up node `{}`", warm_up.name());
            }
        }
        Ok(())
    }
}
