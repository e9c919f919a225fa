//! The warm-up pass instance.
//!
//! Executing a warm-up pass sets up the scene state exactly like a scene pass would (visibility mask, shadow
//! node, cameras, render target), but instead of rendering it asks the scene manager to collect the shader
//! pipeline states the scene needs, and/or to trigger their compilation. See
//! [`WarmUpMode`](crate::graph::pass::WarmUpMode).

use anyhow::Result;

use crate::Error;
use crate::compositor::node::CompositorNode;
use crate::compositor::pass::{CompositorPass, PassBase, PassInfo, PassState};
use crate::compositor::scene::{CameraHandle, CamerasInProgress, ShadowNodeHandle};
use crate::graph::pass::{PassDef, PassDefCommon, WarmUpMode, WarmUpPassDef};
use crate::graph::rtv::RenderTargetViewDef;

/// Runtime instance of a warm-up pass definition.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct WarmUpPass {
    base: PassBase,
    common: PassDefCommon,
    definition: WarmUpPassDef,
    #[derivative(Debug = "ignore")]
    camera: CameraHandle,
    #[derivative(Debug = "ignore")]
    shadow_node: Option<ShadowNodeHandle>,
    shadow_node_created: bool,
}

impl WarmUpPass {
    /// Instantiate a warm-up pass. The camera is looked up in the workspace if the definition names one,
    /// otherwise `default_camera` is used. A shadow node named by the definition is found or created.
    /// # Errors
    /// * Fails with [`Error::PassTypeMismatch`] if `definition` is not a warm-up pass.
    /// * Fails if the workspace cannot resolve the named camera or shadow node.
    pub fn new(
        definition: &PassDef,
        default_camera: CameraHandle,
        parent: &CompositorNode,
        rtv: &RenderTargetViewDef,
    ) -> Result<Self> {
        let warm_up = WarmUpPassDef::from_def(definition)?;
        if warm_up.mode == WarmUpMode::TRIGGER {
            warn!(
                "Warm-up pass {} of node `{}` only triggers, it relies on other passes to collect",
                definition.common.identifier,
                parent.name()
            );
        }

        let base = PassBase::new(definition, parent, rtv);
        let workspace = &parent.context().workspace;

        let (shadow_node, shadow_node_created) = match &warm_up.scope.shadow_node {
            Some(name) => {
                let (node, created) = workspace.borrow_mut().find_or_create_shadow_node(name)?;
                (Some(node), created)
            }
            None => (None, false),
        };

        let camera = match &warm_up.camera_name {
            Some(name) => workspace.borrow().find_camera(name)?,
            None => default_camera,
        };

        trace!("Created warm-up pass {} in node `{}`", definition.common.identifier, parent.name());
        Ok(WarmUpPass {
            base,
            common: definition.common.clone(),
            definition: warm_up.clone(),
            camera,
            shadow_node,
            shadow_node_created,
        })
    }

    pub fn definition(&self) -> &WarmUpPassDef {
        &self.definition
    }

    pub fn camera(&self) -> &CameraHandle {
        &self.camera
    }

    pub fn shadow_node(&self) -> Option<&ShadowNodeHandle> {
        self.shadow_node.as_ref()
    }

    /// Whether resolving the shadow node instantiated it, as opposed to reusing an existing one.
    pub fn shadow_node_created(&self) -> bool {
        self.shadow_node_created
    }

    fn execute_scene_setup(&self, lod_camera: Option<&CameraHandle>) -> Result<()> {
        let context = self.base.context();
        let scope = &self.definition.scope;

        self.base.notify_early_pre_execute();

        let shadow_node = self.shadow_node.as_ref().filter(|node| node.borrow().enabled()).cloned();
        {
            let mut scene_manager = context.scene_manager.borrow_mut();
            scene_manager
                .current_viewport0_mut()
                .set_visibility_mask(scope.visibility_mask, 0xffff_ffff);
            scene_manager.set_current_shadow_node(shadow_node.clone());
        }

        // Listeners may change the viewport.
        self.base.notify_pre_execute();

        if let Some(shadow_node) = shadow_node {
            // Updating the shadow node breaks the chain of load/store actions the pass would skip.
            if self.common.skip_load_store_semantics {
                return Err(anyhow::Error::from(Error::SkipLoadStoreWithShadowNode(format!(
                    "{}:{}",
                    self.base.info().node,
                    self.common.identifier
                ))));
            }

            let mut scene_manager = context.scene_manager.borrow_mut();
            let viewport = *scene_manager.current_viewport0();

            // Cull shadow casters with this pass's camera, so shared shadow maps are not over-culled.
            self.camera.borrow_mut().notify_viewport(&viewport);
            shadow_node
                .borrow_mut()
                .update(&self.camera, lod_camera, &mut *scene_manager)?;

            // The shadow node's own passes changed both of these.
            scene_manager.set_current_shadow_node(Some(shadow_node.clone()));
            scene_manager
                .current_viewport0_mut()
                .set_visibility_mask(viewport.visibility_mask(), viewport.light_visibility_mask());
            self.camera.borrow_mut().notify_viewport(scene_manager.current_viewport0());
        }

        self.base.notify_scene_after_shadow_maps(None);
        Ok(())
    }

    fn execute_warm_up(&self) {
        let context = self.base.context();
        let scope = &self.definition.scope;

        self.base.set_render_pass_desc_to_current();

        {
            let mut scene_manager = context.scene_manager.borrow_mut();
            scene_manager.set_cameras_in_progress(CamerasInProgress::single(self.camera.clone()));
            scene_manager.set_forward_plus_enabled_in_pass(scope.enable_forward_plus);
            scene_manager.set_current_compositor_pass(Some(self.base.info().clone()));
        }

        context
            .render_system
            .borrow_mut()
            .execute_render_pass_descriptor_delayed_actions();

        {
            let mut scene_manager = context.scene_manager.borrow_mut();
            if self.definition.mode.contains(WarmUpMode::COLLECT) {
                scene_manager.warm_up_shaders_collect(&self.camera, scope.visibility_mask, scope.first_rq, scope.last_rq);
            }
            if self.definition.mode.contains(WarmUpMode::TRIGGER) {
                scene_manager.warm_up_shaders_trigger();
            }
            scene_manager.set_current_compositor_pass(None);
        }

        self.base.notify_pos_execute();
    }
}

impl CompositorPass for WarmUpPass {
    /// Execute the warm-up pass. Does nothing once the execution budget is spent.
    /// # Errors
    /// * Fails with [`Error::SkipLoadStoreWithShadowNode`] if the pass skips load/store semantics but has an
    ///   enabled shadow node to update.
    /// * Fails if the shadow node update fails.
    fn execute(&mut self, lod_camera: Option<&CameraHandle>) -> Result<()> {
        if !self.base.begin_execution() {
            return Ok(());
        }
        trace!("Executing warm-up pass {} ({:?})", self.common.identifier, self.definition.mode);

        self.base.profiling_begin();
        let result = self.execute_scene_setup(lod_camera).map(|_| self.execute_warm_up());
        self.base.profiling_end();

        self.base.end_execution();
        result
    }

    fn info(&self) -> &PassInfo {
        self.base.info()
    }

    fn state(&self) -> PassState {
        self.base.state()
    }

    fn num_passes_left(&self) -> Option<u32> {
        self.base.num_passes_left()
    }
}
