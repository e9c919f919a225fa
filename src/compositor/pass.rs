//! Runtime passes instantiated from pass definitions.
//!
//! Every pass type embeds a [`PassBase`], which handles what all passes share: the execution budget and the
//! resulting [`PassState`], the render pass descriptor resolved from the target's render target view,
//! listener notifications and profiling scopes.

use anyhow::Result;

use crate::compositor::node::{CompositorNode, WorkspaceContext};
use crate::compositor::render_pass::RenderPassDescriptor;
use crate::compositor::scene::{CameraHandle, ListenerHandle};
use crate::graph::pass::{PassDef, PassType};
use crate::graph::rtv::RenderTargetViewDef;

/// Identifies a pass instance to listeners and the scene manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassInfo {
    /// Name of the parent node.
    pub node: String,
    pub identifier: u32,
    pub pass_type: PassType,
    pub profiling_id: String,
}

/// Lifecycle of a pass instance.
///
/// ```text
/// Armed --execute--> Executing --> Idle --execute--> Executing --> ...
///                              \-> Exhausted (budget spent, further executes are no-ops)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PassState {
    /// Executed at least once, waiting for the next frame.
    Idle,
    /// Created and resolved, never executed.
    Armed,
    Executing,
    Exhausted,
}

/// A pass instance that can be executed by the frame graph driver.
pub trait CompositorPass {
    /// Execute the pass for this frame.
    fn execute(&mut self, lod_camera: Option<&CameraHandle>) -> Result<()>;
    fn info(&self) -> &PassInfo;
    fn state(&self) -> PassState;
    /// Remaining executions, `None` if the pass is not limited.
    fn num_passes_left(&self) -> Option<u32>;
}

/// State shared by all pass implementations.
#[derive(Debug)]
pub struct PassBase {
    info: PassInfo,
    context: WorkspaceContext,
    render_pass_desc: RenderPassDescriptor,
    num_passes_left: Option<u32>,
    state: PassState,
}

impl PassBase {
    pub(crate) fn new(definition: &PassDef, parent: &CompositorNode, rtv: &RenderTargetViewDef) -> Self {
        let common = &definition.common;
        let num_passes_left = common.num_initial;
        PassBase {
            info: PassInfo {
                node: parent.name().to_owned(),
                identifier: common.identifier,
                pass_type: definition.pass_type(),
                profiling_id: common.profiling_id.clone(),
            },
            context: parent.context().clone(),
            render_pass_desc: RenderPassDescriptor::from_rtv(rtv, common.read_only_depth, common.read_only_stencil),
            num_passes_left,
            state: match num_passes_left {
                Some(0) => PassState::Exhausted,
                _ => PassState::Armed,
            },
        }
    }

    pub fn info(&self) -> &PassInfo {
        &self.info
    }

    pub fn context(&self) -> &WorkspaceContext {
        &self.context
    }

    pub fn render_pass_desc(&self) -> &RenderPassDescriptor {
        &self.render_pass_desc
    }

    pub fn num_passes_left(&self) -> Option<u32> {
        self.num_passes_left
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Start an execution, spending one unit of the budget. Returns false without touching anything
    /// if the budget is already spent.
    pub(crate) fn begin_execution(&mut self) -> bool {
        match self.num_passes_left {
            Some(0) => {
                trace!("Pass {} of node `{}` is exhausted, skipping", self.info.identifier, self.info.node);
                return false;
            }
            Some(left) => self.num_passes_left = Some(left - 1),
            None => {}
        }
        self.state = PassState::Executing;
        true
    }

    pub(crate) fn end_execution(&mut self) {
        self.state = match self.num_passes_left {
            Some(0) => {
                debug!("Pass {} of node `{}` spent its execution budget", self.info.identifier, self.info.node);
                PassState::Exhausted
            }
            _ => PassState::Idle,
        };
    }

    fn listeners(&self) -> Vec<ListenerHandle> {
        self.context.workspace.borrow().listeners()
    }

    pub(crate) fn notify_early_pre_execute(&self) {
        for listener in self.listeners() {
            listener.borrow_mut().pass_early_pre_execute(&self.info);
        }
    }

    pub(crate) fn notify_pre_execute(&self) {
        let listeners = self.listeners();
        let mut scene_manager = self.context.scene_manager.borrow_mut();
        for listener in listeners {
            listener
                .borrow_mut()
                .pass_pre_execute(&self.info, scene_manager.current_viewport0_mut());
        }
    }

    pub(crate) fn notify_scene_after_shadow_maps(&self, pass: Option<&PassInfo>) {
        for listener in self.listeners() {
            listener.borrow_mut().pass_scene_after_shadow_maps(pass);
        }
    }

    pub(crate) fn notify_pos_execute(&self) {
        for listener in self.listeners() {
            listener.borrow_mut().pass_pos_execute(&self.info);
        }
    }

    /// Resolve pending resource transitions and make this pass's target current.
    pub(crate) fn set_render_pass_desc_to_current(&self) {
        let mut render_system = self.context.render_system.borrow_mut();
        render_system.execute_resource_transitions(&self.render_pass_desc);
        render_system.set_current_render_pass_descriptor(&self.render_pass_desc);
    }

    pub(crate) fn profiling_begin(&self) {
        #[cfg(feature = "profiling")]
        trace!("begin pass `{}` ({}:{})", self.info.profiling_id, self.info.node, self.info.identifier);
    }

    pub(crate) fn profiling_end(&self) {
        #[cfg(feature = "profiling")]
        trace!("end pass `{}` ({}:{})", self.info.profiling_id, self.info.node, self.info.identifier);
    }
}
