//! Interfaces of the scene-side collaborators a compositor pass drives.
//!
//! The scene manager, render system, cameras, shadow nodes and workspace listeners are implemented
//! elsewhere. Passes only see them through these traits, and receive them through the
//! [`WorkspaceContext`](crate::compositor::node::WorkspaceContext) of their parent node.

use anyhow::Result;

use crate::compositor::pass::PassInfo;
use crate::compositor::render_pass::RenderPassDescriptor;
use crate::core::handle::Shared;

/// Handle to a camera owned by the workspace or scene.
pub type CameraHandle = Shared<dyn Camera>;
/// Handle to a shadow node owned by the workspace.
pub type ShadowNodeHandle = Shared<dyn ShadowNode>;
/// Handle to the scene manager.
pub type SceneManagerHandle = Shared<dyn SceneManager>;
/// Handle to the render system.
pub type RenderSystemHandle = Shared<dyn RenderSystem>;
/// Handle to the workspace.
pub type WorkspaceHandle = Shared<dyn Workspace>;
/// Handle to a workspace listener.
pub type ListenerHandle = Shared<dyn WorkspaceListener>;

/// Visibility state of the viewport currently being rendered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    visibility_mask: u32,
    light_visibility_mask: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            visibility_mask: 0xffff_ffff,
            light_visibility_mask: 0xffff_ffff,
        }
    }
}

impl Viewport {
    pub fn set_visibility_mask(&mut self, mask: u32, light_mask: u32) {
        self.visibility_mask = mask;
        self.light_visibility_mask = light_mask;
    }

    pub fn visibility_mask(&self) -> u32 {
        self.visibility_mask
    }

    pub fn light_visibility_mask(&self) -> u32 {
        self.light_visibility_mask
    }
}

/// The cameras a pass renders with.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct CamerasInProgress {
    #[derivative(Debug = "ignore")]
    pub rendering: CameraHandle,
    #[derivative(Debug = "ignore")]
    pub culling: CameraHandle,
}

impl CamerasInProgress {
    /// Render and cull with the same camera.
    pub fn single(camera: CameraHandle) -> Self {
        CamerasInProgress {
            rendering: camera.clone(),
            culling: camera,
        }
    }
}

pub trait Camera {
    fn name(&self) -> &str;
    /// Called whenever the camera is about to be used with `viewport`.
    fn notify_viewport(&mut self, viewport: &Viewport);
}

/// A node rendering shadow maps, updated on demand by the scene passes that need it.
pub trait ShadowNode {
    fn name(&self) -> &str;
    fn enabled(&self) -> bool;
    /// Render the shadow maps for `camera`. The update may change the scene manager's active shadow node and
    /// the viewport visibility masks.
    ///
    /// The shadow node is mutably borrowed for the whole update, so `scene_manager` must not borrow its
    /// current shadow node handle from inside this call.
    fn update(
        &mut self,
        camera: &CameraHandle,
        lod_camera: Option<&CameraHandle>,
        scene_manager: &mut dyn SceneManager,
    ) -> Result<()>;
}

pub trait SceneManager {
    fn current_viewport0(&self) -> &Viewport;
    fn current_viewport0_mut(&mut self) -> &mut Viewport;
    fn set_current_shadow_node(&mut self, shadow_node: Option<ShadowNodeHandle>);
    fn set_cameras_in_progress(&mut self, cameras: CamerasInProgress);
    fn set_forward_plus_enabled_in_pass(&mut self, enabled: bool);
    fn set_current_compositor_pass(&mut self, pass: Option<PassInfo>);
    /// Find every shader pipeline state visible to `camera` in render queues `first_rq..=last_rq` and request
    /// its compilation. Must not block on the compilation.
    fn warm_up_shaders_collect(&mut self, camera: &CameraHandle, visibility_mask: u32, first_rq: u8, last_rq: u8);
    /// Start compiling everything collected so far. Must not block on the compilation.
    fn warm_up_shaders_trigger(&mut self);
}

pub trait RenderSystem {
    /// Resolve and issue the resource transitions needed before rendering into `target`.
    fn execute_resource_transitions(&mut self, target: &RenderPassDescriptor);
    fn set_current_render_pass_descriptor(&mut self, target: &RenderPassDescriptor);
    fn execute_render_pass_descriptor_delayed_actions(&mut self);
}

pub trait Workspace {
    /// Find a shadow node by name, instantiating it if this workspace has not done so yet.
    /// The returned flag is true if the node was created by this call.
    fn find_or_create_shadow_node(&mut self, name: &str) -> Result<(ShadowNodeHandle, bool)>;
    fn find_camera(&self, name: &str) -> Result<CameraHandle>;
    /// Listeners, in notification order.
    fn listeners(&self) -> Vec<ListenerHandle>;
}

/// Observes pass execution. Every hook defaults to doing nothing.
///
/// Listeners are called while the scene manager is borrowed, and must not access it through its handle.
#[allow(unused_variables)]
pub trait WorkspaceListener {
    fn pass_early_pre_execute(&mut self, pass: &PassInfo) {}
    /// Called after the pass set up the viewport. Changes to `viewport` are honoured by the pass.
    fn pass_pre_execute(&mut self, pass: &PassInfo, viewport: &mut Viewport) {}
    /// `pass` is `None` for passes that render no scene after updating shadow maps.
    fn pass_scene_after_shadow_maps(&mut self, pass: Option<&PassInfo>) {}
    fn pass_pos_execute(&mut self, pass: &PassInfo) {}
}
