#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::Result;

use ember::prelude::*;

/// Every observable call made into the fake collaborators, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    EarlyPreExecute(u32),
    PreExecute(u32),
    AfterShadowMaps,
    PosExecute(u32),
    SetShadowNode(Option<String>),
    CamerasInProgress(String),
    ForwardPlus(bool),
    CurrentPass(Option<u32>),
    Collect {
        camera: String,
        visibility_mask: u32,
        first_rq: u8,
        last_rq: u8,
    },
    Trigger,
    ResourceTransitions(usize),
    SetRenderPassDesc(usize),
    DelayedActions,
    NotifyViewport(String, u32),
    ShadowUpdate {
        shadow_node: String,
        camera: String,
        lod_camera: Option<String>,
    },
}

pub type CallLog = Shared<Vec<Call>>;

pub struct FakeSceneManager {
    log: CallLog,
    viewport: Viewport,
}

impl SceneManager for FakeSceneManager {
    fn current_viewport0(&self) -> &Viewport {
        &self.viewport
    }

    fn current_viewport0_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    fn set_current_shadow_node(&mut self, shadow_node: Option<ShadowNodeHandle>) {
        let name = shadow_node.map(|node| node.borrow().name().to_owned());
        self.log.borrow_mut().push(Call::SetShadowNode(name));
    }

    fn set_cameras_in_progress(&mut self, cameras: CamerasInProgress) {
        let name = cameras.rendering.borrow().name().to_owned();
        self.log.borrow_mut().push(Call::CamerasInProgress(name));
    }

    fn set_forward_plus_enabled_in_pass(&mut self, enabled: bool) {
        self.log.borrow_mut().push(Call::ForwardPlus(enabled));
    }

    fn set_current_compositor_pass(&mut self, pass: Option<PassInfo>) {
        self.log
            .borrow_mut()
            .push(Call::CurrentPass(pass.map(|pass| pass.identifier)));
    }

    fn warm_up_shaders_collect(&mut self, camera: &CameraHandle, visibility_mask: u32, first_rq: u8, last_rq: u8) {
        self.log.borrow_mut().push(Call::Collect {
            camera: camera.borrow().name().to_owned(),
            visibility_mask,
            first_rq,
            last_rq,
        });
    }

    fn warm_up_shaders_trigger(&mut self) {
        self.log.borrow_mut().push(Call::Trigger);
    }
}

pub struct FakeRenderSystem {
    log: CallLog,
}

impl RenderSystem for FakeRenderSystem {
    fn execute_resource_transitions(&mut self, target: &RenderPassDescriptor) {
        self.log
            .borrow_mut()
            .push(Call::ResourceTransitions(target.colour.len()));
    }

    fn set_current_render_pass_descriptor(&mut self, target: &RenderPassDescriptor) {
        self.log
            .borrow_mut()
            .push(Call::SetRenderPassDesc(target.colour.len()));
    }

    fn execute_render_pass_descriptor_delayed_actions(&mut self) {
        self.log.borrow_mut().push(Call::DelayedActions);
    }
}

pub struct FakeCamera {
    name: String,
    log: CallLog,
}

impl Camera for FakeCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn notify_viewport(&mut self, viewport: &Viewport) {
        self.log
            .borrow_mut()
            .push(Call::NotifyViewport(self.name.clone(), viewport.visibility_mask()));
    }
}

/// Shadow node that clobbers the scene manager state on update, like real shadow passes do.
pub struct FakeShadowNode {
    name: String,
    pub enabled: bool,
    log: CallLog,
}

pub const SHADOW_PASS_VISIBILITY: u32 = 0x0000_0001;

impl ShadowNode for FakeShadowNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn update(
        &mut self,
        camera: &CameraHandle,
        lod_camera: Option<&CameraHandle>,
        scene_manager: &mut dyn SceneManager,
    ) -> Result<()> {
        self.log.borrow_mut().push(Call::ShadowUpdate {
            shadow_node: self.name.clone(),
            camera: camera.borrow().name().to_owned(),
            lod_camera: lod_camera.map(|camera| camera.borrow().name().to_owned()),
        });
        scene_manager
            .current_viewport0_mut()
            .set_visibility_mask(SHADOW_PASS_VISIBILITY, SHADOW_PASS_VISIBILITY);
        scene_manager.set_current_shadow_node(None);
        Ok(())
    }
}

pub struct RecordingListener {
    log: CallLog,
}

impl WorkspaceListener for RecordingListener {
    fn pass_early_pre_execute(&mut self, pass: &PassInfo) {
        self.log.borrow_mut().push(Call::EarlyPreExecute(pass.identifier));
    }

    fn pass_pre_execute(&mut self, pass: &PassInfo, _viewport: &mut Viewport) {
        self.log.borrow_mut().push(Call::PreExecute(pass.identifier));
    }

    fn pass_scene_after_shadow_maps(&mut self, _pass: Option<&PassInfo>) {
        self.log.borrow_mut().push(Call::AfterShadowMaps);
    }

    fn pass_pos_execute(&mut self, pass: &PassInfo) {
        self.log.borrow_mut().push(Call::PosExecute(pass.identifier));
    }
}

/// Overrides the visibility mask right before the pass uses it.
pub struct MaskOverrideListener {
    pub mask: u32,
}

impl WorkspaceListener for MaskOverrideListener {
    fn pass_pre_execute(&mut self, _pass: &PassInfo, viewport: &mut Viewport) {
        viewport.set_visibility_mask(self.mask, viewport.light_visibility_mask());
    }
}

pub struct FakeWorkspace {
    log: CallLog,
    cameras: HashMap<String, CameraHandle>,
    shadow_nodes: HashMap<String, Shared<FakeShadowNode>>,
    /// Shadow node definitions that can be instantiated on demand.
    shadow_node_defs: Vec<String>,
    listeners: Vec<ListenerHandle>,
}

impl FakeWorkspace {
    pub fn add_camera(&mut self, name: &str) -> CameraHandle {
        let camera: CameraHandle = shared(FakeCamera {
            name: name.to_owned(),
            log: self.log.clone(),
        });
        self.cameras.insert(name.to_owned(), camera.clone());
        camera
    }

    pub fn add_shadow_node_def(&mut self, name: &str) {
        self.shadow_node_defs.push(name.to_owned());
    }

    /// Instantiate a shadow node up front, so passes reuse it instead of creating it.
    pub fn add_shadow_node(&mut self, name: &str, enabled: bool) -> Shared<FakeShadowNode> {
        let node = shared(FakeShadowNode {
            name: name.to_owned(),
            enabled,
            log: self.log.clone(),
        });
        self.shadow_nodes.insert(name.to_owned(), node.clone());
        node
    }

    pub fn add_listener(&mut self, listener: ListenerHandle) {
        self.listeners.push(listener);
    }
}

impl Workspace for FakeWorkspace {
    fn find_or_create_shadow_node(&mut self, name: &str) -> Result<(ShadowNodeHandle, bool)> {
        if let Some(node) = self.shadow_nodes.get(name) {
            let node: ShadowNodeHandle = node.clone();
            return Ok((node, false));
        }
        if !self.shadow_node_defs.iter().any(|def| def == name) {
            return Err(Error::ShadowNodeNotFound(name.to_owned()).into());
        }
        let node: ShadowNodeHandle = self.add_shadow_node(name, true);
        Ok((node, true))
    }

    fn find_camera(&self, name: &str) -> Result<CameraHandle> {
        self.cameras
            .get(name)
            .cloned()
            .ok_or_else(|| Error::CameraNotFound(name.to_owned()).into())
    }

    fn listeners(&self) -> Vec<ListenerHandle> {
        self.listeners.clone()
    }
}

/// A workspace with fake collaborators, all logging into the same call log.
pub struct Context {
    pub log: CallLog,
    pub scene_manager: Shared<FakeSceneManager>,
    pub render_system: Shared<FakeRenderSystem>,
    pub workspace: Shared<FakeWorkspace>,
    pub camera: CameraHandle,
    pub node: CompositorNode,
}

impl Context {
    /// Take the calls logged so far.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn viewport(&self) -> Viewport {
        *self.scene_manager.borrow().current_viewport0()
    }

    /// Register a listener recording into the call log.
    pub fn record_listener_calls(&self) {
        let listener: ListenerHandle = shared(RecordingListener {
            log: self.log.clone(),
        });
        self.workspace.borrow_mut().add_listener(listener);
    }
}

/// Creates a workspace context ready for automated tests, with a default camera called `main`.
pub fn make_context() -> Context {
    let _ = pretty_env_logger::try_init();

    let log: CallLog = shared(vec![]);
    let scene_manager = shared(FakeSceneManager {
        log: log.clone(),
        viewport: Viewport::default(),
    });
    let render_system = shared(FakeRenderSystem {
        log: log.clone(),
    });
    let workspace = shared(FakeWorkspace {
        log: log.clone(),
        cameras: HashMap::new(),
        shadow_nodes: HashMap::new(),
        shadow_node_defs: vec![],
        listeners: vec![],
    });
    let camera: CameraHandle = shared(FakeCamera {
        name: String::from("main"),
        log: log.clone(),
    });
    let node = CompositorNode::new("warm_up", WorkspaceContext {
        workspace: workspace.clone(),
        scene_manager: scene_manager.clone(),
        render_system: render_system.clone(),
    });

    Context {
        log,
        scene_manager,
        render_system,
        workspace,
        camera,
        node,
    }
}

/// A render target view with a single colour attachment called `texture`.
pub fn single_rtv(texture: &str) -> RenderTargetViewDef {
    let mut rtv = RenderTargetViewDef::default();
    rtv.colour_attachments.push(RenderTargetViewEntry::new(texture));
    rtv
}

/// Create a node where target pass `i` renders into local texture `rt{i}` and holds `layout[i]` passes.
pub fn make_node(name: &str, layout: &[&[PassType]]) -> NodeDef {
    let mut node = NodeDef::new(name);
    let mut identifier = 0;
    for (i, passes) in layout.iter().enumerate() {
        let rt = format!("rt{i}");
        node.add_texture_definition(TextureDefinition::new(rt.clone()).size(1920, 1080));
        *node.add_render_target_view(rt.clone()) = single_rtv(&rt);
        let target = node.add_target_pass(rt, 0);
        for ty in passes.iter() {
            identifier += 1;
            let builder = match ty {
                PassType::Clear => PassBuilder::clear(),
                PassType::Quad => PassBuilder::quad("postprocess"),
                PassType::Scene => PassBuilder::scene(),
                PassType::WarmUp => PassBuilder::warm_up(),
            };
            target.add_pass(builder.identifier(identifier).build());
        }
    }
    node
}

/// Modes of every pass in the node, in traversal order.
pub fn warm_up_modes(node: &NodeDef) -> Vec<WarmUpMode> {
    node.target_passes()
        .iter()
        .flat_map(|target| target.passes())
        .map(|pass| pass.as_warm_up().expect("warm-up node holds only warm-up passes").mode)
        .collect()
}
