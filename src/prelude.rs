pub use crate::core::error::Error;
pub use crate::core::handle::{shared, Shared};

pub use crate::graph::texture::{PixelFormat, TextureDefinition, TextureFlags, TextureSource, TextureSourceEntry};
pub use crate::graph::rtv::{RenderTargetViewDef, RenderTargetViewEntry};
pub use crate::graph::pass::{
    ClearPassDef, PassBuilder, PassDef, PassDefCommon, PassKind, PassType, QuadPassDef, ScenePassDef, SceneScope,
    WarmUpMode, WarmUpPassDef,
};
pub use crate::graph::target::{TargetLevelBarrier, TargetPassDef};
pub use crate::graph::node::NodeDef;
pub use crate::graph::registry::NodeDefRegistry;
pub use crate::graph::warm_up::{WarmUpGraphBuilder, WarmUpSettings};
#[cfg(feature = "graphviz")]
pub use crate::graph::viz::GraphViz;

pub use crate::compositor::scene::{
    Camera, CameraHandle, CamerasInProgress, ListenerHandle, RenderSystem, RenderSystemHandle, SceneManager,
    SceneManagerHandle, ShadowNode, ShadowNodeHandle, Viewport, Workspace, WorkspaceHandle, WorkspaceListener,
};
pub use crate::compositor::node::{CompositorNode, WorkspaceContext};
pub use crate::compositor::render_pass::{AttachmentDesc, RenderPassDescriptor};
pub use crate::compositor::pass::{CompositorPass, PassBase, PassInfo, PassState};
pub use crate::compositor::warm_up::WarmUpPass;
