use crate::compositor::scene::{RenderSystemHandle, SceneManagerHandle, WorkspaceHandle};

/// Collaborators shared by every pass of a workspace.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct WorkspaceContext {
    #[derivative(Debug = "ignore")]
    pub workspace: WorkspaceHandle,
    #[derivative(Debug = "ignore")]
    pub scene_manager: SceneManagerHandle,
    #[derivative(Debug = "ignore")]
    pub render_system: RenderSystemHandle,
}

/// A node instantiated inside a workspace. Passes are created with their parent node and keep
/// its context for their whole lifetime.
#[derive(Debug, Clone)]
pub struct CompositorNode {
    name: String,
    context: WorkspaceContext,
}

impl CompositorNode {
    pub fn new(name: impl Into<String>, context: WorkspaceContext) -> Self {
        CompositorNode {
            name: name.into(),
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &WorkspaceContext {
        &self.context
    }
}
