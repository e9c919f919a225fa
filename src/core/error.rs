//! Exposes the ember error type

use thiserror::Error;

use crate::graph::pass::PassType;

/// Error type that ember can return.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The reference node has no target pass containing a scene pass, so there is nothing to warm up.
    #[error("Reference node `{0}` has no scene passes to base from.")]
    NoScenePasses(String),
    /// A pass that skips load/store semantics was asked to update an active shadow node.
    #[error("Pass `{0}`: skip-load-store is incompatible with a shadow node update. Use shadow node reuse instead.")]
    SkipLoadStoreWithShadowNode(String),
    /// A pass definition of the wrong variant was given where another was expected.
    #[error("Expected a `{expected:?}` pass definition, found `{found:?}`.")]
    PassTypeMismatch {
        expected: PassType,
        found: PassType,
    },
    /// The render queue range of a pass is inverted.
    #[error("Invalid render queue range [{first}, {last}].")]
    InvalidRenderQueueRange {
        first: u8,
        last: u8,
    },
    /// No node definition registered under this name.
    #[error("Node definition `{0}` not found.")]
    NodeDefinitionNotFound(String),
    /// A node definition with this name is already registered.
    #[error("Node definition `{0}` already exists.")]
    NodeDefinitionExists(String),
    /// Texture name is neither a local texture, an input channel nor a global texture of the node.
    #[error("Texture `{0}` not found in node definition.")]
    TextureNotFound(String),
    /// No render target view registered under this name.
    #[error("Render target view `{0}` not found in node definition.")]
    RenderTargetViewNotFound(String),
    /// Named camera could not be resolved by the workspace.
    #[error("Camera `{0}` not found in workspace.")]
    CameraNotFound(String),
    /// Named shadow node could not be resolved by the workspace.
    #[error("Shadow node `{0}` not found.")]
    ShadowNodeNotFound(String),
}

impl Error {
    /// Whether this error stems from an invalid compositor configuration, as opposed to a failed lookup.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::NoScenePasses(_)
                | Error::SkipLoadStoreWithShadowNode(_)
                | Error::PassTypeMismatch { .. }
                | Error::InvalidRenderQueueRange { .. }
        )
    }
}
