//! Runtime side of the compositor: pass instances created per workspace from pass definitions, and the
//! interfaces of the scene collaborators they drive.
//!
//! A pass instance is created with its parent [`CompositorNode`](node::CompositorNode), which carries the
//! [`WorkspaceContext`](node::WorkspaceContext). Collaborators are resolved once at creation and kept
//! for the lifetime of the pass.
//!
//! # Example
//!
//! ```ignore
//! use ember::prelude::*;
//!
//! let parent = CompositorNode::new("main_render/warm_up", WorkspaceContext {
//!     workspace: workspace.clone(),
//!     scene_manager: scene_manager.clone(),
//!     render_system: render_system.clone(),
//! });
//! let node_def = registry.node_definition("main_render/warm_up")?;
//! let target = node_def.target_pass(0).unwrap();
//! let rtv = node_def.render_target_view(target.render_target_name())?;
//! let mut pass = WarmUpPass::new(&target.passes()[0], main_camera.clone(), &parent, rtv)?;
//! // Once per frame
//! pass.execute(None)?;
//! ```

pub mod scene;
pub mod node;
pub mod render_pass;
pub mod pass;
pub mod warm_up;
