//! Compositor warm-up passes.
//!
//! The first frame that renders a scene usually stalls while the driver compiles every shader pipeline the
//! scene needs. Ember avoids this by deriving a lightweight *warm-up node* from a scene-rendering compositor
//! node, and running it before the real scene passes. The warm-up node mirrors the scene passes of the
//! original, but renders into tiny placeholder textures and only asks the scene manager to collect and
//! compile shader pipeline states.
//!
//! To get started, import the prelude:
//! ```
//! use ember::prelude::*;
//! ```
//!
//! # Example
//!
//! First, describe the node the warm-up node is derived from. Definitions are assembled in code and stored
//! in a [`NodeDefRegistry`](crate::NodeDefRegistry).
//! ```
//! use ember::prelude::*;
//!
//! let mut registry = NodeDefRegistry::new();
//! let node = registry.add_node_definition("main_render")?;
//! node.add_input_channel("rt_window");
//! node.add_texture_definition(TextureDefinition::new("depth").format(PixelFormat::D32Float));
//! let rtv = node.add_render_target_view("rt_window");
//! rtv.colour_attachments.push(RenderTargetViewEntry::new("rt_window"));
//! rtv.depth_attachment = RenderTargetViewEntry::new("depth");
//!
//! let target = node.add_target_pass("rt_window", 0);
//! target.add_pass(PassBuilder::clear().build());
//! target.add_pass(PassBuilder::scene().render_queues(0, 99)?.shadow_node("sun")?.build());
//! target.add_pass(PassBuilder::scene().render_queues(100, 200)?.build());
//! # Ok::<(), anyhow::Error>(())
//! ```
//! Then derive and register the warm-up node:
//! ```ignore
//! let warm_up = WarmUpGraphBuilder::new().create_from(&mut registry, "main_render/warm_up", "main_render")?;
//! ```
//! The resulting node holds one target pass with two warm-up passes. The first one only collects, the second
//! one collects and then triggers compilation of everything collected. Instantiate its passes as
//! [`WarmUpPass`](crate::WarmUpPass)es inside a workspace and execute them once per frame, see the
//! [`compositor`] module.
//!
//! For further documentation, check out the following modules
//! - [`graph`] for node definitions and deriving warm-up nodes.
//! - [`compositor`] for pass instances and the scene collaborators they drive.

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;

pub mod prelude;
pub use crate::prelude::*;

pub mod core;
pub mod graph;
pub mod compositor;

static_assertions::assert_impl_all!(graph::node::NodeDef: Send, Sync, Clone);
static_assertions::assert_impl_all!(graph::registry::NodeDefRegistry: Send, Sync);
static_assertions::assert_not_impl_any!(compositor::warm_up::WarmUpPass: Send, Sync);
