//! The definition graph describes what the compositor renders, independently of any workspace.
//!
//! A [`NodeDef`](node::NodeDef) owns an ordered list of [`TargetPassDef`](target::TargetPassDef)s, each binding
//! a render target view and holding an ordered list of [`PassDef`](pass::PassDef)s. Textures are referenced by
//! name everywhere and resolved through the node's texture sources. Definitions are assembled in code and kept in
//! a [`NodeDefRegistry`](registry::NodeDefRegistry), from which workspaces instantiate them.
//!
//! The [`warm_up`] module derives warm-up nodes from scene-rendering nodes.
//!
//! # Example
//!
//! ```
//! use ember::prelude::*;
//!
//! let mut node = NodeDef::new("forward");
//! node.add_input_channel("rt_window");
//! node.add_texture_definition(TextureDefinition::new("depth").format(PixelFormat::D32Float));
//! let rtv = node.add_render_target_view("rt_window");
//! rtv.colour_attachments.push(RenderTargetViewEntry::new("rt_window"));
//! rtv.depth_attachment = RenderTargetViewEntry::new("depth");
//!
//! let target = node.add_target_pass("rt_window", 0);
//! target.add_pass(PassBuilder::clear().build());
//! target.add_pass(PassBuilder::scene().render_queues(0, 99)?.build());
//! target.add_pass(PassBuilder::scene().render_queues(100, 200)?.build());
//! assert_eq!(target.num_scene_passes(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod texture;
pub mod rtv;
pub mod pass;
pub mod target;
pub mod node;
pub mod registry;
pub mod warm_up;
#[cfg(feature = "graphviz")]
pub mod viz;
