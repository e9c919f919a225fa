//! Graphviz export of node definitions, useful to inspect what a warm-up node was derived into.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use anyhow::Result;
use petgraph::dot::Dot;
use petgraph::graph::{EdgeReference, NodeIndex};
use petgraph::Graph;

use crate::graph::node::NodeDef;
use crate::graph::pass::PassDef;

/// Trait implemented by definitions that can be visualized.
pub trait GraphViz {
    /// Get the string representation of this graph in `dot` format.
    fn dot(&self) -> Result<String>;
}

/// A vertex in the visualized node definition.
#[derive(Debug, Clone)]
pub enum VizNode {
    Texture(String),
    Target(String),
    Pass(String),
}

impl Display for VizNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VizNode::Texture(name) => f.write_fmt(format_args!("Texture: {name}")),
            VizNode::Target(name) => f.write_fmt(format_args!("Target: {name}")),
            VizNode::Pass(label) => f.write_str(label),
        }
    }
}

fn pass_label(pass: &PassDef) -> String {
    match pass.as_warm_up() {
        Some(warm_up) => format!("{:?} {} ({:?})", pass.pass_type(), pass.common.identifier, warm_up.mode),
        None => format!("{:?} {}", pass.pass_type(), pass.common.identifier),
    }
}

fn edge_attributes(_: &Graph<VizNode, String>, _: EdgeReference<String>) -> String {
    String::from("")
}

fn node_attributes(_: &Graph<VizNode, String>, node: (NodeIndex, &VizNode)) -> String {
    match node.1 {
        VizNode::Texture(_) => String::from("fillcolor = \"#f7c65e\" shape=box"),
        VizNode::Target(_) => String::from("fillcolor = \"#5e6df7\""),
        VizNode::Pass(_) => String::from("fillcolor = \"#f75e70\" shape=box"),
    }
}

impl NodeDef {
    /// Build a graph where textures point to the target passes rendering into them, and target passes
    /// point to their passes in execution order.
    pub fn to_graph(&self) -> Graph<VizNode, String> {
        let mut graph = Graph::new();
        let mut textures: HashMap<&str, NodeIndex> = HashMap::new();

        for target in self.target_passes() {
            let target_node = graph.add_node(VizNode::Target(target.render_target_name().to_owned()));
            if let Ok(rtv) = self.render_target_view(target.render_target_name()) {
                for texture in rtv.texture_names() {
                    let texture_node = *textures
                        .entry(texture)
                        .or_insert_with(|| graph.add_node(VizNode::Texture(texture.to_owned())));
                    graph.update_edge(texture_node, target_node, String::from("attachment"));
                }
            }
            for (index, pass) in target.passes().iter().enumerate() {
                let pass_node = graph.add_node(VizNode::Pass(pass_label(pass)));
                graph.add_edge(target_node, pass_node, index.to_string());
            }
        }
        graph
    }
}

impl GraphViz for NodeDef {
    fn dot(&self) -> Result<String> {
        let graph = self.to_graph();
        Ok(format!(
            "{}",
            Dot::with_attr_getters(&graph, &[], &edge_attributes, &node_attributes)
        ))
    }
}
