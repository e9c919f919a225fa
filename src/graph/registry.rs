use std::collections::HashMap;

use anyhow::Result;

use crate::Error;
use crate::graph::node::NodeDef;

/// Owns every node definition known to the compositor. Definitions live here until they are
/// explicitly removed.
#[derive(Debug, Default)]
pub struct NodeDefRegistry {
    nodes: HashMap<String, NodeDef>,
}

impl NodeDefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty node definition and return it for filling in.
    /// # Errors
    /// * Fails with [`Error::NodeDefinitionExists`] if the name is taken.
    pub fn add_node_definition(&mut self, name: impl Into<String>) -> Result<&mut NodeDef> {
        let name = name.into();
        self.insert(NodeDef::new(name))
    }

    /// Register a complete node definition under its own name.
    /// # Errors
    /// * Fails with [`Error::NodeDefinitionExists`] if the name is taken.
    pub fn insert(&mut self, node: NodeDef) -> Result<&mut NodeDef> {
        if self.nodes.contains_key(node.name()) {
            return Err(anyhow::Error::from(Error::NodeDefinitionExists(node.name().to_owned())));
        }
        trace!("Registered node definition `{}`", node.name());
        Ok(self.nodes.entry(node.name().to_owned()).or_insert(node))
    }

    /// # Errors
    /// * Fails with [`Error::NodeDefinitionNotFound`] if no definition has this name.
    pub fn node_definition(&self, name: &str) -> Result<&NodeDef> {
        self.nodes
            .get(name)
            .ok_or_else(|| anyhow::Error::from(Error::NodeDefinitionNotFound(name.to_owned())))
    }

    /// # Errors
    /// * Fails with [`Error::NodeDefinitionNotFound`] if no definition has this name.
    pub fn node_definition_mut(&mut self, name: &str) -> Result<&mut NodeDef> {
        self.nodes
            .get_mut(name)
            .ok_or_else(|| anyhow::Error::from(Error::NodeDefinitionNotFound(name.to_owned())))
    }

    pub fn has_node_definition(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Remove a definition, returning it if it existed.
    pub fn remove_node_definition(&mut self, name: &str) -> Option<NodeDef> {
        self.nodes.remove(name)
    }

    /// Names of all registered definitions, sorted.
    pub fn node_names(&self) -> Vec<&str> {
        let mut names = self.nodes.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}
