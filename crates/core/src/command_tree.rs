//! Arena-backed command tree.
//!
//! Nodes own their children top-down through the [`CommandTree`] arena; the
//! back-reference from child to parent is a plain [`NodeId`], so the tree
//! never forms a reference cycle.

use std::collections::HashMap;
use std::fmt::Write;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::{Error, Result};
use crate::flag::Flag;

/// Name of the built-in help pseudo command.
pub const HELP_COMMAND: &str = "help [command]";
/// Administrative command that is never offered for selection.
pub const COMPLETION_COMMAND: &str = "completion";

/// Returns true for the literal `help` invocation pattern (`help`, `help ...`).
#[must_use]
pub fn is_help_invocation(name: &str) -> bool {
    name == "help" || name.starts_with("help ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct CommandNode {
    pub name: String,
    pub about: Option<String>,
    pub flags: Vec<Flag>,
    pub run: Option<Vec<String>>,
    pub working_directory: Option<String>,
    pub environment: Option<HashMap<String, String>>,
    children: IndexMap<String, NodeId>,
    parent: Option<NodeId>,
}

impl CommandNode {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            about: None,
            flags: Vec::new(),
            run: None,
            working_directory: None,
            environment: None,
            children: IndexMap::new(),
            parent,
        }
    }

    /// Child names and ids in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn flag(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name() == name)
    }

    /// Names offered to the selector: every child except the completion helper.
    pub fn selectable_children(&self) -> Vec<String> {
        self.children
            .keys()
            .filter(|name| name.as_str() != COMPLETION_COMMAND)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    pub fn new(root_name: &str) -> Self {
        Self {
            nodes: vec![CommandNode::new(root_name, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Ids of every node, parents before their children.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Ids are only handed out by this tree, so lookups cannot miss.
    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }

    /// Appends a sub command below `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonUniqueCommandName`] if `parent` already has a child
    /// with that name.
    pub fn add_command(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        if self.node(parent).children.contains_key(name) {
            return Err(Error::NonUniqueCommandName(
                self.node(parent).name.clone(),
                name.to_string(),
            ));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode::new(name, Some(parent)));
        self.node_mut(parent).children.insert(name.to_string(), id);
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`Error::NonUniqueFlagName`] if the node already declares a flag
    /// with the same name.
    pub fn add_flag(&mut self, node: NodeId, flag: Flag) -> Result<()> {
        let command = self.node_mut(node);
        if command.flag(flag.name()).is_some() {
            return Err(Error::NonUniqueFlagName(
                command.name.clone(),
                flag.name().to_string(),
            ));
        }
        command.flags.push(flag);
        Ok(())
    }

    /// Adds the built-in help leaf to the root unless a help command exists.
    pub fn add_help_command(&mut self) -> Option<NodeId> {
        let root = self.root();
        if self
            .node(root)
            .children
            .keys()
            .any(|name| is_help_invocation(name))
        {
            return None;
        }

        let id = self.add_command(root, HELP_COMMAND).ok()?;
        self.node_mut(id).about = Some("Help about any command".to_string());
        Some(id)
    }

    /// # Errors
    ///
    /// Returns [`Error::CommandNotFound`] if `name` is not a direct child of `parent`.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Result<NodeId> {
        let node = self.node(parent);
        node.child(name).ok_or_else(|| Error::CommandNotFound {
            parent: node.name.clone(),
            child: name.to_string(),
        })
    }

    /// Builds the root-to-leaf chain ending at `leaf`.
    pub fn chain(&self, leaf: NodeId) -> CommandChain {
        let mut ids = Vec::new();
        let mut current = Some(leaf);
        while let Some(id) = current {
            ids.push(id);
            current = self.node(id).parent;
        }
        ids.reverse();
        CommandChain { ids }
    }

    /// Indented listing of the commands below `from`, with their flags.
    pub fn overview(&self, from: NodeId) -> String {
        let mut text = String::new();
        self.write_overview(&mut text, from, 0);
        text
    }

    fn write_overview(&self, text: &mut String, id: NodeId, depth: usize) {
        let node = self.node(id);
        let indent = "  ".repeat(depth);
        match &node.about {
            Some(about) => {
                let _ = writeln!(text, "{indent}{} - {about}", node.name);
            }
            None => {
                let _ = writeln!(text, "{indent}{}", node.name);
            }
        }

        for flag in node.flags.iter().filter(|f| !f.is_help()) {
            let required = if flag.required { " (required)" } else { "" };
            let _ = writeln!(
                text,
                "{indent}    --{}{required}  {}",
                flag.name(),
                flag.usage
            );
        }

        for (_, child) in node.children() {
            self.write_overview(text, child, depth + 1);
        }
    }
}

/// Root-to-leaf sequence of nodes; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandChain {
    ids: Vec<NodeId>,
}

impl CommandChain {
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn leaf(&self) -> NodeId {
        self.ids[self.ids.len() - 1]
    }

    /// Names of the chain joined root first, e.g. `root cmd1 cmd2`.
    pub fn render(&self, tree: &CommandTree) -> String {
        self.ids.iter().map(|id| tree.node(*id).name.as_str()).join(" ")
    }

    /// Flags of every node in chain order, root flags first.
    pub fn flags<'t>(&'t self, tree: &'t CommandTree) -> impl Iterator<Item = &'t Flag> + 't {
        self.ids
            .iter()
            .flat_map(move |id| tree.node(*id).flags.iter())
    }
}
