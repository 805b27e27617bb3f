//! Loading and validation of command tree definitions.
//!
//! This module reads the YAML tree definition, validates command and flag
//! names and turns the definition into a [`CommandTree`].

use std::collections::HashSet;
use std::fs::File;

use leon::Template;
use log::debug;

use crate::command_definitions::CommandDefinition;
use crate::command_tree::{CommandTree, NodeId};
use crate::error::Error::{
    EmptyName, NameWithSeparator, NameWithSpace, NumericName, UnknownPlaceholder,
};
use crate::error::{Error, Result};
use crate::flag::Flag;

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EmptyName);
    }

    if name.contains(char::is_whitespace) {
        return Err(NameWithSpace(name.to_string()));
    }

    if name.contains(':') || name.contains('/') || name.contains('\\') {
        return Err(NameWithSeparator(name.to_string()));
    }

    if name.chars().all(|c| c.is_numeric()) {
        return Err(NumericName(name.to_string()));
    }

    Ok(())
}

fn populate(tree: &mut CommandTree, id: NodeId, definition: &CommandDefinition) -> Result<()> {
    {
        let node = tree.node_mut(id);
        node.about.clone_from(&definition.about);
        node.run.clone_from(&definition.run);
        node.working_directory
            .clone_from(&definition.working_directory);
        node.environment.clone_from(&definition.environment);
    }

    for flag_definition in definition.flags.iter().flatten() {
        validate_name(&flag_definition.name)?;
        let flag = Flag::from(flag_definition);
        flag.check_default()?;
        tree.add_flag(id, flag)?;
    }

    for child in definition.commands.iter().flatten() {
        validate_name(&child.name)?;
        let child_id = tree.add_command(id, &child.name)?;
        populate(tree, child_id, child)?;
    }

    Ok(())
}

/// Checks that every `{placeholder}` of a leaf's `run` names a flag in its chain.
fn validate_run_templates(tree: &CommandTree) -> Result<()> {
    for id in tree.ids() {
        let node = tree.node(id);
        let Some(run) = &node.run else {
            continue;
        };

        let chain = tree.chain(id);
        let flag_names: HashSet<&str> = chain.flags(tree).map(Flag::name).collect();

        for argument in run {
            let template = Template::parse(argument)?;
            let unknown = template
                .keys()
                .find(|key| !flag_names.contains(*key))
                .map(|key| (*key).to_string());

            if let Some(key) = unknown {
                return Err(UnknownPlaceholder(node.name.clone(), key));
            }
        }
    }

    Ok(())
}

/// Builds and validates a command tree from its definition.
///
/// A built-in `help` command is appended to the root when the root has sub
/// commands and does not declare its own help.
///
/// # Errors
///
/// Returns an error if:
/// - A command or flag name is empty, contains spaces or separators, or is numeric
/// - Sibling commands or the flags of one command share a name
/// - A flag default does not parse as the flag type
/// - A `run` template is malformed or uses a placeholder that is not a flag in the chain
pub fn build_command_tree(definition: &CommandDefinition) -> Result<CommandTree> {
    validate_name(&definition.name)?;

    let mut tree = CommandTree::new(&definition.name);
    let root = tree.root();
    populate(&mut tree, root, definition)?;
    validate_run_templates(&tree)?;

    if !tree.node(root).is_leaf() {
        tree.add_help_command();
    }

    Ok(tree)
}

/// Loads and validates the command tree from a YAML definition file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or fails
/// any of the checks of [`build_command_tree`].
///
/// # Examples
///
/// ```no_run
/// use cmd_walk_core::file_handling::get_command_tree;
///
/// let tree = get_command_tree("/home/me/.cmd-walk/commands.yml")?;
/// println!("{}", tree.overview(tree.root()));
/// # Ok::<(), cmd_walk_core::error::Error>(())
/// ```
pub fn get_command_tree(tree_path: &str) -> Result<CommandTree> {
    let reader = get_reader("command tree", tree_path)?;

    let definition: CommandDefinition = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "command tree".to_string(),
            tree_path.to_string(),
            e,
        )
    })?;

    debug!("Loaded command tree `{}` from `{}`", definition.name, tree_path);
    build_command_tree(&definition)
}
