use std::collections::HashMap;

use leon::Template;

use crate::command_tree::{CommandChain, CommandTree};
use crate::error::Result;

/// Maps every flag in the chain to its shell-quoted values, deeper flags winning.
///
/// Each value is quoted on its own; the values of a repeatable flag are then
/// joined by a space. A flag without values maps to an empty string.
///
/// # Errors
///
/// Returns [`crate::error::Error::Quote`] if a value contains a nul byte.
pub fn build_flag_context(
    tree: &CommandTree,
    chain: &CommandChain,
) -> Result<HashMap<String, String>> {
    let mut context = HashMap::new();

    for flag in chain.flags(tree).filter(|flag| !flag.is_help()) {
        let mut quoted_values = Vec::new();
        for value in flag.values() {
            quoted_values.push(shlex::try_quote(&value.to_string())?.into_owned());
        }
        context.insert(flag.name().to_string(), quoted_values.join(" "));
    }

    Ok(context)
}

pub fn get_templates(command: &[String]) -> Result<Vec<Template<'_>>> {
    let mut templates: Vec<Template> = Vec::new();

    for argument in command {
        templates.push(Template::parse(argument.as_ref())?);
    }

    Ok(templates)
}

pub fn interpolate_command(
    context: &HashMap<String, String>,
    templates: &[Template],
) -> Result<Vec<String>> {
    let mut interpolated_arguments: Vec<String> = Vec::new();

    for template in templates {
        interpolated_arguments.push(template.render(&context)?);
    }

    Ok(interpolated_arguments)
}

/// Renders the `run` arguments of the chain's leaf with the collected flag values.
///
/// Returns `None` when the leaf declares nothing to run.
pub fn render_run_command(tree: &CommandTree, chain: &CommandChain) -> Result<Option<Vec<String>>> {
    let Some(run) = &tree.node(chain.leaf()).run else {
        return Ok(None);
    };

    let templates = get_templates(run)?;
    let context = build_flag_context(tree, chain)?;
    interpolate_command(&context, &templates).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::{Flag, FlagType};

    fn deploy_tree() -> (CommandTree, CommandChain) {
        let mut tree = CommandTree::new("ops");
        let root = tree.root();
        tree.add_flag(root, Flag::new("verbose", FlagType::Bool).with_default("false"))
            .unwrap();
        let deploy = tree.add_command(root, "deploy").unwrap();
        tree.add_flag(deploy, Flag::new("env", FlagType::String))
            .unwrap();
        tree.add_flag(deploy, Flag::new("tag", FlagType::StringList))
            .unwrap();
        tree.node_mut(deploy).run = Some(vec![
            "echo".to_string(),
            "{env}:{tag}:{verbose}".to_string(),
        ]);
        let chain = tree.chain(deploy);
        (tree, chain)
    }

    #[test]
    fn test_context_uses_values_and_defaults() {
        let (mut tree, chain) = deploy_tree();
        let deploy = chain.leaf();
        let node = tree.node_mut(deploy);
        node.flags[0].set("prod").unwrap();
        node.flags[1].set("a").unwrap();
        node.flags[1].set("b").unwrap();

        let context = build_flag_context(&tree, &chain).unwrap();
        assert_eq!(context["env"], "prod");
        assert_eq!(context["tag"], "a b");
        assert_eq!(context["verbose"], "false");
    }

    #[test]
    fn test_render_run_command() {
        let (mut tree, chain) = deploy_tree();
        tree.node_mut(chain.leaf()).flags[0].set("dev").unwrap();

        let rendered = render_run_command(&tree, &chain).unwrap().unwrap();
        assert_eq!(rendered, vec!["echo", "dev::false"]);
    }

    #[test]
    fn test_values_are_quoted_for_the_shell() {
        let mut tree = CommandTree::new("vcs");
        let commit = tree.add_command(tree.root(), "commit").unwrap();
        tree.add_flag(commit, Flag::new("msg", FlagType::String))
            .unwrap();
        tree.add_flag(commit, Flag::new("path", FlagType::StringList))
            .unwrap();
        let node = tree.node_mut(commit);
        node.run = Some(vec![
            "git".to_string(),
            "commit".to_string(),
            "-m".to_string(),
            "{msg}".to_string(),
            "--".to_string(),
            "{path}".to_string(),
        ]);
        node.flags[0].set("fix bug; echo pwned").unwrap();
        node.flags[1].set("a file.txt").unwrap();
        node.flags[1].set("$(rm -rf x)").unwrap();
        let chain = tree.chain(commit);

        let rendered = render_run_command(&tree, &chain).unwrap().unwrap();
        let command_line = rendered.join(" ");

        assert_ne!(command_line, "git commit -m fix bug; echo pwned -- a file.txt $(rm -rf x)");
        assert_eq!(
            shlex::split(&command_line).unwrap(),
            vec![
                "git",
                "commit",
                "-m",
                "fix bug; echo pwned",
                "--",
                "a file.txt",
                "$(rm -rf x)"
            ]
        );
    }

    #[test]
    fn test_render_without_run() {
        let mut tree = CommandTree::new("ops");
        let leaf = tree.add_command(tree.root(), "noop").unwrap();
        let chain = tree.chain(leaf);
        assert!(render_run_command(&tree, &chain).unwrap().is_none());
    }

    #[test]
    fn test_get_templates_invalid() {
        let binding = ["{unclosed".to_string()];
        let result = get_templates(&binding);
        assert!(result.is_err());
    }
}
