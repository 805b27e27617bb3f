//! Interactive walk through a command tree.
//!
//! The walker keeps asking the selector for a child of the current command
//! until a leaf is reached, collects every flag along the chain and asks for
//! a final confirmation:
//!
//! ```text
//! Selecting(root) -> Selecting(child) -> ... -> Collecting(chain) -> Confirming
//!                                                                   |-> Resolved
//!                                                                   `-> Cancelled
//! ```

use log::debug;

use crate::collector::{FlagCollector, Progress};
use crate::command_tree::{is_help_invocation, CommandChain, CommandTree, NodeId};
use crate::error::{Error, Result};
use crate::render::split_escaped;
use crate::session::Session;

pub const SELECT_SUB_COMMAND_PROMPT: &str = "Select the sub command to use: ";
pub const CONTINUE_PROMPT: &str =
    "\nShould the program execution be continued (default is yes)? [yes|no]: ";
/// Invalid confirmation answers tolerated before the run is cancelled.
pub const MAX_CONFIRMATION_ATTEMPTS: usize = 10;

/// The resolved leaf together with the reconstructed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedInvocation {
    pub leaf: NodeId,
    pub chain: CommandChain,
    /// Command names root first, e.g. `root cmd1 cmd2`.
    pub chain_text: String,
    /// Concatenated ` --name value` fragments in collection order.
    pub flag_text: String,
}

impl CollectedInvocation {
    /// The full command line as shown for confirmation.
    pub fn command_line(&self) -> String {
        format!("{} {}", self.chain_text, self.flag_text)
    }

    /// The flag text split back into arguments.
    pub fn args(&self) -> Vec<String> {
        split_escaped(&self.flag_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    Resolved(CollectedInvocation),
    /// The built-in help command was chosen; no flags were collected.
    Help(NodeId),
    /// The user declined at the confirmation step.
    Cancelled,
}

/// Interprets a confirmation answer; `None` means the answer is not valid.
#[must_use]
pub fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

pub struct CommandWalker<'a> {
    session: Session<'a>,
}

impl<'a> CommandWalker<'a> {
    pub fn new(session: Session<'a>) -> Self {
        Self { session }
    }

    /// Runs one interactive session over `tree`.
    ///
    /// Collected values are applied to the flags of `tree`, so the host can
    /// read them after a [`WalkOutcome::Resolved`].
    ///
    /// # Errors
    ///
    /// Fails if the root has nothing to select, the selection is aborted, a
    /// chosen name cannot be resolved, or the input ends while collecting.
    pub fn walk(&mut self, tree: &mut CommandTree) -> Result<WalkOutcome> {
        let mut current = tree.root();

        loop {
            let node = tree.node(current);
            let options = node.selectable_children();
            if options.is_empty() {
                return Err(Error::NoChildren(node.name.clone()));
            }

            let selected = self
                .session
                .selector
                .select(SELECT_SUB_COMMAND_PROMPT, &options)?;
            debug!("Selected `{selected}` below `{}`", node.name);

            let next = tree.find_child(current, &selected)?;
            if is_help_invocation(&selected) {
                return Ok(WalkOutcome::Help(next));
            }

            if tree.node(next).is_leaf() {
                let chain = tree.chain(next);
                return self.resolve(tree, chain);
            }
            current = next;
        }
    }

    fn resolve(&mut self, tree: &mut CommandTree, chain: CommandChain) -> Result<WalkOutcome> {
        let chain_text = chain.render(tree);
        let total = chain.flags(tree).filter(|f| !f.is_help()).count();
        debug!("Resolved `{chain_text}` with {total} flag(s)");

        if total > 0 {
            self.session.console.info(&format!(
                "\n`{chain_text}` will be called.\n\nIn the following steps the possible flags will be collected.\n"
            ))?;
        }

        let mut flag_text = String::new();
        let mut current = 0;
        for id in chain.ids() {
            for flag in tree.node_mut(*id).flags.iter_mut() {
                if flag.is_help() {
                    continue;
                }
                current += 1;
                let progress = Progress { current, total };
                flag_text.push_str(&FlagCollector::new(&mut self.session).collect(flag, progress)?);
            }
        }

        let invocation = CollectedInvocation {
            leaf: chain.leaf(),
            chain,
            chain_text,
            flag_text,
        };

        self.session.console.info("\nresulting program call:\n\n")?;
        self.session
            .console
            .highlight(&format!("  {}\n", invocation.command_line()))?;

        if !self.should_continue()? {
            self.session.console.print("Cancel.\n")?;
            return Ok(WalkOutcome::Cancelled);
        }

        Ok(WalkOutcome::Resolved(invocation))
    }

    fn should_continue(&mut self) -> Result<bool> {
        for _ in 0..MAX_CONFIRMATION_ATTEMPTS {
            self.session.console.info(CONTINUE_PROMPT)?;

            let Some(input) = self.session.reader.read_line()? else {
                debug!("Input closed while confirming, cancelling");
                return Ok(false);
            };

            match parse_confirmation(&input) {
                Some(answer) => return Ok(answer),
                None => self
                    .session
                    .console
                    .warn("wrong input ... only [yes|no|empty] are allowed!\n")?,
            }
        }

        self.session
            .console
            .warn("Too many invalid answers, program execution is canceled!\n")?;
        Ok(false)
    }
}

/// Walks `tree` with the collaborators of `session`.
///
/// History is offered and recorded if the session carries a store.
///
/// # Errors
///
/// See [`CommandWalker::walk`].
pub fn run_interactive(tree: &mut CommandTree, session: Session<'_>) -> Result<WalkOutcome> {
    CommandWalker::new(session).walk(tree)
}
