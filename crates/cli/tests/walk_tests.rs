#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use clap::Parser;
    use cmd_walk_cli::cli_args::Args;
    use cmd_walk_cli::console::StyledConsole;
    use cmd_walk_core::config;
    use cmd_walk_core::error::{Error, Result};
    use cmd_walk_core::file_handling::get_command_tree;
    use cmd_walk_core::history::{FileHistoryStore, HistoryStore};
    use cmd_walk_core::interpolation::render_run_command;
    use cmd_walk_core::session::{BufReadLines, Selector, Session};
    use cmd_walk_core::walker::{run_interactive, WalkOutcome};

    const TREE: &str = r#"
name: ops
about: Operations toolbox
commands:
  - name: deploy
    about: Deploy a service
    flags:
      - { name: env, required: true, usage: target environment }
      - { name: replicas, type: int, default: "1" }
    run: ["echo", "deploying {env} x{replicas}"]
    environment: { DEPLOY_MODE: interactive }
  - name: status
"#;

    /// Picks the given names in order.
    struct Picks(Vec<&'static str>);

    impl Selector for Picks {
        fn select(&mut self, _prompt: &str, options: &[String]) -> Result<String> {
            if self.0.is_empty() {
                return Err(Error::SelectionAborted);
            }
            let pick = self.0.remove(0);
            assert!(options.iter().any(|o| o == pick));
            Ok(pick.to_string())
        }
    }

    fn write_tree(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("commands.yml");
        fs::write(&path, TREE).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_tree_path_argument_loads_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tree(&dir);

        let args = Args::parse_from(["cw", "--tree-path", path.as_str(), "--dry-run"]);
        let tree = get_command_tree(&config::get_tree_path(&args.tree_path)).unwrap();

        let root = tree.node(tree.root());
        assert_eq!(root.name, "ops");
        assert_eq!(root.selectable_children(), vec!["deploy", "status", "help [command]"]);
    }

    #[test]
    fn test_styled_walk_with_file_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = get_command_tree(&write_tree(&dir)).unwrap();

        let args = Args::parse_from([
            "cw",
            "--history-dir",
            dir.path().join("history").to_str().unwrap(),
        ]);
        let mut history = FileHistoryStore::with_dir(args.history_dir().unwrap()).unwrap();

        let mut reader = BufReadLines::new(Cursor::new("staging\n3\ny\n"));
        let mut selector = Picks(vec!["deploy"]);
        let mut console = StyledConsole::new(Vec::new());
        let session =
            Session::new(&mut reader, &mut selector, &mut console).with_history(&mut history);

        let outcome = run_interactive(&mut tree, session).unwrap();
        let WalkOutcome::Resolved(invocation) = outcome else {
            panic!("expected a resolved walk");
        };

        assert_eq!(
            invocation.command_line(),
            "ops deploy  --env staging --replicas 3"
        );
        assert_eq!(
            render_run_command(&tree, &invocation.chain).unwrap(),
            Some(vec!["echo".to_string(), "deploying staging x3".to_string()])
        );

        let output = String::from_utf8(console.into_inner()).unwrap();
        assert!(output.contains("ops deploy  --env staging --replicas 3"));
        assert!(output.contains('\x1b'));

        assert_eq!(history.history_values("env").unwrap(), vec!["staging"]);
        assert!(dir.path().join("history/replicas.hist").is_file());
    }

    #[test]
    fn test_help_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = get_command_tree(&write_tree(&dir)).unwrap();

        let mut reader = BufReadLines::new(Cursor::new(""));
        let mut selector = Picks(vec!["help [command]"]);
        let mut console = StyledConsole::new(Vec::new());
        let session = Session::new(&mut reader, &mut selector, &mut console);

        let outcome = run_interactive(&mut tree, session).unwrap();
        assert!(matches!(outcome, WalkOutcome::Help(_)));

        let overview = tree.overview(tree.root());
        assert!(overview.starts_with("ops - Operations toolbox\n"));
        assert!(overview.contains("  deploy - Deploy a service\n"));
        assert!(overview.contains("--env (required)  target environment"));
    }
}
