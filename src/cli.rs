// src/cli.rs
use std::path::PathBuf;

use script_prompter::PromptKind;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Collect text files, add context and instructions, and copy an LLM-ready prompt to the clipboard"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Option<SubCommands>,

    #[clap(flatten)]
    pub global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// TOML file with the initial template, options and intake exclusions
    #[clap(long, env = "SCRIPT_PROMPTER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommands {
    /// Interactive shell (the default when no subcommand is given)
    Shell(ShellArgs),

    /// Compose a prompt from the given files and copy it to the clipboard
    Copy(CopyArgs),

    /// Print the file tree for the given paths
    Tree(TreeArgs),
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ShellArgs {
    /// Files or directories to attach before the shell starts
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CopyArgs {
    /// Files or directories to attach
    pub paths: Vec<PathBuf>,

    /// Which prompt to produce
    #[clap(long, short, value_enum, default_value_t = Mode::Enriched)]
    pub mode: Mode,

    /// Free-form context describing the files
    #[clap(long, short, default_value = "")]
    pub context: String,

    /// What the model should do
    #[clap(long, short, default_value = "")]
    pub instructions: String,

    /// Prefix every script line with its line number
    #[clap(long, short = 'n')]
    pub line_numbers: bool,

    /// Include the file tree section
    #[clap(long, short = 't')]
    pub file_tree: bool,

    /// Print the prompt to stdout instead of copying it
    #[clap(long, short)]
    pub print: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct TreeArgs {
    /// Files or directories to include in the tree
    #[clap(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Raw,
    Enriched,
    Template,
}

impl From<Mode> for PromptKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Raw => PromptKind::Raw,
            Mode::Enriched => PromptKind::Enriched,
            Mode::Template => PromptKind::Template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn test_cli_is_consistent() {
        App::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_shell() {
        let app = App::try_parse_from(["script-prompter"]).unwrap();
        assert!(app.command.is_none());
        assert_eq!(app.global.verbose, 0);
    }

    #[test]
    fn test_copy_flags() {
        let app = App::try_parse_from([
            "script-prompter",
            "-vv",
            "copy",
            "src/main.rs",
            "--mode",
            "raw",
            "-n",
            "--instructions",
            "Fix it",
        ])
        .unwrap();

        assert_eq!(app.global.verbose, 2);
        match app.command {
            Some(SubCommands::Copy(args)) => {
                assert_eq!(args.paths, vec![PathBuf::from("src/main.rs")]);
                assert_eq!(args.mode, Mode::Raw);
                assert!(args.line_numbers);
                assert!(!args.file_tree);
                assert_eq!(args.instructions, "Fix it");
                assert_eq!(args.context, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_tree_requires_paths() {
        assert!(App::try_parse_from(["script-prompter", "tree"]).is_err());
    }
}
