// src/main.rs
use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use script_prompter::{intake_paths, ClipboardSink, Config, StdoutSink, SystemClipboard};

use crate::cli::{App, CopyArgs, ShellArgs, SubCommands, TreeArgs};
use crate::shell::Shell;

mod cli;
mod shell;

fn main() -> Result<()> {
    let app = App::parse();
    init_logging(app.global.verbose);

    let config = match &app.global.config {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    match app.command.unwrap_or(SubCommands::Shell(ShellArgs::default())) {
        SubCommands::Shell(args) => run_shell(&config, args),
        SubCommands::Copy(args) => run_copy(&config, args),
        SubCommands::Tree(args) => run_tree(&config, args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run_shell(config: &Config, args: ShellArgs) -> Result<()> {
    let session = config.session()?;
    let stdin = io::stdin();
    let mut shell = Shell::new(
        session,
        config.intake_filter(),
        stdin.lock(),
        io::stdout(),
        SystemClipboard::new(),
    );

    if !args.paths.is_empty() {
        shell.attach(&args.paths)?;
    }
    shell.run()?;
    Ok(())
}

fn run_copy(config: &Config, args: CopyArgs) -> Result<()> {
    let mut session = config.session()?;
    {
        let options = session.options_mut();
        options.include_line_numbers |= args.line_numbers;
        options.include_file_tree |= args.file_tree;
    }
    session.set_context(args.context);
    session.set_instructions(args.instructions);

    let report = intake_paths(&mut session, &args.paths, &config.intake_filter());
    for error in &report.failures {
        warn!("{}", error);
    }

    let mut sink: Box<dyn ClipboardSink> = if args.print {
        Box::new(StdoutSink)
    } else {
        Box::new(SystemClipboard::new())
    };
    let text = session
        .copy(args.mode.into(), sink.as_mut())
        .context("Failed to copy prompt")?;

    // Keep stdout clean for the prompt itself when printing.
    let summary = format!(
        "Files processed: {}\nTotal size: {} characters",
        session.attachments().len(),
        text.chars().count()
    );
    if args.print {
        eprintln!("{}", summary);
    } else {
        println!("Prompt successfully copied to clipboard!");
        println!("{}", summary);
    }

    Ok(())
}

fn run_tree(config: &Config, args: TreeArgs) -> Result<()> {
    let mut session = config.session()?;
    let report = intake_paths(&mut session, &args.paths, &config.intake_filter());
    for error in &report.failures {
        warn!("{}", error);
    }

    println!("{}", session.render_tree());
    Ok(())
}
