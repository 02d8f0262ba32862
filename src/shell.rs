// src/shell.rs
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use script_prompter::intake::attachment_key;
use script_prompter::{
    intake_paths, ClipboardSink, IntakeFilter, IntakeReport, PromptKind, Session,
};

const HELP: &str = "\
Commands:
  add <path>...                 attach files or directories
  remove <path>...              detach files
  clear                         detach everything
  list                          show attached files
  tree                          show the file tree of attached files
  context [text]                set the user context (no text: multi-line, end with '.')
  instructions [text]           set the instructions (no text: multi-line, end with '.')
  set line-numbers|file-tree on|off
  options                       show the current options
  template show|edit|load <file>|reset
  raw | enriched | templated    copy a prompt to the clipboard
  preview raw|enriched|templated
  status                        JSON summary of the session
  help
  quit";

/// What the loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end over a [`Session`].
pub struct Shell<R, W, C> {
    session: Session,
    filter: IntakeFilter,
    input: R,
    output: W,
    clipboard: C,
}

impl<R: BufRead, W: Write, C: ClipboardSink> Shell<R, W, C> {
    pub fn new(session: Session, filter: IntakeFilter, input: R, output: W, clipboard: C) -> Self {
        Self {
            session,
            filter,
            input,
            output,
            clipboard,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Script Prompter. Type 'help' for commands.")?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(());
            }

            let args = match shlex::split(line.trim()) {
                Some(args) => args,
                None => {
                    writeln!(self.output, "Error: unbalanced quotes")?;
                    continue;
                }
            };

            if self.execute(&args)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Attaches the given paths and tells the user what happened.
    pub fn attach(&mut self, paths: &[PathBuf]) -> io::Result<()> {
        let report = intake_paths(&mut self.session, paths, &self.filter);
        self.print_report(&report)
    }

    fn execute(&mut self, args: &[String]) -> io::Result<Flow> {
        let Some((command, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };

        match command.as_str() {
            "help" | "?" => writeln!(self.output, "{}", HELP)?,
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "add" => {
                let paths: Vec<PathBuf> = rest.iter().map(PathBuf::from).collect();
                if paths.is_empty() {
                    writeln!(self.output, "Usage: add <path>...")?;
                } else {
                    self.attach(&paths)?;
                }
            }
            "remove" | "rm" => {
                for path in rest {
                    self.remove(path)?;
                }
            }
            "clear" => {
                self.session.clear();
                writeln!(self.output, "All files detached.")?;
            }
            "list" | "ls" => self.list()?,
            "tree" => writeln!(self.output, "{}", self.session.render_tree())?,
            "context" => {
                let text = self.text_argument(rest)?;
                self.session.set_context(text);
                writeln!(self.output, "Context updated.")?;
            }
            "instructions" => {
                let text = self.text_argument(rest)?;
                self.session.set_instructions(text);
                writeln!(self.output, "Instructions updated.")?;
            }
            "set" => self.set_option(rest)?,
            "options" => self.show_options()?,
            "template" => self.template(rest)?,
            "raw" => self.copy(PromptKind::Raw)?,
            "enriched" => self.copy(PromptKind::Enriched)?,
            "templated" => self.copy(PromptKind::Template)?,
            "preview" => match rest.first().map(String::as_str).and_then(prompt_kind) {
                Some(kind) => writeln!(self.output, "{}", self.session.prompt(kind))?,
                None => writeln!(self.output, "Usage: preview raw|enriched|templated")?,
            },
            "status" => match serde_json::to_string_pretty(&self.session.summary()) {
                Ok(json) => writeln!(self.output, "{}", json)?,
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            },
            other => writeln!(self.output, "Unknown command '{}'. Type 'help' for commands.", other)?,
        }

        Ok(Flow::Continue)
    }

    fn print_report(&mut self, report: &IntakeReport) -> io::Result<()> {
        for path in &report.added {
            writeln!(self.output, "Attached {}", path)?;
        }
        for path in &report.duplicates {
            writeln!(self.output, "Already attached: {}", path)?;
        }
        for error in &report.failures {
            writeln!(self.output, "{}", error)?;
        }
        Ok(())
    }

    fn remove(&mut self, path: &str) -> io::Result<()> {
        let removed = self.session.remove(path)
            || attachment_key(Path::new(path))
                .map(|key| self.session.remove(&key))
                .unwrap_or(false);

        if removed {
            writeln!(self.output, "Removed {}", path)
        } else {
            writeln!(self.output, "Not attached: {}", path)
        }
    }

    fn list(&mut self) -> io::Result<()> {
        if self.session.attachments().is_empty() {
            return writeln!(self.output, "No files attached.");
        }

        for (index, attachment) in self.session.attachments().iter().enumerate() {
            writeln!(
                self.output,
                "{:>3}. {} ({} lines)",
                index + 1,
                attachment.path,
                attachment.content.lines().count()
            )?;
        }
        Ok(())
    }

    /// Inline text if given, otherwise lines up to a lone `.` (or end of input).
    fn text_argument(&mut self, rest: &[String]) -> io::Result<String> {
        if !rest.is_empty() {
            return Ok(rest.join(" "));
        }

        writeln!(self.output, "Enter text, finish with a line containing only '.':")?;
        self.read_block()
    }

    fn read_block(&mut self) -> io::Result<String> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim_end_matches(['\n', '\r']);
            if line == "." {
                break;
            }
            lines.push(line.to_string());
        }
        Ok(lines.join("\n"))
    }

    fn set_option(&mut self, rest: &[String]) -> io::Result<()> {
        let value = match rest.get(1).map(String::as_str) {
            Some("on" | "true" | "yes") => true,
            Some("off" | "false" | "no") => false,
            _ => return writeln!(self.output, "Usage: set line-numbers|file-tree on|off"),
        };

        let options = self.session.options_mut();
        match rest.first().map(String::as_str) {
            Some("line-numbers") => options.include_line_numbers = value,
            Some("file-tree") => options.include_file_tree = value,
            _ => return writeln!(self.output, "Usage: set line-numbers|file-tree on|off"),
        }
        self.show_options()
    }

    fn show_options(&mut self) -> io::Result<()> {
        let options = self.session.options();
        writeln!(
            self.output,
            "line-numbers: {}, file-tree: {}",
            on_off(options.include_line_numbers),
            on_off(options.include_file_tree)
        )
    }

    fn template(&mut self, rest: &[String]) -> io::Result<()> {
        match rest.first().map(String::as_str) {
            Some("show") | None => {
                writeln!(self.output, "{}", self.session.template().source())?;
                writeln!(self.output, "Placeholders available:")?;
                for placeholder in script_prompter::compose::Placeholder::ALL {
                    writeln!(self.output, "  {} - {}", placeholder, placeholder.description())?;
                }
                Ok(())
            }
            Some("edit") => {
                writeln!(
                    self.output,
                    "Enter the new template, finish with a line containing only '.' (empty cancels):"
                )?;
                let source = self.read_block()?;
                if source.is_empty() {
                    return writeln!(self.output, "Template unchanged.");
                }
                self.replace_template(&source)
            }
            Some("load") => match rest.get(1) {
                Some(path) => match std::fs::read_to_string(path) {
                    Ok(source) => self.replace_template(&source),
                    Err(e) => writeln!(self.output, "Error reading {}: {}", path, e),
                },
                None => writeln!(self.output, "Usage: template load <file>"),
            },
            Some("reset") => {
                self.session.reset_template();
                writeln!(self.output, "Template reset to default.")
            }
            Some(_) => writeln!(self.output, "Usage: template show|edit|load <file>|reset"),
        }
    }

    fn replace_template(&mut self, source: &str) -> io::Result<()> {
        match self.session.set_template(source) {
            Ok(()) => writeln!(self.output, "Template updated."),
            Err(e) => writeln!(self.output, "{}. Previous template kept.", e),
        }
    }

    fn copy(&mut self, kind: PromptKind) -> io::Result<()> {
        match self.session.copy(kind, &mut self.clipboard) {
            Ok(text) => writeln!(
                self.output,
                "{} copied to clipboard ({} characters).",
                describe(kind),
                text.chars().count()
            ),
            Err(e) => writeln!(self.output, "{}", e),
        }
    }
}

fn prompt_kind(name: &str) -> Option<PromptKind> {
    match name {
        "raw" => Some(PromptKind::Raw),
        "enriched" => Some(PromptKind::Enriched),
        "templated" | "template" => Some(PromptKind::Template),
        _ => None,
    }
}

fn describe(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::Raw => "Raw context",
        PromptKind::Enriched => "Enriched prompt",
        PromptKind::Template => "Templated prompt",
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
