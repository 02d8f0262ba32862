// src/lib.rs
//! # script-prompter
//!
//! Collects text files, optionally annotates them with line numbers and a
//! directory tree, and assembles them together with free-form context and
//! instructions into a single prompt for a language model.
//!
//! The library is headless: a [`Session`] owns the attached files, the
//! editable template and the render options, and every operation is a plain
//! function call. The `script-prompter` binary is a thin terminal shell on
//! top of it.
//!
//! ```
//! use script_prompter::{MemoryClipboard, Session};
//!
//! let mut session = Session::default();
//! session.add("/proj/src/main.rs", "fn main() {}");
//! session.add("/proj/README.md", "# proj");
//! session.set_instructions("Add error handling.");
//! session.options_mut().include_file_tree = true;
//!
//! let mut clipboard = MemoryClipboard::default();
//! let prompt = session.copy_enriched(&mut clipboard).unwrap();
//! assert!(prompt.contains("proj\n├── README.md\n└── src\n    └── main.rs"));
//! ```

pub mod attachments;
pub mod clipboard;
pub mod compose;
pub mod config;
pub mod error;
pub mod intake;
pub mod path_tree;
pub mod scripts;
pub mod session;

pub use attachments::{Attachment, AttachmentStore};
pub use clipboard::{ClipboardSink, MemoryClipboard, StdoutSink, SystemClipboard};
pub use compose::{compose_enriched, compose_raw, fill_template, EnrichedParts, Template, TemplateValues};
pub use config::Config;
pub use error::{Error, Result};
pub use intake::{intake_paths, read_attachment, IntakeFilter, IntakeReport};
pub use path_tree::{build_tree, PathTree};
pub use scripts::{number_lines, render_scripts};
pub use session::{Options, PromptKind, Session};
