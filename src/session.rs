// src/session.rs
use log::info;
use serde::Serialize;

use crate::attachments::{Attachment, AttachmentStore};
use crate::clipboard::ClipboardSink;
use crate::compose::{
    compose_enriched, compose_raw, EnrichedParts, Template, TemplateValues, NO_CONTEXT,
    NO_INSTRUCTIONS, NO_SCRIPTS,
};
use crate::error::Result;
use crate::path_tree::build_tree;

/// Render-time switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Options {
    pub include_line_numbers: bool,
    pub include_file_tree: bool,
}

/// Which composition a copy action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Raw,
    Enriched,
    Template,
}

/// Everything one user session works on: the attached files, the editable
/// template, the options and the two free-text fields.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: AttachmentStore,
    template: Template,
    options: Options,
    context: String,
    instructions: String,
}

/// Serializable overview of a session, used by the shell's `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary<'a> {
    pub files: Vec<FileSummary<'a>>,
    pub options: Options,
    pub context_chars: usize,
    pub instructions_chars: usize,
    pub template_placeholders: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary<'a> {
    pub path: &'a str,
    pub bytes: usize,
    pub lines: usize,
}

impl Session {
    pub fn new(template: Template, options: Options) -> Self {
        Self {
            template,
            options,
            ..Self::default()
        }
    }

    pub fn add(&mut self, path: impl Into<String>, content: impl Into<String>) -> bool {
        self.store.add(path, content)
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.store.remove(path)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.store.list()
    }

    pub fn store(&self) -> &AttachmentStore {
        &self.store
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.instructions = instructions.into();
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Replaces the template if `source` parses. On error the current template
    /// stays in effect.
    pub fn set_template(&mut self, source: &str) -> Result<()> {
        self.template = Template::parse(source)?;
        info!("Template updated.");
        Ok(())
    }

    pub fn reset_template(&mut self) {
        self.template = Template::default();
    }

    pub fn render_scripts(&self) -> String {
        crate::scripts::render_scripts(&self.store, self.options.include_line_numbers)
    }

    /// The tree is derived from the current attachments on every call.
    pub fn render_tree(&self) -> String {
        build_tree(&self.store.paths())
    }

    pub fn raw_prompt(&self) -> String {
        compose_raw(&self.render_scripts(), &self.context, &self.instructions)
    }

    pub fn enriched_prompt(&self) -> String {
        let scripts = self.render_scripts();
        let tree = if self.options.include_file_tree && !self.store.is_empty() {
            self.render_tree()
        } else {
            String::new()
        };

        compose_enriched(&EnrichedParts {
            scripts: &scripts,
            context: &self.context,
            instructions: &self.instructions,
            include_tree: self.options.include_file_tree,
            tree: &tree,
            include_line_numbers: self.options.include_line_numbers,
        })
    }

    pub fn templated_prompt(&self) -> String {
        let scripts = self.render_scripts();
        let tree = self.render_tree();
        let placeholder_or = |value: &str, placeholder: &str| -> String {
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };

        let scripts = placeholder_or(&scripts, NO_SCRIPTS);
        let context = placeholder_or(&self.context, NO_CONTEXT);
        let instructions = placeholder_or(&self.instructions, NO_INSTRUCTIONS);

        self.template.render(&TemplateValues {
            scripts: &scripts,
            context: &context,
            instructions: &instructions,
            file_tree: &tree,
        })
    }

    pub fn prompt(&self, kind: PromptKind) -> String {
        match kind {
            PromptKind::Raw => self.raw_prompt(),
            PromptKind::Enriched => self.enriched_prompt(),
            PromptKind::Template => self.templated_prompt(),
        }
    }

    /// Composes the prompt and hands it to the clipboard. Returns the copied
    /// text so the caller can report on it.
    pub fn copy(&self, kind: PromptKind, sink: &mut dyn ClipboardSink) -> Result<String> {
        let text = self.prompt(kind);
        sink.set_text(&text)?;
        info!(
            "{:?} prompt copied to clipboard ({} files, {} characters).",
            kind,
            self.store.len(),
            text.chars().count()
        );
        Ok(text)
    }

    pub fn copy_raw(&self, sink: &mut dyn ClipboardSink) -> Result<String> {
        self.copy(PromptKind::Raw, sink)
    }

    pub fn copy_enriched(&self, sink: &mut dyn ClipboardSink) -> Result<String> {
        self.copy(PromptKind::Enriched, sink)
    }

    pub fn copy_templated(&self, sink: &mut dyn ClipboardSink) -> Result<String> {
        self.copy(PromptKind::Template, sink)
    }

    pub fn summary(&self) -> SessionSummary<'_> {
        SessionSummary {
            files: self
                .store
                .iter()
                .map(|(path, content)| FileSummary {
                    path,
                    bytes: content.len(),
                    lines: content.lines().count(),
                })
                .collect(),
            options: self.options,
            context_chars: self.context.chars().count(),
            instructions_chars: self.instructions.chars().count(),
            template_placeholders: self
                .template
                .placeholders()
                .into_iter()
                .map(|p| p.name())
                .collect(),
        }
    }
}
