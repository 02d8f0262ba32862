// src/compose.rs
//! Assembles the scripts block, file tree, context and instructions into the
//! text placed on the clipboard.

use std::fmt;

use crate::error::{Error, Result};

pub const NO_SCRIPTS: &str = "(No scripts attached)";
pub const NO_CONTEXT: &str = "(No user context provided)";
pub const NO_INSTRUCTIONS: &str = "(No instructions provided)";

pub const TITLE_HEADER: &str = "## Enriched Prompt";
pub const CONTEXT_HEADER: &str = "### User Context";
pub const FILE_STRUCTURE_HEADER: &str = "### File Structure";
pub const SCRIPTS_HEADER: &str = "### Scripts";
pub const INSTRUCTIONS_HEADER: &str = "### Instructions";

pub const LINE_NUMBERS_NOTE: &str = "Note: each line of the scripts above is prefixed with its \
line number and a colon (for example `12:`); refer to code by these line numbers.";

pub const DEFAULT_TEMPLATE: &str = "## Enriched Prompt\n\n\
### Scripts\n{scripts}\n\n\
### User Context\n{context}\n\n\
### Instructions\n{instructions}\n";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

/// Joins the non-empty parts with a blank line between them. Nothing is added
/// for empty parts, so three empty inputs give an empty string.
pub fn compose_raw(scripts: &str, context: &str, instructions: &str) -> String {
    [scripts, context, instructions]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Inputs of the enriched, section-structured prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichedParts<'a> {
    pub scripts: &'a str,
    pub context: &'a str,
    pub instructions: &'a str,
    pub include_tree: bool,
    pub tree: &'a str,
    pub include_line_numbers: bool,
}

/// Builds the enriched prompt: context, file structure, scripts, then
/// instructions, each under a fixed header.
///
/// Missing parts are replaced with a placeholder phrase instead of being
/// dropped. The file structure section and the line-number note only appear
/// when at least one script is attached.
pub fn compose_enriched(parts: &EnrichedParts<'_>) -> String {
    let has_scripts = !parts.scripts.is_empty();
    let mut sections = vec![
        TITLE_HEADER.to_string(),
        format!("{CONTEXT_HEADER}\n{}", or_placeholder(parts.context, NO_CONTEXT)),
    ];

    if parts.include_tree && has_scripts {
        sections.push(format!("{FILE_STRUCTURE_HEADER}\n{}", parts.tree));
    }

    let mut scripts = format!("{SCRIPTS_HEADER}\n{}", or_placeholder(parts.scripts, NO_SCRIPTS));
    if parts.include_line_numbers && has_scripts {
        scripts.push_str("\n\n");
        scripts.push_str(LINE_NUMBERS_NOTE);
    }
    sections.push(scripts);

    sections.push(format!(
        "{INSTRUCTIONS_HEADER}\n{}",
        or_placeholder(parts.instructions, NO_INSTRUCTIONS)
    ));

    let mut output = sections.join("\n\n");
    output.push('\n');
    output
}

/// A placeholder a user template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Scripts,
    Context,
    Instructions,
    FileTree,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::Scripts,
        Placeholder::Context,
        Placeholder::Instructions,
        Placeholder::FileTree,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Scripts => "scripts",
            Placeholder::Context => "context",
            Placeholder::Instructions => "instructions",
            Placeholder::FileTree => "file_tree",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Placeholder::Scripts => "Inserted scripts (filename: content)",
            Placeholder::Context => "User context",
            Placeholder::Instructions => "Instructions",
            Placeholder::FileTree => "Tree of the attached files",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// The values substituted into a [`Template`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateValues<'a> {
    pub scripts: &'a str,
    pub context: &'a str,
    pub instructions: &'a str,
    pub file_tree: &'a str,
}

impl TemplateValues<'_> {
    fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Scripts => self.scripts,
            Placeholder::Context => self.context,
            Placeholder::Instructions => self.instructions,
            Placeholder::FileTree => self.file_tree,
        }
    }
}

/// A user-editable prompt template with `{name}` placeholders.
///
/// `{{` and `}}` stand for literal braces. Templates are checked when parsed,
/// so rendering a `Template` cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Default for Template {
    fn default() -> Self {
        // The built-in template only uses known placeholders.
        Self::parse(DEFAULT_TEMPLATE).unwrap_or_else(|_| Self {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: vec![Segment::Literal(DEFAULT_TEMPLATE.to_string())],
        })
    }
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, ch)) = chars.next() {
            match ch {
                '{' if chars.peek().map(|(_, c)| *c) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|(_, c)| *c) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(Error::MalformedTemplate {
                        position,
                        reason: "single '}' encountered".to_string(),
                    });
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (inner_position, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(Error::MalformedTemplate {
                                    position: inner_position,
                                    reason: "unexpected '{' inside placeholder".to_string(),
                                });
                            }
                            other => name.push(other),
                        }
                    }

                    if !closed {
                        return Err(Error::MalformedTemplate {
                            position,
                            reason: "unclosed '{'".to_string(),
                        });
                    }
                    if name.is_empty() {
                        return Err(Error::MalformedTemplate {
                            position,
                            reason: "empty placeholder '{}'".to_string(),
                        });
                    }

                    let placeholder = Placeholder::from_name(&name)
                        .ok_or(Error::UnknownPlaceholder { name })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(placeholder));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The text the template was parsed from, as the user wrote it.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholders referenced by this template, in order of first use.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        let mut used = Vec::new();
        for segment in &self.segments {
            if let Segment::Slot(placeholder) = segment {
                if !used.contains(placeholder) {
                    used.push(*placeholder);
                }
            }
        }
        used
    }

    pub fn render(&self, values: &TemplateValues<'_>) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Slot(placeholder) => output.push_str(values.get(*placeholder)),
            }
        }
        output
    }
}

/// Parses `template` and fills it with `values` in one step.
pub fn fill_template(template: &str, values: &TemplateValues<'_>) -> Result<String> {
    Ok(Template::parse(template)?.render(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_all_empty_is_empty() {
        assert_eq!(compose_raw("", "", ""), "");
    }

    #[test]
    fn test_raw_skips_empty_members() {
        assert_eq!(compose_raw("s", "", "i"), "s\n\ni");
        assert_eq!(compose_raw("", "c", ""), "c");
        assert_eq!(compose_raw("s", "c", "i"), "s\n\nc\n\ni");
        assert_eq!(compose_raw("s", "c", ""), "s\n\nc");
    }

    #[test]
    fn test_enriched_empty_uses_placeholders_and_omits_tree() {
        let prompt = compose_enriched(&EnrichedParts {
            include_tree: true,
            tree: "ignored",
            include_line_numbers: true,
            ..Default::default()
        });

        assert!(prompt.contains(NO_SCRIPTS));
        assert!(prompt.contains(NO_CONTEXT));
        assert!(prompt.contains(NO_INSTRUCTIONS));
        assert!(!prompt.contains(FILE_STRUCTURE_HEADER));
        assert!(!prompt.contains(LINE_NUMBERS_NOTE));
    }

    #[test]
    fn test_enriched_section_order() {
        let prompt = compose_enriched(&EnrichedParts {
            scripts: "/a.rs:\n1:fn main() {}",
            context: "A tiny program.",
            instructions: "Explain it.",
            include_tree: true,
            tree: "a.rs",
            include_line_numbers: true,
        });

        let expected = format!(
            "## Enriched Prompt\n\n\
             ### User Context\nA tiny program.\n\n\
             ### File Structure\na.rs\n\n\
             ### Scripts\n/a.rs:\n1:fn main() {{}}\n\n{LINE_NUMBERS_NOTE}\n\n\
             ### Instructions\nExplain it.\n"
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_enriched_without_tree_flag() {
        let prompt = compose_enriched(&EnrichedParts {
            scripts: "/a.rs:\nfn main() {}",
            include_tree: false,
            tree: "a.rs",
            ..Default::default()
        });
        assert!(!prompt.contains(FILE_STRUCTURE_HEADER));
        assert!(!prompt.contains(LINE_NUMBERS_NOTE));
    }

    #[test]
    fn test_enriched_is_idempotent() {
        let parts = EnrichedParts {
            scripts: "/x:\ny",
            context: "c",
            ..Default::default()
        };
        assert_eq!(compose_enriched(&parts), compose_enriched(&parts));
    }

    #[test]
    fn test_template_substitutes_all_placeholders() {
        let template =
            Template::parse("{context}|{file_tree}|{scripts}|{instructions}|{scripts}").unwrap();
        let values = TemplateValues {
            scripts: "S",
            context: "C",
            instructions: "I",
            file_tree: "T",
        };
        assert_eq!(template.render(&values), "C|T|S|I|S");
        assert_eq!(
            template.placeholders(),
            vec![
                Placeholder::Context,
                Placeholder::FileTree,
                Placeholder::Scripts,
                Placeholder::Instructions
            ]
        );
    }

    #[test]
    fn test_template_unused_placeholders_are_fine() {
        let rendered = fill_template(
            "Only {instructions}",
            &TemplateValues {
                scripts: "S",
                instructions: "do it",
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(rendered, "Only do it");
    }

    #[test]
    fn test_template_escaped_braces() {
        let rendered = fill_template(
            "fn x() {{ }} {context}",
            &TemplateValues {
                context: "ctx",
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(rendered, "fn x() { } ctx");
    }

    #[test]
    fn test_template_unknown_placeholder_is_error() {
        let err = Template::parse("Hello {name}").unwrap_err();
        assert!(matches!(err, Error::UnknownPlaceholder { ref name } if name == "name"));
        assert_eq!(err.to_string(), "Unknown placeholder {name} in template");
    }

    #[test]
    fn test_template_malformed_braces_are_errors() {
        for source in ["open {scripts", "stray } brace", "empty {}", "nested {a{b}}"] {
            assert!(
                matches!(Template::parse(source), Err(Error::MalformedTemplate { .. })),
                "expected malformed template error for {source:?}"
            );
        }
    }

    #[test]
    fn test_default_template_round_trips_source() {
        let template = Template::default();
        assert_eq!(template.source(), DEFAULT_TEMPLATE);
        assert_eq!(
            template.placeholders(),
            vec![Placeholder::Scripts, Placeholder::Context, Placeholder::Instructions]
        );
    }
}
