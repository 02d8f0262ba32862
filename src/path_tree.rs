// src/path_tree.rs
//! Turns a flat set of file paths into a nested directory tree and renders it
//! as ASCII art.

use std::collections::{BTreeMap, BTreeSet};

/// Printed in place of a tree when no files are attached.
pub const EMPTY_TREE_PLACEHOLDER: &str = "(No files attached)";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// A tree node is either a file or a directory holding named children.
///
/// Children live in a `BTreeMap`, so iteration is already in the lexicographic
/// order used for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf,
    Interior(BTreeMap<String, Node>),
}

impl Node {
    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf => 1,
            Node::Interior(children) => children.values().map(Node::leaf_count).sum(),
        }
    }
}

/// One or more top-level roots built from a set of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree {
    roots: BTreeMap<String, Node>,
}

/// A normalized path split into its segments.
#[derive(Debug)]
struct SplitPath<'a> {
    absolute: bool,
    segments: Vec<&'a str>,
}

impl<'a> SplitPath<'a> {
    fn new(normalized: &'a str) -> Self {
        Self {
            absolute: normalized.starts_with('/'),
            segments: normalized
                .split('/')
                .filter(|segment| !segment.is_empty() && *segment != ".")
                .collect(),
        }
    }
}

/// Lexically normalizes a path: backslashes become `/`, repeated separators
/// and `.` segments collapse, and `..` consumes the preceding segment.
///
/// Absolute paths keep their single leading `/`. An empty relative result is
/// returned as `.`.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `/..` is still `/`
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Returns the final segment of a normalized path.
pub fn base_name(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rsplit('/').find(|segment| !segment.is_empty()) {
        Some(name) => name.to_string(),
        None => normalized,
    }
}

/// Component-wise longest common ancestor of the given paths.
///
/// Returns `None` when the paths mix absolute and relative forms. A partially
/// shared segment never counts: `/a/bc` and `/a/bd` share `/a`, not `/a/b`.
pub fn common_ancestor<S: AsRef<str>>(paths: &[S]) -> Option<String> {
    let normalized: Vec<String> = paths.iter().map(|p| normalize(p.as_ref())).collect();
    let split: Vec<SplitPath<'_>> = normalized.iter().map(|p| SplitPath::new(p)).collect();
    let (absolute, depth) = shared_prefix(&split)?;
    let segments = &split[0].segments[..depth];

    Some(match (absolute, segments.is_empty()) {
        (true, _) => format!("/{}", segments.join("/")),
        (false, true) => ".".to_string(),
        (false, false) => segments.join("/"),
    })
}

fn shared_prefix(split: &[SplitPath<'_>]) -> Option<(bool, usize)> {
    let first = split.first()?;
    if split.iter().any(|p| p.absolute != first.absolute) {
        return None;
    }

    let depth = split.iter().skip(1).fold(first.segments.len(), |depth, path| {
        first.segments[..depth]
            .iter()
            .zip(&path.segments)
            .take_while(|(a, b)| a == b)
            .count()
    });
    Some((first.absolute, depth))
}

/// A shared prefix can serve as a single root only if it names a real
/// directory below the filesystem root (or a drive root such as `C:`).
fn usable_root(segments: &[&str]) -> bool {
    match segments {
        [] => false,
        [drive] => !drive.ends_with(':'),
        _ => true,
    }
}

fn insert(children: &mut BTreeMap<String, Node>, segments: &[&str]) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        // A directory already registered under this name wins over the file.
        children.entry((*first).to_string()).or_insert(Node::Leaf);
        return;
    }

    let node = children
        .entry((*first).to_string())
        .or_insert_with(|| Node::Interior(BTreeMap::new()));
    if matches!(node, Node::Leaf) {
        *node = Node::Interior(BTreeMap::new());
    }
    if let Node::Interior(grandchildren) = node {
        insert(grandchildren, rest);
    }
}

impl PathTree {
    /// Builds the tree for a set of paths.
    ///
    /// When the paths share a usable ancestor directory the tree has a single
    /// root named after it. Otherwise every path contributes its full segment
    /// sequence and several roots may result.
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let normalized: BTreeSet<String> = paths.iter().map(|p| normalize(p.as_ref())).collect();
        let split: Vec<SplitPath<'_>> = normalized.iter().map(|p| SplitPath::new(p)).collect();
        let ancestor = if split.len() > 1 {
            common_ancestor(&normalized.iter().collect::<Vec<_>>())
        } else {
            None
        };
        let ancestor = ancestor.as_deref().map(SplitPath::new);

        let mut roots = BTreeMap::new();
        match ancestor {
            Some(ancestor) if usable_root(&ancestor.segments) => {
                let depth = ancestor.segments.len();
                let mut children = BTreeMap::new();
                for path in &split {
                    // The ancestor itself, if attached, has nothing to show below the root.
                    insert(&mut children, &path.segments[depth..]);
                }
                roots.insert(ancestor.segments[depth - 1].to_string(), Node::Interior(children));
            }
            _ => {
                for path in &split {
                    insert(&mut roots, &path.segments);
                }
            }
        }

        Self { roots }
    }

    /// Number of files represented in the tree.
    pub fn leaf_count(&self) -> usize {
        self.roots.values().map(Node::leaf_count).sum()
    }

    /// Renders every root bare, followed by its descendants with connectors.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for (name, node) in &self.roots {
            lines.push(name.clone());
            if let Node::Interior(children) = node {
                render_children(children, "", &mut lines);
            }
        }
        lines.join("\n")
    }
}

fn render_children(children: &BTreeMap<String, Node>, prefix: &str, lines: &mut Vec<String>) {
    let count = children.len();
    for (index, (name, node)) in children.iter().enumerate() {
        let last = index + 1 == count;
        let connector = if last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{prefix}{connector}{name}"));

        if let Node::Interior(grandchildren) = node {
            let indent = if last { SPACE_INDENT } else { PIPE_INDENT };
            render_children(grandchildren, &format!("{prefix}{indent}"), lines);
        }
    }
}

/// Renders the file tree shown to the user for a set of attached paths.
///
/// No paths yields [`EMPTY_TREE_PLACEHOLDER`]; a single path yields just its
/// base name.
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> String {
    let distinct: BTreeSet<String> = paths.iter().map(|p| normalize(p.as_ref())).collect();
    match distinct.len() {
        0 => EMPTY_TREE_PLACEHOLDER.to_string(),
        1 => distinct.iter().next().map(|p| base_name(p)).unwrap_or_default(),
        _ => PathTree::from_paths(&distinct.into_iter().collect::<Vec<_>>()).render(),
    }
}
