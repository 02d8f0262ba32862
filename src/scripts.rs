// src/scripts.rs
use crate::attachments::AttachmentStore;

/// Prefixes every line of `content` with its 1-based number, e.g. `3:let x = 1;`.
///
/// A trailing newline does not produce an extra numbered empty line.
pub fn number_lines(content: &str) -> String {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| format!("{}:{}", index + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats every attachment as `path:` followed by its content, in insertion
/// order, with a blank line between files.
pub fn render_scripts(store: &AttachmentStore, include_line_numbers: bool) -> String {
    let mut output = String::new();

    for (path, content) in store.iter() {
        output.push_str(path);
        output.push_str(":\n");
        if include_line_numbers {
            output.push_str(&number_lines(content));
        } else {
            output.push_str(content);
        }
        output.push_str("\n\n");
    }

    output.truncate(output.trim_end().len());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_lines() {
        assert_eq!(number_lines("foo\nbar"), "1:foo\n2:bar");
        assert_eq!(number_lines("foo\nbar\n"), "1:foo\n2:bar");
        assert_eq!(number_lines("a\r\nb"), "1:a\n2:b");
        assert_eq!(number_lines(""), "");
    }

    #[test]
    fn test_empty_store_renders_nothing() {
        assert_eq!(render_scripts(&AttachmentStore::new(), true), "");
    }

    #[test]
    fn test_render_in_insertion_order() {
        let mut store = AttachmentStore::new();
        store.add("/b.py", "print('b')\n");
        store.add("/a.py", "print('a')");

        assert_eq!(
            render_scripts(&store, false),
            "/b.py:\nprint('b')\n\n\n/a.py:\nprint('a')"
        );
    }

    #[test]
    fn test_numbering_restarts_per_file() {
        let mut store = AttachmentStore::new();
        store.add("/one.rs", "fn a() {}\nfn b() {}");
        store.add("/two.rs", "fn c() {}");

        assert_eq!(
            render_scripts(&store, true),
            "/one.rs:\n1:fn a() {}\n2:fn b() {}\n\n/two.rs:\n1:fn c() {}"
        );
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let mut store = AttachmentStore::new();
        store.add("/notes.txt", "hello   \n\n\n");
        assert_eq!(render_scripts(&store, false), "/notes.txt:\nhello");
    }
}
