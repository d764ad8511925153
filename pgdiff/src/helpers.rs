pub(crate) trait StringExt {
    fn push_join(&mut self, separator: &str, items: impl IntoIterator<Item = impl AsRef<str>>);

    /// Pushes `line` on a new line, indented with a single tab.
    fn push_clause(&mut self, line: &str);
}

impl StringExt for String {
    fn push_join(&mut self, separator: &str, items: impl IntoIterator<Item = impl AsRef<str>>) {
        for (idx, v) in items.into_iter().enumerate() {
            if idx > 0 {
                self.push_str(separator);
            }
            self.push_str(v.as_ref());
        }
    }

    fn push_clause(&mut self, line: &str) {
        self.push_str("\n\t");
        self.push_str(line);
    }
}

/// The SQL for a comment in `COMMENT ON ... IS <literal>`. Comments are kept as the string
/// literal found in the dump, a missing comment renders as `NULL`.
pub(crate) fn comment_literal(comment: &Option<String>) -> &str {
    comment.as_deref().unwrap_or("NULL")
}
