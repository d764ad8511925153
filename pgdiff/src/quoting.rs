/// Reserved key words of PostgreSQL. These can never be used bare as an identifier.
///
/// Taken from <https://www.postgresql.org/docs/current/sql-keywords-appendix.html>
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "authorization",
    "binary", "both", "case", "cast", "check", "collate", "collation", "column", "concurrently",
    "constraint", "create", "cross", "current_catalog", "current_date", "current_role",
    "current_schema", "current_time", "current_timestamp", "current_user", "default", "deferrable",
    "desc", "distinct", "do", "else", "end", "except", "false", "fetch", "for", "foreign", "freeze",
    "from", "full", "grant", "group", "having", "ilike", "in", "initially", "inner", "intersect",
    "into", "is", "isnull", "join", "lateral", "leading", "left", "like", "limit", "localtime",
    "localtimestamp", "natural", "not", "notnull", "null", "offset", "on", "only", "or", "order",
    "outer", "overlaps", "placing", "primary", "references", "returning", "right", "select",
    "session_user", "similar", "some", "symmetric", "system_user", "table", "tablesample", "then",
    "to", "trailing", "true", "union", "unique", "user", "using", "variadic", "verbose", "when",
    "where", "window", "with",
];

/// Quotes an identifier as needed.
///
/// Ported from <https://github.com/postgres/postgres/blob/97957fdbaa429c7c582d4753b108cb1e23e1b28a/src/backend/utils/adt/ruleutils.c#L11975>
pub fn quote_identifier(identifier: &str) -> String {
    if identifier.is_empty() {
        return "\"\"".to_string();
    }

    let mut chars = identifier.chars();

    let safe = matches!(chars.next(), Some('a'..='z' | '_'))
        && chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        && RESERVED_KEYWORDS.binary_search(&identifier).is_err();

    if safe {
        identifier.to_string()
    } else {
        let escaped = identifier.replace('"', r#""""#);

        format!("\"{escaped}\"")
    }
}

/// A trait for types that can be quoted.
pub(crate) trait Quotable {
    /// Quotes the value as needed.
    fn quote(&self) -> String;
}

impl<S> Quotable for S
where
    S: AsRef<str>,
{
    fn quote(&self) -> String {
        quote_identifier(self.as_ref())
    }
}

/// A trait for iterators of identifiers that should be quoted.
pub(crate) trait QuotableIter: Sized {
    fn quote(self) -> IteratorQuoter<Self>;
}

impl<I> QuotableIter for I
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn quote(self) -> IteratorQuoter<Self> {
        IteratorQuoter { iter: self }
    }
}

/// The iterator implementation used then quoting an iterator of values
pub(crate) struct IteratorQuoter<I> {
    iter: I,
}

impl<I> Iterator for IteratorQuoter<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|i| quote_identifier(i.as_ref()))
    }
}

/// Quotes a a string value for usage in Postgres.
pub(crate) fn quote_value_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Reverses [quote_value_string]. Text that is not a quoted literal is returned unchanged.
pub(crate) fn unquote_value_string(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        s[1..s.len() - 1].replace("''", "'")
    } else {
        s.to_string()
    }
}

/// Turns a single identifier part as written in SQL into the name Postgres stores.
/// Quoted parts keep their case and lose their quotes, bare parts are folded to lower case.
pub(crate) fn unquote_identifier(part: &str) -> String {
    if part.len() >= 2 && part.starts_with('"') && part.ends_with('"') {
        part[1..part.len() - 1].replace(r#""""#, "\"")
    } else {
        part.to_lowercase()
    }
}

/// Splits a possibly qualified and quoted name such as `public."My.Table"` into its parts,
/// unquoting every part.
pub(crate) fn split_qualified_name(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in name.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '.' if !in_quotes => {
                parts.push(unquote_identifier(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    parts.push(unquote_identifier(&current));

    parts
}
