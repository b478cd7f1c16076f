//! Query-string escaping for free-text search.
//!
//! User text is embedded in an engine `query_string` clause, so characters
//! with query-syntax meaning are backslash-escaped:
//! - `+ - = ! ( ) { } [ ] ^ " ~ : /` and `\` itself
//! - the two-character operators `&&` and `||`
//!
//! `<` and `>` cannot be escaped inside a query string and are dropped
//! before operators are detected.
//! `*` and `?` stay unescaped so wildcard searches keep working.

const ESCAPED: &[char] = &[
    '\\', '+', '-', '=', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', ':', '/',
];

pub(crate) fn escape_query_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    let mut chars = input.chars().filter(|c| !matches!(c, '<' | '>')).peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' | '|' if chars.peek() == Some(&c) => {
                chars.next();
                out.push('\\');
                out.push(c);
                out.push(c);
            }
            c if ESCAPED.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
