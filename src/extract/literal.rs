//! String-literal decoding: escape handling and `indoc!`-style un-indentation.

/// The three literal spellings a call shape can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `"..."`, backslash escapes are decoded.
    Quoted,
    /// `r"..."`, content is verbatim.
    Raw,
    /// `r#"..."#`, content is verbatim and may contain bare quotes.
    RawHash,
}

impl LiteralKind {
    pub const ALL: [LiteralKind; 3] = [LiteralKind::Quoted, LiteralKind::Raw, LiteralKind::RawHash];

    /// Regex fragment matching the literal; the `body` group is its content.
    ///
    /// A backslash only pairs with a following character that is not a
    /// line terminator.
    pub fn pattern(self) -> &'static str {
        match self {
            LiteralKind::Quoted => {
                r#""(?P<body>[^"\\]*(?:\\[^\n\r\x{2028}\x{2029}][^"\\]*)*)""#
            }
            LiteralKind::Raw => {
                r#"r"(?P<body>[^"\\]*(?:\\[^\n\r\x{2028}\x{2029}][^"\\]*)*)""#
            }
            // Content is any text without a `"#` sequence, so the literal
            // always closes at the first `"#`.
            LiteralKind::RawHash => r##"r#"(?P<body>(?:[^"]|"+[^"#])*"*)"#"##,
        }
    }

    pub fn decodes_escapes(self) -> bool {
        matches!(self, LiteralKind::Quoted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LiteralKind::Quoted => "quoted",
            LiteralKind::Raw => "raw",
            LiteralKind::RawHash => "raw_hash",
        }
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Decodes backslash escapes of a plain-quoted literal.
///
/// Unknown escapes decode to the escaped character with the backslash
/// dropped. A backslash before a line terminator, or at the very end, is
/// kept as-is.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(next) if !is_line_terminator(next) => {
                chars.next();
                out.push(match next {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Strips the indentation shared by every non-blank line.
///
/// Blank lines are left untouched; text whose minimum indentation is zero
/// comes back unchanged.
pub fn unindent(text: &str) -> String {
    let min_indent = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(indent_width)
        .min();

    match min_indent {
        None | Some(0) => text.to_string(),
        Some(width) => text
            .split('\n')
            .map(|line| {
                if line.trim().is_empty() {
                    line
                } else {
                    &line[width..]
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
