//! Shell text helpers.

/// Quote context active while scanning a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Quote {
    Single,
    Double,
    Backtick,
}

impl Quote {
    const fn open(ch: char) -> Option<Self> {
        match ch {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            '`' => Some(Self::Backtick),
            _ => None,
        }
    }

    const fn closes(self, ch: char, escaped: bool) -> bool {
        match self {
            Self::Single => ch == '\'',
            Self::Double => ch == '"' && !escaped,
            Self::Backtick => ch == '`' && !escaped,
        }
    }
}

/// Whitespace skipped before a command or flag value.
pub(crate) const fn is_shell_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// Truncate `s` at the first `#` that is neither quoted nor escaped.
///
/// Backslashes are literal inside single quotes; inside double quotes and
/// backticks they escape the following character.
///
/// # Examples
///
/// ```
/// use mkninja::shell::strip_shell_comment;
///
/// assert_eq!(strip_shell_comment("echo a #comment"), "echo a ");
/// assert_eq!(strip_shell_comment("echo 'a#b'"), "echo 'a#b'");
/// assert_eq!(strip_shell_comment(r"echo \#x"), r"echo \#x");
/// ```
#[must_use]
pub fn strip_shell_comment(s: &str) -> &str {
    if !s.contains('#') {
        return s;
    }
    let mut escape = false;
    let mut quote: Option<Quote> = None;
    for (idx, ch) in s.char_indices() {
        match quote {
            Some(active) => {
                if active.closes(ch, escape) {
                    quote = None;
                }
            }
            None if !escape => {
                if ch == '#' {
                    return s.get(..idx).unwrap_or(s);
                }
                quote = Quote::open(ch);
            }
            None => {}
        }
        escape = !escape && ch == '\\';
    }
    s
}
