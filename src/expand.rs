//! Make-style variable reference expansion.
//!
//! Supports `$$`, `$(NAME)`, `${NAME}` and single-character references such
//! as `$@`. Values returned by the lookup are expanded again, matching the
//! behaviour of recursively expanded Makefile variables. Unknown names
//! expand to the empty string, as does a variable that refers to itself
//! while it is being expanded.

use tracing::warn;

/// Expand every variable reference in `text` using `lookup`.
///
/// # Examples
///
/// ```
/// use mkninja::expand::expand;
///
/// let lookup = |name: &str| match name {
///     "CC" => Some("$(PREFIX)gcc".to_owned()),
///     "PREFIX" => Some("arm-".to_owned()),
///     _ => None,
/// };
/// assert_eq!(expand("$(CC) -c $$HOME", &lookup), "arm-gcc -c $HOME");
/// ```
#[must_use]
pub fn expand<F>(text: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    Expander {
        lookup,
        active: Vec::new(),
    }
    .expand(text)
}

/// Expansion state: the variables currently being expanded, outermost first.
struct Expander<'a, F> {
    lookup: &'a F,
    active: Vec<String>,
}

impl<F> Expander<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn expand(&mut self, text: &str) -> String {
        if !text.contains('$') {
            return text.to_owned();
        }
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch != '$' {
                out.push(ch);
                continue;
            }
            let name = match chars.next() {
                None => {
                    out.push('$');
                    break;
                }
                Some('$') => {
                    out.push('$');
                    continue;
                }
                Some(open @ ('(' | '{')) => {
                    let close = if open == '(' { ')' } else { '}' };
                    read_delimited(&mut chars, open, close)
                }
                Some(single) => single.to_string(),
            };
            out.push_str(&self.resolve(&name));
        }
        out
    }

    fn resolve(&mut self, name: &str) -> String {
        // Computed names such as `$($(ARCH)_CFLAGS)`.
        let resolved_name = self.expand(name);
        if self.active.contains(&resolved_name) {
            warn!(
                variable = %resolved_name,
                "recursive variable references itself; expanding to nothing"
            );
            return String::new();
        }
        let Some(value) = (self.lookup)(&resolved_name) else {
            return String::new();
        };
        self.active.push(resolved_name);
        let expanded = self.expand(&value);
        self.active.pop();
        expanded
    }
}

/// Read up to the matching `close`, honouring nested delimiters.
fn read_delimited(chars: &mut std::str::Chars<'_>, open: char, close: char) -> String {
    let mut name = String::new();
    let mut nesting = 0usize;
    for ch in chars.by_ref() {
        if ch == open {
            nesting += 1;
        } else if ch == close {
            if nesting == 0 {
                break;
            }
            nesting -= 1;
        }
        name.push(ch);
    }
    name
}
