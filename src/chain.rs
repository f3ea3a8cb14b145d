//! Recipe chaining.
//!
//! Ninja runs each rule as a single command line, so a target's recipe lines
//! are normalised and joined here. Each line keeps its own failure semantics:
//! a line whose errors are ignored is followed by `;`, any other line by
//! `&&`. Multi-line chains run every line in its own sub-shell so `cd` and
//! variable assignments do not leak between lines, as in Make.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::GenConfig;
use crate::graph::Command;
use crate::shell::{is_shell_space, strip_shell_comment};

/// Name of the acceleration front end inside the configured directory.
pub const ACCEL_DISPATCH: &str = "gomacc";

/// In-tree compiler invocations the accelerator can take over.
#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and always compiles"
)]
static COMPILER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^prebuilts/(gcc|clang)/.*(gcc|g\+\+|clang|clang\+\+) .* -c ")
        .expect("compiler pattern")
});

/// Result of joining a target's recipe lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellChain {
    /// The composite command line, escaped for Ninja.
    pub text: String,
    /// Acceleration is enabled but no line was dispatched to it, so the
    /// chain must run in the bounded local pool.
    pub needs_local_pool: bool,
}

/// Joins recipe lines into a single Ninja `command` value.
#[derive(Debug, Clone, Copy)]
pub struct ChainBuilder<'a> {
    config: &'a GenConfig,
}

impl<'a> ChainBuilder<'a> {
    /// Create a builder honouring the acceleration settings in `config`.
    #[must_use]
    pub const fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    /// Join `commands` into one command line.
    ///
    /// # Examples
    ///
    /// ```
    /// use mkninja::chain::ChainBuilder;
    /// use mkninja::config::GenConfig;
    /// use mkninja::graph::Command;
    ///
    /// let config = GenConfig::default();
    /// let chain = ChainBuilder::new(&config).build(&[
    ///     Command::ignoring_error("rm -f $OUT"),
    ///     Command::new("touch out"),
    /// ]);
    /// assert_eq!(chain.text, "(rm -f $$OUT) ; (touch out)");
    /// ```
    #[must_use]
    pub fn build(&self, commands: &[Command]) -> ShellChain {
        let mut text = String::new();
        let mut accelerated = false;
        let mut prev_ignores_error: Option<bool> = None;
        let last = commands.len().saturating_sub(1);
        for (idx, command) in commands.iter().enumerate() {
            match prev_ignores_error {
                Some(true) => text.push_str(" ; "),
                Some(false) => text.push_str(" && "),
                None => {}
            }
            let mut line = normalize(&command.text);
            if let Some(dir) = self.config.accel_dir() {
                if COMPILER_RE.is_match(&line) {
                    line = format!("{dir}/{ACCEL_DISPATCH} {line}");
                    accelerated = true;
                }
            }

            let sub_shell = commands.len() > 1 && !line.starts_with('(');
            if sub_shell {
                text.push('(');
            }
            text.push_str(&line);
            if idx == last && command.ignore_error {
                text.push_str(" ; true");
            }
            if sub_shell {
                text.push(')');
            }
            prev_ignores_error = Some(command.ignore_error);
        }
        ShellChain {
            text,
            needs_local_pool: self.config.accelerated() && !accelerated,
        }
    }
}

/// Prepare one recipe line for embedding in a Ninja `command`.
///
/// Comments are dropped, line continuations folded, trailing separators
/// trimmed and `$` doubled so Ninja passes it through to the shell.
fn normalize(text: &str) -> String {
    let code = strip_shell_comment(text).trim_start_matches(is_shell_space);
    let folded = code.replace("\\\n", " ");
    let trimmed = folded.trim_end_matches([' ', '\t', '\n', ';']);
    let escaped = trimmed.replace('$', "$$").replace('\t', " ");
    if escaped.is_empty() {
        String::from("true")
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn plain() -> GenConfig {
        GenConfig::default()
    }

    #[fixture]
    fn accelerated() -> GenConfig {
        GenConfig::default().with_accel_dir("/goma")
    }

    #[rstest]
    #[case("echo hi", "echo hi")]
    #[case("  echo hi ;; ", "echo hi")]
    #[case("echo $HOME", "echo $$HOME")]
    #[case("echo a\tb", "echo a b")]
    #[case("cc -c a.c \\\n  -o a.o", "cc -c a.c    -o a.o")]
    #[case("echo hi # trailing note", "echo hi")]
    #[case("# only a comment", "true")]
    #[case("   ", "true")]
    fn normalizes_lines(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    fn single_command_is_not_wrapped(plain: GenConfig) {
        let chain = ChainBuilder::new(&plain).build(&[Command::new("echo one")]);
        assert_eq!(chain.text, "echo one");
        assert!(!chain.needs_local_pool);
    }

    #[rstest]
    fn single_tolerant_command_ends_with_true(plain: GenConfig) {
        let chain = ChainBuilder::new(&plain).build(&[Command::ignoring_error("rm x")]);
        assert_eq!(chain.text, "rm x ; true");
    }

    #[rstest]
    #[case(
        vec![Command::ignoring_error("a"), Command::new("b")],
        "(a) ; (b)"
    )]
    #[case(
        vec![Command::new("a"), Command::ignoring_error("b")],
        "(a) && (b ; true)"
    )]
    #[case(
        vec![Command::new("a"), Command::new("(cd x && make)"), Command::new("c")],
        "(a) && (cd x && make) && (c)"
    )]
    fn joins_by_error_tolerance(
        plain: GenConfig,
        #[case] commands: Vec<Command>,
        #[case] expected: &str,
    ) {
        assert_eq!(ChainBuilder::new(&plain).build(&commands).text, expected);
    }

    #[rstest]
    fn dispatches_in_tree_compiler(accelerated: GenConfig) {
        let chain = ChainBuilder::new(&accelerated).build(&[Command::new(
            "prebuilts/gcc/linux-x86/bin/arm-eabi-gcc -O2 -c foo.c -o foo.o",
        )]);
        assert_eq!(
            chain.text,
            "/goma/gomacc prebuilts/gcc/linux-x86/bin/arm-eabi-gcc -O2 -c foo.c -o foo.o"
        );
        assert!(!chain.needs_local_pool);
    }

    #[rstest]
    #[case("gcc -O2 -c foo.c -o foo.o")]
    #[case("prebuilts/clang/bin/clang -o foo foo.o")]
    fn other_commands_reserve_local_pool(accelerated: GenConfig, #[case] command: &str) {
        let chain = ChainBuilder::new(&accelerated).build(&[Command::new(command)]);
        assert_eq!(chain.text, command);
        assert!(chain.needs_local_pool);
    }

    #[rstest]
    fn compiler_lines_are_not_dispatched_without_accelerator(plain: GenConfig) {
        let command = "prebuilts/clang/bin/clang++ -x c++ -c a.cc";
        let chain = ChainBuilder::new(&plain).build(&[Command::new(command)]);
        assert_eq!(chain.text, command);
        assert!(!chain.needs_local_pool);
    }
}
