//! Depfile inference from compiler command lines.
//!
//! When a command asks the compiler for dependency output (`-MD`/`-MMD`) the
//! Ninja rule needs to know where that file lands. The location is read from
//! `-MF`, or derived from `-o` by swapping the extension for `.d`, then
//! adjusted for a few toolchain conventions.

use camino::Utf8Path;

use crate::error::GenError;
use crate::shell::is_shell_space;

/// Tool that accepts `-MD` but never writes a depfile.
const NO_DEPFILE_TOOL: &str = "bin/llvm-rs-cc ";

/// Infer the depfile written by `command`, if any.
///
/// # Errors
///
/// Returns [`GenError::MultipleDepfileCandidates`] when `-MF` or `-o`
/// appears more than once, and [`GenError::DepfileNotFound`] when dependency
/// output is requested without either flag.
///
/// # Examples
///
/// ```
/// use mkninja::depfile::resolve;
///
/// assert_eq!(resolve("gcc -c foo.c -o foo.o -MD").unwrap(), Some("foo.d".to_owned()));
/// assert_eq!(resolve("gcc -c foo.c -o foo.o").unwrap(), None);
/// ```
pub fn resolve(command: &str) -> Result<Option<String>, GenError> {
    if command.contains(NO_DEPFILE_TOOL) {
        return Ok(None);
    }
    let Some(depfile) = candidate(command)? else {
        return Ok(None);
    };

    // Post-processing steps may rename `foo.d` to `foo.P`.
    let renamed = format!("{}.P", strip_ext(&depfile));
    if command.contains(&renamed) {
        return Ok(Some(renamed));
    }

    // Assembly skips the preprocessor, which ignores -MF.
    let base = Utf8Path::new(&depfile).file_name().unwrap_or(depfile.as_str());
    let asm_source = format!("/{}.s", strip_ext(base));
    if command.contains(&asm_source) {
        return Ok(None);
    }

    Ok(Some(depfile))
}

fn candidate(command: &str) -> Result<Option<String>, GenError> {
    let padded = format!("{command} ");
    if !padded.contains(" -MD ") && !padded.contains(" -MMD ") {
        return Ok(None);
    }
    if let Some(mf) = flag_value(command, " -MF ")? {
        return Ok(Some(mf.to_owned()));
    }
    match flag_value(command, " -o ")? {
        Some(out) => Ok(Some(format!("{}.d", strip_ext(out)))),
        None => Err(GenError::DepfileNotFound {
            command: command.to_owned(),
        }),
    }
}

/// Return the token following the only occurrence of `flag`.
fn flag_value<'a>(command: &'a str, flag: &str) -> Result<Option<&'a str>, GenError> {
    let Some((_, after)) = command.split_once(flag) else {
        return Ok(None);
    };
    let rest = after.trim_start_matches(is_shell_space);
    if rest.contains(flag) {
        return Err(GenError::MultipleDepfileCandidates {
            command: command.to_owned(),
        });
    }
    let token = rest
        .split([' ', '\t', '\n'])
        .next()
        .unwrap_or_default();
    Ok(Some(token))
}

/// Drop the extension of the final path component, keeping the directory.
fn strip_ext(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |idx| idx + 1);
    path.get(name_start..)
        .and_then(|name| name.rfind('.'))
        .and_then(|dot| path.get(..name_start + dot))
        .unwrap_or(path)
}
