//! Launcher script generation.
//!
//! The launcher recreates the environment the recipes were evaluated in and
//! then `exec`s Ninja. Exported variables are written with their evaluated
//! value; variables marked as unexported are explicitly `unset` so values
//! from the generating process do not leak into the build.

use ninja_env::NINJA_PROGRAM;

use crate::config::GenConfig;
use crate::eval::Evaluator;
use crate::graph::Exports;

/// Interpreter used when `SHELL` is unset or empty.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Render the launcher script.
///
/// # Examples
///
/// ```
/// use mkninja::config::GenConfig;
/// use mkninja::eval::VarEvaluator;
/// use mkninja::graph::{Exports, Vars};
/// use mkninja::launcher::render;
///
/// let mut vars = Vars::new();
/// vars.insert("OUT".into(), "out".into());
/// let mut exports = Exports::new();
/// exports.insert("OUT".into(), true);
/// let script = render(&VarEvaluator::new(&vars), &exports, &GenConfig::default());
/// assert_eq!(script, "#!/bin/sh\nexport OUT=out\nexec ninja\n");
/// ```
#[must_use]
pub fn render(evaluator: &dyn Evaluator, exports: &Exports, config: &GenConfig) -> String {
    let shell = evaluator.evaluate("SHELL");
    let interpreter = if shell.is_empty() {
        DEFAULT_SHELL
    } else {
        shell.as_str()
    };

    let mut script = format!("#!{interpreter}\n");
    for (name, &export) in exports {
        if export {
            script.push_str(&format!("export {name}={}\n", evaluator.evaluate(name)));
        } else {
            script.push_str(&format!("unset {name}\n"));
        }
    }
    if config.accelerated() {
        script.push_str(&format!("exec {NINJA_PROGRAM} -j{}\n", config.accel_jobs));
    } else {
        script.push_str(&format!("exec {NINJA_PROGRAM}\n"));
    }
    script
}
