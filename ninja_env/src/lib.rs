#![forbid(unsafe_code)]

//! Shared environment constants used across mkninja crates (library, tests, and
//! helpers).

/// Environment variable naming the compile-acceleration tool directory.
///
/// An unset or empty value disables acceleration.
///
/// # Examples
///
/// ```
/// use ninja_env::ACCEL_DIR_ENV;
/// assert_eq!(ACCEL_DIR_ENV, "MKNINJA_ACCEL_DIR");
/// ```
pub const ACCEL_DIR_ENV: &str = "MKNINJA_ACCEL_DIR";

/// File name of the generated Ninja build description.
pub const BUILD_FILE: &str = "build.ninja";

/// File name of the generated launcher script.
pub const LAUNCHER_FILE: &str = "ninja.sh";

/// Program the launcher script hands control to.
pub const NINJA_PROGRAM: &str = "ninja";
