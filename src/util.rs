// Copyright (C) 2026 by GiGa infosystems

//! Various utility functions associated with this crate

use crate::cmd::cmd;
use color_eyre::Result;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitCode, ExitStatus};

/// The name of the lockfile `npm` writes
pub const LOCKFILE_NAME: &str = "package-lock.json";

/// Run `<program> install <args>` in `dir` (or the current directory), with its output going
/// straight to the terminal, and return its exit status.
///
/// A non-zero exit status is not an error here, only failing to start the program is.
pub fn install<A: AsRef<OsStr>>(program: &str, args: &[A], dir: Option<&Path>) -> Result<ExitStatus> {
    cmd!([(program) install] with (args) -> ExitStatus in dir)
}

/// Return the output of `<program> --version`
pub fn program_version(program: &str, dir: Option<&Path>) -> Result<String> {
    cmd!([(program) "--version"] -> String in dir)
}

/// The directory the install has to run in for it to update `lockfile`
///
/// Returns `None` for a bare file name, which refers to the current directory.
pub fn install_dir(lockfile: &Path) -> Option<&Path> {
    lockfile
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

/// The exit code to end with after the install failed with `status`
///
/// Mirrors the install's exit code, or is `1` if it has none (e.g. if it was killed by a signal)
/// or it doesn't fit.
pub fn failure_code(status: ExitStatus) -> ExitCode {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .map_or(ExitCode::FAILURE, ExitCode::from)
}
