// Copyright (C) 2026 by GiGa infosystems

//! See the documentation of [`cmd!`], a utility macro for running commands (in this case `npm`).

/// Run an external process
///
/// # Usage
/// Example: `cmd!([(program) install] with (&args) -> ExitStatus in Some(dir))`, where the
/// segments in brackets (`(program)` and `install`) can be either identifiers, which get
/// stringified, literals or expressions in parentheses. They are also used in error reporting
/// ("Failed to run `npm install`").
///
/// `with (expr)` appends every item of an iterable of `impl AsRef<OsStr>` after the fixed
/// arguments, and may be omitted.
///
/// The output is either the [`std::process::ExitStatus`] by adding `-> ExitStatus`, in which
/// case the process's stdout is forwarded to our stderr and a non-zero status is not an error,
/// or the stdout output excluding a single trailing newline by adding `-> String`, in which case
/// a non-zero status is an error.
///
/// It may also be run in another working directory using `in path` (after the return specifier
/// as explained above), where `path` is an expression of the type `Option<impl AsRef<Path>>`, or
/// a reference to such a type.
macro_rules! cmd {
    (@arg $ident:ident) => { stringify!($ident) };
    (@arg $literal:literal) => { $literal };
    (@arg ($expr:expr)) => { $expr };
    (@stdout -> String) => { std::process::Stdio::piped() };
    (@stdout -> ExitStatus) => { std::io::stderr() };
    (@success $out:ident -> String) => { $out.status.success() };
    (@success $out:ident -> ExitStatus) => { true };
    (@out $out:ident -> ExitStatus) => { $out.status };
    (@out $out:ident -> String) => {{
        let mut out = $out.stdout;

        if out.last() == Some(&b'\n') {
            out.pop();
        }

        String::from_utf8(out)?
    }};
    ([$cmd0:tt $($cmd_args:tt)*] $(with ($extra:expr))? -> $ret:tt $(in $path:expr)?) => {{
        let cmd0 = $crate::cmd::cmd!(@arg $cmd0);
        let cmd_args: [&str;_] = [$($crate::cmd::cmd!(@arg $cmd_args)),*];
        let mut cmd = std::process::Command::new(cmd0);
        cmd.args(&cmd_args)
            $(.args($extra))?;

        $(
            if let Some(path) = $path {
                cmd.current_dir(path);
            }
        )?

        cmd.stdout($crate::cmd::cmd!(@stdout -> $ret));

        tracing::debug!(command = ?cmd, "running");

        let output = color_eyre::eyre::WrapErr::wrap_err_with(cmd.spawn(), || {
            format!("Failed to start `{} {}`", cmd0, cmd_args.join(" "))
        })?
        .wait_with_output()?;

        tracing::debug!(status = %output.status, "`{}` finished", cmd0);

        if !$crate::cmd::cmd!(@success output -> $ret) {
            color_eyre::eyre::bail!(
                "Failed to run `{} {}`, returned status code {}",
                cmd0,
                cmd_args.join(" "),
                output.status,
            );
        }

        <color_eyre::Result<_>>::Ok($crate::cmd::cmd!(@out output -> $ret))
    }};
}

pub(crate) use cmd;
