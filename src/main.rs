// Copyright (C) 2026 by GiGa infosystems

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::{
    Result,
    eyre::{Report, bail},
};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use npm_installdiff::diff::{SnapshotDiff, Status};
use npm_installdiff::present::{Colored, Painter, Plain, render, render_listing};
use npm_installdiff::snapshot::Snapshot;
use npm_installdiff::util::{LOCKFILE_NAME, failure_code, install, install_dir, program_version};

/// Arguments starting with this belong to this program, everything else is passed to the install
const RESERVED_PREFIX: &str = "--diff-";

/// The options of this program that take a value, which may be given as a separate argument
const OPTIONS_WITH_VALUES: [&str; 3] = ["--diff-lockfile", "--diff-npm", "--diff-color"];

/// Split the command line (without the program name) into the arguments of this program and the
/// arguments passed through to the install command
///
/// Everything from a `--` on is passed through.
fn split_args(args: impl IntoIterator<Item = OsString>) -> (Vec<OsString>, Vec<OsString>) {
    let mut own = Vec::new();
    let mut pass_through = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            pass_through.push(arg);
            continue;
        };

        if text == "--" {
            pass_through.push(arg);
            pass_through.extend(args.by_ref());
            break;
        }

        if !text.starts_with(RESERVED_PREFIX) {
            pass_through.push(arg);
            continue;
        }

        let takes_value = OPTIONS_WITH_VALUES.contains(&text);
        own.push(arg);
        if takes_value && let Some(value) = args.next() {
            own.push(value);
        }
    }

    (own, pass_through)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum ColorChoice {
    /// Only if stdout is a terminal and `NO_COLOR` isn't set
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => {
                io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// This program runs `npm install` with the given arguments, and reports which top-level
/// dependencies in `package-lock.json` were installed, updated or removed by it.
///
/// All arguments not starting with `--diff-` are passed to `npm install`, so `--help` is the help
/// of `npm install`, and the help of this program is `--diff-help`.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Also list all top-level dependencies before & after the install
    #[arg(long = "diff-list", conflicts_with("json"))]
    list: bool,
    /// Print the diff as JSON, including unchanged dependencies
    #[arg(long = "diff-json")]
    json: bool,
    /// The path to the lockfile to diff
    ///
    /// The install runs in the directory containing it. Defaults to `package-lock.json` in the
    /// current directory.
    #[arg(long = "diff-lockfile", value_name = "PATH")]
    lockfile: Option<PathBuf>,
    /// The program to run `install` with
    #[arg(
        long = "diff-npm",
        value_name = "PROGRAM",
        env = "NPM_INSTALLDIFF_NPM",
        default_value = "npm"
    )]
    npm: String,
    /// When to color the output
    #[arg(long = "diff-color", value_name = "WHEN", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
    /// Log more about what's happening (repeat for more detail)
    ///
    /// `RUST_LOG` takes precedence if it is set.
    #[arg(long = "diff-verbose", action = ArgAction::Count)]
    verbose: u8,
    /// Print help
    #[arg(long = "diff-help", action = ArgAction::Help)]
    help: Option<bool>,
    /// Print version
    #[arg(long = "diff-version", action = ArgAction::Version)]
    version: Option<bool>,
    /// The arguments for the install, split off before parsing
    #[arg(skip)]
    install_args: Vec<OsString>,
}

impl Args {
    fn parse_command_line(args: impl IntoIterator<Item = OsString>) -> Self {
        let mut args = args.into_iter();
        let bin = args
            .next()
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").into());

        let (own, install_args) = split_args(args);
        let mut parsed = Args::parse_from(std::iter::once(bin).chain(own));
        parsed.install_args = install_args;
        parsed
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,npm_installdiff={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn output_json(value: &impl Serialize) -> Result<()> {
    if io::stdout().is_terminal() {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }

    Ok(())
}

struct AppContext {
    lockfile: PathBuf,
    install_dir: Option<PathBuf>,
    npm: String,
    install_args: Vec<OsString>,
    list: bool,
    json: bool,
    colored: bool,
}

impl TryFrom<Args> for AppContext {
    type Error = Report;

    fn try_from(args: Args) -> Result<Self> {
        let lockfile = match args.lockfile {
            Some(path) => path,
            None => std::env::current_dir()?.join(LOCKFILE_NAME),
        };

        if lockfile.is_dir() {
            bail!("The lockfile path {lockfile:?} is a directory");
        }

        let install_dir = install_dir(&lockfile).map(Path::to_owned);
        if let Some(ref dir) = install_dir
            && !dir.is_dir()
        {
            bail!("The directory of the lockfile {dir:?} doesn't exist");
        }

        Ok(AppContext {
            lockfile,
            install_dir,
            npm: args.npm,
            install_args: args.install_args,
            list: args.list,
            json: args.json,
            colored: args.color.enabled(),
        })
    }
}

impl AppContext {
    fn command_line(&self) -> String {
        let args = self
            .install_args
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>();
        if args.is_empty() {
            format!("{} install", self.npm)
        } else {
            format!("{} install {}", self.npm, args.join(" "))
        }
    }

    fn log_program_version(&self) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }

        match program_version(&self.npm, self.install_dir.as_deref()) {
            Ok(version) => tracing::debug!(program = %self.npm, %version, "found install program"),
            Err(err) => tracing::debug!(program = %self.npm, "no version: {err}"),
        }
    }

    fn report_failure(&self, status: std::process::ExitStatus) {
        eprintln!(
            "{} `{}` failed with {status}",
            "error:".red().bold(),
            self.command_line()
        );
    }

    fn print(&self, painter: &impl Painter, before: &Snapshot, after: &Snapshot) -> Result<()> {
        let diff = SnapshotDiff::between(before, after);

        tracing::info!(
            installed = diff.count(Status::Installed),
            updated = diff.count(Status::Updated),
            removed = diff.count(Status::Removed),
            unchanged = diff.count(Status::Unchanged),
            "diffed lockfiles",
        );

        if self.json {
            return output_json(&diff);
        }

        if self.list {
            println!("{}", render_listing("Before:", before, painter));
            println!("{}", render_listing("After:", after, painter));
        }

        print!("{}", render(&diff, painter));
        Ok(())
    }

    fn run(&self) -> Result<ExitCode> {
        tracing::info!(lockfile = ?self.lockfile, "reading lockfile before the install");
        let before = Snapshot::read(&self.lockfile)?;

        self.log_program_version();
        tracing::info!(command = %self.command_line(), dir = ?self.install_dir, "installing");

        let status = install(&self.npm, &self.install_args, self.install_dir.as_deref())?;
        if !status.success() {
            self.report_failure(status);
            return Ok(failure_code(status));
        }

        let after = Snapshot::read(&self.lockfile)?;

        if self.colored {
            self.print(&Colored, &before, &after)?;
        } else {
            self.print(&Plain, &before, &after)?;
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse_command_line(std::env::args_os());
    init_logging(args.verbose);

    let ctx = AppContext::try_from(args)?;
    colored::control::set_override(ctx.colored);
    ctx.run()
}
