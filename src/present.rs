// Copyright (C) 2026 by GiGa infosystems

//! Render a [`SnapshotDiff`] (or a whole [`Snapshot`]) as text for the terminal
//!
//! All styling goes through a [`Painter`], so the layout can be tested with [`Plain`] while the
//! binary uses [`Colored`].

use crate::Category;
use crate::diff::{DiffEntry, SnapshotDiff, Status, UpdateKind};
use crate::snapshot::Snapshot;
use colored::Colorize;
use std::fmt::Write;

/// Added to the longest displayed package name so versions don't touch the names
pub const NAME_MARGIN: usize = 2;
/// The width used if no package names are displayed
pub const MIN_WIDTH: usize = 12;

/// Printed instead of any sections if nothing was installed, updated or removed
pub const NOTHING_CHANGED: &str = "No dependencies changed.";

/// Styles pieces of the rendered output
///
/// Padding is applied before painting, so implementations may wrap the text in escape codes.
pub trait Painter {
    fn heading(&self, status: Status, text: &str) -> String;
    fn label(&self, category: Category, text: &str) -> String;
    fn name(&self, text: &str) -> String;
    /// The version a package has after the install (or had, for removed packages)
    fn version(&self, status: Status, update: Option<UpdateKind>, text: &str) -> String;
    /// The old version of an updated package
    fn previous_version(&self, text: &str) -> String;
    fn notice(&self, text: &str) -> String;
}

/// No styling at all
pub struct Plain;

impl Painter for Plain {
    fn heading(&self, _: Status, text: &str) -> String {
        text.to_owned()
    }

    fn label(&self, _: Category, text: &str) -> String {
        text.to_owned()
    }

    fn name(&self, text: &str) -> String {
        text.to_owned()
    }

    fn version(&self, _: Status, _: Option<UpdateKind>, text: &str) -> String {
        text.to_owned()
    }

    fn previous_version(&self, text: &str) -> String {
        text.to_owned()
    }

    fn notice(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// ANSI colors using [`colored`]
pub struct Colored;

impl Painter for Colored {
    fn heading(&self, status: Status, text: &str) -> String {
        let styled = match status {
            Status::Installed => text.green().bold(),
            Status::Updated => text.yellow().bold(),
            Status::Removed => text.red().bold(),
            Status::Unchanged => text.bold(),
        };
        styled.to_string()
    }

    fn label(&self, category: Category, text: &str) -> String {
        let styled = match category {
            Category::Dependencies => text.cyan(),
            Category::DevDependencies => text.bright_black(),
        };
        styled.to_string()
    }

    fn name(&self, text: &str) -> String {
        text.bold().to_string()
    }

    fn version(&self, status: Status, update: Option<UpdateKind>, text: &str) -> String {
        let styled = match (status, update) {
            (Status::Installed, _) => text.green(),
            (Status::Removed, _) => text.red().strikethrough(),
            (_, Some(UpdateKind::Major | UpdateKind::Downgrade)) => text.red(),
            (_, Some(UpdateKind::Minor)) => text.yellow(),
            (_, Some(UpdateKind::Patch)) => text.green(),
            (_, Some(UpdateKind::Prerelease)) => text.magenta(),
            _ => text.normal(),
        };
        styled.to_string()
    }

    fn previous_version(&self, text: &str) -> String {
        text.bright_black().to_string()
    }

    fn notice(&self, text: &str) -> String {
        text.bright_black().to_string()
    }
}

fn heading(status: Status) -> &'static str {
    match status {
        Status::Installed => "Installed:",
        Status::Updated => "Updated:",
        Status::Removed => "Removed:",
        Status::Unchanged => "Unchanged:",
    }
}

fn width_for<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names
        .map(|name| name.chars().count() + NAME_MARGIN)
        .max()
        .unwrap_or(MIN_WIDTH)
}

/// The column width for package names: the longest displayed name plus [`NAME_MARGIN`], or
/// [`MIN_WIDTH`] if nothing is displayed
pub fn render_width(diff: &SnapshotDiff<'_>) -> usize {
    width_for(
        diff.iter()
            .filter(|(_, entry)| entry.status.is_displayed())
            .map(|(_, entry)| entry.name),
    )
}

fn versions(entry: &DiffEntry<'_>, painter: &impl Painter) -> String {
    let update = entry.update_kind();
    match (entry.before, entry.after) {
        (Some(before), Some(after)) if entry.status == Status::Updated => format!(
            "{} -> {}",
            painter.previous_version(before),
            painter.version(entry.status, update, after),
        ),
        (_, Some(version)) | (Some(version), None) => {
            painter.version(entry.status, update, version)
        }
        (None, None) => String::new(),
    }
}

fn line(
    out: &mut String,
    painter: &impl Painter,
    category: Category,
    name: &str,
    width: usize,
    versions: &str,
) {
    writeln!(
        out,
        "  {} {}{}",
        painter.label(category, category.label()),
        painter.name(&format!("{name:<width$}")),
        versions,
    )
    .expect("Writing to a `String` can't fail");
}

/// Render the installed, updated & removed packages in that order, one section each
///
/// Unchanged packages are never shown. If nothing else is left, this is only [`NOTHING_CHANGED`].
pub fn render(diff: &SnapshotDiff<'_>, painter: &impl Painter) -> String {
    if !diff.has_changes() {
        return format!("{}\n", painter.notice(NOTHING_CHANGED));
    }

    let width = render_width(diff);
    let mut out = String::new();

    for status in Status::DISPLAYED {
        let mut entries = diff.with_status(status).peekable();
        if entries.peek().is_none() {
            continue;
        }

        out.push_str(&painter.heading(status, heading(status)));
        out.push('\n');

        for (category, entry) in entries {
            line(
                &mut out,
                painter,
                category,
                entry.name,
                width,
                &versions(entry, painter),
            );
        }
    }

    out
}

fn all_packages(snapshot: &Snapshot) -> impl Iterator<Item = (Category, &str, &str)> {
    Category::ALL.into_iter().flat_map(move |category| {
        snapshot
            .packages(category)
            .iter()
            .map(move |(name, version)| (category, name.as_str(), version.as_str()))
    })
}

/// Render every package of a [`Snapshot`], for the full before/after listings
pub fn render_listing(title: &str, snapshot: &Snapshot, painter: &impl Painter) -> String {
    let mut out = format!("{}\n", painter.heading(Status::Unchanged, title));

    if snapshot.is_empty() {
        out.push_str(&format!("  {}\n", painter.notice("(no dependencies)")));
        return out;
    }

    let width = width_for(all_packages(snapshot).map(|(_, name, _)| name));
    for (category, name, version) in all_packages(snapshot) {
        let version = painter.version(Status::Unchanged, None, version);
        line(&mut out, painter, category, name, width, &version);
    }

    out
}
