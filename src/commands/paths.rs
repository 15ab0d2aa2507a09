//! Print static route params

use anyhow::Result;
use std::io::{self, Write};

use crate::{Quill, RouteKind};

/// Print the route params for one listing type as JSON
pub fn run(quill: &Quill, kind: RouteKind) -> Result<()> {
    let stdout = io::stdout();
    write(quill, kind, &mut stdout.lock())
}

fn write(quill: &Quill, kind: RouteKind, out: &mut impl Write) -> Result<()> {
    let paths = quill.query().static_paths(kind)?;
    serde_json::to_writer_pretty(&mut *out, &paths)?;
    writeln!(out)?;
    Ok(())
}
