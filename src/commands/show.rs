//! Print a single post's page props

use anyhow::Result;
use std::io::{self, Write};

use crate::Quill;

/// Render one post and print it as JSON
pub fn run(quill: &Quill, id: &str) -> Result<()> {
    let stdout = io::stdout();
    write(quill, id, &mut stdout.lock())
}

fn write(quill: &Quill, id: &str, out: &mut impl Write) -> Result<()> {
    let post = quill.query().get_one(id)?;
    serde_json::to_writer_pretty(&mut *out, &post)?;
    writeln!(out)?;
    Ok(())
}
