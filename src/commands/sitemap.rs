//! Print the sitemap

use anyhow::Result;
use std::io::{self, Write};

use crate::Quill;

pub fn run(quill: &Quill) -> Result<()> {
    let stdout = io::stdout();
    write(quill, &mut stdout.lock())
}

fn write(quill: &Quill, out: &mut impl Write) -> Result<()> {
    // One scan, so posts and categories come from the same snapshot
    let index = quill.query().index()?;
    let xml = quill
        .sitemap()
        .generate(&index.ids(), &index.category_labels());
    out.write_all(xml.as_bytes())?;
    Ok(())
}
