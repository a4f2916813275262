use crate::srt::Subtitle;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// Writes records back out in their input order, one blank-line-separated
/// block per record.
pub fn serialise<W: Write>(subs: Vec<Subtitle>, output: W) -> Result<()> {
    let mut writer = BufWriter::new(output);
    for sub in &subs {
        write_sub(&mut writer, sub).context("Failed to write to output.")?;
    }
    writer.flush().context("Failed to write to output.")?;
    Ok(())
}

fn write_sub<W: Write>(buf: &mut W, sub: &Subtitle) -> Result<()> {
    writeln!(buf, "{}", sub.id)?;
    writeln!(buf, "{} --> {}", sub.show_at, sub.hide_at)?;
    for line in &sub.text {
        writeln!(buf, "{}", line)?;
    }
    writeln!(buf)?;
    Ok(())
}
