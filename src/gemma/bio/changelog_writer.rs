use std::io::{self, BufWriter, Write};

use crate::data_types::ChangelogEntry;

/// Markdown changelog for one experiment.  The entries are expected
/// newest-first (the audit query orders them); entries sharing a date are
/// grouped under one heading.
pub fn write_changelog(out: &mut dyn Write,
                       experiment_short_name: &str,
                       entries: &[ChangelogEntry])
    -> Result<(), io::Error>
{
    let mut writer = BufWriter::new(out);

    writeln!(writer, "# Changelog for {}", experiment_short_name)?;

    let mut current_date = None;

    for entry in entries {
        if current_date != Some(&entry.date) {
            writeln!(writer)?;
            writeln!(writer, "## {}", entry.date)?;
            writeln!(writer)?;
            current_date = Some(&entry.date);
        }
        writeln!(writer, "- {}", entry.message)?;
    }

    writer.flush()?;

    Ok(())
}
