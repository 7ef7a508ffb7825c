use std::io::{self, BufWriter, Write};

use crate::coexpression::CoexpressionSummary;

/// One row per coexpressed gene that passed the stringency filter.
pub fn write_coexpression_summary(out: &mut dyn Write,
                                  summary: &CoexpressionSummary)
    -> Result<(), io::Error>
{
    let mut writer = BufWriter::new(out);

    writeln!(writer, "# Coexpression for query gene: {}",
             summary.query_gene_uniquename)?;
    writeln!(writer, "# Stringency: {}", summary.stringency)?;
    writeln!(writer, "# Experiments tested: {}",
             summary.experiments_tested.len())?;
    writeln!(writer,
             "QueryGene\tFoundGene\tPositiveSupport\tNegativeSupport\tSpecific")?;

    for coexpressed in &summary.coexpressed_genes {
        let specific = if coexpressed.only_nonspecific_support { "N" } else { "Y" };
        writeln!(writer, "{}\t{}\t{}\t{}\t{}",
                 summary.query_gene_uniquename,
                 coexpressed.gene_uniquename,
                 coexpressed.positive_support(),
                 coexpressed.negative_support(),
                 specific)?;
    }

    writer.flush()?;

    Ok(())
}
