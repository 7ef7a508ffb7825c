//! Writers for differential expression analysis exports: one TSV per
//! result set plus a gzipped archive directory for a whole analysis.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::{DateTime, Local};
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::data_types::{DiffExprAnalysis, DiffExprResultSet};
use crate::bio::util::{format_opt_f64, pipe_join};

pub fn write_result_set(out: &mut dyn Write, result_set: &DiffExprResultSet)
    -> Result<(), io::Error>
{
    let mut writer = BufWriter::new(out);

    let mut header = String::from("Element\tGeneSymbols\tPValue\tQValue\tRank");
    for contrast_name in &result_set.contrast_names {
        header.push_str(&format!("\tFoldChange_{}", contrast_name));
        header.push_str(&format!("\tTstat_{}", contrast_name));
        header.push_str(&format!("\tPValue_{}", contrast_name));
    }
    writeln!(writer, "{}", header)?;

    for result in &result_set.results {
        let mut line = format!("{}\t{}\t{}\t{}\t{}",
                               result.probe_name,
                               pipe_join(result.gene_symbols.iter()),
                               format_opt_f64(result.pvalue),
                               format_opt_f64(result.corrected_pvalue),
                               format_opt_f64(result.rank));

        for idx in 0..result_set.contrast_names.len() {
            let contrast = result.contrasts.get(idx).cloned().unwrap_or_default();
            line.push('\t');
            line.push_str(&format_opt_f64(contrast.log2_fold_change));
            line.push('\t');
            line.push_str(&format_opt_f64(contrast.t_stat));
            line.push('\t');
            line.push_str(&format_opt_f64(contrast.pvalue));
        }

        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;

    Ok(())
}

fn write_analysis_readme(out: &mut dyn Write, analysis: &DiffExprAnalysis)
    -> Result<(), io::Error>
{
    let local: DateTime<Local> = Local::now();
    let date = local.format("%F").to_string();

    writeln!(out, "Differential expression analysis for {}",
             analysis.experiment_short_name)?;
    writeln!(out, "Generated: {}", date)?;
    writeln!(out)?;
    writeln!(out, "Result sets:")?;

    for result_set in &analysis.result_sets {
        writeln!(out, "  resultset_{}.data.txt.gz - factor: {} ({} probes)",
                 result_set.id, result_set.factor_name,
                 result_set.results.len())?;
    }

    Ok(())
}

/// Write the archive directory for one analysis: a plain-text README plus
/// one gzipped TSV per result set.  Returns the paths written.
pub fn write_analysis_archive(output_dir: &Path, analysis: &DiffExprAnalysis)
    -> anyhow::Result<Vec<PathBuf>>
{
    let archive_dir =
        output_dir.join(format!("{}.diff_expr", analysis.experiment_short_name));
    fs::create_dir_all(&archive_dir)?;

    let mut written = vec![];

    let readme_path = archive_dir.join("README.txt");
    let mut readme_file = File::create(&readme_path)?;
    write_analysis_readme(&mut readme_file, analysis)?;
    written.push(readme_path);

    for result_set in &analysis.result_sets {
        let data_path =
            archive_dir.join(format!("resultset_{}.data.txt.gz", result_set.id));
        let file = File::create(&data_path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_result_set(&mut encoder, result_set)?;
        encoder.finish()?;
        written.push(data_path);
    }

    Ok(written)
}
