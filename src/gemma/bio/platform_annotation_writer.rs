//! Writer for the per-platform annotation files consumed downstream
//! (ermineJ-style layout): one row per probe with the genes it maps to
//! and their GO terms.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::{DateTime, Local};
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::constants::ANNOTATION_FILE_SUFFIX;
use crate::data_types::{GeneDetails, PlatformDetails, ProbeNameDetailsMap,
                        UniquenameGeneMap};
use crate::bio::util::{pipe_join, sanitize_field};

fn gene_column_values(genes: &[&GeneDetails]) -> (String, String, String, String) {
    let symbols = pipe_join(genes.iter().map(|gene| &gene.symbol));

    let names =
        itertools::join(genes.iter()
                        .map(|gene| {
                            gene.name.as_ref()
                                .map(|name| sanitize_field(name))
                                .unwrap_or_default()
                        }),
                        "|");

    let mut go_termids: Vec<_> =
        genes.iter()
            .flat_map(|gene| gene.go_termids.iter())
            .collect();
    go_termids.sort();
    go_termids.dedup();
    let go_terms = pipe_join(go_termids.into_iter());

    let ncbi_ids =
        itertools::join(genes.iter()
                        .map(|gene| {
                            gene.ncbi_gene_id
                                .map(|id| id.to_string())
                                .unwrap_or_default()
                        }),
                        "|");

    (symbols, names, go_terms, ncbi_ids)
}

pub fn write_platform_annotations(out: &mut dyn Write,
                                  database_name: &str,
                                  platform: &PlatformDetails,
                                  probes: &ProbeNameDetailsMap,
                                  genes: &UniquenameGeneMap)
    -> Result<(), io::Error>
{
    let mut writer = BufWriter::new(out);

    let local: DateTime<Local> = Local::now();
    let date = local.format("%F").to_string();

    writeln!(writer, "# Annotation file generated by {}", database_name)?;
    writeln!(writer, "# Platform: {} - {}", platform.short_name,
             sanitize_field(&platform.name))?;
    writeln!(writer, "# Generated: {}", date)?;
    writeln!(writer, "ProbeName\tGeneSymbols\tGeneNames\tGOTerms\tNCBIids")?;

    for probe_name in &platform.probe_names {
        let Some(probe_details) = probes.get(probe_name)
        else {
            eprintln!("no details for probe {} of platform {}",
                      probe_name, platform.short_name);
            continue;
        };

        let probe_genes: Vec<&GeneDetails> =
            probe_details.gene_uniquenames.iter()
                .filter_map(|uniquename| genes.get(uniquename))
                .collect();

        let (symbols, names, go_terms, ncbi_ids) = gene_column_values(&probe_genes);

        writeln!(writer, "{}\t{}\t{}\t{}\t{}",
                 probe_name, symbols, names, go_terms, ncbi_ids)?;
    }

    writer.flush()?;

    Ok(())
}

/// Write the gzipped annotation file for one platform into `output_dir`,
/// returning the path of the file written.
pub fn write_platform_annotation_file(output_dir: &Path,
                                      database_name: &str,
                                      platform: &PlatformDetails,
                                      probes: &ProbeNameDetailsMap,
                                      genes: &UniquenameGeneMap)
    -> anyhow::Result<PathBuf>
{
    let file_name = format!("{}{}", platform.short_name, ANNOTATION_FILE_SUFFIX);
    let file_path = output_dir.join(file_name);

    let file = File::create(&file_path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());

    write_platform_annotations(&mut encoder, database_name, platform,
                               probes, genes)?;

    encoder.finish()?;

    Ok(file_path)
}
