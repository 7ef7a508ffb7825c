//! Post-processing for the legacy gene-coexpression query.
//!
//! `db::warehouse_queries::get_coexpression_links()` returns one flat row
//! per probe-level link; this module aggregates those rows into one
//! summary per coexpressed gene, applying the stringency filter and
//! flagging support that comes only from probes mapping to more than one
//! gene.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::cmp::Ordering;

use tracing::warn;

use crate::db::warehouse_queries::CoexpressionLinkRow;
use crate::types::*;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CoexpressedGene {
    pub gene_uniquename: GeneUniquename,
    pub positive_support_experiments: BTreeSet<ExperimentId>,
    pub negative_support_experiments: BTreeSet<ExperimentId>,
    pub supporting_probes: BTreeSet<ProbeName>,
    // true when every supporting probe also maps to some other gene
    pub only_nonspecific_support: bool,
}

impl CoexpressedGene {
    pub fn positive_support(&self) -> usize {
        self.positive_support_experiments.len()
    }

    pub fn negative_support(&self) -> usize {
        self.negative_support_experiments.len()
    }

    pub fn max_support(&self) -> usize {
        self.positive_support().max(self.negative_support())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CoexpressionSummary {
    pub query_gene_uniquename: GeneUniquename,
    pub stringency: usize,
    pub experiments_tested: BTreeSet<ExperimentId>,
    // sorted by descending support, then by gene uniquename
    pub coexpressed_genes: Vec<CoexpressedGene>,
    pub positive_link_count: usize,
    pub negative_link_count: usize,
    pub genes_below_stringency: usize,
    pub skipped_self_links: usize,
    pub skipped_nan_scores: usize,
    pub skipped_zero_scores: usize,
}

/// Aggregate raw link rows into per-gene support counts and apply the
/// stringency filter.  A gene is kept when either its positive or its
/// negative support reaches the stringency.
pub fn aggregate_links(query_gene_uniquename: &GeneUniquename,
                       links: &[CoexpressionLinkRow],
                       experiments_tested: &BTreeSet<ExperimentId>,
                       stringency: usize)
    -> CoexpressionSummary
{
    let mut skipped_self_links = 0;
    let mut skipped_nan_scores = 0;
    let mut skipped_zero_scores = 0;

    // first pass: which found genes each found-side probe maps to, so that
    // non-specific probes can be recognised
    let mut probe_found_genes: HashMap<ProbeName, HashSet<GeneUniquename>> =
        HashMap::new();

    for link in links {
        probe_found_genes
            .entry(link.found_probe_name.clone())
            .or_default()
            .insert(link.found_gene_uniquename.clone());
    }

    let mut by_gene: HashMap<GeneUniquename, CoexpressedGene> = HashMap::new();
    let mut specific_support: HashMap<GeneUniquename, bool> = HashMap::new();

    for link in links {
        if link.found_gene_uniquename == *query_gene_uniquename {
            skipped_self_links += 1;
            continue;
        }

        if link.score.is_nan() {
            warn!("NaN coexpression score for {} / {} in experiment {}",
                  query_gene_uniquename, link.found_gene_uniquename,
                  link.experiment_id);
            skipped_nan_scores += 1;
            continue;
        }

        // a zero correlation carries no sign, it supports neither direction
        if link.score == 0.0 {
            skipped_zero_scores += 1;
            continue;
        }

        let entry = by_gene.entry(link.found_gene_uniquename.clone())
            .or_insert_with(|| CoexpressedGene {
                gene_uniquename: link.found_gene_uniquename.clone(),
                positive_support_experiments: BTreeSet::new(),
                negative_support_experiments: BTreeSet::new(),
                supporting_probes: BTreeSet::new(),
                only_nonspecific_support: true,
            });

        if link.score > 0.0 {
            entry.positive_support_experiments.insert(link.experiment_id);
        } else {
            entry.negative_support_experiments.insert(link.experiment_id);
        }

        entry.supporting_probes.insert(link.found_probe_name.clone());

        let probe_is_specific =
            probe_found_genes[&link.found_probe_name].len() <= 1;
        if probe_is_specific {
            specific_support.insert(link.found_gene_uniquename.clone(), true);
        }
    }

    for (gene_uniquename, coexpressed) in by_gene.iter_mut() {
        if specific_support.get(gene_uniquename).copied().unwrap_or(false) {
            coexpressed.only_nonspecific_support = false;
        }
    }

    let total_genes = by_gene.len();

    let mut coexpressed_genes: Vec<CoexpressedGene> =
        by_gene.into_values()
            .filter(|coexpressed| coexpressed.max_support() >= stringency)
            .collect();

    coexpressed_genes.sort_by(|a, b| {
        match b.max_support().cmp(&a.max_support()) {
            Ordering::Equal => a.gene_uniquename.cmp(&b.gene_uniquename),
            other => other,
        }
    });

    let positive_link_count =
        coexpressed_genes.iter()
            .filter(|coexpressed| coexpressed.positive_support() >= stringency)
            .count();
    let negative_link_count =
        coexpressed_genes.iter()
            .filter(|coexpressed| coexpressed.negative_support() >= stringency)
            .count();

    CoexpressionSummary {
        query_gene_uniquename: query_gene_uniquename.clone(),
        stringency,
        experiments_tested: experiments_tested.clone(),
        genes_below_stringency: total_genes - coexpressed_genes.len(),
        coexpressed_genes,
        positive_link_count,
        negative_link_count,
        skipped_self_links,
        skipped_nan_scores,
        skipped_zero_scores,
    }
}
