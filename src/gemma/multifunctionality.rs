//! Gene multifunctionality scoring, after Gillis & Pavlidis (2011).
//!
//! Each gene is scored by summing, over the GO groups it belongs to,
//! `1 / (in_group * out_group)` where `in_group` is the number of genes
//! annotated with the group and `out_group` is the rest of the annotated
//! genome.  The scores are then rank-transformed (ascending, ties
//! averaged) and divided by the number of genes, so the most
//! multifunctional gene of an organism gets a relative rank of 1.0.

use std::collections::{HashMap, HashSet};

use crate::data_types::Multifunctionality;
use crate::types::{GeneUniquename, TermId};

const MIN_GROUP_SIZE: usize = 2;

/// Compute multifunctionality for every gene that appears in at least one
/// GO group.  Groups smaller than two genes carry no signal and groups
/// containing the whole genome have a zero denominator; both are ignored
/// for scoring but still counted in `num_go_terms`.
pub fn compute_multifunctionality(go_groups: &HashMap<TermId, HashSet<GeneUniquename>>)
    -> HashMap<GeneUniquename, Multifunctionality>
{
    let mut all_genes: HashSet<&GeneUniquename> = HashSet::new();
    for members in go_groups.values() {
        all_genes.extend(members.iter());
    }

    let num_genes = all_genes.len();

    if num_genes == 0 {
        return HashMap::new();
    }

    let mut scores: HashMap<GeneUniquename, f64> = HashMap::new();
    let mut term_counts: HashMap<GeneUniquename, usize> = HashMap::new();

    for gene_uniquename in &all_genes {
        scores.insert((*gene_uniquename).clone(), 0.0);
        term_counts.insert((*gene_uniquename).clone(), 0);
    }

    for members in go_groups.values() {
        for gene_uniquename in members {
            *term_counts.get_mut(gene_uniquename).unwrap() += 1;
        }

        let in_group = members.len();
        let out_group = num_genes - in_group;

        if in_group < MIN_GROUP_SIZE || out_group == 0 {
            continue;
        }

        let contribution = 1.0 / (in_group as f64 * out_group as f64);

        for gene_uniquename in members {
            *scores.get_mut(gene_uniquename).unwrap() += contribution;
        }
    }

    let ranks = relative_ranks(&scores);

    scores.into_iter()
        .map(|(gene_uniquename, score)| {
            let rank = ranks[&gene_uniquename];
            let num_go_terms = term_counts[&gene_uniquename];
            (gene_uniquename,
             Multifunctionality {
                 score,
                 rank,
                 num_go_terms,
             })
        })
        .collect()
}

/// Ascending rank transform with averaged ties, normalized by the number
/// of values.  The largest score maps to 1.0.
fn relative_ranks(scores: &HashMap<GeneUniquename, f64>)
    -> HashMap<GeneUniquename, f64>
{
    let num_genes = scores.len();

    let mut sorted: Vec<(&GeneUniquename, f64)> =
        scores.iter().map(|(gene, score)| (gene, *score)).collect();
    sorted.sort_by(|(gene_a, score_a), (gene_b, score_b)| {
        score_a.partial_cmp(score_b)
            .expect("multifunctionality scores are never NaN")
            .then_with(|| gene_a.cmp(gene_b))
    });

    let mut ranks = HashMap::new();

    let mut idx = 0;
    while idx < sorted.len() {
        let mut tie_end = idx;
        while tie_end + 1 < sorted.len() && sorted[tie_end + 1].1 == sorted[idx].1 {
            tie_end += 1;
        }

        // 1-based positions idx+1 ..= tie_end+1 averaged
        let average_rank = (idx + tie_end + 2) as f64 / 2.0;
        let relative_rank = average_rank / num_genes as f64;

        for (gene_uniquename, _) in &sorted[idx..=tie_end] {
            ranks.insert((*gene_uniquename).clone(), relative_rank);
        }

        idx = tie_end + 1;
    }

    ranks
}

