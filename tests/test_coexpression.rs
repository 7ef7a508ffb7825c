extern crate gemma;

use std::collections::BTreeSet;

use flexstr::{shared_str, ToSharedStr};

use gemma::coexpression::aggregate_links;
use gemma::db::warehouse_queries::CoexpressionLinkRow;
use gemma::types::ExperimentId;

fn make_link(found_gene: &str, found_probe: &str, experiment_id: ExperimentId,
             score: f64) -> CoexpressionLinkRow {
    CoexpressionLinkRow {
        found_gene_uniquename: found_gene.to_shared_str(),
        query_probe_name: shared_str!("probe_q"),
        found_probe_name: found_probe.to_shared_str(),
        experiment_id,
        score,
    }
}

fn tested_experiments() -> BTreeSet<ExperimentId> {
    (1..=5).collect()
}

#[test]
fn test_stringency_filter() {
    let query_gene = shared_str!("gene_q");

    let links = vec![
        make_link("gene_a", "probe_a", 1, 0.8),
        make_link("gene_a", "probe_a", 2, 0.7),
        make_link("gene_b", "probe_b", 1, 0.5),
    ];

    let summary = aggregate_links(&query_gene, &links, &tested_experiments(), 2);

    assert_eq!(summary.coexpressed_genes.len(), 1);
    assert_eq!(summary.coexpressed_genes[0].gene_uniquename, "gene_a");
    assert_eq!(summary.coexpressed_genes[0].positive_support(), 2);
    assert_eq!(summary.coexpressed_genes[0].negative_support(), 0);
    assert_eq!(summary.genes_below_stringency, 1);
    assert_eq!(summary.positive_link_count, 1);
    assert_eq!(summary.negative_link_count, 0);
    assert_eq!(summary.experiments_tested.len(), 5);
}

#[test]
fn test_positive_and_negative_support() {
    let query_gene = shared_str!("gene_q");

    // the same gene supported positively and negatively in different
    // experiments - both counts kept separately, filter on the larger
    let links = vec![
        make_link("gene_a", "probe_a", 1, 0.9),
        make_link("gene_a", "probe_a", 2, -0.6),
        make_link("gene_a", "probe_a", 3, -0.7),
    ];

    let summary = aggregate_links(&query_gene, &links, &tested_experiments(), 2);

    assert_eq!(summary.coexpressed_genes.len(), 1);
    let coexpressed = &summary.coexpressed_genes[0];
    assert_eq!(coexpressed.positive_support(), 1);
    assert_eq!(coexpressed.negative_support(), 2);
    assert_eq!(coexpressed.max_support(), 2);
    assert_eq!(summary.positive_link_count, 0);
    assert_eq!(summary.negative_link_count, 1);
}

#[test]
fn test_duplicate_experiment_support() {
    let query_gene = shared_str!("gene_q");

    // two probe pairs in the same experiment count as one experiment of
    // support
    let links = vec![
        make_link("gene_a", "probe_a1", 1, 0.8),
        make_link("gene_a", "probe_a2", 1, 0.6),
    ];

    let summary = aggregate_links(&query_gene, &links, &tested_experiments(), 1);

    assert_eq!(summary.coexpressed_genes.len(), 1);
    assert_eq!(summary.coexpressed_genes[0].positive_support(), 1);
    assert_eq!(summary.coexpressed_genes[0].supporting_probes.len(), 2);
}

#[test]
fn test_self_links_and_unusable_scores_skipped() {
    let query_gene = shared_str!("gene_q");

    let links = vec![
        make_link("gene_q", "probe_q2", 1, 0.9),
        make_link("gene_a", "probe_a", 1, f64::NAN),
        make_link("gene_a", "probe_a", 2, 0.5),
        make_link("gene_a", "probe_a", 3, 0.0),
    ];

    let summary = aggregate_links(&query_gene, &links, &tested_experiments(), 1);

    assert_eq!(summary.skipped_self_links, 1);
    assert_eq!(summary.skipped_nan_scores, 1);
    // a zero score supports neither direction
    assert_eq!(summary.skipped_zero_scores, 1);
    assert_eq!(summary.coexpressed_genes.len(), 1);
    assert_eq!(summary.coexpressed_genes[0].positive_support(), 1);
    assert_eq!(summary.coexpressed_genes[0].negative_support(), 0);
}

#[test]
fn test_nonspecific_probe_flag() {
    let query_gene = shared_str!("gene_q");

    // probe_shared maps to both gene_a and gene_b, so gene_b (supported
    // only by it) is flagged; gene_a also has a specific probe
    let links = vec![
        make_link("gene_a", "probe_shared", 1, 0.8),
        make_link("gene_b", "probe_shared", 1, 0.8),
        make_link("gene_a", "probe_a", 2, 0.7),
    ];

    let summary = aggregate_links(&query_gene, &links, &tested_experiments(), 1);

    assert_eq!(summary.coexpressed_genes.len(), 2);

    let gene_a = summary.coexpressed_genes.iter()
        .find(|coexpressed| coexpressed.gene_uniquename == "gene_a").unwrap();
    let gene_b = summary.coexpressed_genes.iter()
        .find(|coexpressed| coexpressed.gene_uniquename == "gene_b").unwrap();

    assert!(!gene_a.only_nonspecific_support);
    assert!(gene_b.only_nonspecific_support);
}

#[test]
fn test_result_ordering() {
    let query_gene = shared_str!("gene_q");

    let links = vec![
        make_link("gene_c", "probe_c", 1, 0.5),
        make_link("gene_a", "probe_a", 1, 0.5),
        make_link("gene_b", "probe_b", 1, 0.5),
        make_link("gene_b", "probe_b", 2, 0.5),
    ];

    let summary = aggregate_links(&query_gene, &links, &tested_experiments(), 1);

    let ordered: Vec<_> =
        summary.coexpressed_genes.iter()
            .map(|coexpressed| coexpressed.gene_uniquename.as_str())
            .collect();

    // descending support, ties broken by gene uniquename
    assert_eq!(ordered, vec!["gene_b", "gene_a", "gene_c"]);
}

#[test]
fn test_no_links() {
    let query_gene = shared_str!("gene_q");

    let summary = aggregate_links(&query_gene, &[], &BTreeSet::new(), 2);

    assert!(summary.coexpressed_genes.is_empty());
    assert_eq!(summary.genes_below_stringency, 0);
    assert_eq!(summary.skipped_self_links, 0);
    assert_eq!(summary.skipped_nan_scores, 0);
    assert_eq!(summary.skipped_zero_scores, 0);
}
