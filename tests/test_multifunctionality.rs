extern crate gemma;

use std::collections::{HashMap, HashSet};

use flexstr::{shared_str, ToSharedStr};

use gemma::multifunctionality::compute_multifunctionality;
use gemma::types::{GeneUniquename, TermId};

fn make_group(genes: &[&str]) -> HashSet<GeneUniquename> {
    genes.iter().map(|gene| gene.to_shared_str()).collect()
}

#[test]
fn test_scores_and_ranks() {
    let mut go_groups: HashMap<TermId, HashSet<GeneUniquename>> = HashMap::new();
    go_groups.insert(shared_str!("GO:0000001"), make_group(&["g1", "g2"]));
    go_groups.insert(shared_str!("GO:0000002"), make_group(&["g1", "g2", "g3"]));

    let results = compute_multifunctionality(&go_groups);

    assert_eq!(results.len(), 3);

    // GO:0000002 covers the whole annotated genome so it contributes
    // nothing, GO:0000001 contributes 1/(2*1) to g1 and g2
    let g1 = &results[&shared_str!("g1")];
    assert!((g1.score - 0.5).abs() < f64::EPSILON);
    assert_eq!(g1.num_go_terms, 2);
    assert!((g1.rank - 2.5 / 3.0).abs() < f64::EPSILON);

    let g2 = &results[&shared_str!("g2")];
    assert!((g2.score - 0.5).abs() < f64::EPSILON);
    assert!((g2.rank - 2.5 / 3.0).abs() < f64::EPSILON);

    let g3 = &results[&shared_str!("g3")];
    assert_eq!(g3.score, 0.0);
    assert_eq!(g3.num_go_terms, 1);
    assert!((g3.rank - 1.0 / 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_distinct_scores() {
    let mut go_groups: HashMap<TermId, HashSet<GeneUniquename>> = HashMap::new();
    go_groups.insert(shared_str!("GO:0000010"), make_group(&["g1", "g2"]));
    go_groups.insert(shared_str!("GO:0000011"), make_group(&["g1", "g3"]));
    go_groups.insert(shared_str!("GO:0000012"), make_group(&["g1", "g4"]));

    let results = compute_multifunctionality(&go_groups);

    assert_eq!(results.len(), 4);

    // each group has 2 genes in and 2 out, contribution 1/4
    let g1 = &results[&shared_str!("g1")];
    assert!((g1.score - 0.75).abs() < f64::EPSILON);
    assert_eq!(g1.num_go_terms, 3);
    // g1 has the highest score
    assert!((g1.rank - 1.0).abs() < f64::EPSILON);

    // g2, g3 and g4 tie at 0.25, sharing positions 1 to 3
    let g2 = &results[&shared_str!("g2")];
    assert!((g2.score - 0.25).abs() < f64::EPSILON);
    assert!((g2.rank - 2.0 / 4.0).abs() < f64::EPSILON);
    assert_eq!(results[&shared_str!("g3")].rank, g2.rank);
    assert_eq!(results[&shared_str!("g4")].rank, g2.rank);
}

#[test]
fn test_small_groups_ignored() {
    let mut go_groups: HashMap<TermId, HashSet<GeneUniquename>> = HashMap::new();
    go_groups.insert(shared_str!("GO:0000020"), make_group(&["g1"]));
    go_groups.insert(shared_str!("GO:0000021"), make_group(&["g1", "g2"]));
    go_groups.insert(shared_str!("GO:0000022"), make_group(&["g3"]));

    let results = compute_multifunctionality(&go_groups);

    // singleton groups score nothing but still count towards num_go_terms
    let g1 = &results[&shared_str!("g1")];
    assert!((g1.score - 1.0 / (2.0 * 1.0)).abs() < f64::EPSILON);
    assert_eq!(g1.num_go_terms, 2);

    let g3 = &results[&shared_str!("g3")];
    assert_eq!(g3.score, 0.0);
    assert_eq!(g3.num_go_terms, 1);
}

#[test]
fn test_single_gene() {
    let mut go_groups: HashMap<TermId, HashSet<GeneUniquename>> = HashMap::new();
    go_groups.insert(shared_str!("GO:0000030"), make_group(&["g1"]));

    let results = compute_multifunctionality(&go_groups);

    let g1 = &results[&shared_str!("g1")];
    assert_eq!(g1.score, 0.0);
    assert!((g1.rank - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_empty_input() {
    let go_groups: HashMap<TermId, HashSet<GeneUniquename>> = HashMap::new();
    assert!(compute_multifunctionality(&go_groups).is_empty());
}
