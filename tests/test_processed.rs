extern crate gemma;

use std::cell::RefCell;
use std::rc::Rc;

use flexstr::{shared_str, ToSharedStr};

use gemma::data_types::{GeneType, PhysicalLocation, Strand};
use gemma::db::raw::*;
use gemma::db::Processed;
use gemma::types::TaxonId;

fn make_test_taxon(taxa: &mut Vec<Rc<Taxon>>, ncbi_taxon_id: TaxonId,
                   scientific_name: &str, common_name: Option<&str>) -> Rc<Taxon> {
    let taxon = Rc::new(Taxon {
        ncbi_taxon_id,
        scientific_name: scientific_name.to_shared_str(),
        common_name: common_name.map(|name| name.to_shared_str()),
        abbreviation: None,
    });
    taxa.push(taxon.clone());
    taxon
}

fn make_test_chromosome(chromosomes: &mut Vec<Rc<Chromosome>>, taxon: &Rc<Taxon>,
                        name: &str) -> Rc<Chromosome> {
    let chromosome = Rc::new(Chromosome {
        name: name.to_shared_str(),
        taxon: taxon.clone(),
        length: None,
    });
    chromosomes.push(chromosome.clone());
    chromosome
}

fn make_test_gene(genes: &mut Vec<Rc<Gene>>, taxon: &Rc<Taxon>,
                  uniquename: &str, symbol: &str, gene_type: &str,
                  ncbi_gene_id: Option<i64>) -> Rc<Gene> {
    let gene = Rc::new(Gene {
        uniquename: uniquename.to_shared_str(),
        symbol: symbol.to_shared_str(),
        name: None,
        ncbi_gene_id,
        ensembl_id: None,
        description: None,
        gene_type: gene_type.to_shared_str(),
        taxon: taxon.clone(),
        aliases: RefCell::new(vec![]),
        location: RefCell::new(None),
    });
    genes.push(gene.clone());
    gene
}

fn set_test_location(gene: &Rc<Gene>, chromosome: &Rc<Chromosome>,
                     nucleotide: i64, nucleotide_length: i64, strand: &str) {
    *gene.location.borrow_mut() = Some(GeneLocation {
        chromosome: chromosome.clone(),
        nucleotide,
        nucleotide_length,
        strand: Some(strand.to_shared_str()),
    });
}

fn make_test_raw() -> Raw {
    let mut taxa = vec![];
    let mut chromosomes = vec![];
    let mut genes = vec![];
    let mut qtls = vec![];
    let mut platforms = vec![];
    let mut probes = vec![];
    let mut go_annotations = vec![];
    let mut experiments = vec![];
    let mut quantitation_types = vec![];

    let human = make_test_taxon(&mut taxa, 9606, "Homo sapiens", Some("human"));
    let mouse = make_test_taxon(&mut taxa, 10090, "Mus musculus", Some("mouse"));

    let chr1 = make_test_chromosome(&mut chromosomes, &human, "1");
    let mouse_chr1 = make_test_chromosome(&mut chromosomes, &mouse, "1");

    let grin1 = make_test_gene(&mut genes, &human, "gene_grin1", "GRIN1",
                               "known", Some(2902));
    grin1.aliases.borrow_mut().push(shared_str!("NMDAR1"));
    grin1.aliases.borrow_mut().push(shared_str!("NR1"));
    // duplicate alias rows happen after curation merges
    grin1.aliases.borrow_mut().push(shared_str!("NR1"));
    set_test_location(&grin1, &chr1, 1000, 500, "+");

    let grin2a = make_test_gene(&mut genes, &human, "gene_grin2a", "GRIN2A",
                                "known", Some(2903));
    set_test_location(&grin2a, &chr1, 1400, 300, "-");

    let predicted = make_test_gene(&mut genes, &human, "gene_pred", "LOC100",
                                   "predicted", None);
    set_test_location(&predicted, &chr1, 10000, 200, "+");

    // a gene the sequence pipeline has not placed yet
    make_test_gene(&mut genes, &human, "gene_noloc", "SYT1", "known", None);

    // same symbol as the human gene, different organism
    let mouse_grin1 = make_test_gene(&mut genes, &mouse, "gene_mouse_grin1",
                                     "Grin1", "known", Some(14810));
    set_test_location(&mouse_grin1, &mouse_chr1, 1100, 400, "+");

    qtls.push(Rc::new(Qtl {
        uniquename: shared_str!("qtl_1"),
        trait_name: Some(shared_str!("body weight")),
        chromosome: chr1.clone(),
        nucleotide: 900,
        nucleotide_length: 300,
    }));

    let platform = Rc::new(ArrayDesign {
        short_name: shared_str!("GPL96"),
        name: shared_str!("Affymetrix HG-U133A"),
        taxon: human.clone(),
    });
    platforms.push(platform.clone());

    let probe = Rc::new(CompositeSequence {
        name: shared_str!("probe_1"),
        description: None,
        platform: platform.clone(),
        genes: RefCell::new(vec![grin1.clone(), grin2a.clone()]),
    });
    probes.push(probe);

    for (gene, termid, term_name) in
        [(&grin1, "GO:0004972", "NMDA glutamate receptor activity"),
         (&grin2a, "GO:0004972", "NMDA glutamate receptor activity"),
         (&grin1, "GO:0007268", "chemical synaptic transmission"),
         (&grin2a, "GO:0098978", "glutamatergic synapse"),
         (&predicted, "GO:0098978", "glutamatergic synapse")]
    {
        go_annotations.push(Rc::new(GoAnnotation {
            gene: (*gene).clone(),
            termid: termid.to_shared_str(),
            term_name: term_name.to_shared_str(),
        }));
    }

    let experiment = Rc::new(ExpressionExperiment {
        id: 1,
        short_name: shared_str!("GSE1234"),
        name: shared_str!("NMDA receptor expression"),
        taxon: human.clone(),
    });
    experiments.push(experiment.clone());

    quantitation_types.push(Rc::new(QuantitationType {
        name: shared_str!("value"),
        description: None,
        is_ratio: false,
        scale: shared_str!("log2"),
        experiment: experiment.clone(),
    }));

    Raw {
        taxa,
        chromosomes,
        genes,
        qtls,
        platforms,
        probes,
        go_annotations,
        experiments,
        quantitation_types,
    }
}

#[test]
fn test_taxon_lookups() {
    let processed = Processed::new(make_test_raw());

    assert_eq!(processed.taxon_by_id(9606).unwrap().scientific_name,
               "Homo sapiens");
    assert_eq!(processed.taxon_by_common_name("mouse").unwrap().taxonid, 10090);
    assert_eq!(processed.taxon_by_scientific_name("Homo sapiens").unwrap().taxonid,
               9606);
    assert!(processed.taxon_by_id(4896).is_none());
}

#[test]
fn test_gene_lookups() {
    let processed = Processed::new(make_test_raw());

    let grin1 = processed.gene_by_uniquename(&shared_str!("gene_grin1")).unwrap();
    assert_eq!(grin1.symbol, "GRIN1");
    assert_eq!(grin1.gene_type, GeneType::Known);
    assert_eq!(grin1.location.as_ref().unwrap().strand, Some(Strand::Forward));

    assert_eq!(processed.gene_by_ncbi_gene_id(2903).unwrap().symbol, "GRIN2A");
    assert!(processed.gene_by_ncbi_gene_id(99999).is_none());

    // symbol lookup ignores case and crosses organisms
    let by_symbol = processed.genes_by_symbol("grin1");
    assert_eq!(by_symbol.len(), 2);

    // alias lookup is exact and duplicate alias rows collapse
    let by_alias = processed.genes_by_alias("NR1");
    assert_eq!(by_alias.len(), 1);
    assert_eq!(by_alias[0].uniquename, "gene_grin1");
    assert!(processed.genes_by_alias("nr1").is_empty());
}

#[test]
fn test_known_genes() {
    let processed = Processed::new(make_test_raw());

    assert_eq!(processed.genes_of_taxon(9606).len(), 4);

    let known = processed.known_genes(9606);
    assert_eq!(known.len(), 3);
    assert!(known.iter().all(|gene| gene.gene_type == GeneType::Known));
}

#[test]
fn test_overlaps() {
    let processed = Processed::new(make_test_raw());

    let region = PhysicalLocation {
        chromosome_name: shared_str!("1"),
        taxonid: 9606,
        nucleotide: 1300,
        nucleotide_length: 200,
        strand: None,
    };

    let genes = processed.genes_overlapping(&region);
    assert_eq!(genes.len(), 2);

    // a region covering the whole chromosome still only returns placed
    // genes - gene_noloc has no location
    let whole_chromosome = PhysicalLocation {
        chromosome_name: shared_str!("1"),
        taxonid: 9606,
        nucleotide: 1,
        nucleotide_length: 100_000,
        strand: None,
    };
    let placed = processed.genes_overlapping(&whole_chromosome);
    assert_eq!(placed.len(), 3);
    assert!(placed.iter().all(|gene| gene.uniquename != "gene_noloc"));

    // the mouse chromosome has the same name but never overlaps
    let mouse_region = PhysicalLocation {
        taxonid: 10090,
        ..region.clone()
    };
    let mouse_genes = processed.genes_overlapping(&mouse_region);
    assert_eq!(mouse_genes.len(), 0);

    let qtl_region = PhysicalLocation {
        chromosome_name: shared_str!("1"),
        taxonid: 9606,
        nucleotide: 1000,
        nucleotide_length: 100,
        strand: None,
    };
    assert_eq!(processed.qtls_overlapping(&qtl_region).len(), 1);
    assert_eq!(processed.qtls_of_taxon(9606).len(), 1);
    assert_eq!(processed.qtls_of_taxon(10090).len(), 0);
}

#[test]
fn test_compute_overlap() {
    let location = PhysicalLocation {
        chromosome_name: shared_str!("1"),
        taxonid: 9606,
        nucleotide: 100,
        nucleotide_length: 50,
        strand: None,
    };

    let same = location.clone();
    assert_eq!(location.compute_overlap(&same), 50);

    let shifted = PhysicalLocation { nucleotide: 125, ..location.clone() };
    assert_eq!(location.compute_overlap(&shifted), 25);

    let disjoint = PhysicalLocation { nucleotide: 200, ..location.clone() };
    assert_eq!(location.compute_overlap(&disjoint), 0);

    let other_chromosome =
        PhysicalLocation { chromosome_name: shared_str!("2"), ..location.clone() };
    assert_eq!(location.compute_overlap(&other_chromosome), 0);

    let other_taxon = PhysicalLocation { taxonid: 10090, ..location.clone() };
    assert_eq!(location.compute_overlap(&other_taxon), 0);

    let zero_length =
        PhysicalLocation { nucleotide_length: 0, ..location.clone() };
    assert_eq!(location.compute_overlap(&zero_length), 0);
}

#[test]
fn test_chromosome_lookup() {
    let processed = Processed::new(make_test_raw());

    assert!(processed.chromosome(9606, "1").is_some());
    assert!(processed.chromosome(9606, "2").is_none());
    assert!(processed.chromosome(10090, "1").is_some());
}

#[test]
fn test_terms_and_multifunctionality() {
    let processed = Processed::new(make_test_raw());

    let term = processed.term_by_id(&shared_str!("GO:0004972")).unwrap();
    assert_eq!(term.annotated_genes.len(), 2);

    let grin1 = processed.gene_by_uniquename(&shared_str!("gene_grin1")).unwrap();
    let grin2a = processed.gene_by_uniquename(&shared_str!("gene_grin2a")).unwrap();

    assert_eq!(grin1.go_termids.len(), 2);

    let grin1_mf = grin1.multifunctionality.as_ref().unwrap();
    let grin2a_mf = grin2a.multifunctionality.as_ref().unwrap();

    assert_eq!(grin1_mf.num_go_terms, 2);
    assert_eq!(grin2a_mf.num_go_terms, 2);

    // GRIN2A belongs to both scoring groups, so it is the most
    // multifunctional human gene
    assert!((grin2a_mf.score - 1.0).abs() < f64::EPSILON);
    assert!((grin2a_mf.rank - 1.0).abs() < f64::EPSILON);
    assert!(grin2a_mf.rank > grin1_mf.rank);

    // genes without annotation have no multifunctionality
    let mouse_grin1 =
        processed.gene_by_uniquename(&shared_str!("gene_mouse_grin1")).unwrap();
    assert!(mouse_grin1.multifunctionality.is_none());
}

#[test]
fn test_platforms_and_probes() {
    let processed = Processed::new(make_test_raw());

    let platform = processed.platform_by_short_name("GPL96").unwrap();
    assert_eq!(platform.taxonid, 9606);
    assert_eq!(platform.probe_names, vec![shared_str!("probe_1")]);

    let probe = processed.probe_by_name(&shared_str!("probe_1")).unwrap();
    assert!(!probe.is_specific());

    let probe_genes = processed.genes_for_probe(&shared_str!("probe_1"));
    assert_eq!(probe_genes.len(), 2);
}

#[test]
fn test_experiments() {
    let processed = Processed::new(make_test_raw());

    let experiment = processed.experiment_by_short_name("GSE1234").unwrap();
    assert_eq!(experiment.id, 1);
    assert_eq!(experiment.taxonid, 9606);

    let quantitation_types = processed.quantitation_types("GSE1234");
    assert_eq!(quantitation_types.len(), 1);
    assert_eq!(quantitation_types[0].scale, "log2");

    assert!(processed.quantitation_types("GSE9999").is_empty());
}
