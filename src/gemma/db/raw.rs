use std::rc::Rc;
use std::cell::RefCell;
use std::collections::HashMap;

use tokio_postgres::Client;

use flexstr::{SharedStr as FlexStr, ToSharedStr};

use crate::types::*;

pub struct Raw {
    pub taxa: Vec<Rc<Taxon>>,
    pub chromosomes: Vec<Rc<Chromosome>>,
    pub genes: Vec<Rc<Gene>>,
    pub qtls: Vec<Rc<Qtl>>,
    pub platforms: Vec<Rc<ArrayDesign>>,
    pub probes: Vec<Rc<CompositeSequence>>,
    pub go_annotations: Vec<Rc<GoAnnotation>>,
    pub experiments: Vec<Rc<ExpressionExperiment>>,
    pub quantitation_types: Vec<Rc<QuantitationType>>,
}

pub struct Taxon {
    pub ncbi_taxon_id: TaxonId,
    pub scientific_name: FlexStr,
    pub common_name: Option<FlexStr>,
    pub abbreviation: Option<FlexStr>,
}

pub struct Chromosome {
    pub name: FlexStr,
    pub taxon: Rc<Taxon>,
    pub length: Option<i64>,
}

pub struct GeneLocation {
    pub chromosome: Rc<Chromosome>,
    pub nucleotide: i64,
    pub nucleotide_length: i64,
    pub strand: Option<FlexStr>,
}

pub struct Gene {
    pub uniquename: FlexStr,
    pub symbol: FlexStr,
    pub name: Option<FlexStr>,
    pub ncbi_gene_id: Option<i64>,
    pub ensembl_id: Option<FlexStr>,
    pub description: Option<FlexStr>,
    pub gene_type: FlexStr,
    pub taxon: Rc<Taxon>,
    pub aliases: RefCell<Vec<FlexStr>>,
    pub location: RefCell<Option<GeneLocation>>,
}

pub struct Qtl {
    pub uniquename: FlexStr,
    pub trait_name: Option<FlexStr>,
    pub chromosome: Rc<Chromosome>,
    pub nucleotide: i64,
    pub nucleotide_length: i64,
}

pub struct ArrayDesign {
    pub short_name: FlexStr,
    pub name: FlexStr,
    pub taxon: Rc<Taxon>,
}

pub struct CompositeSequence {
    pub name: FlexStr,
    pub description: Option<FlexStr>,
    pub platform: Rc<ArrayDesign>,
    pub genes: RefCell<Vec<Rc<Gene>>>,
}

pub struct GoAnnotation {
    pub gene: Rc<Gene>,
    pub termid: FlexStr,
    pub term_name: FlexStr,
}

pub struct ExpressionExperiment {
    pub id: ExperimentId,
    pub short_name: FlexStr,
    pub name: FlexStr,
    pub taxon: Rc<Taxon>,
}

pub struct QuantitationType {
    pub name: FlexStr,
    pub description: Option<FlexStr>,
    pub is_ratio: bool,
    pub scale: FlexStr,
    pub experiment: Rc<ExpressionExperiment>,
}

impl Raw {
    pub async fn new(conn: &mut Client) -> Result<Raw, tokio_postgres::Error> {
        let mut ret = Raw {
            taxa: vec![],
            chromosomes: vec![],
            genes: vec![],
            qtls: vec![],
            platforms: vec![],
            probes: vec![],
            go_annotations: vec![],
            experiments: vec![],
            quantitation_types: vec![],
        };

        let mut taxon_map: HashMap<i64, Rc<Taxon>> = HashMap::new();
        let mut chromosome_map: HashMap<i64, Rc<Chromosome>> = HashMap::new();
        let mut gene_map: HashMap<i64, Rc<Gene>> = HashMap::new();
        let mut platform_map: HashMap<i64, Rc<ArrayDesign>> = HashMap::new();
        let mut probe_map: HashMap<i64, Rc<CompositeSequence>> = HashMap::new();
        let mut experiment_map: HashMap<i64, Rc<ExpressionExperiment>> = HashMap::new();

        fn get_taxon(taxon_map: &HashMap<i64, Rc<Taxon>>, taxon_id: i64) -> Rc<Taxon> {
            taxon_map.get(&taxon_id)
                .unwrap_or_else(|| panic!("can't find taxon {:?} in map", taxon_id)).clone()
        }

        fn get_chromosome(chromosome_map: &HashMap<i64, Rc<Chromosome>>, chromosome_id: i64)
            -> Rc<Chromosome>
        {
            chromosome_map.get(&chromosome_id)
                .unwrap_or_else(|| panic!("can't find chromosome {:?} in map", chromosome_id)).clone()
        }

        fn get_gene(gene_map: &HashMap<i64, Rc<Gene>>, gene_id: i64) -> Rc<Gene> {
            gene_map.get(&gene_id)
                .unwrap_or_else(|| panic!("can't find gene {:?} in map", gene_id)).clone()
        }

        let result =
            conn.query("SELECT taxon_id, ncbi_taxon_id, scientific_name, common_name, abbreviation FROM taxon", &[]).await?;

        for row in &result {
            let ncbi_taxon_id: i64 = row.get(1);
            let scientific_name: String = row.get(2);
            let common_name: Option<String> = row.get(3);
            let abbreviation: Option<String> = row.get(4);

            let taxon = Taxon {
                ncbi_taxon_id: ncbi_taxon_id as TaxonId,
                scientific_name: scientific_name.to_shared_str(),
                common_name: common_name.map(|s| s.to_shared_str()),
                abbreviation: abbreviation.map(|s| s.to_shared_str()),
            };
            let rc_taxon = Rc::new(taxon);
            ret.taxa.push(rc_taxon.clone());
            taxon_map.insert(row.get(0), rc_taxon);
        }

        for row in &conn.query("SELECT chromosome_id, name, taxon_id, length FROM chromosome", &[]).await? {
            let chromosome_id: i64 = row.get(0);
            let name: String = row.get(1);
            let taxon_id: i64 = row.get(2);
            let length: Option<i64> = row.get(3);
            let chromosome = Chromosome {
                name: name.to_shared_str(),
                taxon: get_taxon(&taxon_map, taxon_id),
                length,
            };
            let rc_chromosome = Rc::new(chromosome);
            ret.chromosomes.push(rc_chromosome.clone());
            chromosome_map.insert(chromosome_id, rc_chromosome);
        }

        for row in &conn.query("SELECT gene_id, uniquename, official_symbol, official_name, ncbi_gene_id, ensembl_id, description, gene_type, taxon_id FROM gene", &[]).await? {
            let gene_id: i64 = row.get(0);
            let uniquename: String = row.get(1);
            let symbol: String = row.get(2);
            let name: Option<String> = row.get(3);
            let ncbi_gene_id: Option<i64> = row.get(4);
            let ensembl_id: Option<String> = row.get(5);
            let description: Option<String> = row.get(6);
            let gene_type: String = row.get(7);
            let taxon_id: i64 = row.get(8);

            let gene = Gene {
                uniquename: uniquename.to_shared_str(),
                symbol: symbol.to_shared_str(),
                name: name.map(|s| s.to_shared_str()),
                ncbi_gene_id,
                ensembl_id: ensembl_id.map(|s| s.to_shared_str()),
                description: description.map(|s| s.to_shared_str()),
                gene_type: gene_type.to_shared_str(),
                taxon: get_taxon(&taxon_map, taxon_id),
                aliases: RefCell::new(vec![]),
                location: RefCell::new(None),
            };
            let rc_gene = Rc::new(gene);
            ret.genes.push(rc_gene.clone());
            gene_map.insert(gene_id, rc_gene);
        }

        for row in &conn.query("SELECT gene_id, alias FROM gene_alias", &[]).await? {
            let gene_id: i64 = row.get(0);
            let alias: String = row.get(1);
            let gene = get_gene(&gene_map, gene_id);
            gene.aliases.borrow_mut().push(alias.to_shared_str());
        }

        for row in &conn.query("SELECT gene_id, chromosome_id, nucleotide, nucleotide_length, strand FROM physical_location WHERE gene_id IS NOT NULL", &[]).await? {
            let gene_id: i64 = row.get(0);
            let chromosome_id: i64 = row.get(1);
            let nucleotide: i64 = row.get(2);
            let nucleotide_length: i64 = row.get(3);
            let strand: Option<String> = row.get(4);

            let gene = get_gene(&gene_map, gene_id);
            let location = GeneLocation {
                chromosome: get_chromosome(&chromosome_map, chromosome_id),
                nucleotide,
                nucleotide_length,
                strand: strand.map(|s| s.to_shared_str()),
            };
            *gene.location.borrow_mut() = Some(location);
        }

        for row in &conn.query("SELECT uniquename, trait_name, chromosome_id, nucleotide, nucleotide_length FROM qtl", &[]).await? {
            let uniquename: String = row.get(0);
            let trait_name: Option<String> = row.get(1);
            let chromosome_id: i64 = row.get(2);
            let qtl = Qtl {
                uniquename: uniquename.to_shared_str(),
                trait_name: trait_name.map(|s| s.to_shared_str()),
                chromosome: get_chromosome(&chromosome_map, chromosome_id),
                nucleotide: row.get(3),
                nucleotide_length: row.get(4),
            };
            ret.qtls.push(Rc::new(qtl));
        }

        for row in &conn.query("SELECT array_design_id, short_name, name, taxon_id FROM array_design", &[]).await? {
            let array_design_id: i64 = row.get(0);
            let short_name: String = row.get(1);
            let name: String = row.get(2);
            let taxon_id: i64 = row.get(3);
            let platform = ArrayDesign {
                short_name: short_name.to_shared_str(),
                name: name.to_shared_str(),
                taxon: get_taxon(&taxon_map, taxon_id),
            };
            let rc_platform = Rc::new(platform);
            ret.platforms.push(rc_platform.clone());
            platform_map.insert(array_design_id, rc_platform);
        }

        for row in &conn.query("SELECT composite_sequence_id, name, description, array_design_id FROM composite_sequence", &[]).await? {
            let composite_sequence_id: i64 = row.get(0);
            let name: String = row.get(1);
            let description: Option<String> = row.get(2);
            let array_design_id: i64 = row.get(3);
            let probe = CompositeSequence {
                name: name.to_shared_str(),
                description: description.map(|s| s.to_shared_str()),
                platform: platform_map.get(&array_design_id)
                    .unwrap_or_else(|| panic!("can't find platform {:?} in map", array_design_id)).clone(),
                genes: RefCell::new(vec![]),
            };
            let rc_probe = Rc::new(probe);
            ret.probes.push(rc_probe.clone());
            probe_map.insert(composite_sequence_id, rc_probe);
        }

        // the probe-to-gene junction table
        for row in &conn.query("SELECT composite_sequence_id, gene_id FROM gene2cs", &[]).await? {
            let composite_sequence_id: i64 = row.get(0);
            let gene_id: i64 = row.get(1);
            let probe = probe_map.get(&composite_sequence_id)
                .unwrap_or_else(|| panic!("can't find probe {:?} in map", composite_sequence_id)).clone();
            probe.genes.borrow_mut().push(get_gene(&gene_map, gene_id));
        }

        for row in &conn.query("SELECT gene_id, termid, term_name FROM go_annotation", &[]).await? {
            let gene_id: i64 = row.get(0);
            let termid: String = row.get(1);
            let term_name: String = row.get(2);
            let go_annotation = GoAnnotation {
                gene: get_gene(&gene_map, gene_id),
                termid: termid.to_shared_str(),
                term_name: term_name.to_shared_str(),
            };
            ret.go_annotations.push(Rc::new(go_annotation));
        }

        for row in &conn.query("SELECT expression_experiment_id, short_name, name, taxon_id FROM expression_experiment", &[]).await? {
            let expression_experiment_id: i64 = row.get(0);
            let short_name: String = row.get(1);
            let name: String = row.get(2);
            let taxon_id: i64 = row.get(3);
            let experiment = ExpressionExperiment {
                id: expression_experiment_id,
                short_name: short_name.to_shared_str(),
                name: name.to_shared_str(),
                taxon: get_taxon(&taxon_map, taxon_id),
            };
            let rc_experiment = Rc::new(experiment);
            ret.experiments.push(rc_experiment.clone());
            experiment_map.insert(expression_experiment_id, rc_experiment);
        }

        for row in &conn.query("SELECT name, description, is_ratio, scale, expression_experiment_id FROM quantitation_type", &[]).await? {
            let name: String = row.get(0);
            let description: Option<String> = row.get(1);
            let is_ratio: bool = row.get(2);
            let scale: String = row.get(3);
            let expression_experiment_id: i64 = row.get(4);
            let quantitation_type = QuantitationType {
                name: name.to_shared_str(),
                description: description.map(|s| s.to_shared_str()),
                is_ratio,
                scale: scale.to_shared_str(),
                experiment: experiment_map.get(&expression_experiment_id)
                    .unwrap_or_else(|| panic!("can't find experiment {:?} in map", expression_experiment_id)).clone(),
            };
            ret.quantitation_types.push(Rc::new(quantitation_type));
        }

        Ok(ret)
    }
}
