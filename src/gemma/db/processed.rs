use std::collections::{HashMap, HashSet, BTreeMap, BTreeSet};

use flexstr::{SharedStr as FlexStr, ToSharedStr};

use crate::data_types::*;
use crate::multifunctionality::compute_multifunctionality;
use crate::types::*;

use super::Raw;

/// The query surface over the warehoused genome entities.  All lookups are
/// eager maps built once from `Raw` - there is no lazy loading.
pub struct Processed {
    taxon_map: TaxonIdDetailsMap,
    taxon_by_common_name: HashMap<FlexStr, TaxonId>,
    taxon_by_scientific_name: HashMap<FlexStr, TaxonId>,

    gene_map: UniquenameGeneMap,
    genes_by_lc_symbol: HashMap<String, Vec<GeneUniquename>>,
    genes_by_alias: HashMap<GeneAlias, Vec<GeneUniquename>>,
    gene_by_ncbi_gene_id: HashMap<i64, GeneUniquename>,

    chromosome_map: HashMap<(TaxonId, ChromosomeName), ChromosomeDetails>,

    qtls: Vec<QtlDetails>,

    term_map: TermIdDetailsMap,

    platform_map: PlatformShortNameMap,
    probe_map: ProbeNameDetailsMap,

    experiments: Vec<ExpressionExperimentShort>,
    quantitation_types: HashMap<ExperimentShortName, Vec<QuantitationTypeDetails>>,
}

fn strand_from_db_str(strand_str: &str) -> Option<Strand> {
    match strand_str {
        "+" => Some(Strand::Forward),
        "-" => Some(Strand::Reverse),
        _ => {
            eprintln!("unexpected strand string from database: {}", strand_str);
            None
        },
    }
}

fn make_taxon_maps(raw: &Raw)
    -> (TaxonIdDetailsMap, HashMap<FlexStr, TaxonId>, HashMap<FlexStr, TaxonId>)
{
    let mut taxon_map = HashMap::new();
    let mut by_common_name = HashMap::new();
    let mut by_scientific_name = HashMap::new();

    for taxon in &raw.taxa {
        let details = TaxonDetails {
            taxonid: taxon.ncbi_taxon_id,
            scientific_name: taxon.scientific_name.clone(),
            common_name: taxon.common_name.clone(),
            abbreviation: taxon.abbreviation.clone(),
        };
        if let Some(ref common_name) = taxon.common_name {
            by_common_name.insert(common_name.clone(), taxon.ncbi_taxon_id);
        }
        by_scientific_name.insert(taxon.scientific_name.clone(), taxon.ncbi_taxon_id);
        taxon_map.insert(taxon.ncbi_taxon_id, details);
    }

    (taxon_map, by_common_name, by_scientific_name)
}

fn make_gene_map(raw: &Raw) -> UniquenameGeneMap {
    let mut gene_map = BTreeMap::new();

    for gene in &raw.genes {
        let location =
            gene.location.borrow().as_ref().map(|loc| {
                PhysicalLocation {
                    chromosome_name: loc.chromosome.name.clone(),
                    taxonid: loc.chromosome.taxon.ncbi_taxon_id,
                    nucleotide: loc.nucleotide,
                    nucleotide_length: loc.nucleotide_length,
                    strand: loc.strand.as_ref()
                        .and_then(|s| strand_from_db_str(s)),
                }
            });

        let details = GeneDetails {
            uniquename: gene.uniquename.clone(),
            symbol: gene.symbol.clone(),
            name: gene.name.clone(),
            description: gene.description.clone(),
            ncbi_gene_id: gene.ncbi_gene_id,
            ensembl_id: gene.ensembl_id.clone(),
            taxonid: gene.taxon.ncbi_taxon_id,
            gene_type: GeneType::from_db_str(&gene.gene_type),
            aliases: gene.aliases.borrow().clone(),
            location,
            go_termids: BTreeSet::new(),
            multifunctionality: None,
        };

        gene_map.insert(gene.uniquename.clone(), details);
    }

    gene_map
}

fn make_term_map(raw: &Raw, gene_map: &mut UniquenameGeneMap) -> TermIdDetailsMap {
    let mut term_map: TermIdDetailsMap = HashMap::new();

    for annotation in &raw.go_annotations {
        let gene_uniquename = annotation.gene.uniquename.clone();

        let term_details = term_map.entry(annotation.termid.clone())
            .or_insert_with(|| TermDetails {
                termid: annotation.termid.clone(),
                name: annotation.term_name.clone(),
                annotated_genes: HashSet::new(),
            });
        term_details.annotated_genes.insert(gene_uniquename.clone());

        if let Some(gene_details) = gene_map.get_mut(&gene_uniquename) {
            gene_details.go_termids.insert(annotation.termid.clone());
        }
    }

    term_map
}

fn make_platform_maps(raw: &Raw) -> (PlatformShortNameMap, ProbeNameDetailsMap) {
    let mut platform_map: PlatformShortNameMap = BTreeMap::new();
    let mut probe_map = HashMap::new();

    for platform in &raw.platforms {
        platform_map.insert(platform.short_name.clone(),
                            PlatformDetails {
                                short_name: platform.short_name.clone(),
                                name: platform.name.clone(),
                                taxonid: platform.taxon.ncbi_taxon_id,
                                probe_names: vec![],
                            });
    }

    for probe in &raw.probes {
        let mut gene_uniquenames: Vec<GeneUniquename> =
            probe.genes.borrow().iter()
                .map(|gene| gene.uniquename.clone())
                .collect();
        gene_uniquenames.sort();
        gene_uniquenames.dedup();

        if let Some(platform_details) = platform_map.get_mut(&probe.platform.short_name) {
            platform_details.probe_names.push(probe.name.clone());
        }

        probe_map.insert(probe.name.clone(),
                         ProbeDetails {
                             name: probe.name.clone(),
                             platform_short_name: probe.platform.short_name.clone(),
                             description: probe.description.clone(),
                             gene_uniquenames,
                         });
    }

    for platform_details in platform_map.values_mut() {
        platform_details.probe_names.sort();
    }

    (platform_map, probe_map)
}

fn add_multifunctionality(gene_map: &mut UniquenameGeneMap,
                          term_map: &TermIdDetailsMap,
                          taxon_map: &TaxonIdDetailsMap)
{
    for taxonid in taxon_map.keys() {
        let taxon_genes: HashSet<GeneUniquename> =
            gene_map.values()
                .filter(|gene| gene.taxonid == *taxonid)
                .map(|gene| gene.uniquename.clone())
                .collect();

        let mut go_groups: HashMap<TermId, HashSet<GeneUniquename>> = HashMap::new();

        for term_details in term_map.values() {
            let members: HashSet<GeneUniquename> =
                term_details.annotated_genes.intersection(&taxon_genes)
                    .cloned()
                    .collect();
            if !members.is_empty() {
                go_groups.insert(term_details.termid.clone(), members);
            }
        }

        for (gene_uniquename, multifunctionality) in compute_multifunctionality(&go_groups) {
            if let Some(gene_details) = gene_map.get_mut(&gene_uniquename) {
                gene_details.multifunctionality = Some(multifunctionality);
            }
        }
    }
}

impl Processed {
    pub fn new(raw: Raw) -> Processed {
        let (taxon_map, taxon_by_common_name, taxon_by_scientific_name) =
            make_taxon_maps(&raw);

        let mut gene_map = make_gene_map(&raw);
        let term_map = make_term_map(&raw, &mut gene_map);

        add_multifunctionality(&mut gene_map, &term_map, &taxon_map);

        let mut genes_by_lc_symbol: HashMap<String, Vec<GeneUniquename>> = HashMap::new();
        let mut genes_by_alias: HashMap<GeneAlias, Vec<GeneUniquename>> = HashMap::new();
        let mut gene_by_ncbi_gene_id = HashMap::new();

        for gene_details in gene_map.values() {
            genes_by_lc_symbol
                .entry(gene_details.symbol.to_lowercase())
                .or_default()
                .push(gene_details.uniquename.clone());

            for alias in &gene_details.aliases {
                let entry = genes_by_alias.entry(alias.clone()).or_default();
                // two aliases of the same gene may be equal after curation
                // mistakes - never return a gene twice
                if !entry.contains(&gene_details.uniquename) {
                    entry.push(gene_details.uniquename.clone());
                }
            }

            if let Some(ncbi_gene_id) = gene_details.ncbi_gene_id {
                gene_by_ncbi_gene_id.insert(ncbi_gene_id, gene_details.uniquename.clone());
            }
        }

        let mut chromosome_map = HashMap::new();
        for chromosome in &raw.chromosomes {
            let details = ChromosomeDetails {
                name: chromosome.name.clone(),
                taxonid: chromosome.taxon.ncbi_taxon_id,
                length: chromosome.length,
            };
            chromosome_map.insert((chromosome.taxon.ncbi_taxon_id, chromosome.name.clone()),
                                  details);
        }

        let qtls =
            raw.qtls.iter().map(|qtl| {
                QtlDetails {
                    uniquename: qtl.uniquename.clone(),
                    trait_name: qtl.trait_name.clone(),
                    location: PhysicalLocation {
                        chromosome_name: qtl.chromosome.name.clone(),
                        taxonid: qtl.chromosome.taxon.ncbi_taxon_id,
                        nucleotide: qtl.nucleotide,
                        nucleotide_length: qtl.nucleotide_length,
                        strand: None,
                    },
                }
            })
            .collect();

        let (platform_map, probe_map) = make_platform_maps(&raw);

        let experiments: Vec<_> =
            raw.experiments.iter().map(|experiment| {
                ExpressionExperimentShort {
                    id: experiment.id,
                    short_name: experiment.short_name.clone(),
                    name: experiment.name.clone(),
                    taxonid: experiment.taxon.ncbi_taxon_id,
                }
            })
            .collect();

        let mut quantitation_types: HashMap<ExperimentShortName, Vec<QuantitationTypeDetails>> =
            HashMap::new();
        for quantitation_type in &raw.quantitation_types {
            quantitation_types
                .entry(quantitation_type.experiment.short_name.clone())
                .or_default()
                .push(QuantitationTypeDetails {
                    name: quantitation_type.name.clone(),
                    description: quantitation_type.description.clone(),
                    is_ratio: quantitation_type.is_ratio,
                    scale: quantitation_type.scale.clone(),
                });
        }

        Processed {
            taxon_map,
            taxon_by_common_name,
            taxon_by_scientific_name,
            gene_map,
            genes_by_lc_symbol,
            genes_by_alias,
            gene_by_ncbi_gene_id,
            chromosome_map,
            qtls,
            term_map,
            platform_map,
            probe_map,
            experiments,
            quantitation_types,
        }
    }

    pub fn taxon_by_id(&self, taxonid: TaxonId) -> Option<&TaxonDetails> {
        self.taxon_map.get(&taxonid)
    }

    pub fn taxon_by_common_name(&self, common_name: &str) -> Option<&TaxonDetails> {
        self.taxon_by_common_name.get(common_name)
            .and_then(|taxonid| self.taxon_map.get(taxonid))
    }

    pub fn taxon_by_scientific_name(&self, scientific_name: &str) -> Option<&TaxonDetails> {
        self.taxon_by_scientific_name.get(scientific_name)
            .and_then(|taxonid| self.taxon_map.get(taxonid))
    }

    pub fn genes(&self) -> &UniquenameGeneMap {
        &self.gene_map
    }

    pub fn gene_by_uniquename(&self, uniquename: &GeneUniquename) -> Option<&GeneDetails> {
        self.gene_map.get(uniquename)
    }

    pub fn gene_by_ncbi_gene_id(&self, ncbi_gene_id: i64) -> Option<&GeneDetails> {
        self.gene_by_ncbi_gene_id.get(&ncbi_gene_id)
            .and_then(|uniquename| self.gene_map.get(uniquename))
    }

    /// Official symbol lookup, ignoring case.  May match genes from more
    /// than one organism.
    pub fn genes_by_symbol(&self, symbol: &str) -> Vec<&GeneDetails> {
        let Some(uniquenames) = self.genes_by_lc_symbol.get(&symbol.to_lowercase())
        else {
            return vec![];
        };

        uniquenames.iter()
            .filter_map(|uniquename| self.gene_map.get(uniquename))
            .collect()
    }

    /// Exact alias lookup.
    pub fn genes_by_alias(&self, alias: &str) -> Vec<&GeneDetails> {
        let Some(uniquenames) = self.genes_by_alias.get(alias)
        else {
            return vec![];
        };

        uniquenames.iter()
            .filter_map(|uniquename| self.gene_map.get(uniquename))
            .collect()
    }

    pub fn genes_of_taxon(&self, taxonid: TaxonId) -> Vec<&GeneDetails> {
        self.gene_map.values()
            .filter(|gene| gene.taxonid == taxonid)
            .collect()
    }

    /// All genes of the taxon except predicted genes and probe-aligned
    /// regions.
    pub fn known_genes(&self, taxonid: TaxonId) -> Vec<&GeneDetails> {
        self.gene_map.values()
            .filter(|gene| gene.taxonid == taxonid &&
                    gene.gene_type == GeneType::Known)
            .collect()
    }

    pub fn chromosome(&self, taxonid: TaxonId, name: &str) -> Option<&ChromosomeDetails> {
        self.chromosome_map.get(&(taxonid, name.to_shared_str()))
    }

    /// Genes whose physical location overlaps the given region.  Strand is
    /// ignored; genes without locations are skipped.
    pub fn genes_overlapping(&self, location: &PhysicalLocation) -> Vec<&GeneDetails> {
        self.gene_map.values()
            .filter(|gene| {
                if let Some(ref gene_location) = gene.location {
                    gene_location.overlaps(location)
                } else {
                    false
                }
            })
            .collect()
    }

    pub fn qtls_of_taxon(&self, taxonid: TaxonId) -> Vec<&QtlDetails> {
        self.qtls.iter()
            .filter(|qtl| qtl.location.taxonid == taxonid)
            .collect()
    }

    pub fn qtls_overlapping(&self, location: &PhysicalLocation) -> Vec<&QtlDetails> {
        self.qtls.iter()
            .filter(|qtl| qtl.location.overlaps(location))
            .collect()
    }

    pub fn terms(&self) -> &TermIdDetailsMap {
        &self.term_map
    }

    pub fn term_by_id(&self, termid: &TermId) -> Option<&TermDetails> {
        self.term_map.get(termid)
    }

    pub fn platforms(&self) -> &PlatformShortNameMap {
        &self.platform_map
    }

    pub fn platform_by_short_name(&self, short_name: &str) -> Option<&PlatformDetails> {
        self.platform_map.get(short_name)
    }

    pub fn probe_by_name(&self, probe_name: &ProbeName) -> Option<&ProbeDetails> {
        self.probe_map.get(probe_name)
    }

    pub fn probes(&self) -> &ProbeNameDetailsMap {
        &self.probe_map
    }

    pub fn genes_for_probe(&self, probe_name: &ProbeName) -> Vec<&GeneDetails> {
        let Some(probe_details) = self.probe_map.get(probe_name)
        else {
            return vec![];
        };

        probe_details.gene_uniquenames.iter()
            .filter_map(|uniquename| self.gene_map.get(uniquename))
            .collect()
    }

    pub fn experiments(&self) -> &[ExpressionExperimentShort] {
        &self.experiments
    }

    pub fn experiment_by_short_name(&self, short_name: &str)
        -> Option<&ExpressionExperimentShort>
    {
        self.experiments.iter()
            .find(|experiment| experiment.short_name == short_name)
    }

    pub fn quantitation_types(&self, experiment_short_name: &str)
        -> &[QuantitationTypeDetails]
    {
        self.quantitation_types.get(experiment_short_name)
            .map(|quantitation_types| quantitation_types.as_slice())
            .unwrap_or(&[])
    }
}
