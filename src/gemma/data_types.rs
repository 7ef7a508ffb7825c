use std::collections::{HashMap, HashSet, BTreeMap, BTreeSet};

use std::fmt::Display;
use std::fmt;

use flexstr::SharedStr as FlexStr;

use crate::types::*;

pub type UniquenameGeneMap = BTreeMap<GeneUniquename, GeneDetails>;
pub type TermIdDetailsMap = HashMap<TermId, TermDetails>;
pub type TaxonIdDetailsMap = HashMap<TaxonId, TaxonDetails>;
pub type ProbeNameDetailsMap = HashMap<ProbeName, ProbeDetails>;
pub type PlatformShortNameMap = BTreeMap<PlatformShortName, PlatformDetails>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    #[serde(rename = "forward")]
    Forward,
    #[serde(rename = "reverse")]
    Reverse,
}

impl Strand {
    pub fn to_symbol(self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_symbol())
    }
}

/// A nucleotide range on a chromosome.  `nucleotide` is the 1-based start
/// position and the region covers `nucleotide_length` bases.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhysicalLocation {
    pub chromosome_name: ChromosomeName,
    pub taxonid: TaxonId,
    pub nucleotide: i64,
    pub nucleotide_length: i64,
    #[serde(skip_serializing_if="Option::is_none")]
    pub strand: Option<Strand>,
}

impl PhysicalLocation {
    pub fn end(&self) -> i64 {
        self.nucleotide + self.nucleotide_length
    }

    /// Number of overlapping bases between two locations.  Locations on
    /// different chromosomes or from different organisms never overlap.
    /// Strand is ignored.
    pub fn compute_overlap(&self, other: &PhysicalLocation) -> i64 {
        if self.taxonid != other.taxonid ||
            self.chromosome_name != other.chromosome_name {
            return 0;
        }

        let overlap_start = self.nucleotide.max(other.nucleotide);
        let overlap_end = self.end().min(other.end());

        (overlap_end - overlap_start).max(0)
    }

    pub fn overlaps(&self, other: &PhysicalLocation) -> bool {
        self.compute_overlap(other) > 0
    }
}

impl Display for PhysicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.chromosome_name,
               self.nucleotide, self.end() - 1)?;
        if let Some(strand) = self.strand {
            write!(f, "({})", strand)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneType {
    #[serde(rename = "known")]
    Known,
    #[serde(rename = "predicted")]
    Predicted,
    #[serde(rename = "probe_aligned_region")]
    ProbeAlignedRegion,
}

impl GeneType {
    pub fn from_db_str(type_str: &str) -> GeneType {
        match type_str {
            "predicted" => GeneType::Predicted,
            "probe_aligned_region" => GeneType::ProbeAlignedRegion,
            _ => GeneType::Known,
        }
    }
}

/// The Gillis & Pavlidis (2011) multifunctionality of one gene, relative
/// to the other genes of its organism.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Multifunctionality {
    pub score: f64,
    // relative rank of the score in (0.0, 1.0], 1.0 is most multifunctional
    pub rank: f64,
    pub num_go_terms: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GeneDetails {
    pub uniquename: GeneUniquename,
    pub symbol: GeneSymbol,
    #[serde(skip_serializing_if="Option::is_none")]
    pub name: Option<GeneName>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub description: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub ncbi_gene_id: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub ensembl_id: Option<FlexStr>,
    pub taxonid: TaxonId,
    pub gene_type: GeneType,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub aliases: Vec<GeneAlias>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub location: Option<PhysicalLocation>,
    #[serde(skip_serializing_if="BTreeSet::is_empty", default)]
    pub go_termids: BTreeSet<TermId>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub multifunctionality: Option<Multifunctionality>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TaxonDetails {
    pub taxonid: TaxonId,
    pub scientific_name: FlexStr,
    #[serde(skip_serializing_if="Option::is_none")]
    pub common_name: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub abbreviation: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeDetails {
    pub name: ChromosomeName,
    pub taxonid: TaxonId,
    #[serde(skip_serializing_if="Option::is_none")]
    pub length: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QtlDetails {
    pub uniquename: QtlUniquename,
    #[serde(skip_serializing_if="Option::is_none")]
    pub trait_name: Option<FlexStr>,
    pub location: PhysicalLocation,
}

/// A GO group: the term and the genes annotated with it (directly or via
/// the annotations loaded into the warehouse).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TermDetails {
    pub termid: TermId,
    pub name: TermName,
    #[serde(skip_serializing_if="HashSet::is_empty", default)]
    pub annotated_genes: HashSet<GeneUniquename>,
}

/// A microarray probe (CompositeSequence).  One probe may map to more than
/// one gene - see `ProbeDetails::is_specific()`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProbeDetails {
    pub name: ProbeName,
    pub platform_short_name: PlatformShortName,
    #[serde(skip_serializing_if="Option::is_none")]
    pub description: Option<FlexStr>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub gene_uniquenames: Vec<GeneUniquename>,
}

impl ProbeDetails {
    pub fn is_specific(&self) -> bool {
        self.gene_uniquenames.len() <= 1
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlatformDetails {
    pub short_name: PlatformShortName,
    pub name: FlexStr,
    pub taxonid: TaxonId,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub probe_names: Vec<ProbeName>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExpressionExperimentShort {
    pub id: ExperimentId,
    pub short_name: ExperimentShortName,
    pub name: FlexStr,
    pub taxonid: TaxonId,
}

/// Metadata describing the kind of measurement in an expression data
/// vector, eg. "log2 ratio" or "counts".
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuantitationTypeDetails {
    pub name: FlexStr,
    #[serde(skip_serializing_if="Option::is_none")]
    pub description: Option<FlexStr>,
    pub is_ratio: bool,
    pub scale: FlexStr,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ContrastResult {
    #[serde(skip_serializing_if="Option::is_none")]
    pub log2_fold_change: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub t_stat: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub pvalue: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DiffExprResult {
    pub probe_name: ProbeName,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub gene_symbols: Vec<GeneSymbol>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub pvalue: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub corrected_pvalue: Option<f64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub rank: Option<f64>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub contrasts: Vec<ContrastResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DiffExprResultSet {
    pub id: ResultSetId,
    pub factor_name: FactorName,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub contrast_names: Vec<ContrastName>,
    pub results: Vec<DiffExprResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DiffExprAnalysis {
    pub experiment_short_name: ExperimentShortName,
    pub result_sets: Vec<DiffExprResultSet>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatrixRowDescriptor {
    pub probe_name: ProbeName,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub gene_symbols: Vec<GeneSymbol>,
}

/// An expression data matrix for JSON export.  Missing values and NaNs
/// are stored as None so that they serialize as null.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExpressionDataMatrix {
    pub experiment_short_name: ExperimentShortName,
    pub quantitation_type: QuantitationTypeDetails,
    pub rows: Vec<MatrixRowDescriptor>,
    pub sample_names: Vec<FlexStr>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl ExpressionDataMatrix {
    pub fn from_raw_values(experiment_short_name: ExperimentShortName,
                           quantitation_type: QuantitationTypeDetails,
                           rows: Vec<MatrixRowDescriptor>,
                           sample_names: Vec<FlexStr>,
                           raw_values: Vec<Vec<f64>>)
        -> ExpressionDataMatrix
    {
        let values = raw_values.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| if v.is_finite() { Some(v) } else { None })
                    .collect()
            })
            .collect();

        ExpressionDataMatrix {
            experiment_short_name,
            quantitation_type,
            rows,
            sample_names,
            values,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    // ISO-8601, eg. "2023-05-11"
    pub date: FlexStr,
    pub message: FlexStr,
}

