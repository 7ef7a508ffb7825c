use flexstr::SharedStr as FlexStr;

pub type GeneUniquename = FlexStr;
pub type GeneSymbol = FlexStr;
pub type GeneName = FlexStr;
pub type GeneAlias = FlexStr;

pub type TermId = FlexStr;
pub type TermName = FlexStr;

pub type ChromosomeName = FlexStr;
pub type QtlUniquename = FlexStr;

pub type ProbeName = FlexStr;
pub type PlatformShortName = FlexStr;
pub type ExperimentShortName = FlexStr;
pub type FactorName = FlexStr;
pub type ContrastName = FlexStr;

pub type TaxonId = u32;
pub type ExperimentId = i64;
pub type ResultSetId = i64;
