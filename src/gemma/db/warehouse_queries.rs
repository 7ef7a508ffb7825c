//! Raw-SQL reporting queries.  These read the per-experiment analysis
//! tables that are too large to hold in `Raw`, returning flat rows for
//! post-processing.

use tokio_postgres::Client;

use flexstr::{SharedStr as FlexStr, ToSharedStr};

use crate::data_types::{ChangelogEntry, ContrastResult};
use crate::types::*;

/// One probe-level coexpression link between the query gene and a found
/// gene, from one experiment.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CoexpressionLinkRow {
    pub found_gene_uniquename: GeneUniquename,
    pub query_probe_name: ProbeName,
    pub found_probe_name: ProbeName,
    pub experiment_id: ExperimentId,
    pub score: f64,
}

// probe-probe links resolved to genes through the gene2cs junction table
// on both sides
const COEXPRESSION_LINK_SQL: &str = "
SELECT found_gene.uniquename,
       query_probe.name,
       found_probe.name,
       link.expression_experiment_id,
       link.score
FROM probe_coexpression link
     JOIN composite_sequence query_probe
          ON query_probe.composite_sequence_id = link.first_probe_id
     JOIN composite_sequence found_probe
          ON found_probe.composite_sequence_id = link.second_probe_id
     JOIN gene2cs query_g2cs
          ON query_g2cs.composite_sequence_id = query_probe.composite_sequence_id
     JOIN gene2cs found_g2cs
          ON found_g2cs.composite_sequence_id = found_probe.composite_sequence_id
     JOIN gene query_gene ON query_gene.gene_id = query_g2cs.gene_id
     JOIN gene found_gene ON found_gene.gene_id = found_g2cs.gene_id
WHERE query_gene.uniquename = $1
";

pub async fn get_coexpression_links(conn: &mut Client,
                                    query_gene_uniquename: &GeneUniquename)
    -> Result<Vec<CoexpressionLinkRow>, tokio_postgres::Error>
{
    let mut ret = vec![];

    let result = conn.query(COEXPRESSION_LINK_SQL,
                            &[&query_gene_uniquename.as_str()]).await?;

    for row in &result {
        let found_gene_uniquename: String = row.get(0);
        let query_probe_name: String = row.get(1);
        let found_probe_name: String = row.get(2);
        let link = CoexpressionLinkRow {
            found_gene_uniquename: found_gene_uniquename.to_shared_str(),
            query_probe_name: query_probe_name.to_shared_str(),
            found_probe_name: found_probe_name.to_shared_str(),
            experiment_id: row.get(3),
            score: row.get(4),
        };
        ret.push(link);
    }

    Ok(ret)
}

// experiments whose platform carries at least one probe for the gene -
// the universe the coexpression support is counted against
const TESTED_EXPERIMENTS_SQL: &str = "
SELECT DISTINCT ee.expression_experiment_id
FROM expression_experiment ee
     JOIN experiment_platform ep
          ON ep.expression_experiment_id = ee.expression_experiment_id
     JOIN composite_sequence cs ON cs.array_design_id = ep.array_design_id
     JOIN gene2cs g2cs ON g2cs.composite_sequence_id = cs.composite_sequence_id
     JOIN gene ON gene.gene_id = g2cs.gene_id
WHERE gene.uniquename = $1
";

pub async fn get_tested_experiments(conn: &mut Client,
                                    query_gene_uniquename: &GeneUniquename)
    -> Result<Vec<ExperimentId>, tokio_postgres::Error>
{
    let mut ret = vec![];

    let result = conn.query(TESTED_EXPERIMENTS_SQL,
                            &[&query_gene_uniquename.as_str()]).await?;

    for row in &result {
        ret.push(row.get(0));
    }

    Ok(ret)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DiffExprResultSetRow {
    pub id: ResultSetId,
    pub factor_name: FactorName,
    pub contrast_names: Vec<ContrastName>,
}

const RESULT_SET_SQL: &str = "
SELECT rs.result_set_id, rs.factor_name, c.contrast_name
FROM diff_expr_result_set rs
     JOIN expression_experiment ee
          ON ee.expression_experiment_id = rs.expression_experiment_id
     LEFT OUTER JOIN diff_expr_contrast c ON c.result_set_id = rs.result_set_id
WHERE ee.short_name = $1
ORDER BY rs.result_set_id, c.contrast_order
";

pub async fn get_result_sets(conn: &mut Client, experiment_short_name: &str)
    -> Result<Vec<DiffExprResultSetRow>, tokio_postgres::Error>
{
    let mut ret: Vec<DiffExprResultSetRow> = vec![];

    let result = conn.query(RESULT_SET_SQL, &[&experiment_short_name]).await?;

    for row in &result {
        let result_set_id: i64 = row.get(0);
        let factor_name: String = row.get(1);
        let contrast_name: Option<String> = row.get(2);

        if ret.last().map(|result_set| result_set.id) != Some(result_set_id) {
            ret.push(DiffExprResultSetRow {
                id: result_set_id,
                factor_name: factor_name.to_shared_str(),
                contrast_names: vec![],
            });
        }

        if let Some(contrast_name) = contrast_name {
            ret.last_mut().unwrap().contrast_names.push(contrast_name.to_shared_str());
        }
    }

    Ok(ret)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DiffExprResultRow {
    pub result_set_id: ResultSetId,
    pub probe_name: ProbeName,
    pub pvalue: Option<f64>,
    pub corrected_pvalue: Option<f64>,
    pub rank: Option<f64>,
    // per-contrast, in contrast_order
    pub log2_fold_changes: Vec<Option<f64>>,
    pub t_stats: Vec<Option<f64>>,
    pub contrast_pvalues: Vec<Option<f64>>,
}

impl DiffExprResultRow {
    pub fn contrast_results(&self) -> Vec<ContrastResult> {
        (0..self.log2_fold_changes.len())
            .map(|idx| ContrastResult {
                log2_fold_change: self.log2_fold_changes[idx],
                t_stat: self.t_stats.get(idx).copied().flatten(),
                pvalue: self.contrast_pvalues.get(idx).copied().flatten(),
            })
            .collect()
    }
}

const DIFF_EXPR_RESULT_SQL: &str = "
SELECT r.result_set_id, cs.name, r.pvalue, r.corrected_pvalue, r.rank,
       c.log2_fold_change, c.t_stat, c.pvalue
FROM diff_expr_result r
     JOIN diff_expr_result_set rs ON rs.result_set_id = r.result_set_id
     JOIN expression_experiment ee
          ON ee.expression_experiment_id = rs.expression_experiment_id
     JOIN composite_sequence cs ON cs.composite_sequence_id = r.probe_id
     LEFT OUTER JOIN diff_expr_contrast_result c ON c.result_id = r.result_id
WHERE ee.short_name = $1
ORDER BY r.result_set_id, cs.name, c.contrast_order
";

pub async fn get_diff_expr_results(conn: &mut Client, experiment_short_name: &str)
    -> Result<Vec<DiffExprResultRow>, tokio_postgres::Error>
{
    let mut ret: Vec<DiffExprResultRow> = vec![];

    let result = conn.query(DIFF_EXPR_RESULT_SQL, &[&experiment_short_name]).await?;

    for row in &result {
        let result_set_id: i64 = row.get(0);
        let probe_name_string: String = row.get(1);
        let probe_name: FlexStr = probe_name_string.to_shared_str();

        let same_result =
            ret.last().map(|r| (r.result_set_id, r.probe_name.clone())) ==
            Some((result_set_id, probe_name.clone()));

        if !same_result {
            ret.push(DiffExprResultRow {
                result_set_id,
                probe_name,
                pvalue: row.get(2),
                corrected_pvalue: row.get(3),
                rank: row.get(4),
                log2_fold_changes: vec![],
                t_stats: vec![],
                contrast_pvalues: vec![],
            });
        }

        let log2_fold_change: Option<f64> = row.get(5);
        let t_stat: Option<f64> = row.get(6);
        let contrast_pvalue: Option<f64> = row.get(7);

        // a row with no contrast columns comes from the outer join
        if log2_fold_change.is_some() || t_stat.is_some() || contrast_pvalue.is_some() {
            let current = ret.last_mut().unwrap();
            current.log2_fold_changes.push(log2_fold_change);
            current.t_stats.push(t_stat);
            current.contrast_pvalues.push(contrast_pvalue);
        }
    }

    Ok(ret)
}

const MATRIX_SAMPLE_SQL: &str = "
SELECT ba.name
FROM bioassay ba
     JOIN expression_experiment ee
          ON ee.expression_experiment_id = ba.expression_experiment_id
WHERE ee.short_name = $1
ORDER BY ba.bioassay_id
";

const MATRIX_VECTOR_SQL: &str = "
SELECT cs.name, v.data
FROM processed_data_vector v
     JOIN composite_sequence cs ON cs.composite_sequence_id = v.probe_id
     JOIN expression_experiment ee
          ON ee.expression_experiment_id = v.expression_experiment_id
WHERE ee.short_name = $1
ORDER BY cs.name
";

pub async fn get_matrix_sample_names(conn: &mut Client, experiment_short_name: &str)
    -> Result<Vec<FlexStr>, tokio_postgres::Error>
{
    let mut ret = vec![];

    let result = conn.query(MATRIX_SAMPLE_SQL, &[&experiment_short_name]).await?;

    for row in &result {
        let name: String = row.get(0);
        ret.push(name.to_shared_str());
    }

    Ok(ret)
}

/// The processed data vectors of one experiment: probe name and one value
/// per sample, in `get_matrix_sample_names()` order.
pub async fn get_matrix_vectors(conn: &mut Client, experiment_short_name: &str)
    -> Result<Vec<(ProbeName, Vec<f64>)>, tokio_postgres::Error>
{
    let mut ret = vec![];

    let result = conn.query(MATRIX_VECTOR_SQL, &[&experiment_short_name]).await?;

    for row in &result {
        let probe_name: String = row.get(0);
        let data: Vec<f64> = row.get(1);
        ret.push((probe_name.to_shared_str(), data));
    }

    Ok(ret)
}

// audit trail rows backing the per-experiment changelog exports
const CHANGELOG_SQL: &str = "
SELECT to_char(event.event_date, 'YYYY-MM-DD'), event.note
FROM audit_event event
     JOIN expression_experiment ee
          ON ee.expression_experiment_id = event.expression_experiment_id
WHERE ee.short_name = $1
ORDER BY event.event_date DESC, event.audit_event_id DESC
";

pub async fn get_changelog_entries(conn: &mut Client, experiment_short_name: &str)
    -> Result<Vec<ChangelogEntry>, tokio_postgres::Error>
{
    let mut ret = vec![];

    let result = conn.query(CHANGELOG_SQL, &[&experiment_short_name]).await?;

    for row in &result {
        let date: String = row.get(0);
        let note: String = row.get(1);
        ret.push(ChangelogEntry {
            date: date.to_shared_str(),
            message: note.to_shared_str(),
        });
    }

    Ok(ret)
}
