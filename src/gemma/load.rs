//! The mutating half of the gene access layer: create, update and remove
//! gene records inside one database transaction.

use anyhow::{bail, Result};

use deadpool_postgres::Client;

use flexstr::SharedStr as FlexStr;

use tracing::info;

use crate::db::Processed;
use crate::types::*;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GeneLocationInput {
    pub chromosome_name: FlexStr,
    pub nucleotide: i64,
    pub nucleotide_length: i64,
    #[serde(skip_serializing_if="Option::is_none")]
    pub strand: Option<FlexStr>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GeneInput {
    pub uniquename: GeneUniquename,
    pub symbol: GeneSymbol,
    #[serde(skip_serializing_if="Option::is_none")]
    pub name: Option<GeneName>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub ncbi_gene_id: Option<i64>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub ensembl_id: Option<FlexStr>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub description: Option<FlexStr>,
    #[serde(default)]
    pub gene_type: Option<FlexStr>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pub aliases: Vec<GeneAlias>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub location: Option<GeneLocationInput>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct GeneUpdate {
    #[serde(skip_serializing_if="Option::is_none")]
    pub symbol: Option<GeneSymbol>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub name: Option<GeneName>,
    #[serde(skip_serializing_if="Option::is_none")]
    pub description: Option<FlexStr>,
}

pub struct Loader {
    conn: Client,
    taxonid: TaxonId,
    processed: Processed,
}

const GENE_INSERT_SQL: &str = "INSERT INTO gene(uniquename, official_symbol, official_name, ncbi_gene_id, ensembl_id, description, gene_type, taxon_id)
VALUES ($1, $2, $3, $4, $5, $6, $7,
        (SELECT taxon_id FROM taxon WHERE ncbi_taxon_id = $8))";

const ALIAS_INSERT_SQL: &str = "INSERT INTO gene_alias(gene_id, alias)
VALUES ((SELECT gene_id FROM gene WHERE uniquename = $1), $2)
ON CONFLICT DO NOTHING";

const LOCATION_INSERT_SQL: &str = "INSERT INTO physical_location(gene_id, chromosome_id, nucleotide, nucleotide_length, strand)
VALUES ((SELECT gene_id FROM gene WHERE uniquename = $1),
        (SELECT c.chromosome_id FROM chromosome c
              JOIN taxon t ON t.taxon_id = c.taxon_id
             WHERE c.name = $2 AND t.ncbi_taxon_id = $3),
        $4, $5, $6)";

impl Loader {
    pub fn new(conn: Client, taxonid: TaxonId, processed: Processed) -> Loader {
        Loader {
            conn,
            taxonid,
            processed,
        }
    }

    pub async fn create_genes(&mut self, genes: &[GeneInput]) -> Result<()> {
        if self.processed.taxon_by_id(self.taxonid).is_none() {
            bail!("create failed, taxon not in database: {}", self.taxonid);
        }

        let trans = self.conn.transaction().await?;

        let gene_smt = trans.prepare(GENE_INSERT_SQL).await?;
        let alias_smt = trans.prepare(ALIAS_INSERT_SQL).await?;
        let location_smt = trans.prepare(LOCATION_INSERT_SQL).await?;

        for gene in genes {
            if self.processed.gene_by_uniquename(&gene.uniquename).is_some() {
                bail!("gene loading failed: {} is already in the database",
                      gene.uniquename);
            }

            if let Some(ref location) = gene.location {
                if self.processed.chromosome(self.taxonid,
                                             &location.chromosome_name).is_none() {
                    bail!("gene loading failed: no chromosome {} for taxon {}",
                          location.chromosome_name, self.taxonid);
                }
            }

            let uniquename = gene.uniquename.as_str();
            let symbol = gene.symbol.as_str();
            let name = gene.name.as_ref().map(|s| s.as_str());
            let ensembl_id = gene.ensembl_id.as_ref().map(|s| s.as_str());
            let description = gene.description.as_ref().map(|s| s.as_str());
            let gene_type = gene.gene_type.as_deref().unwrap_or("known");
            let taxonid = self.taxonid as i64;

            trans.query(&gene_smt,
                        &[&uniquename, &symbol, &name, &gene.ncbi_gene_id,
                          &ensembl_id, &description, &gene_type, &taxonid]).await?;

            for alias in &gene.aliases {
                trans.query(&alias_smt, &[&uniquename, &alias.as_str()]).await?;
            }

            if let Some(ref location) = gene.location {
                let chromosome_name = location.chromosome_name.as_str();
                let strand = location.strand.as_ref().map(|s| s.as_str());
                trans.query(&location_smt,
                            &[&uniquename, &chromosome_name, &taxonid,
                              &location.nucleotide, &location.nucleotide_length,
                              &strand]).await?;
            }
        }

        trans.commit().await?;

        info!("created {} genes for taxon {}", genes.len(), self.taxonid);

        Ok(())
    }

    pub async fn update_gene(&mut self, uniquename: &GeneUniquename,
                             update: &GeneUpdate) -> Result<()> {
        let Some(existing) = self.processed.gene_by_uniquename(uniquename)
        else {
            bail!("update failed: can't find {} in the database", uniquename);
        };

        let symbol =
            update.symbol.clone().unwrap_or_else(|| existing.symbol.clone());
        let name =
            update.name.clone().or_else(|| existing.name.clone());
        let description =
            update.description.clone().or_else(|| existing.description.clone());

        let trans = self.conn.transaction().await?;

        trans.query("UPDATE gene SET official_symbol = $1, official_name = $2, description = $3
 WHERE uniquename = $4",
                    &[&symbol.as_str(),
                      &name.as_ref().map(|s| s.as_str()),
                      &description.as_ref().map(|s| s.as_str()),
                      &uniquename.as_str()]).await?;

        trans.commit().await?;

        info!("updated gene {}", uniquename);

        Ok(())
    }

    pub async fn remove_gene(&mut self, uniquename: &GeneUniquename) -> Result<()> {
        if self.processed.gene_by_uniquename(uniquename).is_none() {
            bail!("remove failed: can't find {} in the database", uniquename);
        }

        let trans = self.conn.transaction().await?;

        // dependent rows first, the schema has no ON DELETE CASCADE
        for delete_sql in
            ["DELETE FROM gene_alias WHERE gene_id = (SELECT gene_id FROM gene WHERE uniquename = $1)",
             "DELETE FROM physical_location WHERE gene_id = (SELECT gene_id FROM gene WHERE uniquename = $1)",
             "DELETE FROM gene2cs WHERE gene_id = (SELECT gene_id FROM gene WHERE uniquename = $1)",
             "DELETE FROM go_annotation WHERE gene_id = (SELECT gene_id FROM gene WHERE uniquename = $1)",
             "DELETE FROM gene WHERE uniquename = $1"]
        {
            trans.query(delete_sql, &[&uniquename.as_str()]).await?;
        }

        trans.commit().await?;

        info!("removed gene {}", uniquename);

        Ok(())
    }
}
