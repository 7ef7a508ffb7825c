use rusqlite::Connection;

use crate::constants::API_MAPS_TABLE_NAMES;
use crate::data_types::{ExpressionExperimentShort, PlatformShortNameMap,
                        UniquenameGeneMap};

pub fn make_maps_database_tables(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;

    for table_name in API_MAPS_TABLE_NAMES.iter() {
        tx.execute(
            &format!("CREATE TABLE {} (
                        id    TEXT PRIMARY KEY,
                        data  TEXT NOT NULL
                     )",
                     table_name),
            (),
        )?;
    }

    tx.commit()?;

    Ok(())
}

pub fn store_maps_into_database(conn: &mut Connection,
                                genes: &UniquenameGeneMap,
                                platforms: &PlatformShortNameMap,
                                experiments: &[ExpressionExperimentShort])
    -> anyhow::Result<()>
{
    let tx = conn.transaction()?;

    for (gene_uniquename, gene_details) in genes {
        let json = serde_json::value::to_value(gene_details)?;

        tx.execute("INSERT INTO genes (id, data) VALUES (?1, ?2)",
                   (gene_uniquename.as_str(), &json))?;
    }
    for (platform_short_name, platform_details) in platforms {
        let json = serde_json::value::to_value(platform_details)?;

        tx.execute("INSERT INTO platforms (id, data) VALUES (?1, ?2)",
                   (platform_short_name.as_str(), &json))?;
    }
    for experiment in experiments {
        let json = serde_json::value::to_value(experiment)?;

        tx.execute("INSERT INTO experiments (id, data) VALUES (?1, ?2)",
                   (experiment.short_name.as_str(), &json))?;
    }

    tx.commit()?;

    Ok(())
}
