pub const DATABASE_NAME: &str = "Gemma";

pub const API_MAPS_SQLITE3_FILE_NAME: &str = "api_maps.sqlite3";

pub const API_MAPS_TABLE_NAMES: &[&str; 3] =
    &["genes", "platforms", "experiments"];

pub const ANNOTATION_FILE_SUFFIX: &str = ".an.txt.gz";
