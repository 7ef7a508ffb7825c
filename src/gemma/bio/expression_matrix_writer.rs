use std::io::Write;

use crate::data_types::ExpressionDataMatrix;

/// JSON export of an expression data matrix.  NaNs were already mapped to
/// None by `ExpressionDataMatrix::from_raw_values()` so the output is
/// valid JSON with nulls for missing values.
pub fn write_matrix_json(out: &mut dyn Write, matrix: &ExpressionDataMatrix)
    -> anyhow::Result<()>
{
    serde_json::to_writer(&mut *out, matrix)?;
    out.write_all(b"\n")?;

    Ok(())
}
