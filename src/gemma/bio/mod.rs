pub mod util;
pub mod platform_annotation_writer;
pub mod diff_expression_writer;
pub mod coexpression_writer;
pub mod expression_matrix_writer;
pub mod changelog_writer;
