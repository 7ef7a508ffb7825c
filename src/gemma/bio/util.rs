use flexstr::SharedStr as FlexStr;
use regex::Regex;

lazy_static! {
    static ref FIELD_WHITESPACE_RE: Regex = Regex::new(r"[\t\r\n]+").unwrap();
}

/// Collapse tabs and newlines in free text so it can't break a TSV row.
pub fn sanitize_field(field: &str) -> String {
    FIELD_WHITESPACE_RE.replace_all(field, " ").trim().to_owned()
}

/// The `|`-joined multi-value column convention of the annotation files.
pub fn pipe_join<'a>(values: impl Iterator<Item = &'a FlexStr>) -> String {
    itertools::join(values.map(FlexStr::as_str), "|")
}

/// Format an optional statistic for a TSV column, empty when missing.
pub fn format_opt_f64(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{}", value),
        None => String::new(),
    }
}
