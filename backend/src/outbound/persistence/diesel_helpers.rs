//! Small helpers shared by the Diesel repositories.

use super::diesel_error_mapping::RepositoryError;

/// Build an `ILIKE` pattern matching `fragment` anywhere in the column.
///
/// `%`, `_` and `\` are escaped so the fragment is matched literally.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Convert loaded rows, failing on the first row that no longer validates.
pub(crate) fn collect_rows<T, R, V, E>(
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, V>,
) -> Result<Vec<T>, E>
where
    V: std::fmt::Display,
    E: RepositoryError,
{
    rows.into_iter()
        .map(|row| convert(row).map_err(|err| invalid_row(&err)))
        .collect()
}

/// Query error for a stored row that fails domain validation.
pub(crate) fn invalid_row<E: RepositoryError>(error: &impl std::fmt::Display) -> E {
    E::query(format!("stored row failed validation: {error}"))
}
