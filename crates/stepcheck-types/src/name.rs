//! Name normalisation shared by every tag lookup table.

/// Fold a user-supplied token into its lookup key.
///
/// Letters are lowercased and whitespace, `-` and `_` are dropped, so
/// `"Not Contains"`, `"not-contains"` and `"NOT_CONTAINS"` share one key.
/// Symbols are kept as written, with interior whitespace removed.
///
/// # Examples
///
/// ```
/// use stepcheck_types::normalise_name;
///
/// assert_eq!(normalise_name(" Not Contains "), "notcontains");
/// assert_eq!(normalise_name("starts_with"), "startswith");
/// assert_eq!(normalise_name("> ="), ">=");
/// ```
#[must_use]
pub fn normalise_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
