//! Deterministic cache key generation.

/// Separator between the base URL and each `name_value` pair.
const CONNECTOR: &str = "_";

/// Build the cache key for a request.
///
/// Each parameter becomes `name_value`; those strings are sorted and joined
/// with `_` after the base URL, so the key does not depend on the order the
/// parameters were supplied in. A request with no parameters still carries
/// the trailing connector (`{base_url}_`).
pub fn construct_unique_key<I, K, V>(base_url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<String> = params
        .into_iter()
        .map(|(k, v)| format!("{}{CONNECTOR}{}", k.as_ref(), v.as_ref()))
        .collect();
    pairs.sort();

    format!("{base_url}{CONNECTOR}{}", pairs.join(CONNECTOR))
}
