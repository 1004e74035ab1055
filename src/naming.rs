//! Turning window classes into a workspace label.

use std::collections::HashMap;

/// Map a window class to its display name.
///
/// The lookup is case-insensitive (`app_names` keys are expected to be
/// lowercase already, see [`Config::normalized`](crate::config::Config::normalized)).
/// Unmapped classes are returned unchanged.
pub fn resolve<'a>(class: &'a str, app_names: &'a HashMap<String, String>) -> &'a str {
    app_names
        .get(&class.to_lowercase())
        .map(String::as_str)
        .unwrap_or(class)
}

/// Build the label `"<num>: <name><sep><name>..."`.
///
/// With `unique` set, later repeats of a name are dropped; the order of
/// first appearance is kept.
pub fn build_label<S: AsRef<str>>(num: i64, names: &[S], separator: &str, unique: bool) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(names.len());
    for name in names.iter().map(AsRef::as_ref) {
        if unique && kept.contains(&name) {
            continue;
        }
        kept.push(name);
    }
    format!("{}: {}", num, kept.join(separator))
}
