/// Converts an arbitrary display name into an identifier that is valid in
/// the generated project file.
///
/// The result contains only `[a-z0-9_]`: the name is lowercased and every
/// other character (dots, slashes, dashes, spaces, punctuation) becomes an
/// underscore. Identifiers must not start with a digit, so a literal `a_`
/// is prepended when the first character is one. An empty name is returned
/// unchanged.
///
/// The function is idempotent: a second pass maps underscores to
/// underscores, and a prefixed name starts with `a`, so it is never
/// prefixed twice.
pub fn normalize(name: &str) -> String {
    let mut ident: String = name
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();

    if ident.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
        ident.insert_str(0, "a_");
    }

    ident
}
