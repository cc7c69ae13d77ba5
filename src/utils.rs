/// Removes trailing site suffixes such as `" | FROM JAPAN"` from a title.
///
/// Suffixes are checked in order and each one is stripped at most once. A
/// suffix also matches when it makes up the whole (already trimmed) title.
pub fn strip_suffixes(title: &str, suffixes: &[&str]) -> String {
    let mut name = title.trim().to_string();
    for suffix in suffixes {
        let core = suffix.trim_start();
        if let Some(rest) = name.strip_suffix(core) {
            if rest.is_empty() || rest.ends_with(char::is_whitespace) {
                name = rest.trim().to_string();
            }
        }
    }
    name
}
