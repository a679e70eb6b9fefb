//! Inline style helpers
//!
//! Only the `display` declaration matters to the storefront behaviours, so the
//! `style` attribute is treated as a list of `name: value` pairs and nothing
//! more.

/// Extract the `display` value from an inline style string
pub(crate) fn display_of(style: &str) -> Option<&str> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case("display"))
        .map(|(_, value)| value.trim())
        .last()
}

/// Rewrite an inline style string with a new `display` value.
/// An empty value removes the declaration.
pub(crate) fn with_display(style: &str, value: &str) -> String {
    let mut decls: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            decl.split_once(':')
                .is_none_or(|(name, _)| !name.trim().eq_ignore_ascii_case("display"))
        })
        .map(str::to_string)
        .collect();

    if !value.is_empty() {
        decls.push(format!("display: {value}"));
    }

    if decls.is_empty() {
        String::new()
    } else {
        format!("{};", decls.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_of() {
        assert_eq!(display_of("color: red; display: none"), Some("none"));
        assert_eq!(display_of("DISPLAY:block;"), Some("block"));
        assert_eq!(display_of("color: red"), None);
        assert_eq!(display_of(""), None);
    }

    #[test]
    fn test_with_display_replaces() {
        assert_eq!(with_display("color: red; display: block", "none"), "color: red; display: none;");
        assert_eq!(with_display("", "none"), "display: none;");
    }

    #[test]
    fn test_with_display_empty_resets() {
        assert_eq!(with_display("display: none;", ""), "");
        assert_eq!(with_display("color: red; display: none", ""), "color: red;");
    }
}
