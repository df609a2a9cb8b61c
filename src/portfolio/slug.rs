/// Slug derivation for project titles
///
/// "Hello World" becomes "hello-world". Runs of non-alphanumeric characters
/// collapse into a single hyphen and leading/trailing separators are
/// dropped. Uniqueness is not enforced here.

/// Derive a URL-safe slug from a title
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            // Non-ASCII letters are dropped along with punctuation
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn punctuation_collapses_to_single_hyphen() {
        assert_eq!(slugify("Rust & Axum: CRUD!"), "rust-axum-crud");
        assert_eq!(slugify("one --- two"), "one-two");
    }

    #[test]
    fn leading_and_trailing_junk_is_trimmed() {
        assert_eq!(slugify("  --Hello--  "), "hello");
    }

    #[test]
    fn digits_survive() {
        assert_eq!(slugify("Portfolio v2.0"), "portfolio-v2-0");
    }

    #[test]
    fn empty_and_symbol_only_titles() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(slugify("Café Site"), "caf-site");
    }
}
