//! References block appended to the compiled report.

use brandscope_common::Reference;

/// Render the accumulated citations as a markdown section. Duplicate URLs
/// keep their first occurrence; an empty list renders nothing.
pub fn format_references_section(references: &[Reference]) -> String {
    if references.is_empty() {
        return String::new();
    }

    let mut seen = std::collections::HashSet::new();
    let mut lines = vec!["## References".to_string(), String::new()];

    for reference in references {
        if !seen.insert(reference.url.as_str()) {
            continue;
        }
        match reference.title.as_deref() {
            Some(title) if !title.is_empty() => {
                lines.push(format!("* [{}]({})", title, reference.url));
            }
            _ => lines.push(format!("* {}", reference.url)),
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_references_render_nothing() {
        assert_eq!(format_references_section(&[]), "");
    }

    #[test]
    fn titled_and_bare_urls() {
        let refs = vec![
            Reference::new("https://youtube.com/@acme").with_title("youtube profile"),
            Reference::new("https://facebook.com/acme"),
        ];
        let section = format_references_section(&refs);
        assert!(section.starts_with("## References"));
        assert!(section.contains("* [youtube profile](https://youtube.com/@acme)"));
        assert!(section.contains("* https://facebook.com/acme"));
    }

    #[test]
    fn duplicate_urls_keep_first() {
        let refs = vec![
            Reference::new("https://acme.com").with_title("first"),
            Reference::new("https://acme.com").with_title("second"),
        ];
        let section = format_references_section(&refs);
        assert!(section.contains("first"));
        assert!(!section.contains("second"));
    }
}
