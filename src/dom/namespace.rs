//! Namespace-aware name resolution
//!
//! Only the binary switch is supported: with namespace awareness on, names
//! resolve to their local part and namespace declarations are not treated
//! as attributes. Prefixes are not resolved to URIs.

/// Split a qualified name into prefix and local name at the first colon
pub fn split_name(name: &str) -> (Option<&str>, &str) {
    match memchr::memchr(b':', name.as_bytes()) {
        Some(pos) if pos > 0 && pos + 1 < name.len() => (Some(&name[..pos]), &name[pos + 1..]),
        _ => (None, name),
    }
}

/// Name an element or attribute is stored under
#[inline]
pub fn resolve_name(qname: &str, namespace_aware: bool) -> &str {
    if namespace_aware {
        split_name(qname).1
    } else {
        qname
    }
}

/// `xmlns` or `xmlns:prefix`
#[inline]
pub fn is_namespace_declaration(qname: &str) -> bool {
    qname == "xmlns" || qname.starts_with("xmlns:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("svg:rect"), (Some("svg"), "rect"));
        assert_eq!(split_name("rect"), (None, "rect"));
        // Degenerate colons fall back to the qualified name
        assert_eq!(split_name(":rect"), (None, ":rect"));
        assert_eq!(split_name("svg:"), (None, "svg:"));
    }

    #[test]
    fn test_resolve_name() {
        assert_eq!(resolve_name("dc:title", true), "title");
        assert_eq!(resolve_name("dc:title", false), "dc:title");
    }

    #[test]
    fn test_namespace_declaration() {
        assert!(is_namespace_declaration("xmlns"));
        assert!(is_namespace_declaration("xmlns:dc"));
        assert!(!is_namespace_declaration("xmlnsx"));
        assert!(!is_namespace_declaration("id"));
    }
}
