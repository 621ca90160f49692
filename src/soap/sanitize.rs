//! Payload cleanup before embedding in the envelope.
//!
//! The signing step leaves a default-prefixed XML-DSig namespace, `standalone`
//! attributes and an XML declaration in the payload. BHISS rejects all of them
//! inside `nfseDadosMsg`, as well as line breaks and indentation.

/// Fragments removed from the payload, applied in this order.
pub const NOISE_FRAGMENTS: [&str; 8] = [
    r#"xmlns:default="http://www.w3.org/2000/09/xmldsig#""#,
    r#" standalone="no""#,
    "default:",
    ":default",
    "\n",
    "\r",
    "\t",
    "  ",
];

/// XML declarations removed after the noise fragments.
pub const XML_DECLARATIONS: [&str; 5] = [
    r#"<?xml version="1.0"?>"#,
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#,
    r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#,
];

/// Strip every known noise fragment from `raw`.
///
/// Removal can join two halves into a new fragment (`de` + `fault:`), so
/// passes repeat until nothing changes. Each pass only shortens the string,
/// and the fixpoint makes the function idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut current = remove_once(raw);
    loop {
        let next = remove_once(&current);
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

fn remove_once(input: &str) -> String {
    NOISE_FRAGMENTS
        .iter()
        .chain(XML_DECLARATIONS.iter())
        .fold(input.to_string(), |acc, fragment| acc.replace(fragment, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_declaration_and_whitespace() {
        let raw = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Lote>\n\t<Rps>1</Rps>\r\n</Lote>";
        assert_eq!(sanitize(raw), "<Lote><Rps>1</Rps></Lote>");
    }

    #[test]
    fn strips_default_signature_prefix() {
        let raw = r#"<default:Signature xmlns:default="http://www.w3.org/2000/09/xmldsig#"><default:SignedInfo/></default:Signature>"#;
        assert_eq!(sanitize(raw), "<Signature ><SignedInfo/></Signature>");
    }

    #[test]
    fn standalone_declaration_collapses() {
        let raw = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?><Lote/>"#;
        assert_eq!(sanitize(raw), "<Lote/>");
    }

    #[test]
    fn joined_fragment_is_removed_too() {
        assert_eq!(sanitize("<a>de\tfault:x</a>"), "<a>x</a>");
    }

    #[test]
    fn single_spaces_survive() {
        assert_eq!(sanitize("<a b=\"1\">x y</a>"), "<a b=\"1\">x y</a>");
        assert_eq!(sanitize("x   y"), "x y");
    }

    #[test]
    fn empty_input() {
        assert_eq!(sanitize(""), "");
    }
}
