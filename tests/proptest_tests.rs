//! Property-based tests for the sanitizer and the envelope builder.

use bhiss_nfse::soap::*;
use proptest::prelude::*;

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Strings assembled from noise fragments, declarations and their halves,
/// so removals can join pieces into new fragments.
fn arb_noisy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        prop::sample::select(NOISE_FRAGMENTS.to_vec()).prop_map(String::from),
        prop::sample::select(XML_DECLARATIONS.to_vec()).prop_map(String::from),
        prop::sample::select(vec!["de", "fault", "fault:", ":de", " ", "<?xml", "?>", "<Lote>", "</Lote>"])
            .prop_map(String::from),
        "[a-zA-Z0-9<>/=\" :]{0,6}",
    ];
    prop::collection::vec(piece, 0..16).prop_map(|parts| parts.concat())
}

/// XML NCName-like method names.
fn arb_method() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,30}"
}

/// Payloads that cannot close a CDATA section.
fn arb_payload() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9<>/=\" .&;]{0,60}".prop_map(|s| sanitize(&s))
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

proptest! {
    /// sanitize(sanitize(s)) == sanitize(s) for arbitrary input.
    #[test]
    fn sanitize_idempotent_arbitrary(s in any::<String>()) {
        let once = sanitize(&s);
        prop_assert_eq!(sanitize(&once), once);
    }

    /// Idempotence on inputs dense with fragments.
    #[test]
    fn sanitize_idempotent_noisy(s in arb_noisy()) {
        let once = sanitize(&s);
        prop_assert_eq!(sanitize(&once), once.clone());
        for fragment in NOISE_FRAGMENTS.iter().chain(XML_DECLARATIONS.iter()) {
            prop_assert!(!once.contains(fragment));
        }
    }

    /// Output never grows.
    #[test]
    fn sanitize_never_grows(s in arb_noisy()) {
        prop_assert!(sanitize(&s).len() <= s.len());
    }

    /// One header block with the fixed literal, one payload block with p verbatim.
    #[test]
    fn envelope_structure(method in arb_method(), payload in arb_payload()) {
        let envelope = build_envelope(&method, &payload);

        prop_assert_eq!(count(&envelope, "<nfseCabecMsg>"), 1);
        prop_assert_eq!(count(&envelope, "<nfseDadosMsg>"), 1);
        let header = format!("<nfseCabecMsg><![CDATA[{CABECALHO}]]></nfseCabecMsg>");
        prop_assert_eq!(count(&envelope, &header), 1);

        let start = envelope.find("<nfseDadosMsg><![CDATA[").unwrap() + "<nfseDadosMsg><![CDATA[".len();
        let end = envelope.rfind("]]></nfseDadosMsg>").unwrap();
        prop_assert_eq!(&envelope[start..end], payload.as_str());

        let open = format!("<ns2:{method} xmlns:ns2=\"{BHISS_NS}\">");
        let close = format!("</ns2:{method}>");
        prop_assert!(envelope.contains(&open));
        prop_assert!(envelope.contains(&close));
    }

    /// Dropping a trailing "Request" is the only change to the method name.
    #[test]
    fn operation_derivation(method in arb_method()) {
        let with_suffix = format!("{method}Request");
        prop_assert_eq!(derive_operation(&with_suffix), method.as_str());
        if !method.ends_with("Request") {
            prop_assert_eq!(derive_operation(&method), method.as_str());
        }
    }
}
