use fetch_core::{classify, classify_or, DEFAULT_FALLBACK_MESSAGE, TRANSPORT_FALLBACK_STATUS};

#[test]
fn mapped_codes_return_their_messages() {
    assert_eq!(classify(400), "Bad request!");
    assert_eq!(classify(401), "Unauthorized!");
    assert_eq!(classify(403), "Forbidden!");
    assert_eq!(classify(404), "Source not found!");
}

#[test]
fn unmapped_codes_return_default_fallback() {
    for code in [0, 1, 200, 204, 302, 402, 405, 418, 500, 502, 503, 599, u16::MAX] {
        assert_eq!(classify(code), DEFAULT_FALLBACK_MESSAGE, "code {code}");
    }
    assert_eq!(DEFAULT_FALLBACK_MESSAGE, "Error!");
}

#[test]
fn explicit_fallback_only_applies_to_unmapped_codes() {
    assert_eq!(classify_or(500, "Server trouble"), "Server trouble");
    assert_eq!(classify_or(404, "Server trouble"), "Source not found!");
}

#[test]
fn transport_fallback_is_bad_request() {
    assert_eq!(classify(TRANSPORT_FALLBACK_STATUS), "Bad request!");
}
