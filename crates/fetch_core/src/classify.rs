/// Message used when a status code has no entry in [`STATUS_MESSAGES`].
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Error!";

/// Status code assumed when a cycle failed before any response arrived.
pub const TRANSPORT_FALLBACK_STATUS: u16 = 400;

/// User-facing messages for the status codes we know how to explain.
pub const STATUS_MESSAGES: &[(u16, &str)] = &[
    (400, "Bad request!"),
    (401, "Unauthorized!"),
    (403, "Forbidden!"),
    (404, "Source not found!"),
];

/// Map an HTTP status code to its user-facing message, using
/// [`DEFAULT_FALLBACK_MESSAGE`] for unmapped codes.
pub fn classify(status_code: u16) -> &'static str {
    classify_or(status_code, DEFAULT_FALLBACK_MESSAGE)
}

/// Map an HTTP status code to its user-facing message, returning `fallback`
/// for any code not in the table.
pub fn classify_or(status_code: u16, fallback: &str) -> &str {
    STATUS_MESSAGES
        .iter()
        .find(|(code, _)| *code == status_code)
        .map(|(_, message)| *message)
        .unwrap_or(fallback)
}
