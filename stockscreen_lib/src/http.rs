//! Helpers shared by the provider clients.

/// Maximum number of characters of a response body kept in an error.
const MAX_SNIPPET: usize = 200;

/// First [`MAX_SNIPPET`] characters of `body`, with `...` appended when cut.
pub(crate) fn snippet(body: &str) -> String {
    match body.char_indices().nth(MAX_SNIPPET) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Text of the innermost error in `err`'s source chain.
///
/// Transport errors wrap the useful part ("operation timed out", "Connection
/// refused") a few levels down; status labels keep only that.
pub(crate) fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}
