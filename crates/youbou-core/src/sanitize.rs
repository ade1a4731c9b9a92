//! Submission text sanitization.

/// Maximum number of characters kept from a submission, counted before
/// escaping.
pub const MAX_SUBMISSION_CHARS: usize = 200;

/// Bounds and escapes free-text input before it is echoed to the channel.
///
/// Keeps the first [`MAX_SUBMISSION_CHARS`] characters (not bytes), then
/// replaces `<` with `&lt;` and `>` with `&gt;`. Truncation happens first, so
/// the escaped result can be longer than the cap. No other character is
/// touched; in particular `&` is left alone.
///
/// ```
/// use youbou_core::sanitize;
///
/// assert_eq!(sanitize("<b>more snacks</b>"), "&lt;b&gt;more snacks&lt;/b&gt;");
/// ```
pub fn sanitize(text: &str) -> String {
    let bounded: String = text.chars().take(MAX_SUBMISSION_CHARS).collect();
    bounded.replace('<', "&lt;").replace('>', "&gt;")
}
