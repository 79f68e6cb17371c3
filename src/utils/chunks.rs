/// Join streamed output chunks into one text blob for parsing
///
/// A line break is inserted between two chunks when the boundary between them is not
/// already a line break, so a partial line at the end of one chunk is never merged with
/// the start of the next. Empty chunks are skipped.
///
/// # Examples
///
/// ```
/// use agent_log_timeline::join_chunks;
///
/// assert_eq!(join_chunks(["user\nhel", "lo"]), "user\nhel\nlo");
/// assert_eq!(join_chunks(["codex\n", "done"]), "codex\ndone");
/// ```
pub fn join_chunks<I, S>(chunks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for chunk in chunks {
        let chunk = chunk.as_ref();
        if chunk.is_empty() {
            continue;
        }
        if !joined.is_empty() && !joined.ends_with('\n') && !chunk.starts_with('\n') {
            joined.push('\n');
        }
        joined.push_str(chunk);
    }
    joined
}
