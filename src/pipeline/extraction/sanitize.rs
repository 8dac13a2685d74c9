// Normalize raw transcripts before they are embedded in the prompt.
// Intentionally lossy: turn-by-turn line breaks do not survive.

/// Maximum transcript length sent to a provider (characters).
/// Prompt-size assumptions downstream depend on this exact cap.
pub const MAX_TRANSCRIPT_CHARS: usize = 50_000;

/// Sanitize a raw transcript: strip everything outside printable ASCII,
/// collapse whitespace runs to single spaces, trim, and silently truncate
/// at `MAX_TRANSCRIPT_CHARS`. Never fails; empty input is the caller's
/// problem (the orchestrator rejects it before calling this).
pub fn sanitize_transcript(raw: &str) -> String {
    let printable = strip_non_printable(raw);
    let collapsed = collapse_whitespace(&printable);
    truncate_chars(&collapsed, MAX_TRANSCRIPT_CHARS)
}

/// Keep printable ASCII plus newline/carriage-return/tab. Everything else
/// (control characters, zero-width marks, non-ASCII) is dropped. Stripping
/// runs before whitespace collapse so a removed character never leaves a
/// double space behind.
fn strip_non_printable(text: &str) -> String {
    text.chars()
        .filter(|c| (' '..='~').contains(c) || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Collapse every whitespace run (spaces, tabs, newlines) to one ASCII
/// space and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
