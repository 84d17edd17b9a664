//! Truncation Utilities
//!
//! Keeps log lines readable when echoing whole rendered pages.

/// Collapse whitespace runs and shorten to about `max_bytes`, keeping the
/// head and tail of the content on UTF-8 boundaries.
pub fn truncate_text(content: &str, max_bytes: usize) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= max_bytes {
        return collapsed;
    }

    let half = max_bytes / 2;
    let head_end = boundary_before(&collapsed, half);
    let tail_start = boundary_after(&collapsed, collapsed.len() - half).max(head_end);

    format!(
        "{} ... [{} bytes omitted] ... {}",
        &collapsed[..head_end],
        tail_start - head_end,
        &collapsed[tail_start..]
    )
}

fn boundary_before(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn boundary_after(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
