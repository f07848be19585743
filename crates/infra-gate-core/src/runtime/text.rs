// crates/infra-gate-core/src/runtime/text.rs
// ============================================================================
// Module: Text Helpers
// Description: Substring counting and block extraction over artifact text.
// Purpose: Share the few text primitives the artifact suites need.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! Artifacts are matched as plain text, never parsed as HCL or shell. Block
//! extraction uses the same shape everywhere: a header literal, optional
//! whitespace, then a brace-delimited body without nested closing braces.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

// ============================================================================
// SECTION: Counting
// ============================================================================

/// Counts non-overlapping occurrences of `needle` in `haystack`.
///
/// An empty needle counts as zero occurrences.
#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Counts how many of `terms` occur in `haystack`.
#[must_use]
pub fn count_present_terms(haystack: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| haystack.contains(*term)).count()
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Returns the first `header { ... }` block in `content`.
///
/// The body ends at the first `}`; nested blocks are not supported.
///
/// # Errors
///
/// Returns [`regex::Error`] if the derived pattern fails to compile.
pub fn extract_block<'a>(content: &'a str, header: &str) -> Result<Option<&'a str>, regex::Error> {
    let pattern = format!(r"{}\s*\{{[^}}]+\}}", regex::escape(header));
    let block = Regex::new(&pattern)?;
    Ok(block.find(content).map(|found| found.as_str()))
}

/// Returns the text from the first `start` up to the next `end` after it.
///
/// Yields an empty string when `start` is absent and runs to the end of the
/// content when `end` is absent.
#[must_use]
pub fn section_between<'a>(content: &'a str, start: &str, end: &str) -> &'a str {
    let Some(begin) = content.find(start) else {
        return "";
    };
    let tail = &content[begin ..];
    let search_from = start.len().min(tail.len());
    tail[search_from ..].find(end).map_or(tail, |offset| &tail[.. search_from + offset])
}

/// Returns the first `count` lines of `content` joined with `\n`.
#[must_use]
pub fn first_lines(content: &str, count: usize) -> String {
    content.lines().take(count).collect::<Vec<_>>().join("\n")
}

/// Returns the first line with non-whitespace content, untrimmed.
#[must_use]
pub fn first_non_blank_line(content: &str) -> Option<&str> {
    content.lines().find(|line| !line.trim().is_empty())
}

/// Returns at most the first `limit` characters of `content`.
#[must_use]
pub fn char_prefix(content: &str, limit: usize) -> &str {
    content.char_indices().nth(limit).map_or(content, |(index, _)| &content[.. index])
}
