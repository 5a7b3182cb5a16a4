//! Plain-text rendering of a listing page
//!
//! Mirrors what the listing widget shows: one card per dataset, an
//! empty-state or error message, and a pager whose controls follow
//! [`PagerState`].

use std::fmt::Write;

use crate::api::PagerState;
use crate::data::ResultPage;

/// Longest description shown on a card, in characters
pub const DESCRIPTION_LIMIT: usize = 256;

pub const UNTITLED: &str = "Untitled dataset";
pub const NO_RESULTS: &str = "No datasets found for the current filters.";
pub const LOAD_ERROR: &str = "We could not load the datasets right now. Please try again later.";

/// Renders a successfully fetched page
pub fn render_text(page: &ResultPage) -> String {
    let mut out = String::new();

    if page.items.is_empty() {
        out.push_str(NO_RESULTS);
        out.push('\n');
    }

    for item in &page.items {
        let title = if item.title.is_empty() { UNTITLED } else { &item.title };
        let _ = writeln!(out, "{}", title);

        if !item.organization.is_empty() {
            let _ = writeln!(out, "  Organization: {}", item.organization);
        }

        let description = truncate_text(&item.description, DESCRIPTION_LIMIT);
        if !description.is_empty() {
            let _ = writeln!(out, "  {}", description);
        }

        if !item.link.is_empty() {
            let _ = writeln!(out, "  View details: {}", item.link);
        }
        out.push('\n');
    }

    out.push_str(&render_pager(page.page, PagerState::from_page(page)));
    out
}

/// Renders the failure state: message plus a fully disabled pager
pub fn render_error(page: u64) -> String {
    format!(
        "{}\n\n{}",
        LOAD_ERROR,
        render_pager(page, PagerState::disabled())
    )
}

fn render_pager(page: u64, pager: PagerState) -> String {
    let control = |label: &str, enabled: bool| {
        if enabled {
            format!("[{}]", label)
        } else {
            format!("({} disabled)", label)
        }
    };
    format!(
        "{}  Page {}  {}\n",
        control("Previous", pager.previous_enabled),
        page,
        control("Next", pager.next_enabled)
    )
}

/// Trims `value` and shortens it to at most `max_len` characters, ending
/// in `...` when cut
pub fn truncate_text(value: &str, max_len: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let cut: String = trimmed.chars().take(keep).collect();
    format!("{}...", cut.trim_end())
}
