//! Page-link window for rendering pagination controls.

/// Page numbers to render, with `None` standing for a gap ("…").
///
/// Always shows `edge` pages at both ends and `around` pages on each side of
/// the current page.
pub fn page_links(current_page: usize, last_page: usize, edge: usize, around: usize) -> Vec<Option<usize>> {
    if last_page == 0 {
        return Vec::new();
    }
    let current_page = current_page.clamp(1, last_page);

    let left_end = (1 + edge).min(last_page + 1);
    let mut links: Vec<Option<usize>> = (1..left_end).map(Some).collect();

    let mid_start = left_end.max(current_page.saturating_sub(around));
    let mid_end = (current_page + around + 1).min(last_page + 1);
    if mid_start > left_end {
        links.push(None);
    }
    links.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(edge) + 1);
    if right_start > mid_end {
        links.push(None);
    }
    links.extend((right_start..=last_page).map(Some));

    links
}

/// Renders the links as text, bracketing the current page.
pub fn render_links(current_page: usize, last_page: usize) -> String {
    page_links(current_page, last_page, 1, 2)
        .into_iter()
        .map(|link| match link {
            Some(page) if page == current_page => format!("[{page}]"),
            Some(page) => page.to_string(),
            None => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
