//! This modules defines the common functionality for paging data.

use maud::{Markup, html};

/// The page sizes a user can pick from.
pub const PAGE_SIZE_OPTIONS: [u64; 3] = [5, 10, 20];

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: PAGE_SIZE_OPTIONS[0],
            max_pages: 5,
        }
    }
}

impl PaginationConfig {
    /// Use `per_page` if it is one of [PAGE_SIZE_OPTIONS], otherwise the default.
    pub fn page_size_or_default(&self, per_page: Option<u64>) -> u64 {
        per_page
            .filter(|per_page| PAGE_SIZE_OPTIONS.contains(per_page))
            .unwrap_or(self.default_page_size)
    }

    /// Use `page` if it is at least 1, otherwise the default.
    pub fn page_or_default(&self, page: Option<u64>) -> u64 {
        page.filter(|page| *page >= 1).unwrap_or(self.default_page)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

const PAGE_LINK_STYLE: &str = "flex items-center justify-center px-3 h-8 leading-tight \
    text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 hover:text-gray-700 \
    dark:bg-gray-800 dark:border-gray-700 dark:text-gray-400 dark:hover:bg-gray-700 \
    dark:hover:text-white";
const CURRENT_PAGE_STYLE: &str = "flex items-center justify-center px-3 h-8 \
    text-blue-600 border border-gray-300 bg-blue-50 dark:border-gray-700 \
    dark:bg-gray-700 dark:text-white";

/// Render `indicators` as a list of page buttons.
///
/// Each button fetches `page_url(page)` into `target` with htmx.
pub fn pagination_nav(
    indicators: &[PaginationIndicator],
    target: &str,
    page_url: impl Fn(u64) -> String,
) -> Markup {
    let page_button = |page: u64, label: &str| {
        html! {
            button
                type="button"
                hx-get=(page_url(page))
                hx-target=(target)
                hx-swap="outerHTML"
                hx-sync=(format!("{target}:replace"))
                class=(PAGE_LINK_STYLE)
            {
                (label)
            }
        }
    };

    html! {
        nav aria-label="Pagination"
        {
            ul class="inline-flex -space-x-px text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => { (page_button(*page, &page.to_string())) }
                            PaginationIndicator::CurrPage(page) => {
                                span class=(CURRENT_PAGE_STYLE) aria-current="page" { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(PAGE_LINK_STYLE) { "..." }
                            }
                            PaginationIndicator::NextButton(page) => { (page_button(*page, "Next")) }
                            PaginationIndicator::BackButton(page) => { (page_button(*page, "Back")) }
                        }
                    }
                }
            }
        }
    }
}
