//! Ordering and paging of album listings.

use crate::types::{AlbumPage, AlbumSummary};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Albums per page in listings.
pub const ITEMS_PER_PAGE: usize = 20;

/// How an album listing is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlbumSort {
    /// Keep Last.fm's order (most played first for top albums)
    #[default]
    Default,
    /// Newest first; albums without a year go last, ties ordered by name
    Year,
    /// Alphabetical, ignoring a trailing `(YYYY)` in the title
    Name,
}

fn title_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((\d{4})\)").expect("title year pattern is valid"))
}

/// The year of an album: its known year, otherwise a `(YYYY)` group in its title.
pub fn extract_year(album: &AlbumSummary) -> Option<String> {
    if let Some(year) = &album.year {
        return Some(year.clone());
    }
    title_year_pattern()
        .captures(&album.name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The album title without the `(YYYY)` group [`extract_year`] would find.
pub fn display_name(album: &AlbumSummary) -> String {
    match extract_year(album) {
        Some(year) => album.name.replace(&format!("({year})"), "").trim().to_string(),
        None => album.name.clone(),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort an album listing. Sorting is stable.
pub fn sort_albums(mut albums: Vec<AlbumSummary>, sort: AlbumSort) -> Vec<AlbumSummary> {
    match sort {
        AlbumSort::Default => {}
        AlbumSort::Year => {
            let year_of = |album: &AlbumSummary| {
                extract_year(album)
                    .and_then(|y| y.parse::<u32>().ok())
                    .unwrap_or(0)
            };
            albums.sort_by(|a, b| {
                year_of(b)
                    .cmp(&year_of(a))
                    .then_with(|| compare_names(&a.name, &b.name))
            });
        }
        AlbumSort::Name => {
            albums.sort_by_cached_key(|album| display_name(album).to_lowercase());
        }
    }
    albums
}

/// Cut one page out of a listing.
///
/// Pages are 1-indexed; page 0 is treated as page 1. A page past the end is empty.
/// `per_page` of 0 is treated as [`ITEMS_PER_PAGE`].
pub fn paginate(albums: &[AlbumSummary], page: u32, per_page: usize) -> AlbumPage {
    let per_page = if per_page == 0 { ITEMS_PER_PAGE } else { per_page };
    let page = page.max(1);
    let total_pages = albums.len().div_ceil(per_page) as u32;

    let start = (page as usize - 1).saturating_mul(per_page);
    let page_albums = albums
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();

    AlbumPage {
        albums: page_albums,
        page_number: page,
        has_next_page: page < total_pages,
        total_pages,
    }
}
