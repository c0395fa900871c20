use melody_scope::catalog::{display_name, extract_year};
use melody_scope::playcounts::MAX_ALBUMS_TO_FETCH_YEARS;
use melody_scope::{
    fetch_album_years, paginate, sort_albums, AlbumSort, MelodyScopeApi, Result, ITEMS_PER_PAGE,
};

/// Handle listing an artist's top albums
pub async fn handle_albums_command<A>(
    client: &A,
    artist: &str,
    sort: AlbumSort,
    page: u32,
    with_years: bool,
) -> Result<()>
where
    A: MelodyScopeApi + ?Sized,
{
    println!("💿 Top albums for '{artist}'");

    let mut albums = client.fetch_artist_top_albums(artist).await?;
    if albums.is_empty() {
        println!("  No albums found");
        return Ok(());
    }

    if with_years {
        albums = fetch_album_years(client, albums, MAX_ALBUMS_TO_FETCH_YEARS).await;
    }

    let albums = sort_albums(albums, sort);
    let page = paginate(&albums, page, ITEMS_PER_PAGE);
    let offset = (page.page_number as usize - 1) * ITEMS_PER_PAGE;

    for (i, album) in page.albums.iter().enumerate() {
        let year = extract_year(album)
            .map(|y| format!(" ({y})"))
            .unwrap_or_default();
        let plays = album
            .playcount
            .map(|p| format!(" - {p} plays"))
            .unwrap_or_default();
        println!("  {}. {}{year}{plays}", offset + i + 1, display_name(album));
    }

    println!(
        "\n📄 Page {} of {}{}",
        page.page_number,
        page.total_pages,
        if page.has_next_page {
            format!(" (next: --page {})", page.page_number + 1)
        } else {
            String::new()
        }
    );
    Ok(())
}
