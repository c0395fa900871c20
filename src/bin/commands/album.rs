use melody_scope::playcounts::{MAX_TRACKS_FOR_GRAPH, MAX_TRACKS_TO_FETCH_PLAYCOUNTS};
use melody_scope::{
    fetch_track_playcounts, format_duration, top_tracks_by_playcount, FavouritesStore,
    MelodyScopeApi, Result, StateStorage,
};
use std::collections::BTreeMap;

/// Handle showing one album with its tracks
pub async fn handle_album_command<A, S>(
    client: &A,
    store: &FavouritesStore<S>,
    artist: &str,
    album_name: &str,
    with_playcounts: bool,
) -> Result<()>
where
    A: MelodyScopeApi + ?Sized,
    S: StateStorage,
{
    let Some(album) = client.fetch_album_details(artist, album_name).await? else {
        println!("❌ Album '{album_name}' by '{artist}' not found");
        return Ok(());
    };

    println!("💿 {album}");
    if let Some(listeners) = &album.listeners {
        println!("   Listeners: {listeners}");
    }
    if let Some(playcount) = &album.playcount {
        println!("   Plays: {playcount}");
    }
    let cover = album.cover_url();
    if !cover.is_empty() {
        println!("   Cover: {cover}");
    }
    println!("   {}", album.url);

    let playcounts = if with_playcounts {
        fetch_track_playcounts(client, &album.artist, &album.tracks, MAX_TRACKS_TO_FETCH_PLAYCOUNTS)
            .await
    } else {
        BTreeMap::new()
    };

    println!();
    for (i, track) in album.tracks.iter().enumerate() {
        let heart = if store.is_favourite(&track.name, &album.artist) {
            "❤"
        } else {
            " "
        };
        let plays = playcounts
            .get(&i)
            .copied()
            .or(track.playcount)
            .map(|p| format!("  {p} plays"))
            .unwrap_or_default();
        println!(
            "  {heart} {:>2}. {} [{}]{plays}",
            i + 1,
            track.name,
            format_duration(track.duration_seconds)
        );
    }

    if with_playcounts {
        let top = top_tracks_by_playcount(&album.tracks, &playcounts, MAX_TRACKS_FOR_GRAPH);
        if !top.is_empty() {
            println!("\n📊 Most played");
            for row in top {
                println!("  {:>10}  {}", row.playcount, row.name);
            }
        }
    }

    if let Some(summary) = &album.wiki_summary {
        println!("\n📝 {summary}");
    }
    Ok(())
}
