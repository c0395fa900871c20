use super::FavouriteCommands;
use melody_scope::{
    format_duration, FavouriteTrack, FavouritesStore, MelodyScopeApi, MelodyScopeError, Result,
    StateStorage,
};

/// Handle the favourites subcommands
pub async fn handle_favourites_command<A, S>(
    client: &A,
    store: &mut FavouritesStore<S>,
    command: FavouriteCommands,
) -> Result<()>
where
    A: MelodyScopeApi + ?Sized,
    S: StateStorage,
{
    match command {
        FavouriteCommands::List => {
            if store.favourites().is_empty() {
                println!("❤ No favourites yet");
                return Ok(());
            }
            println!("❤ {} favourites", store.favourites().len());
            for (i, fav) in store.favourites().iter().enumerate() {
                println!(
                    "  {}. {fav} [{}]",
                    i + 1,
                    format_duration(fav.duration_seconds)
                );
            }
        }
        FavouriteCommands::Add {
            artist,
            album,
            track,
        } => {
            let details = client
                .fetch_album_details(&artist, &album)
                .await?
                .ok_or_else(|| {
                    MelodyScopeError::Validation(format!("Album '{album}' by '{artist}' not found"))
                })?;
            let summary = details
                .tracks
                .iter()
                .find(|t| t.name == track)
                .ok_or_else(|| {
                    MelodyScopeError::Validation(format!("No track '{track}' on '{album}'"))
                })?;

            let playcount = client.fetch_track_info(&details.artist, &summary.name).await;
            let favourite = FavouriteTrack::from_album_track(summary, &details, playcount);

            if store.is_favourite(&favourite.name, &favourite.artist) {
                println!("ℹ️  Already a favourite: {favourite}");
            } else {
                store.add_favourite(favourite.clone())?;
                println!("✅ Added {favourite}");
            }
        }
        FavouriteCommands::Remove { artist, track } => {
            if store.is_favourite(&track, &artist) {
                store.remove_favourite(&track, &artist)?;
                println!("🗑️  Removed '{track}' by '{artist}'");
            } else {
                println!("ℹ️  '{track}' by '{artist}' is not a favourite");
            }
        }
        FavouriteCommands::Check { artist, track } => {
            if store.is_favourite(&track, &artist) {
                println!("❤ '{track}' by '{artist}' is a favourite");
            } else {
                println!("  '{track}' by '{artist}' is not a favourite");
            }
        }
    }
    Ok(())
}
