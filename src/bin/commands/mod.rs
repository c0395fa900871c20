pub mod album;
pub mod albums;
pub mod favourites;
pub mod search;

use clap::{Subcommand, ValueEnum};
use melody_scope::{AlbumSort, FavouritesStore, MelodyScopeApi, Result, StateStorage};

#[derive(ValueEnum, Clone, Copy)]
pub enum SearchType {
    /// Search for tracks
    Tracks,
    /// Search for albums
    Albums,
}

#[derive(ValueEnum, Clone, Copy, Default)]
pub enum SortArg {
    /// Last.fm's order (most played first)
    #[default]
    Default,
    /// Newest first
    Year,
    /// Alphabetical
    Name,
}

impl From<SortArg> for AlbumSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Default => AlbumSort::Default,
            SortArg::Year => AlbumSort::Year,
            SortArg::Name => AlbumSort::Name,
        }
    }
}

#[derive(Subcommand)]
pub enum FavouriteCommands {
    /// List favourite tracks in the order they were added
    List,

    /// Add a track from an album to the favourites
    ///
    /// Usage examples:
    /// # Add a track, looking up its duration and play count on the album
    /// melody-scope favourites add "The Beatles" "Abbey Road" "Come Together"
    Add {
        artist: String,
        album: String,
        track: String,
    },

    /// Remove a favourite (exact, case-sensitive match)
    Remove { artist: String, track: String },

    /// Check whether a track is a favourite
    Check { artist: String, track: String },
}

#[derive(Subcommand)]
pub enum Commands {
    /// List an artist's top albums
    ///
    /// Without an artist, the last selected artist is used. Giving an artist
    /// makes it the selected one.
    ///
    /// Usage examples:
    /// # Top albums of the selected artist
    /// melody-scope albums
    ///
    /// # Newest first, second page, with years looked up
    /// melody-scope albums "Radiohead" --sort year --page 2 --years
    Albums {
        /// Artist name
        artist: Option<String>,

        /// Ordering of the listing
        #[arg(long, value_enum, default_value_t = SortArg::Default)]
        sort: SortArg,

        /// Page to show (1-indexed)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Look up release years for the first albums
        #[arg(long)]
        years: bool,
    },

    /// Show an album with its track listing
    ///
    /// Usage examples:
    /// melody-scope album "The Beatles" "Abbey Road"
    /// melody-scope album "Radiohead" "OK Computer" --playcounts
    Album {
        artist: String,
        album: String,

        /// Look up per-track play counts and show the most played tracks
        #[arg(long)]
        playcounts: bool,
    },

    /// Search Last.fm for tracks or albums
    Search {
        #[arg(value_enum)]
        search_type: SearchType,

        query: String,

        /// Maximum number of results to show (0 for no limit)
        #[arg(long, default_value = "0")]
        limit: usize,
    },

    /// Show a single track's play count
    TrackInfo { artist: String, track: String },

    /// Manage favourite tracks
    Favourites {
        #[command(subcommand)]
        command: FavouriteCommands,
    },

    /// Show or change the selected artist
    Artist {
        /// New artist; omit to show the current one
        name: Option<String>,
    },
}

pub async fn execute_command<A, S>(
    command: Commands,
    client: &A,
    store: &mut FavouritesStore<S>,
) -> Result<()>
where
    A: MelodyScopeApi + ?Sized,
    S: StateStorage,
{
    match command {
        Commands::Albums {
            artist,
            sort,
            page,
            years,
        } => {
            if let Some(artist) = artist {
                store.set_artist(artist)?;
            }
            let artist = store.artist().to_string();
            albums::handle_albums_command(client, &artist, sort.into(), page, years).await
        }
        Commands::Album {
            artist,
            album,
            playcounts,
        } => album::handle_album_command(client, store, &artist, &album, playcounts).await,
        Commands::Search {
            search_type,
            query,
            limit,
        } => search::handle_search_command(client, search_type, &query, limit).await,
        Commands::TrackInfo { artist, track } => {
            match client.fetch_track_info(&artist, &track).await {
                Some(playcount) => println!("🎵 {artist} - {track}: {playcount} plays"),
                None => println!("🎵 {artist} - {track}: no play count available"),
            }
            Ok(())
        }
        Commands::Favourites { command } => {
            favourites::handle_favourites_command(client, store, command).await
        }
        Commands::Artist { name } => {
            match name {
                Some(name) => {
                    store.set_artist(name)?;
                    println!("✅ Selected artist: {}", store.artist());
                }
                None => println!("🎤 {}", store.artist()),
            }
            Ok(())
        }
    }
}
