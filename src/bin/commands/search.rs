use super::SearchType;
use melody_scope::{MelodyScopeApi, Result};

/// Handle the search command for tracks or albums
pub async fn handle_search_command<A>(
    client: &A,
    search_type: SearchType,
    query: &str,
    limit: usize,
) -> Result<()>
where
    A: MelodyScopeApi + ?Sized,
{
    let limit = if limit == 0 { usize::MAX } else { limit };

    let lines: Vec<String> = match search_type {
        SearchType::Tracks => {
            println!("🔍 Searching tracks for '{query}'");
            client
                .search_tracks(query)
                .await?
                .iter()
                .take(limit)
                .map(|track| track.to_string())
                .collect()
        }
        SearchType::Albums => {
            println!("🔍 Searching albums for '{query}'");
            client
                .search_albums(query)
                .await?
                .iter()
                .take(limit)
                .map(|album| album.to_string())
                .collect()
        }
    };

    if lines.is_empty() {
        println!("  No results for '{query}'");
        return Ok(());
    }
    for (i, line) in lines.iter().enumerate() {
        println!("  {}. {line}", i + 1);
    }
    Ok(())
}
