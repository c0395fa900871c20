#[cfg(feature = "mock")]
mod mock_tests {
    use melody_scope::playcounts::MAX_TRACKS_FOR_GRAPH;
    use melody_scope::{
        fetch_album_years, fetch_track_playcounts, top_tracks_by_playcount, AlbumDetails,
        AlbumSummary, MelodyScopeApi, MelodyScopeError, MockMelodyScopeApi, TrackSummary,
    };
    use mockall::predicate::*; // for eq(), any(), etc.

    fn track(name: &str) -> TrackSummary {
        TrackSummary {
            name: name.to_string(),
            duration_seconds: Some(200),
            url: format!("https://last.fm/{name}"),
            playcount: None,
            artist: None,
        }
    }

    fn summary(name: &str) -> AlbumSummary {
        AlbumSummary {
            name: name.to_string(),
            artist: "Radiohead".to_string(),
            playcount: None,
            url: String::new(),
            images: vec![],
            year: None,
        }
    }

    #[tokio::test]
    async fn test_mock_fan_out_keys_by_index() {
        let mut mock_client = MockMelodyScopeApi::new();

        mock_client
            .expect_fetch_track_info()
            .with(eq("Radiohead"), eq("Airbag"))
            .times(1)
            .returning(|_, _| Some(900));
        mock_client
            .expect_fetch_track_info()
            .with(eq("Radiohead"), eq("Paranoid Android"))
            .times(1)
            .returning(|_, _| None);
        mock_client
            .expect_fetch_track_info()
            .with(eq("Radiohead"), eq("Karma Police"))
            .times(1)
            .returning(|_, _| Some(1500));

        let tracks = vec![track("Airbag"), track("Paranoid Android"), track("Karma Police")];

        // Use the mock as a trait object
        let client: &dyn MelodyScopeApi = &mock_client;
        let playcounts = fetch_track_playcounts(client, "Radiohead", &tracks, 20).await;

        assert_eq!(playcounts.len(), 2);
        assert_eq!(playcounts[&0], 900);
        assert_eq!(playcounts[&2], 1500);

        let top = top_tracks_by_playcount(&tracks, &playcounts, MAX_TRACKS_FOR_GRAPH);
        assert_eq!(top[0].name, "Karma Police");
        assert_eq!(top[1].name, "Airbag");
    }

    #[tokio::test]
    async fn test_mock_fan_out_skips_blank_artist() {
        let mut mock_client = MockMelodyScopeApi::new();
        mock_client.expect_fetch_track_info().never();

        let playcounts = fetch_track_playcounts(&mock_client, "", &[track("Airbag")], 20).await;
        assert!(playcounts.is_empty());
    }

    #[tokio::test]
    async fn test_mock_album_years_tolerate_errors() {
        let mut mock_client = MockMelodyScopeApi::new();

        mock_client
            .expect_fetch_album_details()
            .with(eq("Radiohead"), eq("OK Computer"))
            .times(1)
            .returning(|artist, name| {
                Ok(Some(AlbumDetails {
                    name: name.to_string(),
                    artist: artist.to_string(),
                    url: String::new(),
                    images: vec![],
                    listeners: None,
                    playcount: None,
                    tracks: vec![],
                    wiki_summary: None,
                    year: Some("1997".to_string()),
                }))
            });
        mock_client
            .expect_fetch_album_details()
            .with(eq("Radiohead"), eq("Kid A"))
            .times(1)
            .returning(|_, _| Err(MelodyScopeError::Http { status: 500 }));
        mock_client
            .expect_fetch_album_details()
            .with(eq("Radiohead"), eq("Amnesiac"))
            .times(1)
            .returning(|_, _| Ok(None));

        let albums = vec![summary("OK Computer"), summary("Kid A"), summary("Amnesiac")];
        let albums = fetch_album_years(&mock_client, albums, 20).await;

        assert_eq!(albums[0].year.as_deref(), Some("1997"));
        assert_eq!(albums[1].year, None);
        assert_eq!(albums[2].year, None);
    }

    #[tokio::test]
    async fn test_mock_search() {
        let mut mock_client = MockMelodyScopeApi::new();

        mock_client
            .expect_search_albums()
            .with(eq("In Rainbows"))
            .times(1)
            .returning(|q| Ok(vec![summary(q)]));

        let client: &dyn MelodyScopeApi = &mock_client;
        let albums = client.search_albums("In Rainbows").await.unwrap();

        assert_eq!(albums.len(), 1);
        assert_eq!(format!("{}", albums[0]), "Radiohead - In Rainbows");
    }
}
