use super::*;
use crate::backend::{AlbumListing, IndexedAlbum, IndexedArtist, IndexedTrack};
use crate::playlist::{QueuedTrack, TrackFormat};

fn t(id: &str, name: &str) -> IndexedTrack {
    IndexedTrack {
        id: id.into(),
        name: name.into(),
        album_id: "al".into(),
        album_name: "Album".into(),
        artists: vec![("ar".into(), "Artist".into())],
        duration: 200,
        format: "mp3".into(),
        loved: false,
    }
}

fn app_with(names: &[&str]) -> App {
    let mut app = App::new();
    let (generation, query) = app.begin_search(String::new());
    let tracks = names
        .iter()
        .enumerate()
        .map(|(i, name)| t(&format!("id{i}"), name))
        .collect();
    assert!(app.apply_search(generation, query, tracks_only(tracks)));
    app
}

fn tracks_only(tracks: Vec<IndexedTrack>) -> SearchResults {
    SearchResults {
        tracks,
        ..SearchResults::default()
    }
}

fn album(id: &str, name: &str) -> IndexedAlbum {
    IndexedAlbum {
        id: id.into(),
        name: name.into(),
        artists: vec![("ar".into(), "Artist".into())],
        tracks: vec![],
        release_date: "2001-01-01T00:00:00Z".into(),
        genres: vec![],
        loved: false,
    }
}

fn listing(id: &str, titles: &[&str]) -> AlbumListing {
    AlbumListing {
        id: id.into(),
        name: "Record".into(),
        artist: "Artist".into(),
        year: Some("2001".into()),
        tracks: titles
            .iter()
            .map(|title| QueuedTrack {
                id: Some(format!("{id}-{title}")),
                title: title.to_string(),
                artist: "Artist".into(),
                album: "Record".into(),
                format: TrackFormat::Mp3,
            })
            .collect(),
        lengths: vec![100; titles.len()],
        skipped: 0,
    }
}

fn browsing_app() -> App {
    let mut app = App::new();
    let (generation, query) = app.begin_search("moon".into());
    let results = SearchResults {
        tracks: vec![t("t1", "Moon River")],
        albums: vec![album("al1", "Moon Songs"), album("al2", "Moonlight")],
        artists: vec![IndexedArtist {
            id: "a1".into(),
            name: "Moon Band".into(),
        }],
    };
    assert!(app.apply_search(generation, query, results));
    app
}

#[test]
fn whole_query_is_highlighted_case_insensitively() {
    assert_eq!(App::match_positions("Blue Moon", "MOON"), vec![5, 6, 7, 8]);
    assert_eq!(App::match_positions("Blue Moon", "e m"), vec![3, 4, 5]);
    assert!(App::match_positions("Blue Moon", "").is_empty());
}

#[test]
fn words_are_highlighted_when_the_whole_query_is_absent() {
    // Scattered letters are not a server match and stay plain.
    assert!(App::match_positions("Hello World", "hw").is_empty());
    assert_eq!(
        App::match_positions("Hello World", "world hell"),
        vec![0, 1, 2, 3, 6, 7, 8, 9, 10]
    );
    assert!(App::match_positions("Hello World", "xyz").is_empty());
}

#[test]
fn selection_wraps_both_ways() {
    let mut app = app_with(&["A", "B", "C"]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected_track().map(|t| t.name.as_str()), Some("B"));
}

#[test]
fn selection_on_empty_results_is_noop() {
    let mut app = App::new();
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}

#[test]
fn search_prompt_edits_and_submits_trimmed_query() {
    let mut app = App::new();
    app.enter_search_mode();
    assert_eq!(app.input_mode, InputMode::Search);
    for c in " blue  x".chars() {
        app.push_search_char(c);
    }
    app.pop_search_char();
    let (_, query) = app.submit_search();
    assert_eq!(query, "blue");
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.searching);
}

#[test]
fn stale_search_results_are_dropped() {
    let mut app = App::new();
    let (first, _) = app.begin_search("old".into());
    let (second, _) = app.begin_search("new".into());

    assert!(!app.apply_search(first, "old".into(), tracks_only(vec![t("x", "Old")])));
    assert!(app.results.is_empty());
    assert!(app.searching);

    assert!(app.apply_search(second, "new".into(), tracks_only(vec![t("y", "New")])));
    assert_eq!(app.shown_query.as_deref(), Some("new"));
    assert!(!app.searching);
}

#[test]
fn failed_search_keeps_previous_results() {
    let mut app = app_with(&["Keep"]);
    let (generation, _) = app.begin_search("boom".into());
    app.search_failed(generation);
    assert!(!app.searching);
    assert_eq!(app.results.len(), 1);
}

#[test]
fn set_loved_updates_matching_rows() {
    let mut app = app_with(&["A", "B"]);
    app.set_loved("id1", true);
    assert!(!app.results[0].loved);
    assert!(app.results[1].loved);
}

#[test]
fn lyrics_selection_starts_at_anchor_and_clamps() {
    let mut app = App::new();
    app.toggle_focus();
    assert_eq!(app.focus, Focus::Lyrics);

    app.move_lyrics_selection(1, 5, Some(2));
    assert_eq!(app.lyrics_selected, Some(3));
    app.move_lyrics_selection(10, 5, Some(2));
    assert_eq!(app.lyrics_selected, Some(4));
    app.move_lyrics_selection(-10, 5, None);
    assert_eq!(app.lyrics_selected, Some(0));
    app.move_lyrics_selection(1, 0, None);
    assert_eq!(app.lyrics_selected, None);
}

#[test]
fn leaving_lyrics_focus_resumes_following() {
    let mut app = App::new();
    app.toggle_focus();
    app.move_lyrics_selection(1, 3, None);
    app.toggle_focus();
    assert_eq!(app.focus, Focus::Results);
    assert_eq!(app.lyrics_selected, None);

    app.toggle_focus();
    app.move_lyrics_selection(1, 3, None);
    app.release_lyrics_focus();
    assert_eq!(app.lyrics_selected, None);
}

#[test]
fn track_change_resets_lyrics_view() {
    let mut app = App::new();
    app.lyrics_selected = Some(4);
    assert_eq!(app.lyrics_scroll.update(7), Some(7));
    app.track_changed();
    assert_eq!(app.lyrics_selected, None);
    assert_eq!(app.lyrics_scroll.update(7), Some(7));
}

#[test]
fn browse_cycles_through_result_kinds() {
    let mut app = browsing_app();
    assert_eq!(app.result_summary(), "1 track, 2 albums, 1 artist");
    assert_eq!(app.browse, Browse::Tracks);
    assert_eq!(app.visible_len(), 1);

    app.cycle_browse();
    assert_eq!(app.browse, Browse::Albums);
    app.next();
    assert_eq!(app.selected_album().map(|a| a.name.as_str()), Some("Moonlight"));
    assert!(app.selected_track().is_none());

    app.cycle_browse();
    assert_eq!(app.browse, Browse::Artists);
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_artist().map(|a| a.name.as_str()), Some("Moon Band"));

    app.cycle_browse();
    assert_eq!(app.browse, Browse::Tracks);
}

#[test]
fn opened_album_lists_its_tracks() {
    let mut app = browsing_app();
    app.cycle_browse();
    app.begin_open_album("al1");
    assert!(app.is_opening_album());

    assert!(app.open_album(listing("al1", &["One", "Two"])));
    assert!(!app.is_opening_album());
    assert_eq!(app.browse, Browse::Album);
    assert_eq!(app.visible_len(), 2);
    app.prev();
    assert_eq!(app.selected_album_track().map(|t| t.title.as_str()), Some("Two"));

    assert!(app.close_album());
    assert_eq!(app.browse, Browse::Albums);
    assert!(!app.close_album());
}

#[test]
fn only_the_last_requested_album_opens() {
    let mut app = browsing_app();
    app.cycle_browse();
    app.begin_open_album("al1");
    app.begin_open_album("al2");

    assert!(!app.open_album(listing("al1", &["Old"])));
    assert_eq!(app.browse, Browse::Albums);

    app.album_failed("al2");
    assert!(!app.is_opening_album());
    assert!(!app.open_album(listing("al2", &["Late"])));
}

#[test]
fn new_search_leaves_the_opened_album() {
    let mut app = browsing_app();
    app.begin_open_album("al1");
    assert!(app.open_album(listing("al1", &["One"])));

    let (generation, query) = app.begin_search("sun".into());
    assert!(app.apply_search(generation, query, tracks_only(vec![t("t9", "Sun")])));
    assert_eq!(app.browse, Browse::Tracks);
    assert!(app.albums.is_empty());
    assert_eq!(app.selected_track().map(|t| t.name.as_str()), Some("Sun"));
}
