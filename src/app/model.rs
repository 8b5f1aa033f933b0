//! Application model types: `App`, `InputMode` and `Focus`.
//!
//! `App` holds everything the views need that is not playback state:
//! search results (tracks, albums, artists, an opened album) and the
//! selection, the search prompt, lyrics pane focus, pointer interaction
//! state and the status line. Playback itself lives in the
//! `PlaylistController`.

use ratatui::layout::Rect;

use crate::backend::{AlbumListing, IndexedAlbum, IndexedArtist, IndexedTrack};
use crate::lyrics::AutoScroll;
use crate::playlist::QueuedTrack;
use crate::progress::{Scrubber, VolumeSlider};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search prompt.
    Search,
}

/// What the results pane lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Browse {
    #[default]
    Tracks,
    Albums,
    Artists,
    /// Tracks of the opened album.
    Album,
}

impl Browse {
    pub fn label(self) -> &'static str {
        match self {
            Browse::Tracks => "tracks",
            Browse::Albums => "albums",
            Browse::Artists => "artists",
            Browse::Album => "album",
        }
    }
}

/// One search round: every index queried with the same text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub tracks: Vec<IndexedTrack>,
    pub albums: Vec<IndexedAlbum>,
    pub artists: Vec<IndexedArtist>,
}

/// Which pane receives `j`/`k`/`Enter`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Results,
    Lyrics,
}

/// Screen areas of the pointer-driven widgets, recorded while drawing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct HitAreas {
    pub progress: Option<Rect>,
    pub volume: Option<Rect>,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub results: Vec<IndexedTrack>,
    pub albums: Vec<IndexedAlbum>,
    pub artists: Vec<IndexedArtist>,
    pub album: Option<AlbumListing>,
    /// Album whose metadata is being fetched.
    pending_album: Option<String>,
    pub browse: Browse,
    /// Selection within the list `browse` points at.
    pub selected: usize,

    pub input_mode: InputMode,
    pub search_query: String,
    /// Query whose results are on screen.
    pub shown_query: Option<String>,
    search_generation: u64,
    pub searching: bool,

    pub focus: Focus,
    /// Keyboard-selected lyric line while the lyrics pane has focus.
    pub lyrics_selected: Option<usize>,
    pub lyrics_scroll: AutoScroll,

    pub scrubber: Scrubber,
    pub volume_slider: VolumeSlider,
    pub hit_areas: HitAreas,

    pub status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in the list currently shown.
    pub fn visible_len(&self) -> usize {
        match self.browse {
            Browse::Tracks => self.results.len(),
            Browse::Albums => self.albums.len(),
            Browse::Artists => self.artists.len(),
            Browse::Album => self.album.as_ref().map_or(0, |a| a.tracks.len()),
        }
    }

    pub fn selected_track(&self) -> Option<&IndexedTrack> {
        match self.browse {
            Browse::Tracks => self.results.get(self.selected),
            _ => None,
        }
    }

    pub fn selected_album(&self) -> Option<&IndexedAlbum> {
        match self.browse {
            Browse::Albums => self.albums.get(self.selected),
            _ => None,
        }
    }

    pub fn selected_artist(&self) -> Option<&IndexedArtist> {
        match self.browse {
            Browse::Artists => self.artists.get(self.selected),
            _ => None,
        }
    }

    /// Selected row of the opened album.
    pub fn selected_album_track(&self) -> Option<&QueuedTrack> {
        match (self.browse, &self.album) {
            (Browse::Album, Some(album)) => album.tracks.get(self.selected),
            _ => None,
        }
    }

    /// Move selection down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    /// Move selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected = match self.selected {
            0 => len - 1,
            i => i - 1,
        };
    }

    /// Tracks, albums, artists, then tracks again. From an opened album
    /// this goes back to the album list.
    pub fn cycle_browse(&mut self) {
        let next = match self.browse {
            Browse::Tracks => Browse::Albums,
            Browse::Albums => Browse::Artists,
            Browse::Artists => Browse::Tracks,
            Browse::Album => Browse::Albums,
        };
        self.show(next);
    }

    /// Leave the opened album for the album list it came from.
    pub fn close_album(&mut self) -> bool {
        if self.browse != Browse::Album {
            return false;
        }
        self.show(Browse::Albums);
        true
    }

    fn show(&mut self, browse: Browse) {
        self.browse = browse;
        self.selected = 0;
    }

    /// Remember that `id` is being opened; only its metadata is applied.
    pub fn begin_open_album(&mut self, id: &str) {
        self.pending_album = Some(id.to_string());
    }

    /// Show `listing` if it is the album last asked for. Returns whether
    /// it was applied.
    pub fn open_album(&mut self, listing: AlbumListing) -> bool {
        if self.pending_album.as_deref() != Some(listing.id.as_str()) {
            return false;
        }
        self.pending_album = None;
        self.album = Some(listing);
        self.show(Browse::Album);
        true
    }

    pub fn album_failed(&mut self, id: &str) {
        if self.pending_album.as_deref() == Some(id) {
            self.pending_album = None;
        }
    }

    pub fn is_opening_album(&self) -> bool {
        self.pending_album.is_some()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Open the search prompt, keeping the last query for editing.
    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
    }

    /// Close the prompt and start a search. Returns the generation tag the
    /// results must carry and the trimmed query.
    pub fn submit_search(&mut self) -> (u64, String) {
        self.input_mode = InputMode::Normal;
        self.begin_search(self.search_query.trim().to_string())
    }

    /// Start a search for `query` (also used for the startup search).
    pub fn begin_search(&mut self, query: String) -> (u64, String) {
        self.search_generation += 1;
        self.searching = true;
        self.search_query = query.clone();
        (self.search_generation, query)
    }

    /// Install results for `generation`. Results of an older search are
    /// dropped; returns whether they were applied. An opened album is
    /// left for the track list.
    pub fn apply_search(&mut self, generation: u64, query: String, results: SearchResults) -> bool {
        if generation != self.search_generation {
            return false;
        }
        self.searching = false;
        self.results = results.tracks;
        self.albums = results.albums;
        self.artists = results.artists;
        if self.browse == Browse::Album {
            self.browse = Browse::Tracks;
        }
        self.selected = 0;
        self.shown_query = Some(query);
        true
    }

    /// A search failed; keep the previous results.
    pub fn search_failed(&mut self, generation: u64) {
        if generation == self.search_generation {
            self.searching = false;
        }
    }

    /// Update the loved flag of every result row with `id`.
    pub fn set_loved(&mut self, id: &str, loved: bool) {
        for track in self.results.iter_mut().filter(|t| t.id == id) {
            track.loved = loved;
        }
    }

    /// Counts shown after a search, e.g. `12 tracks, 2 albums, 1 artist`.
    pub fn result_summary(&self) -> String {
        let plural = |n: usize, one: &str| {
            if n == 1 {
                format!("1 {one}")
            } else {
                format!("{n} {one}s")
            }
        };
        [
            plural(self.results.len(), "track"),
            plural(self.albums.len(), "album"),
            plural(self.artists.len(), "artist"),
        ]
        .join(", ")
    }

    /// Toggle focus between the result list and the lyrics pane. Leaving
    /// the lyrics pane drops the line selection so the pane follows
    /// playback again.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Results => Focus::Lyrics,
            Focus::Lyrics => {
                self.lyrics_selected = None;
                Focus::Results
            }
        };
    }

    pub fn release_lyrics_focus(&mut self) {
        self.focus = Focus::Results;
        self.lyrics_selected = None;
    }

    /// Move the lyric selection by `delta` lines within `len` lines,
    /// starting from `anchor` (usually the active line) when nothing is
    /// selected yet.
    pub fn move_lyrics_selection(&mut self, delta: isize, len: usize, anchor: Option<usize>) {
        if len == 0 {
            self.lyrics_selected = None;
            return;
        }
        let start = self.lyrics_selected.or(anchor).unwrap_or(0) as isize;
        let next = (start + delta).clamp(0, len as isize - 1);
        self.lyrics_selected = Some(next as usize);
    }

    /// Reset per-track view state (after the current track changed).
    pub fn track_changed(&mut self) {
        self.lyrics_selected = None;
        self.lyrics_scroll.reset();
    }

    /// Character positions in `title` to highlight for `query`.
    ///
    /// The server matches names case-insensitively, either on the whole
    /// query or on its words, so the whole query is highlighted where it
    /// occurs and each word otherwise. Empty when nothing occurs.
    pub fn match_positions(title: &str, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let haystack: Vec<char> = title.chars().map(fold_case).collect();
        if let Some(positions) = find_chars(&haystack, query) {
            return positions;
        }

        let mut positions: Vec<usize> = query
            .split_whitespace()
            .filter_map(|word| find_chars(&haystack, word))
            .flatten()
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Positions of the first case-insensitive occurrence of `needle`.
fn find_chars(haystack: &[char], needle: &str) -> Option<Vec<usize>> {
    let needle: Vec<char> = needle.chars().map(fold_case).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let start = haystack
        .windows(needle.len())
        .position(|window| window == needle.as_slice())?;
    Some((start..start + needle.len()).collect())
}
