use serde::Deserialize;

use crate::playlist::{QueuedTrack, TrackFormat};

/// One row of `GET /index/tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexedTrack {
    pub id: String,
    pub name: String,
    pub album_id: String,
    pub album_name: String,
    /// `(artist id, artist name)` pairs.
    #[serde(default)]
    pub artists: Vec<(String, String)>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: i64,
    /// Kept as text; the server also knows codecs we cannot play.
    pub format: String,
    #[serde(default)]
    pub loved: bool,
}

impl IndexedTrack {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Queue entry for this track, or `None` when the codec is unplayable.
    pub fn to_queued(&self) -> Option<QueuedTrack> {
        let format = TrackFormat::from_hint(&self.format)?;
        Some(QueuedTrack {
            id: Some(self.id.clone()),
            title: self.name.clone(),
            artist: self.artist_names(),
            album: self.album_name.clone(),
            format,
        })
    }
}

/// One row of `GET /index/albums`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexedAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<(String, String)>,
    /// Track ids in album order.
    #[serde(default)]
    pub tracks: Vec<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub loved: bool,
}

impl IndexedAlbum {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Leading year of the release date, if it has one.
    pub fn year(&self) -> Option<&str> {
        release_year(&self.release_date)
    }
}

/// One row of `GET /index/artists`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexedArtist {
    pub id: String,
    pub name: String,
}

/// `GET /metadata/album/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlbumMetadata {
    pub album_id: String,
    pub metadata: AlbumDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlbumDetails {
    pub album_name: String,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
    #[serde(default)]
    pub tracks: Vec<AlbumTrack>,
    #[serde(default)]
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlbumArtist {
    pub artist_id: String,
    pub artist_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlbumTrack {
    /// Position on the album; tracks arrive unordered.
    #[serde(default)]
    pub number: u32,
    pub track_id: String,
    pub track_name: String,
    /// Milliseconds.
    #[serde(default)]
    pub track_length: u64,
    #[serde(default)]
    pub artist_ids: Vec<String>,
    /// Absent on older servers; such streams are decoded as mp3.
    #[serde(default)]
    pub format: Option<String>,
}

/// An opened album, ready to be queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumListing {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub year: Option<String>,
    /// Playable tracks in album order.
    pub tracks: Vec<QueuedTrack>,
    /// Track lengths in seconds, parallel to `tracks`.
    pub lengths: Vec<u64>,
    /// Tracks left out because their codec cannot be played.
    pub skipped: usize,
}

impl AlbumMetadata {
    pub fn listing(&self) -> AlbumListing {
        let details = &self.metadata;
        let album_artist = details
            .artists
            .iter()
            .map(|a| a.artist_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut ordered: Vec<&AlbumTrack> = details.tracks.iter().collect();
        ordered.sort_by_key(|t| t.number);

        let mut tracks = Vec::with_capacity(ordered.len());
        let mut lengths = Vec::with_capacity(ordered.len());
        let mut skipped = 0;
        for track in ordered {
            let format = match track.format.as_deref() {
                None => Some(TrackFormat::Mp3),
                Some(hint) => TrackFormat::from_hint(hint),
            };
            let Some(format) = format else {
                skipped += 1;
                continue;
            };
            let artist = self.track_artists(track).unwrap_or_else(|| album_artist.clone());
            tracks.push(QueuedTrack {
                id: Some(track.track_id.clone()),
                title: track.track_name.clone(),
                artist,
                album: details.album_name.clone(),
                format,
            });
            lengths.push(track.track_length / 1000);
        }

        AlbumListing {
            id: self.album_id.clone(),
            name: details.album_name.clone(),
            artist: album_artist,
            year: release_year(&details.release_date).map(str::to_string),
            tracks,
            lengths,
            skipped,
        }
    }

    /// Names of the track's artists that the album lists. `None` when
    /// none of them are known here.
    fn track_artists(&self, track: &AlbumTrack) -> Option<String> {
        let names: Vec<&str> = track
            .artist_ids
            .iter()
            .filter_map(|id| {
                self.metadata
                    .artists
                    .iter()
                    .find(|a| &a.artist_id == id)
                    .map(|a| a.artist_name.as_str())
            })
            .collect();
        (!names.is_empty()).then(|| names.join(", "))
    }
}

fn release_year(date: &str) -> Option<&str> {
    let year = date.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then_some(year)
}
