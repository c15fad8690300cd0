//! Result filtering and relevance ranking
//!
//! Catalog results are filtered down to records the player can actually use
//! and then ordered by how well they match the query.

use crate::artwork;
use crate::types::TrackRecord;
use soundwave_core::Track;

/// How well a track matches the query, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Title equals the query
    ExactTitle,
    /// Title contains the query
    Title,
    /// Artist contains the query
    Artist,
    /// Neither matches
    None,
}

/// Convert a record into a playable track
///
/// Returns `None` for records missing an id, a preview stream, a title or an
/// artist; such a record must never reach the queue.
pub fn into_playable(record: TrackRecord, artwork_size: Option<u32>) -> Option<Track> {
    let id = record.track_id?;
    let stream_url = non_blank(record.preview_url)?;
    let title = non_blank(record.track_name)?;
    let artist = non_blank(record.artist_name)?;

    let artwork_url = match (record.artwork_url_100, artwork_size) {
        (Some(url), Some(size)) => artwork::upscale(&url, size),
        (Some(url), None) => url,
        (None, _) => String::new(),
    };

    Some(Track {
        id: id.to_string(),
        title,
        artist,
        album_title: non_blank(record.collection_name),
        artwork_url,
        stream_url,
        duration_millis: record.track_time_millis,
    })
}

/// Drop unusable records, keeping provider order
pub fn filter_playable(records: Vec<TrackRecord>, artwork_size: Option<u32>) -> Vec<Track> {
    records
        .into_iter()
        .filter_map(|record| into_playable(record, artwork_size))
        .collect()
}

/// Classify a track against an already-normalized query
pub fn match_tier(track: &Track, normalized_query: &str) -> MatchTier {
    if normalized_query.is_empty() {
        return MatchTier::None;
    }

    let title = track.title.to_lowercase();
    if title == normalized_query {
        MatchTier::ExactTitle
    } else if title.contains(normalized_query) {
        MatchTier::Title
    } else if track.artist.to_lowercase().contains(normalized_query) {
        MatchTier::Artist
    } else {
        MatchTier::None
    }
}

/// Order tracks by match tier, then case-insensitive title
///
/// The sort is stable: tracks with the same tier and title keep the order
/// the catalog returned them in.
pub fn rank(tracks: &mut [Track], normalized_query: &str) {
    tracks.sort_by_cached_key(|track| {
        (
            match_tier(track, normalized_query),
            track.title.to_lowercase(),
        )
    });
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, title: &str, artist: &str) -> TrackRecord {
        TrackRecord {
            track_id: Some(id),
            track_name: Some(title.to_string()),
            artist_name: Some(artist.to_string()),
            collection_name: None,
            artwork_url_100: Some(format!("https://img.example/{id}/100x100bb.jpg")),
            preview_url: Some(format!("https://audio.example/{id}.m4a")),
            track_time_millis: Some(30_000),
        }
    }

    fn track(title: &str, artist: &str) -> Track {
        Track::new(title, title, artist, "https://audio.example/x.m4a")
    }

    #[test]
    fn title_match_beats_artist_match_beats_none() {
        let mut tracks = vec![
            track("Unrelated", "Y"),
            track("Song", "Love Band"),
            track("I Love You", "X"),
        ];

        rank(&mut tracks, "love");

        let titles: Vec<_> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["I Love You", "Song", "Unrelated"]);
    }

    #[test]
    fn exact_title_ranks_first() {
        let mut tracks = vec![track("Imagine Dragons Live", "A"), track("Imagine", "B")];
        rank(&mut tracks, "imagine");
        assert_eq!(tracks[0].title, "Imagine");
    }

    #[test]
    fn ties_sorted_by_title_case_insensitive() {
        let mut tracks = vec![
            track("zebra love", "A"),
            track("Alpha Love", "A"),
            track("beta love", "A"),
        ];
        rank(&mut tracks, "love");

        let titles: Vec<_> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha Love", "beta love", "zebra love"]);
    }

    #[test]
    fn identical_titles_keep_provider_order() {
        let mut tracks = vec![
            Track::new("1", "Love", "First", "u1"),
            Track::new("2", "Love", "Second", "u2"),
        ];
        rank(&mut tracks, "love");
        assert_eq!(tracks[0].id, "1");
        assert_eq!(tracks[1].id, "2");
    }

    #[test]
    fn missing_preview_is_dropped_even_on_exact_match() {
        let mut unplayable = record(1, "love", "Love");
        unplayable.preview_url = None;

        let tracks = filter_playable(vec![unplayable, record(2, "Other", "Y")], None);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "2");
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let mut no_title = record(1, "  ", "A");
        no_title.track_name = Some("   ".into());
        let mut no_artist = record(2, "T", "");
        no_artist.artist_name = Some(String::new());
        let mut blank_preview = record(3, "T", "A");
        blank_preview.preview_url = Some(" ".into());
        let mut no_id = record(4, "T", "A");
        no_id.track_id = None;

        assert!(filter_playable(vec![no_title, no_artist, blank_preview, no_id], None).is_empty());
    }

    #[test]
    fn converts_fields() {
        let mut rec = record(7, "Imagine", "John Lennon");
        rec.collection_name = Some("Imagine".into());

        let track = into_playable(rec, Some(600)).unwrap();
        assert_eq!(track.id, "7");
        assert_eq!(track.album_title.as_deref(), Some("Imagine"));
        assert_eq!(track.artwork_url, "https://img.example/7/600x600bb.jpg");
        assert_eq!(track.duration_millis, Some(30_000));
    }

    #[test]
    fn missing_artwork_becomes_empty() {
        let mut rec = record(8, "T", "A");
        rec.artwork_url_100 = None;
        assert_eq!(into_playable(rec, None).unwrap().artwork_url, "");
    }
}
