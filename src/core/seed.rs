//! Built-in album catalog
//!
//! Twenty well-known albums so the game is playable without Spotify
//! credentials. Inserted idempotently by (title, artist).

use anyhow::Result;
use tracing::info;

use crate::db::tables::AlbumTable;
use crate::models::Album;

const SAMPLE_ALBUMS: &[(&str, &str, &str)] = &[
    (
        "The Dark Side of the Moon",
        "Pink Floyd",
        "https://miro.medium.com/v2/resize:fit:1400/1*8FkvzbSdSJ4HNxtuZo5kLg.jpeg",
    ),
    (
        "Abbey Road",
        "The Beatles",
        "https://upload.wikimedia.org/wikipedia/en/4/42/Beatles_-_Abbey_Road.jpg",
    ),
    (
        "Rumours",
        "Fleetwood Mac",
        "https://upload.wikimedia.org/wikipedia/en/f/fb/FMacRumours.PNG",
    ),
    (
        "Back in Black",
        "AC/DC",
        "https://upload.wikimedia.org/wikipedia/commons/9/92/ACDC_Back_in_Black.png",
    ),
    (
        "Hotel California",
        "Eagles",
        "https://upload.wikimedia.org/wikipedia/en/4/49/Hotelcalifornia.jpg",
    ),
    (
        "Thriller",
        "Michael Jackson",
        "https://upload.wikimedia.org/wikipedia/en/5/55/Michael_Jackson_-_Thriller.png",
    ),
    (
        "Nevermind",
        "Nirvana",
        "https://upload.wikimedia.org/wikipedia/en/b/b7/NirvanaNevermindalbumcover.jpg",
    ),
    (
        "The Wall",
        "Pink Floyd",
        "https://upload.wikimedia.org/wikipedia/en/0/0e/PinkFloydWallCoverOriginalNoText.jpg",
    ),
    (
        "Led Zeppelin IV",
        "Led Zeppelin",
        "https://upload.wikimedia.org/wikipedia/en/2/26/Led_Zeppelin_-_Led_Zeppelin_IV.jpg",
    ),
    (
        "Born to Run",
        "Bruce Springsteen",
        "https://upload.wikimedia.org/wikipedia/en/7/7a/Born_to_Run_%28Bruce_Springsteen_album_-_cover_art%29.jpg",
    ),
    (
        "Purple Rain",
        "Prince",
        "https://upload.wikimedia.org/wikipedia/en/9/9a/Prince_Purple_Rain.jpg",
    ),
    (
        "Appetite for Destruction",
        "Guns N' Roses",
        "https://upload.wikimedia.org/wikipedia/en/6/60/Guns_N%27_Roses_Appetite_for_Destruction.png",
    ),
    (
        "OK Computer",
        "Radiohead",
        "https://upload.wikimedia.org/wikipedia/en/b/ba/Radioheadokcomputer.png",
    ),
    (
        "The Joshua Tree",
        "U2",
        "https://upload.wikimedia.org/wikipedia/en/2/2f/U2_The_Joshua_Tree.png",
    ),
    (
        "Sgt. Pepper's Lonely Hearts Club Band",
        "The Beatles",
        "https://upload.wikimedia.org/wikipedia/en/5/50/Sgt._Pepper%27s_Lonely_Hearts_Club_Band.jpg",
    ),
    (
        "Kind of Blue",
        "Miles Davis",
        "https://upload.wikimedia.org/wikipedia/en/9/9c/MilesDavisKindofBlue.jpg",
    ),
    (
        "Pet Sounds",
        "The Beach Boys",
        "https://upload.wikimedia.org/wikipedia/en/2/2e/PetSoundsCover.jpg",
    ),
    (
        "What's Going On",
        "Marvin Gaye",
        "https://upload.wikimedia.org/wikipedia/en/8/8e/Marvin_Gaye_-_What%27s_Going_On.jpg",
    ),
    (
        "Exile on Main St.",
        "The Rolling Stones",
        "https://upload.wikimedia.org/wikipedia/en/4/4f/Exile_on_Main_St._cover.jpg",
    ),
    (
        "London Calling",
        "The Clash",
        "https://upload.wikimedia.org/wikipedia/en/0/0c/London_Calling_cover.jpg",
    ),
];

/// Insert any sample albums not already present. Returns how many were added.
pub async fn seed_albums() -> Result<usize> {
    let mut inserted = 0;

    for (title, artist, cover_url) in SAMPLE_ALBUMS {
        if AlbumTable::exists_by_title_artist(title, artist).await? {
            continue;
        }

        AlbumTable::insert(&Album::new(
            (*title).to_string(),
            (*artist).to_string(),
            (*cover_url).to_string(),
        ))
        .await?;
        inserted += 1;
    }

    if inserted > 0 {
        info!("Seeded {} sample albums", inserted);
    }

    Ok(inserted)
}

/// Seed only when the album table is empty (first startup)
pub async fn seed_if_empty() -> Result<usize> {
    if AlbumTable::count().await? > 0 {
        return Ok(0);
    }
    seed_albums().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_shape() {
        assert_eq!(SAMPLE_ALBUMS.len(), 20);
        for (title, artist, cover_url) in SAMPLE_ALBUMS {
            assert!(!title.is_empty());
            assert!(!artist.is_empty());
            assert!(cover_url.starts_with("https://"));
        }
    }
}
