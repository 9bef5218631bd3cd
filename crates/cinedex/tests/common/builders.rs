//! Builder for library rows used to seed test databases.

#![allow(dead_code)]

use cinedex::ImageKind;

/// One `MediaItems` row plus the genres and cached images that go with it.
#[derive(Debug, Clone)]
pub struct MovieRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<i64>,
    pub overview: Option<String>,
    pub provider_ids: Option<String>,
    pub runtime_ticks: Option<i64>,
    pub rating: Option<f64>,
    pub path: Option<String>,
    pub guid: Option<Vec<u8>>,
    pub is_movie: i64,
    pub item_type: i64,
    pub genres: Vec<String>,
    pub images: Vec<ImageKind>,
}

impl MovieRow {
    /// A movie row with an id, a name and a four-byte GUID derived from the id.
    pub fn new(id: u8, name: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            original_title: None,
            year: None,
            overview: None,
            provider_ids: None,
            runtime_ticks: None,
            rating: None,
            path: None,
            guid: Some(vec![0xA0, 0x00, 0x00, id]),
            is_movie: 1,
            item_type: 8,
            genres: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn images(mut self, images: &[ImageKind]) -> Self {
        self.images = images.to_vec();
        self
    }

    pub fn provider_ids(mut self, json: &str) -> Self {
        self.provider_ids = Some(json.to_string());
        self
    }

    pub fn runtime_ticks(mut self, ticks: i64) -> Self {
        self.runtime_ticks = Some(ticks);
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn guid(mut self, guid: Option<Vec<u8>>) -> Self {
        self.guid = guid;
        self
    }

    /// Marks the row as a non-movie library item.
    pub fn not_a_movie(mut self) -> Self {
        self.is_movie = 0;
        self.item_type = 5;
        self
    }

    /// Lowercase hex of the GUID, as used for the cache directory name.
    pub fn hash(&self) -> String {
        self.guid
            .as_deref()
            .map(|g| g.iter().map(|b| format!("{:02x}", b)).collect())
            .unwrap_or_default()
    }
}

/// The record used throughout the end-to-end tests.
pub fn shawshank() -> MovieRow {
    MovieRow::new(1, "The Shawshank Redemption")
        .year(1994)
        .rating(9.3)
        .genres(&["Drama"])
        .images(&[ImageKind::Poster, ImageKind::Backdrop])
        .provider_ids(r#"{"Imdb":"tt0111161","Tmdb":"278"}"#)
        .runtime_ticks(85_200_000_000)
        .path("/movies/The Shawshank Redemption (1994)/movie.mkv")
}
