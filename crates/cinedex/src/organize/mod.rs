//! Fans exported movie metadata out into browsable directory taxonomies.
//!
//! Each [`OrganizePass`] is independent: it reads the same loaded movie list
//! and writes only under its own directory of the organized root.

pub mod movie;
pub mod organizer;
pub mod pass;

pub use movie::{load_file, load_metadata, metadata_path, LoadOutcome, OrganizedMovie};
pub use organizer::{Organizer, PassOutcome, MISSING_IMAGES_FILE, MOVIE_INFO_FILE};
pub use pass::{format_rating, OrganizePass, RatingBand, UNKNOWN_GENRE};
