//! The aggregation pipeline between an authorized session and the final
//! write-back: collect tracks from the selected playlists, enrich them with
//! audio features, filter, and create the result playlist.

pub mod aggregate;
pub mod filter;
pub mod writer;

pub use aggregate::Aggregator;
pub use writer::PlaylistWriter;
