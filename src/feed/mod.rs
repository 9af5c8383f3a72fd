mod decoder;
mod fetcher;

pub use decoder::{decode_item, DecodedFeed};
pub use fetcher::{FeedFetcher, FeedSource};
