use serde::Serialize;

use super::{Banner, ModelType, Product};

/// Any entry that can appear on the feed screen.
///
/// Serializes back to the wire shape, with the `type` discriminator restored.
/// Decoding goes through `feed::decode_item`, which reports the three failure
/// modes separately instead of a single serde error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum FeedItem {
    Banner(Banner),
    Product(Product),
}

impl FeedItem {
    pub fn kind(&self) -> ModelType {
        match self {
            FeedItem::Banner(_) => ModelType::Banner,
            FeedItem::Product(_) => ModelType::Product,
        }
    }

    /// Link target for opening the item outside the app, if any.
    pub fn link(&self) -> Option<&str> {
        match self {
            FeedItem::Banner(banner) => banner.link.as_deref(),
            FeedItem::Product(_) => None,
        }
    }
}
