mod banner;
mod feed_item;
mod model_type;
mod product;

pub use banner::Banner;
pub use feed_item::FeedItem;
pub use model_type::ModelType;
pub use product::Product;
