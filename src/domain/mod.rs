pub mod feed;
pub mod id;
pub mod item;

pub use feed::Feed;
pub use id::generate_id;
pub use item::Item;
