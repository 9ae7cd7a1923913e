// Forum API access — listing client and paginated post collection.

pub mod client;
pub mod posts;
