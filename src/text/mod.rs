// Text preparation shared by every analysis stage.

pub mod normalize;

pub use normalize::{normalize, normalize_str, tokenize};
