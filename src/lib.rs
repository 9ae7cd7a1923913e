// forumstats: descriptive text statistics for forum communities.
//
// This is the library root. Each module corresponds to one stage of the
// pipeline: fetch posts, normalize text, compute statistics, plot.

pub mod analysis;
pub mod config;
pub mod forum;
pub mod output;
pub mod plot;
pub mod text;
