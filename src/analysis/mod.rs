// Corpus statistics — vocabulary distribution, TF-IDF top terms, and
// per-post term frequencies.

pub mod report;
pub mod term_freq;
pub mod tfidf;
pub mod vocabulary;

pub use report::{analyze_forum, analyze_forums, AnalysisParams, ForumReport, TermScore};
pub use term_freq::{extract_term_frequencies, PostTermRow, TermStat};
pub use vocabulary::{analyze_vocabulary, VocabularyStats, WordFrequency};
