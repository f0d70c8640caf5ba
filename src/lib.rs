// Reusable library API, visible to the CLI and the helper binaries
pub mod errors;
pub mod grid;
pub mod log;
pub mod normalize;
pub mod search;
pub mod word;
pub mod word_index;
pub mod word_list;
