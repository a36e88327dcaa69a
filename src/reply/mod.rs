// Reply text — formatting resolved games for a DTF comment.

pub mod format;
pub mod stores;

pub use format::{ReplyFormatter, BLOCK_DIVIDER};
