// Reply dispatch — posting the composed reply back to DTF.

pub mod dtf;
pub mod traits;

pub use traits::{CommentPoster, PostedReply};
