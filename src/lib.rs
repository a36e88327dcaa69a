// Gamebot: answers DTF comments that mention [games] with RAWG details.
//
// This is the library root. Each module corresponds to one stage or
// collaborator of the comment pipeline.

pub mod catalog;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod reply;
pub mod report;
pub mod scheduler;
pub mod web;
