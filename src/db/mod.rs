//! Database layer (flat JSON documents).

pub mod json_store;

pub use json_store::{CommentBook, JsonCollection, JsonDb, VoteBook};

/// Document file names as constants.
pub mod collections {
    pub const USERS: &str = "users.json";
    pub const VIDEOS: &str = "videos.json";
    pub const VOTES: &str = "votes.json";
    pub const COMMENTS: &str = "comments.json";
}
