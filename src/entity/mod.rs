//! SeaORM entities of the blog schema.
//!
//! `post` owns its comments and its details; `post_details` reuses the post id as its own
//! primary key. Tags are shared between posts through the `post_tag` join table.

pub mod prelude;

pub mod post;
pub mod post_comment;
pub mod post_details;
pub mod post_tag;
pub mod tag;
