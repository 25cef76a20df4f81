pub use super::post::Entity as Post;
pub use super::post_comment::Entity as PostComment;
pub use super::post_details::Entity as PostDetails;
pub use super::post_tag::Entity as PostTag;
pub use super::tag::Entity as Tag;
