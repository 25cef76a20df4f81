//! In-memory post graph.
//!
//! A [`Post`] owns its comments and its details, and references shared tags. Back-references
//! are only ever written by the owning side: adding a comment points it at the post, removing
//! it clears the pointer. Setters follow the SeaQuery builder convention of `&mut self -> &mut
//! Self`, so a chain is finished with `.to_owned()`.
//!
//! ```
//! use sea_orm_lateral::{Post, PostComment, PostDetails};
//!
//! let post = Post::new()
//!     .set_id(1)
//!     .set_title("High-Performance Java Persistence")
//!     .add_comment(PostComment::new("Best book on JPA and Hibernate!"))
//!     .add_details(PostDetails::new().set_created_by("Vlad Mihalcea").to_owned())
//!     .to_owned();
//!
//! assert_eq!(post.comments()[0].post_id(), Some(1));
//! assert_eq!(post.details().and_then(|d| d.id()), Some(1));
//! ```

use crate::entity::{post, post_comment, post_details, tag};
use chrono::{NaiveDateTime, SubsecRound, Utc};

/// A post together with everything it owns
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Post {
    pub(crate) id: Option<i64>,
    pub(crate) title: String,
    pub(crate) comments: Vec<PostComment>,
    pub(crate) details: Option<PostDetails>,
    pub(crate) tags: Vec<Tag>,
}

/// A comment, pointing back at the post that owns it
#[derive(Clone, Debug, Default)]
pub struct PostComment {
    pub(crate) id: Option<i64>,
    pub(crate) review: String,
    pub(crate) post_id: Option<i64>,
}

/// Creation metadata of a post, keyed by the post id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDetails {
    pub(crate) id: Option<i64>,
    pub(crate) created_on: NaiveDateTime,
    pub(crate) created_by: String,
}

/// A tag, shared between posts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag {
    pub(crate) id: Option<i64>,
    pub(crate) name: String,
}

impl Post {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn comments(&self) -> &[PostComment] {
        &self.comments
    }

    pub fn details(&self) -> Option<&PostDetails> {
        self.details.as_ref()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Assign the post id. Owned comments and details follow the new id.
    pub fn set_id(&mut self, id: i64) -> &mut Self {
        self.id = Some(id);
        for comment in self.comments.iter_mut() {
            comment.post_id = Some(id);
        }
        if let Some(details) = self.details.as_mut() {
            details.id = Some(id);
        }
        self
    }

    pub fn set_title<T>(&mut self, title: T) -> &mut Self
    where
        T: Into<String>,
    {
        self.title = title.into();
        self
    }

    /// Append a comment and point its back-reference at this post
    pub fn add_comment(&mut self, mut comment: PostComment) -> &mut Self {
        comment.post_id = self.id;
        self.comments.push(comment);
        self
    }

    /// Detach a persisted comment, matched by identity.
    /// The comment is handed back with its back-reference cleared.
    pub fn remove_comment(&mut self, comment: &PostComment) -> Option<PostComment> {
        let index = self.comments.iter().position(|c| c == comment)?;
        self.remove_comment_at(index)
    }

    /// Detach the comment at `index`, which also works for comments that were never persisted
    pub fn remove_comment_at(&mut self, index: usize) -> Option<PostComment> {
        if index >= self.comments.len() {
            return None;
        }
        let mut comment = self.comments.remove(index);
        comment.post_id = None;
        Some(comment)
    }

    /// Attach details, sharing this post's id
    pub fn add_details(&mut self, mut details: PostDetails) -> &mut Self {
        details.id = self.id;
        self.details = Some(details);
        self
    }

    /// Detach the details, handing them back without an id
    pub fn remove_details(&mut self) -> Option<PostDetails> {
        let mut details = self.details.take()?;
        details.id = None;
        Some(details)
    }

    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    pub(crate) fn from_models(
        post: post::Model,
        comments: Vec<post_comment::Model>,
        details: Option<post_details::Model>,
        tags: Vec<tag::Model>,
    ) -> Self {
        Self {
            id: Some(post.id),
            title: post.title,
            comments: comments.into_iter().map(Into::into).collect(),
            details: details.map(Into::into),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl PostComment {
    pub fn new<T>(review: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            review: review.into(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn review(&self) -> &str {
        &self.review
    }

    /// Id of the owning post; `None` while detached
    pub fn post_id(&self) -> Option<i64> {
        self.post_id
    }

    pub fn set_review<T>(&mut self, review: T) -> &mut Self
    where
        T: Into<String>,
    {
        self.review = review.into();
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Comments are equal when they share a database identity.
/// A transient comment equals no other comment.
impl PartialEq for PostComment {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl From<post_comment::Model> for PostComment {
    fn from(model: post_comment::Model) -> Self {
        Self {
            id: Some(model.id),
            review: model.review,
            post_id: model.post_id,
        }
    }
}

impl PostDetails {
    /// Stamp `created_on` with the current UTC time.
    /// Sub-microsecond digits are dropped so the value survives a round trip through the database.
    pub fn new() -> Self {
        Self {
            id: None,
            created_on: Utc::now().naive_utc().trunc_subsecs(6),
            created_by: String::new(),
        }
    }

    /// Shared primary key, equal to the owning post's id once attached
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn created_on(&self) -> NaiveDateTime {
        self.created_on
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn set_created_on(&mut self, created_on: NaiveDateTime) -> &mut Self {
        self.created_on = created_on;
        self
    }

    pub fn set_created_by<T>(&mut self, created_by: T) -> &mut Self
    where
        T: Into<String>,
    {
        self.created_by = created_by.into();
        self
    }
}

impl Default for PostDetails {
    fn default() -> Self {
        Self::new()
    }
}

impl From<post_details::Model> for PostDetails {
    fn from(model: post_details::Model) -> Self {
        Self {
            id: Some(model.id),
            created_on: model.created_on,
            created_by: model.created_by,
        }
    }
}

impl Tag {
    pub fn new<T>(name: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<T>(&mut self, name: T) -> &mut Self
    where
        T: Into<String>,
    {
        self.name = name.into();
        self
    }
}

impl From<tag::Model> for Tag {
    fn from(model: tag::Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
        }
    }
}
