//! Unit-of-work persistence for the post graph.
//!
//! Each operation runs in its own transaction (a savepoint when called inside one). A post
//! owns its comments and details, so they are written and deleted with it; tags are only
//! linked and must be persisted on their own first.

use crate::{
    LateralErr,
    entity::{post, post_comment, post_details, post_tag, tag},
    graph::{Post, Tag},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait,
    DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::instrument;

/// Insert a tag, returning it with its generated id
#[instrument(level = "debug", skip_all, fields(tag = tag.name()))]
pub async fn persist_tag<C>(db: &C, tag: &Tag) -> Result<Tag, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let name = tag.name().to_owned();
    let model = db
        .transaction::<_, tag::Model, DbErr>(|txn| {
            Box::pin(async move {
                tag::ActiveModel {
                    name: Set(name),
                    ..Default::default()
                }
                .insert(txn)
                .await
            })
        })
        .await?;
    tracing::debug!(id = model.id, "tag persisted");
    Ok(model.into())
}

/// Insert a new post with its comments, details and tag links
#[instrument(level = "debug", skip_all, fields(post_id = ?post.id()))]
pub async fn persist<C>(db: &C, post: &Post) -> Result<Post, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let id = ensure_persistable(post)?;
    let graph = post.clone();
    let persisted = db
        .transaction::<_, Post, LateralErr>(|txn| {
            Box::pin(async move {
                post::ActiveModel {
                    id: Set(id),
                    title: Set(graph.title.clone()),
                }
                .insert(txn)
                .await?;
                write_children(txn, id, graph).await
            })
        })
        .await?;
    tracing::debug!(comments = persisted.comments().len(), "post persisted");
    Ok(persisted)
}

/// Load a post with everything it owns and the tags it links to
#[instrument(level = "debug", skip(db))]
pub async fn find<C>(db: &C, id: i64) -> Result<Option<Post>, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let found = db
        .transaction::<_, Option<Post>, DbErr>(|txn| {
            Box::pin(async move {
                let Some(post) = post::Entity::find_by_id(id).one(txn).await? else {
                    return Ok(None);
                };
                let comments = post
                    .find_related(post_comment::Entity)
                    .order_by_asc(post_comment::Column::Id)
                    .all(txn)
                    .await?;
                let details = post.find_related(post_details::Entity).one(txn).await?;
                let tags = post
                    .find_related(tag::Entity)
                    .order_by_asc(tag::Column::Id)
                    .all(txn)
                    .await?;
                Ok(Some(Post::from_models(post, comments, details, tags)))
            })
        })
        .await?;
    Ok(found)
}

/// Make the stored graph match `post`.
///
/// Comments no longer in the graph are deleted, retained ones are updated and new ones
/// inserted. Details are inserted, updated or deleted to match, and the tag links are rewritten.
#[instrument(level = "debug", skip_all, fields(post_id = ?post.id()))]
pub async fn merge<C>(db: &C, post: &Post) -> Result<Post, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let id = ensure_persistable(post)?;
    let graph = post.clone();
    let merged = db
        .transaction::<_, Post, LateralErr>(|txn| {
            Box::pin(async move {
                let stored = post::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("post {id}")))?;
                let mut active: post::ActiveModel = stored.into();
                active.title = Set(graph.title.clone());
                active.update(txn).await?;

                let retained: Vec<i64> = graph.comments.iter().filter_map(|c| c.id).collect();
                let orphans = post_comment::Entity::delete_many()
                    .filter(post_comment::Column::PostId.eq(id))
                    .filter(post_comment::Column::Id.is_not_in(retained))
                    .exec(txn)
                    .await?;
                tracing::debug!(orphans = orphans.rows_affected, "orphaned comments removed");

                post_details::Entity::delete_by_id(id).exec(txn).await?;
                post_tag::Entity::delete_many()
                    .filter(post_tag::Column::PostId.eq(id))
                    .exec(txn)
                    .await?;

                write_children(txn, id, graph).await
            })
        })
        .await?;
    Ok(merged)
}

/// Delete a post with its comments, details and tag links. Tags are kept.
///
/// Returns whether a post was deleted.
#[instrument(level = "debug", skip(db))]
pub async fn remove<C>(db: &C, id: i64) -> Result<bool, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let removed = db
        .transaction::<_, bool, DbErr>(|txn| {
            Box::pin(async move {
                post_tag::Entity::delete_many()
                    .filter(post_tag::Column::PostId.eq(id))
                    .exec(txn)
                    .await?;
                post_comment::Entity::delete_many()
                    .filter(post_comment::Column::PostId.eq(id))
                    .exec(txn)
                    .await?;
                post_details::Entity::delete_by_id(id).exec(txn).await?;
                let res = post::Entity::delete_by_id(id).exec(txn).await?;
                Ok(res.rows_affected > 0)
            })
        })
        .await?;
    tracing::debug!(removed, "post removed");
    Ok(removed)
}

fn ensure_persistable(post: &Post) -> Result<i64, LateralErr> {
    let id = post.id().ok_or(LateralErr::TransientPost)?;
    if let Some(tag) = post.tags().iter().find(|tag| tag.id().is_none()) {
        return Err(LateralErr::TransientTag(tag.name().to_owned()));
    }
    Ok(id)
}

/// Write comments, details and tag links of a post whose row already exists.
/// Persisted comments are updated in place, the rest are inserted.
async fn write_children<C>(db: &C, id: i64, mut graph: Post) -> Result<Post, LateralErr>
where
    C: ConnectionTrait,
{
    graph.set_id(id);

    for comment in graph.comments.iter_mut() {
        match comment.id {
            Some(comment_id) => {
                post_comment::ActiveModel {
                    id: Unchanged(comment_id),
                    review: Set(comment.review.clone()),
                    post_id: Set(Some(id)),
                }
                .update(db)
                .await?;
            }
            None => {
                let model = post_comment::ActiveModel {
                    review: Set(comment.review.clone()),
                    post_id: Set(Some(id)),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                comment.id = Some(model.id);
            }
        }
    }

    if let Some(details) = graph.details.as_ref() {
        post_details::ActiveModel {
            id: Set(id),
            created_on: Set(details.created_on),
            created_by: Set(details.created_by.clone()),
        }
        .insert(db)
        .await?;
    }

    let links: Vec<post_tag::ActiveModel> = graph
        .tags
        .iter()
        .filter_map(Tag::id)
        .map(|tag_id| post_tag::ActiveModel {
            post_id: Set(id),
            tag_id: Set(tag_id),
        })
        .collect();
    if !links.is_empty() {
        post_tag::Entity::insert_many(links)
            .exec_without_returning(db)
            .await?;
    }

    Ok(graph)
}
