pub mod common;

use common::TestContext;
use pretty_assertions::assert_eq;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use sea_orm_lateral::{
    LateralErr, Post, PostComment, PostDetails, Tag,
    entity::{post_comment, post_details, post_tag, tag},
    fixture, repository, schema,
};

#[sea_orm_macros::test]
#[cfg(any(
    feature = "sqlx-mysql",
    feature = "sqlx-sqlite",
    feature = "sqlx-postgres"
))]
async fn find_loads_the_graph() -> Result<(), LateralErr> {
    let ctx = TestContext::new("repository_find_loads_the_graph").await;
    let seeded = fixture::setup(&ctx.db).await?;

    let found = repository::find(&ctx.db, fixture::POST_ID)
        .await?
        .expect("post was seeded");

    assert_eq!(found.id(), seeded.id());
    assert_eq!(found.title(), fixture::POST_TITLE);
    assert_eq!(found.comments(), seeded.comments());
    assert_eq!(
        found
            .comments()
            .iter()
            .map(|c| (c.review(), c.post_id()))
            .collect::<Vec<_>>(),
        vec![
            (fixture::FIRST_REVIEW, Some(fixture::POST_ID)),
            (fixture::SECOND_REVIEW, Some(fixture::POST_ID)),
        ]
    );
    let details = found.details().expect("details were seeded");
    assert_eq!(details.id(), Some(fixture::POST_ID));
    assert_eq!(details.created_by(), fixture::CREATED_BY);
    assert_eq!(found.tags(), seeded.tags());

    assert!(repository::find(&ctx.db, 42).await?.is_none());

    ctx.delete().await;
    Ok(())
}

#[sea_orm_macros::test]
#[cfg(any(
    feature = "sqlx-mysql",
    feature = "sqlx-sqlite",
    feature = "sqlx-postgres"
))]
async fn merge_removes_orphans() -> Result<(), LateralErr> {
    let ctx = TestContext::new("repository_merge_removes_orphans").await;
    let mut post = fixture::setup(&ctx.db).await?;

    let first = post.comments()[0].clone();
    let detached = post.remove_comment(&first).expect("comment is attached");
    assert_eq!(detached.post_id(), None);

    post.set_title("High-Performance Java Persistence, 2nd edition")
        .add_comment(PostComment::new("Worth every page"));
    post.remove_details();

    let merged = repository::merge(&ctx.db, &post).await?;
    let new_comment = merged.comments()[1].clone();
    assert!(new_comment.is_persisted());

    let found = repository::find(&ctx.db, fixture::POST_ID)
        .await?
        .expect("post still exists");
    assert_eq!(
        found.title(),
        "High-Performance Java Persistence, 2nd edition"
    );
    assert_eq!(
        found
            .comments()
            .iter()
            .map(PostComment::review)
            .collect::<Vec<_>>(),
        vec![fixture::SECOND_REVIEW, "Worth every page"]
    );
    assert!(found.details().is_none());
    assert_eq!(post_comment::Entity::find().count(&ctx.db).await?, 2);
    assert_eq!(post_details::Entity::find().count(&ctx.db).await?, 0);

    let mut post = found;
    post.add_details(PostDetails::new().set_created_by("Someone Else").to_owned());
    post.remove_comment_at(1);
    let merged = repository::merge(&ctx.db, &post).await?;
    assert_eq!(merged.comments().len(), 1);
    assert_eq!(
        repository::find(&ctx.db, fixture::POST_ID)
            .await?
            .and_then(|p| p.details().map(|d| d.created_by().to_owned())),
        Some("Someone Else".to_owned())
    );

    ctx.delete().await;
    Ok(())
}

#[sea_orm_macros::test]
#[cfg(any(
    feature = "sqlx-mysql",
    feature = "sqlx-sqlite",
    feature = "sqlx-postgres"
))]
async fn remove_keeps_tags() -> Result<(), LateralErr> {
    let ctx = TestContext::new("repository_remove_keeps_tags").await;
    fixture::setup(&ctx.db).await?;

    assert!(repository::remove(&ctx.db, fixture::POST_ID).await?);

    assert!(repository::find(&ctx.db, fixture::POST_ID).await?.is_none());
    assert_eq!(post_comment::Entity::find().count(&ctx.db).await?, 0);
    assert_eq!(post_details::Entity::find().count(&ctx.db).await?, 0);
    assert_eq!(post_tag::Entity::find().count(&ctx.db).await?, 0);
    assert_eq!(tag::Entity::find().count(&ctx.db).await?, 2);

    assert!(!repository::remove(&ctx.db, fixture::POST_ID).await?);

    ctx.delete().await;
    Ok(())
}

#[sea_orm_macros::test]
#[cfg(any(
    feature = "sqlx-mysql",
    feature = "sqlx-sqlite",
    feature = "sqlx-postgres"
))]
async fn unsaved_references_are_rejected() -> Result<(), LateralErr> {
    let ctx = TestContext::new("repository_unsaved_references").await;
    schema::create_tables(&ctx.db).await?;

    let post = Post::new()
        .set_id(7)
        .set_title("Draft")
        .add_tag(Tag::new("Rust"))
        .to_owned();
    assert!(matches!(
        repository::persist(&ctx.db, &post).await,
        Err(LateralErr::TransientTag(name)) if name == "Rust"
    ));
    assert!(matches!(
        repository::merge(&ctx.db, &Post::new().set_id(7).to_owned()).await,
        Err(LateralErr::Db(DbErr::RecordNotFound(_)))
    ));

    let rust = repository::persist_tag(&ctx.db, &Tag::new("Rust")).await?;
    assert!(rust.id().is_some());
    let post = Post::new().set_id(7).set_title("Draft").add_tag(rust).to_owned();
    repository::persist(&ctx.db, &post).await?;
    assert_eq!(post_tag::Entity::find().count(&ctx.db).await?, 1);

    ctx.delete().await;
    Ok(())
}
