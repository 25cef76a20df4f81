//! The blog post every scenario runs against.

use crate::{
    LateralErr,
    graph::{Post, PostComment, PostDetails, Tag},
    repository, schema,
};
use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
use tracing::instrument;

pub const POST_ID: i64 = 1;
pub const POST_TITLE: &str = "High-Performance Java Persistence";
pub const FIRST_REVIEW: &str = "Best book on JPA and Hibernate!";
pub const SECOND_REVIEW: &str = "A must-read for every Java developer!";
pub const CREATED_BY: &str = "Vlad Mihalcea";
pub const JAVA: &str = "Java";
pub const HIBERNATE: &str = "Hibernate";

/// Build the post graph: two comments, details and both tags. Nothing is written.
pub fn post_graph(java: Tag, hibernate: Tag) -> Post {
    Post::new()
        .set_id(POST_ID)
        .set_title(POST_TITLE)
        .add_comment(PostComment::new(FIRST_REVIEW))
        .add_comment(PostComment::new(SECOND_REVIEW))
        .add_details(PostDetails::new().set_created_by(CREATED_BY).to_owned())
        .add_tag(java)
        .add_tag(hibernate)
        .to_owned()
}

/// Persist both tags and then the post graph, all in one transaction
#[instrument(level = "debug", skip_all)]
pub async fn seed<C>(db: &C) -> Result<Post, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let post = db
        .transaction::<_, Post, LateralErr>(|txn| Box::pin(seed_in(txn)))
        .await?;
    tracing::info!(post_id = ?post.id(), "fixture seeded");
    Ok(post)
}

async fn seed_in(txn: &DatabaseTransaction) -> Result<Post, LateralErr> {
    let java = repository::persist_tag(txn, &Tag::new(JAVA)).await?;
    let hibernate = repository::persist_tag(txn, &Tag::new(HIBERNATE)).await?;
    repository::persist(txn, &post_graph(java, hibernate)).await
}

/// Create the tables and seed them
pub async fn setup<C>(db: &C) -> Result<Post, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    schema::create_tables(db).await?;
    seed(db).await
}
