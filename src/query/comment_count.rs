use super::{QueryPair, bind_named};
use crate::{
    LateralErr,
    entity::{post, post_comment, post_details},
};
use sea_orm::{
    ColumnTrait, DbBackend, EntityTrait, FromQueryResult, QueryFilter, QuerySelect, QueryTrait,
    Select, Statement, sea_query::SelectStatement,
};

const NATIVE: &str = r#"SELECT
    p.title AS post_title,
    COUNT(pc.id) AS comment_count
FROM post p
LEFT JOIN post_comment pc ON pc.post_id = p.id
JOIN post_details pd ON p.id = pd.id
WHERE pd.created_by = :createdBy
GROUP BY p.title"#;

/// A post title with its number of comments
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, FromQueryResult)]
pub struct CommentCountRow {
    pub post_title: String,
    pub comment_count: i64,
}

/// Comments per post title, for the posts whose details name a given creator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentCount {
    created_by: String,
}

impl CommentCount {
    pub fn new<T>(created_by: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            created_by: created_by.into(),
        }
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub(crate) fn native_sql() -> &'static str {
        NATIVE
    }

    /// The aggregation as a SeaORM select, joined along the post's relations
    pub fn select(&self) -> Select<post::Entity> {
        post::Entity::find()
            .select_only()
            .column_as(post::Column::Title, "post_title")
            .column_as(post_comment::Column::Id.count(), "comment_count")
            .left_join(post_comment::Entity)
            .inner_join(post_details::Entity)
            .filter(post_details::Column::CreatedBy.eq(self.created_by.as_str()))
            .group_by(post::Column::Title)
    }
}

impl QueryPair for CommentCount {
    type Row = CommentCountRow;

    fn name(&self) -> &'static str {
        "comment_count"
    }

    fn native(&self, backend: DbBackend) -> Result<Statement, LateralErr> {
        bind_named(
            backend,
            NATIVE,
            [("createdBy", self.created_by.as_str().into())],
        )
    }

    fn builder(&self) -> SelectStatement {
        self.select().into_query()
    }

    fn native_uses_lateral(&self) -> bool {
        false
    }

    fn builder_uses_lateral(&self) -> bool {
        false
    }
}
