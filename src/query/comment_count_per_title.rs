use super::{CommentCount, CommentCountRow, QueryAlias, QueryPair, bind_named};
use crate::{LateralErr, entity::post};
use sea_orm::{
    DbBackend, QueryFilter, QueryTrait, Statement,
    sea_query::{Expr, JoinType, Query, SelectStatement},
};

/// Joins `post` against the group-by aggregation used as a derived table.
fn native_sql() -> String {
    format!(
        "SELECT\n    p1.title AS post_title,\n    p_c.comment_count\nFROM post p1\nJOIN (\n{}\n) p_c ON p1.title = p_c.post_title",
        CommentCount::native_sql()
    )
}

/// [`CommentCount`] joined back to `post` by title.
///
/// The native form joins a derived table; the builder form correlates the aggregation on the
/// outer title and joins it laterally, so only the builder needs `LATERAL`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentCountPerTitle {
    inner: CommentCount,
}

impl CommentCountPerTitle {
    pub fn new<T>(created_by: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            inner: CommentCount::new(created_by),
        }
    }

    pub fn created_by(&self) -> &str {
        self.inner.created_by()
    }
}

impl From<CommentCount> for CommentCountPerTitle {
    fn from(inner: CommentCount) -> Self {
        Self { inner }
    }
}

impl QueryPair for CommentCountPerTitle {
    type Row = CommentCountRow;

    fn name(&self) -> &'static str {
        "comment_count_per_title"
    }

    fn native(&self, backend: DbBackend) -> Result<Statement, LateralErr> {
        bind_named(
            backend,
            &native_sql(),
            [("createdBy", self.inner.created_by().into())],
        )
    }

    fn builder(&self) -> SelectStatement {
        let per_title = self
            .inner
            .select()
            .filter(
                Expr::col((post::Entity, post::Column::Title))
                    .equals((QueryAlias::P1, post::Column::Title)),
            )
            .into_query();

        Query::select()
            .expr_as(
                Expr::col((QueryAlias::P1, post::Column::Title)),
                QueryAlias::PostTitle,
            )
            .expr_as(
                Expr::col((QueryAlias::PC, QueryAlias::CommentCount)),
                QueryAlias::CommentCount,
            )
            .from_as(post::Entity, QueryAlias::P1)
            .join_lateral(
                JoinType::InnerJoin,
                per_title,
                QueryAlias::PC,
                Expr::cust("TRUE"),
            )
            .to_owned()
    }

    fn native_uses_lateral(&self) -> bool {
        false
    }

    fn builder_uses_lateral(&self) -> bool {
        true
    }
}
