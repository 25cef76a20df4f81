use super::{QueryAlias, QueryPair};
use crate::{
    LateralErr,
    entity::{post, post_comment},
};
use sea_orm::{
    DbBackend, FromQueryResult, Statement,
    sea_query::{Asterisk, Expr, JoinType, Query, SelectStatement},
};

const NATIVE: &str = r#"SELECT
    p.id AS post_id,
    p.title AS post_title,
    pc.review AS latest_comment_review
FROM post p,
LATERAL (
    SELECT *
    FROM post_comment pc1
    WHERE pc1.id = (
        SELECT MAX(pc2.id)
        FROM post_comment pc2
        WHERE pc2.post_id = p.id
    )
) pc"#;

/// A post with the review of its most recent comment
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, FromQueryResult)]
pub struct LatestCommentRow {
    pub post_id: i64,
    pub post_title: String,
    pub latest_comment_review: String,
}

/// Each post joined laterally to the comment with the highest id. Posts without comments are
/// left out.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatestComment;

impl QueryPair for LatestComment {
    type Row = LatestCommentRow;

    fn name(&self) -> &'static str {
        "latest_comment"
    }

    fn native(&self, backend: DbBackend) -> Result<Statement, LateralErr> {
        Ok(Statement::from_string(backend, NATIVE.to_owned()))
    }

    fn builder(&self) -> SelectStatement {
        let max_id = Query::select()
            .expr(Expr::col((QueryAlias::Pc2, post_comment::Column::Id)).max())
            .from_as(post_comment::Entity, QueryAlias::Pc2)
            .and_where(
                Expr::col((QueryAlias::Pc2, post_comment::Column::PostId))
                    .equals((QueryAlias::P, post::Column::Id)),
            )
            .to_owned();

        let latest = Query::select()
            .column((QueryAlias::Pc1, Asterisk))
            .from_as(post_comment::Entity, QueryAlias::Pc1)
            .and_where(Expr::col((QueryAlias::Pc1, post_comment::Column::Id)).in_subquery(max_id))
            .to_owned();

        Query::select()
            .expr_as(Expr::col((QueryAlias::P, post::Column::Id)), QueryAlias::PostId)
            .expr_as(
                Expr::col((QueryAlias::P, post::Column::Title)),
                QueryAlias::PostTitle,
            )
            .expr_as(
                Expr::col((QueryAlias::Pc, post_comment::Column::Review)),
                QueryAlias::LatestCommentReview,
            )
            .from_as(post::Entity, QueryAlias::P)
            .join_lateral(
                JoinType::InnerJoin,
                latest,
                QueryAlias::Pc,
                Expr::cust("TRUE"),
            )
            .to_owned()
    }

    fn native_uses_lateral(&self) -> bool {
        true
    }

    fn builder_uses_lateral(&self) -> bool {
        true
    }
}
