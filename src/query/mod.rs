//! Query pairs: one result, asked for twice.
//!
//! Every [`QueryPair`] carries a native SQL form and a builder form of the same query. Each form
//! is executed in its own transaction; [`PairOutcome::ensure_equivalent`] then compares the two
//! row sets, ignoring row order.

mod comment_count;
mod comment_count_per_title;
mod latest_comment;
mod params;

pub use comment_count::*;
pub use comment_count_per_title::*;
pub use latest_comment::*;
pub use params::*;

use crate::LateralErr;
use sea_orm::{
    ConnectionTrait, DbBackend, DbErr, DeriveIden, FromQueryResult, Statement, TransactionTrait,
    sea_query::SelectStatement,
};
use std::fmt::Debug;

/// Table and column aliases used by the builder forms
#[derive(DeriveIden, Clone, Copy, Debug)]
pub(crate) enum QueryAlias {
    P,
    P1,
    Pc,
    Pc1,
    Pc2,
    #[sea_orm(iden = "p_c")]
    PC,
    PostId,
    PostTitle,
    LatestCommentReview,
    CommentCount,
}

/// A query written twice: as native SQL and with the query builder
pub trait QueryPair {
    /// Shape of one result row, shared by both forms
    type Row: FromQueryResult + Clone + Debug + Ord + Send + 'static;

    fn name(&self) -> &'static str;

    /// Native SQL with its named parameters bound for `backend`
    fn native(&self, backend: DbBackend) -> Result<Statement, LateralErr>;

    /// Builder form, independent of the backend until it is built
    fn builder(&self) -> SelectStatement;

    fn native_uses_lateral(&self) -> bool;

    fn builder_uses_lateral(&self) -> bool;
}

/// Rows returned by both forms of a [`QueryPair`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairOutcome<R> {
    pub scenario: &'static str,
    pub native: Vec<R>,
    pub builder: Vec<R>,
}

/// Whether the backend can execute `LATERAL` joins
pub fn supports_lateral(backend: DbBackend) -> bool {
    matches!(backend, DbBackend::Postgres | DbBackend::MySql)
}

fn ensure_lateral(scenario: &'static str, backend: DbBackend, needed: bool) -> Result<(), LateralErr> {
    if needed && !supports_lateral(backend) {
        return Err(LateralErr::LateralUnsupported { scenario, backend });
    }
    Ok(())
}

/// Execute the native form inside its own transaction
pub async fn fetch_native<C, P>(db: &C, pair: &P) -> Result<Vec<P::Row>, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
    P: QueryPair,
{
    let backend = db.get_database_backend();
    ensure_lateral(pair.name(), backend, pair.native_uses_lateral())?;
    fetch(db, pair.name(), pair.native(backend)?).await
}

/// Execute the builder form inside its own transaction
pub async fn fetch_builder<C, P>(db: &C, pair: &P) -> Result<Vec<P::Row>, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
    P: QueryPair,
{
    let backend = db.get_database_backend();
    ensure_lateral(pair.name(), backend, pair.builder_uses_lateral())?;
    fetch(db, pair.name(), backend.build(&pair.builder())).await
}

async fn fetch<C, R>(db: &C, scenario: &'static str, stmt: Statement) -> Result<Vec<R>, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
    R: FromQueryResult + Send + 'static,
{
    tracing::debug!(scenario, sql = %stmt.sql, "executing");
    let rows = db
        .transaction::<_, Vec<R>, DbErr>(|txn| {
            Box::pin(async move { R::find_by_statement(stmt).all(txn).await })
        })
        .await?;
    tracing::debug!(scenario, rows = rows.len(), "fetched");
    Ok(rows)
}

/// Execute both forms of `pair`, native first
pub async fn run<C, P>(db: &C, pair: &P) -> Result<PairOutcome<P::Row>, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
    P: QueryPair,
{
    let native = fetch_native(db, pair).await?;
    let builder = fetch_builder(db, pair).await?;
    Ok(PairOutcome {
        scenario: pair.name(),
        native,
        builder,
    })
}

/// Execute both forms and return the rows once they agree
pub async fn run_equivalent<C, P>(db: &C, pair: &P) -> Result<Vec<P::Row>, LateralErr>
where
    C: ConnectionTrait + TransactionTrait,
    P: QueryPair,
{
    let outcome = run(db, pair).await?;
    outcome.ensure_equivalent()?;
    Ok(outcome.native)
}

impl<R> PairOutcome<R>
where
    R: Clone + Debug + Ord,
{
    /// Both forms returned the same rows, in any order
    pub fn ensure_equivalent(&self) -> Result<(), LateralErr> {
        if self.native.len() != self.builder.len() {
            tracing::warn!(
                scenario = self.scenario,
                native = self.native.len(),
                builder = self.builder.len(),
                "row counts differ"
            );
            return Err(LateralErr::RowCountMismatch {
                scenario: self.scenario,
                native: self.native.len(),
                builder: self.builder.len(),
            });
        }

        let mut native = self.native.clone();
        let mut builder = self.builder.clone();
        native.sort();
        builder.sort();
        if native != builder {
            tracing::warn!(scenario = self.scenario, "row values differ");
            return Err(LateralErr::RowMismatch {
                scenario: self.scenario,
                native: format!("{native:?}"),
                builder: format!("{builder:?}"),
            });
        }
        Ok(())
    }
}
