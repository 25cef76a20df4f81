//! DDL for the blog schema.
//!
//! Generated identities need care on SQLite, where `AUTOINCREMENT` is only accepted on an
//! `INTEGER PRIMARY KEY`; the other backends get 64-bit serial columns.

use crate::entity::{post, post_comment, post_details, post_tag, tag};
use sea_orm::{
    ConnectionTrait, DbBackend, DbErr,
    sea_query::{
        ColumnDef, ForeignKey, ForeignKeyAction, Index, IntoIden, Table, TableCreateStatement,
        TableDropStatement,
    },
};
use tracing::instrument;

/// Create all tables, owners first
#[instrument(level = "debug", skip_all)]
pub async fn create_tables<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    for stmt in create_table_statements(backend) {
        db.execute(backend.build(&stmt)).await?;
    }
    Ok(())
}

/// Drop all tables, dependents first
#[instrument(level = "debug", skip_all)]
pub async fn drop_tables<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    for stmt in drop_table_statements() {
        db.execute(backend.build(&stmt)).await?;
    }
    Ok(())
}

pub fn create_table_statements(backend: DbBackend) -> Vec<TableCreateStatement> {
    vec![
        create_post_table(),
        create_tag_table(backend),
        create_post_comment_table(backend),
        create_post_details_table(),
        create_post_tag_table(),
    ]
}

pub fn drop_table_statements() -> Vec<TableDropStatement> {
    vec![
        Table::drop().table(post_tag::Entity).if_exists().to_owned(),
        Table::drop()
            .table(post_details::Entity)
            .if_exists()
            .to_owned(),
        Table::drop()
            .table(post_comment::Entity)
            .if_exists()
            .to_owned(),
        Table::drop().table(tag::Entity).if_exists().to_owned(),
        Table::drop().table(post::Entity).if_exists().to_owned(),
    ]
}

fn generated_id<T>(backend: DbBackend, column: T) -> ColumnDef
where
    T: IntoIden,
{
    let mut id = ColumnDef::new(column);
    match backend {
        DbBackend::Sqlite => id.integer(),
        DbBackend::MySql | DbBackend::Postgres => id.big_integer(),
    };
    id.not_null().auto_increment().primary_key();
    id
}

pub fn create_post_table() -> TableCreateStatement {
    Table::create()
        .table(post::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(post::Column::Id)
                .big_integer()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(post::Column::Title).string().not_null())
        .to_owned()
}

pub fn create_tag_table(backend: DbBackend) -> TableCreateStatement {
    Table::create()
        .table(tag::Entity)
        .if_not_exists()
        .col(&mut generated_id(backend, tag::Column::Id))
        .col(ColumnDef::new(tag::Column::Name).string().not_null())
        .to_owned()
}

pub fn create_post_comment_table(backend: DbBackend) -> TableCreateStatement {
    Table::create()
        .table(post_comment::Entity)
        .if_not_exists()
        .col(&mut generated_id(backend, post_comment::Column::Id))
        .col(
            ColumnDef::new(post_comment::Column::Review)
                .string()
                .not_null(),
        )
        .col(ColumnDef::new(post_comment::Column::PostId).big_integer())
        .foreign_key(
            ForeignKey::create()
                .name("fk-post_comment-post_id")
                .from(post_comment::Entity, post_comment::Column::PostId)
                .to(post::Entity, post::Column::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

pub fn create_post_details_table() -> TableCreateStatement {
    Table::create()
        .table(post_details::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(post_details::Column::Id)
                .big_integer()
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(post_details::Column::CreatedOn)
                .date_time()
                .not_null(),
        )
        .col(
            ColumnDef::new(post_details::Column::CreatedBy)
                .string()
                .not_null(),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk-post_details-id")
                .from(post_details::Entity, post_details::Column::Id)
                .to(post::Entity, post::Column::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

pub fn create_post_tag_table() -> TableCreateStatement {
    Table::create()
        .table(post_tag::Entity)
        .if_not_exists()
        .col(
            ColumnDef::new(post_tag::Column::PostId)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(post_tag::Column::TagId)
                .big_integer()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .name("pk-post_tag")
                .col(post_tag::Column::PostId)
                .col(post_tag::Column::TagId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk-post_tag-post_id")
                .from(post_tag::Entity, post_tag::Column::PostId)
                .to(post::Entity, post::Column::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk-post_tag-tag_id")
                .from(post_tag::Entity, post_tag::Column::TagId)
                .to(tag::Entity, tag::Column::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}
