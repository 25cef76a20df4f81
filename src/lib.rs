#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # SeaORM Lateral
//!
//! Hand-written SQL and the query builder, side by side.
//!
//! A blog schema of posts, comments, details and tags is modelled as SeaORM entities.
//! Three reporting queries are each written twice: once as native SQL with named parameters,
//! once with SeaORM / SeaQuery. Running a [`QueryPair`] executes both forms, each in its own
//! transaction, and checks that they return the same rows.
//!
//! ```
//! use sea_orm::DbBackend;
//! use sea_orm_lateral::{CommentCount, QueryPair};
//!
//! let pair = CommentCount::new("Vlad Mihalcea");
//!
//! assert_eq!(
//!     DbBackend::Postgres.build(&pair.builder()).to_string(),
//!     [
//!         r#"SELECT "post"."title" AS "post_title", COUNT("post_comment"."id") AS "comment_count""#,
//!         r#"FROM "post""#,
//!         r#"LEFT JOIN "post_comment" ON "post"."id" = "post_comment"."post_id""#,
//!         r#"INNER JOIN "post_details" ON "post"."id" = "post_details"."id""#,
//!         r#"WHERE "post_details"."created_by" = 'Vlad Mihalcea'"#,
//!         r#"GROUP BY "post"."title""#,
//!     ]
//!     .join(" ")
//! );
//! ```
//!
//! The lateral scenarios need a backend with `LATERAL` support (PostgreSQL or MySQL); on
//! SQLite they fail with [`LateralErr::LateralUnsupported`] before touching the database.

pub mod config;
pub mod entity;
pub mod error;
pub mod fixture;
pub mod graph;
pub mod query;
pub mod repository;
pub mod schema;

pub use config::Config;
pub use error::*;
pub use graph::{Post, PostComment, PostDetails, Tag};
pub use query::*;
