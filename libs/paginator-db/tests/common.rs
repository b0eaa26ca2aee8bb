#![allow(dead_code)]
use std::sync::Arc;

use anyhow::Result;
use paginator_core::{EntityColumns, PaginationConfig};
use paginator_db::{FieldKind, FieldMap};
use sea_orm::{
    ActiveValue::Set, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema,
};

pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub name: String,
        pub email: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod post {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "posts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub title: String,
        pub body: String,
        pub author_id: i64,
        pub rating: Option<i64>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub const USERS: i64 = 10;
pub const POSTS: i64 = 230;

const TITLE_PREFIXES: [&str; 3] = ["Intro to", "Deep dive:", "Notes on"];

pub fn post_fields() -> FieldMap<post::Entity> {
    FieldMap::<post::Entity>::new()
        .insert("id", post::Column::Id, FieldKind::I64)
        .insert("title", post::Column::Title, FieldKind::String)
        .insert("body", post::Column::Body, FieldKind::String)
        .insert("authorId", post::Column::AuthorId, FieldKind::I64)
        .insert("rating", post::Column::Rating, FieldKind::I64)
}

pub fn user_fields() -> FieldMap<user::Entity> {
    FieldMap::<user::Entity>::new()
        .insert("id", user::Column::Id, FieldKind::I64)
        .insert("name", user::Column::Name, FieldKind::String)
        .insert("email", user::Column::Email, FieldKind::String)
}

/// `Post` gets its own policy; `User` resolves through `default` (`id` only).
pub fn config() -> Arc<PaginationConfig> {
    Arc::new(PaginationConfig::default().with_columns(
        "Post",
        EntityColumns::new(
            ["id", "title"],
            ["id", "title", "authorId", "rating", "body"],
        ),
    ))
}

/// Title prefix cycles with `i % 3`: 0 → "Intro to", 1 → "Deep dive:", 2 → "Notes on".
pub fn expected_title(i: i64) -> String {
    let prefix = TITLE_PREFIXES[(i % 3) as usize];
    format!("{prefix} topic {i:03}")
}

pub async fn bring_up_sqlite() -> Result<DatabaseConnection> {
    // in-memory sqlite is per-connection; pin the pool to one
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(user::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(post::Entity)))
        .await?;

    seed(&db).await?;
    Ok(db)
}

// Post `i`: author `(i - 1) % 10 + 1`, every fourth post unrated.
async fn seed(db: &DatabaseConnection) -> Result<()> {
    let users = (1..=USERS).map(|id| user::ActiveModel {
        id: Set(id),
        name: Set(format!("user{id}")),
        email: Set((id % 2 == 0).then(|| format!("user{id}@example.com"))),
    });
    user::Entity::insert_many(users).exec(db).await?;

    let posts: Vec<post::ActiveModel> = (1..=POSTS)
        .map(|id| post::ActiveModel {
            id: Set(id),
            title: Set(expected_title(id)),
            body: Set(format!("Body of post {id}")),
            author_id: Set((id - 1) % USERS + 1),
            rating: Set((id % 4 != 0).then_some(id % 5)),
        })
        .collect();
    for chunk in posts.chunks(50) {
        post::Entity::insert_many(chunk.to_vec()).exec(db).await?;
    }
    Ok(())
}
