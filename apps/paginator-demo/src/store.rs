//! In-memory SQLite fixture: users, their posts and comments on those posts.

use anyhow::{Context, Result};
use paginator_db::{FieldKind, FieldMap};
use sea_orm::{
    ActiveValue::Set, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema,
};
use serde::Serialize;

pub mod user {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub name: String,
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
        pub author_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod comment {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "comments")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub post_id: i64,
        pub user_id: i64,
        pub body: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub const USERS: i64 = 10;
pub const POSTS_PER_USER: i64 = 23;
pub const COMMENTS: i64 = 120;

const TOPICS: [&str; 4] = ["rust", "sqlite", "tracing", "serde"];

/* ---------- DTOs printed by the CLI ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
}

impl From<user::Model> for UserDto {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
}

impl From<post::Model> for PostDto {
    fn from(m: post::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            author_id: m.author_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub body: String,
}

impl From<comment::Model> for CommentDto {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            post_id: m.post_id,
            user_id: m.user_id,
            body: m.body,
        }
    }
}

/* ---------- field maps ---------- */

pub fn user_fields() -> FieldMap<user::Entity> {
    FieldMap::<user::Entity>::new()
        .insert("id", user::Column::Id, FieldKind::I64)
        .insert("name", user::Column::Name, FieldKind::String)
}

pub fn post_fields() -> FieldMap<post::Entity> {
    FieldMap::<post::Entity>::new()
        .insert("id", post::Column::Id, FieldKind::I64)
        .insert("title", post::Column::Title, FieldKind::String)
        .insert("authorId", post::Column::AuthorId, FieldKind::I64)
}

pub fn comment_fields() -> FieldMap<comment::Entity> {
    FieldMap::<comment::Entity>::new()
        .insert("id", comment::Column::Id, FieldKind::I64)
        .insert("postId", comment::Column::PostId, FieldKind::I64)
        .insert("userId", comment::Column::UserId, FieldKind::I64)
        .insert("body", comment::Column::Body, FieldKind::String)
}

/* ---------- connection + seed ---------- */

pub async fn connect_seeded() -> Result<DatabaseConnection> {
    // one connection: each in-memory sqlite connection is its own database
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .context("failed to open in-memory sqlite")?;

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(user::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(post::Entity)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(comment::Entity)))
        .await?;

    seed(&db).await.context("failed to seed demo data")?;
    tracing::info!(
        users = USERS,
        posts = USERS * POSTS_PER_USER,
        comments = COMMENTS,
        "demo database seeded"
    );
    Ok(db)
}

async fn seed(db: &DatabaseConnection) -> Result<()> {
    let users = (1..=USERS).map(|id| user::ActiveModel {
        id: Set(id),
        name: Set(format!("user{id:02}")),
    });
    user::Entity::insert_many(users).exec(db).await?;

    let total_posts = USERS * POSTS_PER_USER;
    let posts: Vec<post::ActiveModel> = (1..=total_posts)
        .map(|id| post::ActiveModel {
            id: Set(id),
            title: Set(format!(
                "Post {id:03} about {}",
                TOPICS[(id % TOPICS.len() as i64) as usize]
            )),
            author_id: Set((id - 1) % USERS + 1),
        })
        .collect();
    for chunk in posts.chunks(50) {
        post::Entity::insert_many(chunk.to_vec()).exec(db).await?;
    }

    let comments = (1..=COMMENTS).map(|id| comment::ActiveModel {
        id: Set(id),
        post_id: Set((id - 1) % 30 + 1),
        user_id: Set(id % USERS + 1),
        body: Set(format!("Comment {id} on post {}", (id - 1) % 30 + 1)),
    });
    comment::Entity::insert_many(comments).exec(db).await?;
    Ok(())
}
