//! Book database entity for SeaORM.
//!
//! Client-supplied keys other than `id` and `title` live in the `fields`
//! JSONB column.

use sea_orm::entity::prelude::*;
use serde_json::{Map, Value};

use crate::domain::{Book, BookId};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub fields: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        let fields = match model.fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Book {
            id: BookId::from(model.id),
            title: model.title,
            fields,
        }
    }
}
