use sea_orm::entity::prelude::*;

use super::parse_date;
use crate::domain::BookInstance;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "book_instances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub book_id: String,
    pub imprint: String,
    /// One of `Available`, `Maintenance`, `Loaned`, `Reserved`
    #[sea_orm(default_value = "Maintenance")]
    pub status: String,
    pub due_back: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BookInstance {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            book: model.book_id,
            imprint: model.imprint,
            status: model.status.parse().unwrap_or_default(),
            due_back: parse_date(&model.due_back).unwrap_or_default(),
        }
    }
}
