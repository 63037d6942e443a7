use sea_orm::entity::prelude::*;

use crate::domain::Genre;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    // Not unique at the schema level; duplicates are caught case-insensitively on create
    pub name: String,
    /// `name` folded with [`name_key`], the column duplicate lookups match on
    pub name_key: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Case-folded form of a genre name
///
/// Folded in Rust rather than with SQLite `LOWER()`, which only folds ASCII.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

impl From<Model> for Genre {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_folds_non_ascii() {
        assert_eq!(name_key("Épopée"), "épopée");
        assert_eq!(name_key("ÉPOPÉE"), name_key("épopée"));
        assert_eq!(name_key("Science Fiction"), "science fiction");
    }
}
