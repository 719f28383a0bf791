use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "jutsus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Globally unique, case-sensitive.
    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Element tag (`fire`, `water`, ..., `other`).
    pub element: String,

    /// Category tag (`offensive`, `defensive`, `support`, `supplementary`).
    pub category: String,

    /// Rank tag (`E` through `SS`).
    pub rank: String,

    /// Relative filename of the stored image asset.
    pub image: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
