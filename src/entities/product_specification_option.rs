use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join row for the Product <-> `SpecificationOption` many-to-many relation
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_specification_options")]
pub struct Model {
    /// Linked product
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
    /// Linked option
    #[sea_orm(primary_key, auto_increment = false)]
    pub specification_option_id: i64,
}

/// Both sides of the join
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Product side
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// Option side
    #[sea_orm(
        belongs_to = "super::specification_option::Entity",
        from = "Column::SpecificationOptionId",
        to = "super::specification_option::Column::Id",
        on_delete = "Cascade"
    )]
    SpecificationOption,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::specification_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpecificationOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
