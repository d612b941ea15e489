//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod image;
pub mod order;
pub mod product;
pub mod product_line;
pub mod product_specification_option;
pub mod purchase;
pub mod specification;
pub mod specification_option;
pub mod super_category;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use image::{Column as ImageColumn, Entity as Image, Model as ImageModel};
pub use order::{
    Column as OrderColumn, DeliveryType, Entity as Order, Model as OrderModel, OrderStatus,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_line::{
    Column as ProductLineColumn, Entity as ProductLine, Model as ProductLineModel,
};
pub use product_specification_option::{
    Column as ProductSpecificationOptionColumn, Entity as ProductSpecificationOption,
};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use specification::{
    Column as SpecificationColumn, Entity as Specification, Model as SpecificationModel,
};
pub use specification_option::{
    Column as SpecificationOptionColumn, Entity as SpecificationOption,
    Model as SpecificationOptionModel,
};
pub use super_category::{
    Column as SuperCategoryColumn, Entity as SuperCategory, Model as SuperCategoryModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
