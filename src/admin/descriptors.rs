//! Field tables for every administered entity.

use super::{Collection, EntityDescriptor, FieldDescriptor, FieldRole, ScalarKind};

const fn field(name: &'static str, role: FieldRole) -> FieldDescriptor {
    FieldDescriptor { name, role }
}

const ID: FieldDescriptor = field("id", FieldRole::PrimaryKey);

/// Fields of a product
pub static PRODUCT: EntityDescriptor = EntityDescriptor {
    name: "product",
    title: "Product",
    fields: &[
        ID,
        field("name", FieldRole::SimpleProperty(ScalarKind::Text)),
        field("cost", FieldRole::SimpleProperty(ScalarKind::Integer)),
        field("description", FieldRole::SimpleProperty(ScalarKind::LongText)),
        field("category_id", FieldRole::NotAdministered),
        field("category", FieldRole::ManyToOne(Collection::Categories)),
        field(
            "specification_options",
            FieldRole::ManyToMany(Collection::SpecificationOptions),
        ),
        field("images", FieldRole::OneToMany(Collection::Images)),
        // Derived from name and description on every write
        field("search_vector", FieldRole::NotAdministered),
        // Per-request flag, never stored
        field("is_in_cart", FieldRole::NotAdministered),
    ],
};

/// Fields of a category
pub static CATEGORY: EntityDescriptor = EntityDescriptor {
    name: "category",
    title: "Category",
    fields: &[
        ID,
        field("name", FieldRole::SimpleProperty(ScalarKind::Text)),
        field("super_category_id", FieldRole::NotAdministered),
        field("super_category", FieldRole::ManyToOne(Collection::SuperCategories)),
    ],
};

/// Fields of a super category
pub static SUPER_CATEGORY: EntityDescriptor = EntityDescriptor {
    name: "super_category",
    title: "Super category",
    fields: &[ID, field("name", FieldRole::SimpleProperty(ScalarKind::Text))],
};

/// Fields of a specification
pub static SPECIFICATION: EntityDescriptor = EntityDescriptor {
    name: "specification",
    title: "Specification",
    fields: &[ID, field("name", FieldRole::SimpleProperty(ScalarKind::Text))],
};

/// Fields of a specification option
pub static SPECIFICATION_OPTION: EntityDescriptor = EntityDescriptor {
    name: "specification_option",
    title: "Specification option",
    fields: &[
        ID,
        field("value", FieldRole::SimpleProperty(ScalarKind::Text)),
        field("specification_id", FieldRole::NotAdministered),
        field("specification", FieldRole::ManyToOne(Collection::Specifications)),
    ],
};

/// Fields of an image
pub static IMAGE: EntityDescriptor = EntityDescriptor {
    name: "image",
    title: "Image",
    fields: &[
        ID,
        field("path", FieldRole::SimpleProperty(ScalarKind::Text)),
        field("product_id", FieldRole::NotAdministered),
        field("product", FieldRole::ManyToOne(Collection::Products)),
    ],
};
