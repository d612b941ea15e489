//! Generic admin layer - create/edit forms driven by per-entity field descriptors.
//!
//! Each administered entity declares a static [`EntityDescriptor`] listing its
//! fields and their roles. The form code walks that table to build a
//! [`FormSchema`], binds submitted values back into a [`BoundForm`], and hands
//! the result to the entity's [`AdminModel`] implementation. No entity needs
//! its own form code.

pub mod descriptors;
pub mod form;
pub mod models;

use crate::{
    core::{catalog, product},
    entities::{Category, Image, Product, Specification, SpecificationOption, SuperCategory},
    errors::{Error, Result},
    store::Store,
};
use serde::Serialize;
use std::future::Future;
use std::str::FromStr;
use tracing::instrument;

pub use form::{BoundForm, FormField, FormInput, FormSchema, FormValues, bind};

/// How a scalar field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// Single-line text
    Text,
    /// Multi-line text
    LongText,
    /// Whole number
    Integer,
}

/// Cardinality of a relation field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Points at one row of the target
    ManyToOne,
    /// Owns many rows of the target
    OneToMany,
    /// Linked to many rows through a join table
    ManyToMany,
}

/// A collection a relation field can select from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// `products`
    Products,
    /// `categories`
    Categories,
    /// `super_categories`
    SuperCategories,
    /// `specifications`
    Specifications,
    /// `specification_options`
    SpecificationOptions,
    /// `images`
    Images,
}

/// One entry of a selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Row id submitted back by the form
    pub id: i64,
    /// Text shown to the administrator
    pub label: String,
}

impl Collection {
    /// Accessor name, as exposed by [`Store`]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::SuperCategories => "super_categories",
            Self::Specifications => "specifications",
            Self::SpecificationOptions => "specification_options",
            Self::Images => "images",
        }
    }

    /// Loads every row of the collection as selector options.
    pub async fn options(self, store: &Store) -> Result<Vec<SelectOption>> {
        let options = match self {
            Self::Products => product::list_products(store)
                .await?
                .into_iter()
                .map(|p| SelectOption { id: p.id, label: p.name })
                .collect(),
            Self::Categories => catalog::list_categories(store)
                .await?
                .into_iter()
                .map(|c| SelectOption { id: c.id, label: c.name })
                .collect(),
            Self::SuperCategories => catalog::list_super_categories(store)
                .await?
                .into_iter()
                .map(|c| SelectOption { id: c.id, label: c.name })
                .collect(),
            Self::Specifications => catalog::list_specifications(store)
                .await?
                .into_iter()
                .map(|s| SelectOption { id: s.id, label: s.name })
                .collect(),
            Self::SpecificationOptions => catalog::list_specification_options(store)
                .await?
                .into_iter()
                .map(|o| SelectOption { id: o.id, label: o.value })
                .collect(),
            Self::Images => catalog::list_images(store)
                .await?
                .into_iter()
                .map(|i| SelectOption { id: i.id, label: i.path })
                .collect(),
        };
        Ok(options)
    }
}

/// What generic tooling does with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "role", content = "detail")]
pub enum FieldRole {
    /// The row key; shown nowhere in forms
    PrimaryKey,
    /// A scalar edited directly
    SimpleProperty(ScalarKind),
    /// Single selector over the target collection
    ManyToOne(Collection),
    /// Multi selector over the target collection
    OneToMany(Collection),
    /// Multi selector over the target collection, stored via a join table
    ManyToMany(Collection),
    /// Stored but hidden from forms (shadow keys, computed or transient values)
    NotAdministered,
}

impl FieldRole {
    /// Relation kind and target, for relation fields
    #[must_use]
    pub const fn relation(self) -> Option<(RelationKind, Collection)> {
        match self {
            Self::ManyToOne(target) => Some((RelationKind::ManyToOne, target)),
            Self::OneToMany(target) => Some((RelationKind::OneToMany, target)),
            Self::ManyToMany(target) => Some((RelationKind::ManyToMany, target)),
            Self::PrimaryKey | Self::SimpleProperty(_) | Self::NotAdministered => None,
        }
    }

    /// Whether the field appears in create/edit forms
    #[must_use]
    pub const fn is_administered(self) -> bool {
        !matches!(self, Self::PrimaryKey | Self::NotAdministered)
    }
}

/// One field of an entity descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Form field name
    pub name: &'static str,
    /// How the field is treated
    pub role: FieldRole,
}

/// Static description of an administered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    /// Name used in admin URLs
    pub name: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// All fields, administered or not
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    /// Fields shown in forms, in declaration order
    pub fn administered(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.role.is_administered())
    }

    /// Name of the primary key field
    #[must_use]
    pub fn primary_key(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.role == FieldRole::PrimaryKey)
            .map(|f| f.name)
    }
}

/// Entity operations the admin forms dispatch to
pub trait AdminModel {
    /// The field table for this entity
    const DESCRIPTOR: &'static EntityDescriptor;

    /// Creates a row from bound form values and returns its id
    fn create(store: &Store, form: &BoundForm) -> impl Future<Output = Result<i64>> + Send;

    /// Updates an existing row from bound form values
    fn update(
        store: &Store,
        id: i64,
        form: &BoundForm,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Deletes a row
    fn delete(store: &Store, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Current values of a row, keyed like the form fields
    fn current_values(store: &Store, id: i64) -> impl Future<Output = Result<FormValues>> + Send;
}

/// Builds the create form (`id = None`) or the prefilled edit form for `M`.
pub async fn form_schema<M: AdminModel>(store: &Store, id: Option<i64>) -> Result<FormSchema> {
    let values = match id {
        Some(id) => M::current_values(store, id).await?,
        None => FormValues::default(),
    };
    form::build_schema(store, M::DESCRIPTOR, id, &values).await
}

/// Binds submitted values and creates a row of `M`.
pub async fn create_entity<M: AdminModel>(store: &Store, values: &FormValues) -> Result<i64> {
    let bound = bind(M::DESCRIPTOR, values)?;
    M::create(store, &bound).await
}

/// Binds submitted values and updates row `id` of `M`.
pub async fn update_entity<M: AdminModel>(
    store: &Store,
    id: i64,
    values: &FormValues,
) -> Result<()> {
    let bound = bind(M::DESCRIPTOR, values)?;
    M::update(store, id, &bound).await
}

/// Deletes row `id` of `M`.
pub async fn delete_entity<M: AdminModel>(store: &Store, id: i64) -> Result<()> {
    M::delete(store, id).await
}

/// Every entity kind reachable through the admin endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEntity {
    /// Products
    Product,
    /// Categories
    Category,
    /// Super categories
    SuperCategory,
    /// Specifications
    Specification,
    /// Specification options
    SpecificationOption,
    /// Images
    Image,
}

macro_rules! dispatch {
    ($kind:expr, $model:ident => $body:expr) => {
        match $kind {
            AdminEntity::Product => {
                type $model = Product;
                $body
            }
            AdminEntity::Category => {
                type $model = Category;
                $body
            }
            AdminEntity::SuperCategory => {
                type $model = SuperCategory;
                $body
            }
            AdminEntity::Specification => {
                type $model = Specification;
                $body
            }
            AdminEntity::SpecificationOption => {
                type $model = SpecificationOption;
                $body
            }
            AdminEntity::Image => {
                type $model = Image;
                $body
            }
        }
    };
}

impl AdminEntity {
    /// All kinds, in menu order
    pub const ALL: [Self; 6] = [
        Self::Product,
        Self::Category,
        Self::SuperCategory,
        Self::Specification,
        Self::SpecificationOption,
        Self::Image,
    ];

    /// The descriptor for this kind
    #[must_use]
    pub const fn descriptor(self) -> &'static EntityDescriptor {
        dispatch!(self, M => M::DESCRIPTOR)
    }

    /// See [`form_schema`]
    pub async fn schema(self, store: &Store, id: Option<i64>) -> Result<FormSchema> {
        dispatch!(self, M => form_schema::<M>(store, id).await)
    }

    /// See [`create_entity`]
    #[instrument(skip(store, values))]
    pub async fn create(self, store: &Store, values: &FormValues) -> Result<i64> {
        dispatch!(self, M => create_entity::<M>(store, values).await)
    }

    /// See [`update_entity`]
    #[instrument(skip(store, values))]
    pub async fn update(self, store: &Store, id: i64, values: &FormValues) -> Result<()> {
        dispatch!(self, M => update_entity::<M>(store, id, values).await)
    }

    /// See [`delete_entity`]
    #[instrument(skip(store))]
    pub async fn delete(self, store: &Store, id: i64) -> Result<()> {
        dispatch!(self, M => delete_entity::<M>(store, id).await)
    }
}

impl FromStr for AdminEntity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.descriptor().name == s)
            .ok_or_else(|| Error::UnknownEntity {
                name: s.to_string(),
            })
    }
}
