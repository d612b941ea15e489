//! Form values, binding and schema generation.
//!
//! Submitted forms arrive as flat `(name, value)` pairs; multi selectors repeat
//! the field name once per selected id. [`bind`] turns those pairs into typed
//! values following the entity descriptor:
//!
//! - text fields take the first value, or an empty string when absent
//! - integer fields must parse as `i64`
//! - single selectors yield one id, 0 when empty or absent
//! - multi selectors yield every non-empty value as an id, possibly none

use super::{Collection, EntityDescriptor, FieldRole, ScalarKind, SelectOption};
use crate::{
    errors::{Error, Result},
    store::Store,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Raw submitted values keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, Vec<String>>,
}

impl FormValues {
    /// Collects pairs, keeping repeated names in submission order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (name, value) in pairs {
            form.push(name, value);
        }
        form
    }

    /// Appends one value under `name`
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// First value submitted for `name`
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value submitted for `name`
    #[must_use]
    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map_or(&[], Vec::as_slice)
    }
}

/// Form values converted to the types their fields declare
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundForm {
    texts: BTreeMap<&'static str, String>,
    integers: BTreeMap<&'static str, i64>,
    ids: BTreeMap<&'static str, i64>,
    id_lists: BTreeMap<&'static str, Vec<i64>>,
}

impl BoundForm {
    /// Bound text, empty when the field was not submitted
    #[must_use]
    pub fn text(&self, field: &str) -> &str {
        self.texts.get(field).map_or("", String::as_str)
    }

    /// Bound integer, 0 for fields that are not integer fields
    #[must_use]
    pub fn integer(&self, field: &str) -> i64 {
        self.integers.get(field).copied().unwrap_or_default()
    }

    /// Selected id of a single selector, 0 when nothing was selected
    #[must_use]
    pub fn id(&self, field: &str) -> i64 {
        self.ids.get(field).copied().unwrap_or_default()
    }

    /// Selected ids of a multi selector
    #[must_use]
    pub fn ids(&self, field: &str) -> Vec<i64> {
        self.id_lists.get(field).cloned().unwrap_or_default()
    }
}

fn invalid(field: &str, message: impl Into<String>) -> Error {
    Error::InvalidForm {
        field: field.to_string(),
        message: message.into(),
    }
}

fn parse_id(field: &str, raw: &str) -> Result<i64> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(field, format!("'{raw}' is not an id")))?;
    if id < 0 {
        return Err(invalid(field, format!("'{raw}' is not an id")));
    }
    Ok(id)
}

/// Binds submitted `values` against `descriptor`.
///
/// Names the descriptor does not administer are ignored.
///
/// # Errors
/// Returns `Error::InvalidForm` naming the first field whose value cannot be
/// converted.
pub fn bind(descriptor: &EntityDescriptor, values: &FormValues) -> Result<BoundForm> {
    let mut bound = BoundForm::default();
    for field in descriptor.administered() {
        let name = field.name;
        match field.role {
            FieldRole::SimpleProperty(ScalarKind::Text | ScalarKind::LongText) => {
                bound
                    .texts
                    .insert(name, values.first(name).unwrap_or_default().to_string());
            }
            FieldRole::SimpleProperty(ScalarKind::Integer) => {
                let raw = values.first(name).unwrap_or_default().trim();
                if raw.is_empty() {
                    return Err(invalid(name, "a number is required"));
                }
                let number = raw
                    .parse()
                    .map_err(|_| invalid(name, format!("'{raw}' is not a number")))?;
                bound.integers.insert(name, number);
            }
            FieldRole::ManyToOne(_) => {
                let id = match values.first(name).map(str::trim) {
                    None | Some("") => 0,
                    Some(raw) => parse_id(name, raw)?,
                };
                bound.ids.insert(name, id);
            }
            FieldRole::OneToMany(_) | FieldRole::ManyToMany(_) => {
                let ids = values
                    .all(name)
                    .iter()
                    .filter(|raw| !raw.trim().is_empty())
                    .map(|raw| parse_id(name, raw))
                    .collect::<Result<Vec<_>>>()?;
                bound.id_lists.insert(name, ids);
            }
            FieldRole::PrimaryKey | FieldRole::NotAdministered => {}
        }
    }
    Ok(bound)
}

/// Input widget for one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FormInput {
    /// Single-line text box
    Text,
    /// Multi-line text box
    TextArea,
    /// Number box
    Number,
    /// Single selector
    Select {
        /// Everything that can be picked
        options: Vec<SelectOption>,
    },
    /// Multi selector
    MultiSelect {
        /// Everything that can be picked
        options: Vec<SelectOption>,
    },
}

/// One rendered field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Submitted under this name
    pub name: &'static str,
    /// Widget to render
    pub input: FormInput,
    /// Current value(s), empty on a create form
    pub value: Vec<String>,
}

/// A complete create or edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    /// Entity name used in admin URLs
    pub entity: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// Row being edited, `None` for a create form
    pub id: Option<i64>,
    /// Administered fields in declaration order
    pub fields: Vec<FormField>,
}

pub(super) async fn build_schema(
    store: &Store,
    descriptor: &EntityDescriptor,
    id: Option<i64>,
    current: &FormValues,
) -> Result<FormSchema> {
    let mut fields = Vec::new();
    // Each collection is loaded at most once per form
    let mut loaded: BTreeMap<&'static str, Vec<SelectOption>> = BTreeMap::new();

    for field in descriptor.administered() {
        let input = match field.role {
            FieldRole::SimpleProperty(ScalarKind::Text) => FormInput::Text,
            FieldRole::SimpleProperty(ScalarKind::LongText) => FormInput::TextArea,
            FieldRole::SimpleProperty(ScalarKind::Integer) => FormInput::Number,
            FieldRole::ManyToOne(target) => FormInput::Select {
                options: options_for(store, &mut loaded, target).await?,
            },
            FieldRole::OneToMany(target) | FieldRole::ManyToMany(target) => {
                FormInput::MultiSelect {
                    options: options_for(store, &mut loaded, target).await?,
                }
            }
            FieldRole::PrimaryKey | FieldRole::NotAdministered => continue,
        };
        fields.push(FormField {
            name: field.name,
            input,
            value: current.all(field.name).to_vec(),
        });
    }

    Ok(FormSchema {
        entity: descriptor.name,
        title: descriptor.title,
        id,
        fields,
    })
}

async fn options_for(
    store: &Store,
    loaded: &mut BTreeMap<&'static str, Vec<SelectOption>>,
    target: Collection,
) -> Result<Vec<SelectOption>> {
    let key = target.name();
    if let Some(options) = loaded.get(key) {
        return Ok(options.clone());
    }
    let options = target.options(store).await?;
    loaded.insert(key, options.clone());
    Ok(options)
}
