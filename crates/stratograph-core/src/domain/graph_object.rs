//! Graph object types - entities and relationships
//!
//! Entities are graph vertices identified by a caller-assigned natural key
//! (`_key`). Relationships are edges connecting two entities, either by
//! platform-assigned ID or by key. Both carry an integration-local type tag
//! (`_type`), one or more standardized classification tags (`_class`) and an
//! open set of additional properties restricted to scalars and arrays of
//! scalars.
//!
//! ## Wire format
//!
//! Objects serialize to flat JSON maps: the reserved fields use their
//! underscore-prefixed wire names (`_key`, `_type`, `_class`, ...) and the
//! additional properties are flattened alongside them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Property values
// ============================================================================

/// A property value on an entity or relationship
///
/// The platform accepts scalars and arrays of scalars. Modeling this as a
/// closed union keeps serialization explicit; arbitrarily nested JSON is
/// rejected at the type level rather than at upload time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// JSON null
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating-point scalar
    Float(f64),
    /// String scalar
    String(String),
    /// Array of booleans
    BoolList(Vec<bool>),
    /// Array of integers
    IntList(Vec<i64>),
    /// Array of floats
    FloatList(Vec<f64>),
    /// Array of strings
    StringList(Vec<String>),
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(v: Vec<String>) -> Self {
        Self::StringList(v)
    }
}

impl From<Vec<i64>> for PropertyValue {
    fn from(v: Vec<i64>) -> Self {
        Self::IntList(v)
    }
}

// ============================================================================
// Class labels
// ============================================================================

/// One or more standardized classification tags
///
/// `_class` refers to a classification that has been standardized across
/// integrations, while `_type` only has to be unique within one integration.
/// The wire format accepts a bare string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabels {
    /// A single classification tag
    One(String),
    /// Multiple classification tags
    Many(Vec<String>),
}

impl ClassLabels {
    /// Returns the labels as a slice regardless of wire shape
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match self {
            Self::One(label) => std::slice::from_ref(label),
            Self::Many(labels) => labels,
        }
    }
}

impl From<&str> for ClassLabels {
    fn from(label: &str) -> Self {
        Self::One(label.to_string())
    }
}

impl From<String> for ClassLabels {
    fn from(label: String) -> Self {
        Self::One(label)
    }
}

impl From<Vec<String>> for ClassLabels {
    fn from(labels: Vec<String>) -> Self {
        Self::Many(labels)
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A graph vertex record with a caller-assigned natural key
///
/// `_key` must be unique within its owning scope. `_type` and `_class`
/// together drive downstream classification and must both be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Natural identifier assigned by the integration,
    /// e.g. `aws:iam:user-policy:abc123`
    #[serde(rename = "_key")]
    pub key: String,

    /// Integration-local type tag
    #[serde(rename = "_type")]
    pub entity_type: String,

    /// Standardized classification tag(s)
    #[serde(rename = "_class")]
    pub class: ClassLabels,

    /// Label shown for this vertex in the UI
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,

    /// Additional properties, flattened into the wire object
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Entity {
    /// Creates an entity with the required key, type and class fields
    pub fn new(
        key: impl Into<String>,
        entity_type: impl Into<String>,
        class: impl Into<ClassLabels>,
    ) -> Self {
        Self {
            key: key.into(),
            entity_type: entity_type.into(),
            class: class.into(),
            display_name: None,
            properties: BTreeMap::new(),
        }
    }

    /// Sets the display name (builder style)
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Adds one additional property (builder style)
    #[must_use]
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

// ============================================================================
// Relationship
// ============================================================================

/// A graph edge record connecting two entities
///
/// Endpoints are referenced either directly by platform-assigned ID
/// (scope-independent) or by natural key. Key references may be qualified
/// with a scope/source when the source entity lives in a different upload
/// scope; unqualified key references across scopes silently fail to resolve
/// on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Natural identifier assigned by the integration
    #[serde(rename = "_key")]
    pub key: String,

    /// Integration-local type tag
    #[serde(rename = "_type")]
    pub relationship_type: String,

    /// Standardized classification tag(s)
    #[serde(rename = "_class")]
    pub class: ClassLabels,

    /// Source entity by platform-assigned ID
    #[serde(
        rename = "_fromEntityId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub from_entity_id: Option<String>,

    /// Target entity by platform-assigned ID
    #[serde(
        rename = "_toEntityId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub to_entity_id: Option<String>,

    /// Source entity by natural key
    #[serde(
        rename = "_fromEntityKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub from_entity_key: Option<String>,

    /// Target entity by natural key
    #[serde(
        rename = "_toEntityKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub to_entity_key: Option<String>,

    /// Upload scope of the source entity, when it differs from the job scope
    #[serde(
        rename = "_fromEntityScope",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub from_entity_scope: Option<String>,

    /// Source system of the source entity, when it differs from the job source
    #[serde(
        rename = "_fromEntitySource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub from_entity_source: Option<String>,

    /// Additional properties, flattened into the wire object
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// A view of how a relationship addresses its endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointRefs<'a> {
    /// Both endpoints referenced by platform-assigned ID
    ById {
        /// Source entity ID
        from: &'a str,
        /// Target entity ID
        to: &'a str,
    },
    /// Both endpoints referenced by natural key
    ByKey {
        /// Source entity key
        from: &'a str,
        /// Target entity key
        to: &'a str,
    },
}

impl Relationship {
    /// Creates a relationship addressing both endpoints by platform ID
    pub fn between_ids(
        key: impl Into<String>,
        relationship_type: impl Into<String>,
        class: impl Into<ClassLabels>,
        from_entity_id: impl Into<String>,
        to_entity_id: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            relationship_type: relationship_type.into(),
            class: class.into(),
            from_entity_id: Some(from_entity_id.into()),
            to_entity_id: Some(to_entity_id.into()),
            from_entity_key: None,
            to_entity_key: None,
            from_entity_scope: None,
            from_entity_source: None,
            properties: BTreeMap::new(),
        }
    }

    /// Creates a relationship addressing both endpoints by natural key
    pub fn between_keys(
        key: impl Into<String>,
        relationship_type: impl Into<String>,
        class: impl Into<ClassLabels>,
        from_entity_key: impl Into<String>,
        to_entity_key: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            relationship_type: relationship_type.into(),
            class: class.into(),
            from_entity_id: None,
            to_entity_id: None,
            from_entity_key: Some(from_entity_key.into()),
            to_entity_key: Some(to_entity_key.into()),
            from_entity_scope: None,
            from_entity_source: None,
            properties: BTreeMap::new(),
        }
    }

    /// Qualifies a key-based source endpoint with its upload scope
    #[must_use]
    pub fn with_from_scope(mut self, scope: impl Into<String>) -> Self {
        self.from_entity_scope = Some(scope.into());
        self
    }

    /// Adds one additional property (builder style)
    #[must_use]
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns the endpoint addressing style, if both endpoints are set
    ///
    /// ID-based references take precedence when both styles are present.
    /// Returns `None` when the relationship is missing an endpoint.
    #[must_use]
    pub fn endpoints(&self) -> Option<EndpointRefs<'_>> {
        if let (Some(from), Some(to)) = (&self.from_entity_id, &self.to_entity_id) {
            return Some(EndpointRefs::ById { from, to });
        }
        if let (Some(from), Some(to)) = (&self.from_entity_key, &self.to_entity_key) {
            return Some(EndpointRefs::ByKey { from, to });
        }
        None
    }
}

// ============================================================================
// Deletions
// ============================================================================

/// Reference to an existing graph object by its platform-assigned ID
///
/// Deletion uploads carry only identifiers, never full property payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDeletion {
    /// Platform-assigned object ID
    #[serde(rename = "_id")]
    pub id: String,
}

impl ObjectDeletion {
    /// Creates a deletion reference for the given object ID
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// ============================================================================
// Tests
// ============================================================================
