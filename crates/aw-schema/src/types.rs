//! The schema description type itself. Deliberately hand-rolled rather than
//! a JSON-Schema crate: the validator needs full control over suggestion
//! generation, example-value synthesis, and deprecated-field handling (spec
//! §4.2), which a generic schema library would only get in the way of.

/// The shape a single field's value is expected to take.
#[derive(Debug, Clone)]
pub enum SchemaType {
    String,
    Integer,
    Boolean,
    /// A closed set of accepted string values (e.g. `engine:`'s tag).
    Enum(Vec<&'static str>),
    Array(Box<SchemaType>),
    Object(ObjectSchema),
    /// Accepted if *any* alternative validates cleanly (e.g. `permissions:`
    /// is either the scalar `read-all`/`write-all`/`none` or a mapping of
    /// permission name to `read`/`write`/`none`, spec §3).
    Union(Vec<SchemaType>),
    /// Any shape at all — used for the rare genuinely free-form mapping
    /// (`env:`, a step's `with:`).
    Any,
}

impl SchemaType {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Enum(_) => "enum",
            SchemaType::Array(_) => "array",
            SchemaType::Object(_) => "object",
            SchemaType::Union(_) => "one of several shapes",
            SchemaType::Any => "any",
        }
    }
}

/// A single named field within an [`ObjectSchema`].
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub schema: SchemaType,
    pub required: bool,
    /// `Some(replacement)` marks a field as deprecated in favor of
    /// `replacement`, per the `Deprecated: Use 'X' instead.` description
    /// convention (spec §4.2).
    pub deprecated_in_favor_of: Option<&'static str>,
}

impl FieldSchema {
    pub const fn required(name: &'static str, schema: SchemaType) -> Self {
        Self {
            name,
            schema,
            required: true,
            deprecated_in_favor_of: None,
        }
    }

    pub const fn optional(name: &'static str, schema: SchemaType) -> Self {
        Self {
            name,
            schema,
            required: false,
            deprecated_in_favor_of: None,
        }
    }

    pub const fn deprecated(name: &'static str, replacement: &'static str) -> Self {
        Self {
            name,
            schema: SchemaType::Any,
            required: false,
            deprecated_in_favor_of: Some(replacement),
        }
    }
}

/// A mapping schema: its known fields, and whether unlisted keys are
/// tolerated. Every header-level object in this compiler forbids unknown
/// properties (spec §4.2: "strict mode is mandatory"); only genuinely
/// free-form maps (`env:`, MCP server entries keyed by arbitrary tool name)
/// set `additional_properties: true`.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub fields: Vec<FieldSchema>,
    pub additional_properties: bool,
}

impl ObjectSchema {
    pub fn strict(fields: Vec<FieldSchema>) -> Self {
        Self {
            fields,
            additional_properties: false,
        }
    }

    pub fn open(fields: Vec<FieldSchema>) -> Self {
        Self {
            fields,
            additional_properties: true,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn accepted_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.deprecated_in_favor_of.is_none())
            .map(|f| f.name)
            .collect()
    }
}
