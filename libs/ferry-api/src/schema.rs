use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::ConvertError;

/// Closed enumeration of logical schema kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Null,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    Fixed,
    Enum,
    Array,
    Map,
    Record,
    Union,
}

impl SchemaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Int32 => "int32",
            SchemaKind::Int64 => "int64",
            SchemaKind::Float32 => "float32",
            SchemaKind::Float64 => "float64",
            SchemaKind::String => "string",
            SchemaKind::Bytes => "bytes",
            SchemaKind::Fixed => "fixed",
            SchemaKind::Enum => "enum",
            SchemaKind::Array => "array",
            SchemaKind::Map => "map",
            SchemaKind::Record => "record",
            SchemaKind::Union => "union",
        }
    }

    /// Kinds that carry a declared name (record, enum, fixed).
    pub fn is_named(self) -> bool {
        matches!(self, SchemaKind::Record | SchemaKind::Enum | SchemaKind::Fixed)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared name of a record, enum or fixed schema.
///
/// `"com.acme.Trade"` parses into namespace `com.acme` and simple name `Trade`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    name: String,
    namespace: Option<String>,
}

impl Name {
    pub fn new(fullname: &str) -> Self {
        match fullname.rsplit_once('.') {
            Some((ns, name)) if !ns.is_empty() => Self {
                name: name.to_string(),
                namespace: Some(ns.to_string()),
            },
            _ => Self {
                name: fullname.trim_start_matches('.').to_string(),
                namespace: None,
            },
        }
    }

    pub fn with_namespace(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    pub fn simple(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// True if `declared` is this name's full name or its simple name.
    pub fn matches(&self, declared: &str) -> bool {
        declared == self.name || declared == self.fullname()
    }
}

impl From<&str> for Name {
    fn from(fullname: &str) -> Self {
        Name::new(fullname)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A single declared field of a record schema.
#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: String,
    pub schema: Schema,
}

impl RecordField {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Record schema. Field position in `fields` is the canonical output order.
#[derive(Debug)]
pub struct RecordSchema {
    name: Name,
    fields: Vec<RecordField>,
}

impl RecordSchema {
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Field by name together with its declared position.
    pub fn field(&self, name: &str) -> Option<(usize, &RecordField)> {
        self.fields.iter().enumerate().find(|(_, f)| f.name == name)
    }
}

#[derive(Debug)]
pub struct EnumSchema {
    name: Name,
    symbols: Vec<String>,
}

impl EnumSchema {
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

#[derive(Debug)]
pub struct FixedSchema {
    name: Name,
    size: usize,
}

impl FixedSchema {
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

#[derive(Debug)]
pub struct UnionSchema {
    branches: Vec<Schema>,
}

impl UnionSchema {
    pub fn branches(&self) -> &[Schema] {
        &self.branches
    }

    /// Position of the `null` branch, if the union declares one.
    pub fn null_branch(&self) -> Option<usize> {
        self.branches.iter().position(|b| matches!(b, Schema::Null))
    }
}

/// Non-owning back reference to an enclosing record.
///
/// Built by [`Schema::recursive_record`]; never keeps its target alive.
#[derive(Clone)]
pub struct RecordRef {
    name: Name,
    target: Weak<RecordSchema>,
}

impl RecordRef {
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// `None` once every owner of the referenced record is gone.
    pub fn resolve(&self) -> Option<Arc<RecordSchema>> {
        self.target.upgrade()
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.name.fullname()).finish()
    }
}

/// Read-only schema descriptor.
///
/// Cheap to clone (composite nodes are shared) and safe to read from any
/// number of concurrent conversions.
#[derive(Debug, Clone)]
pub enum Schema {
    Null,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    Fixed(Arc<FixedSchema>),
    Enum(Arc<EnumSchema>),
    /// Element schema.
    Array(Arc<Schema>),
    /// Value schema; keys are always text.
    Map(Arc<Schema>),
    Record(Arc<RecordSchema>),
    /// Self-reference of a recursive record.
    RecordRef(RecordRef),
    Union(Arc<UnionSchema>),
}

impl Schema {
    pub fn fixed(name: impl Into<Name>, size: usize) -> Schema {
        Schema::Fixed(Arc::new(FixedSchema {
            name: name.into(),
            size,
        }))
    }

    pub fn enumeration<S: Into<String>>(
        name: impl Into<Name>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Result<Schema, ConvertError> {
        let name = name.into();
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for symbol in &symbols {
            if symbol.is_empty() {
                return Err(ConvertError::InvalidSchema(format!("enum {name}: empty symbol")));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(ConvertError::InvalidSchema(format!(
                    "enum {name}: duplicate symbol '{symbol}'"
                )));
            }
        }
        Ok(Schema::Enum(Arc::new(EnumSchema { name, symbols })))
    }

    pub fn array(items: Schema) -> Schema {
        Schema::Array(Arc::new(items))
    }

    pub fn map(values: Schema) -> Schema {
        Schema::Map(Arc::new(values))
    }

    pub fn record(name: impl Into<Name>, fields: Vec<RecordField>) -> Result<Schema, ConvertError> {
        let name = name.into();
        check_fields(&name, &fields)?;
        Ok(Schema::Record(Arc::new(RecordSchema { name, fields })))
    }

    /// Record whose fields may refer back to the record itself.
    ///
    /// `build` receives a back reference to the record under construction and
    /// returns its fields.
    pub fn recursive_record(
        name: impl Into<Name>,
        build: impl FnOnce(&Schema) -> Result<Vec<RecordField>, ConvertError>,
    ) -> Result<Schema, ConvertError> {
        let name = name.into();
        let mut failure = None;
        let record = Arc::new_cyclic(|weak| {
            let self_ref = Schema::RecordRef(RecordRef {
                name: name.clone(),
                target: weak.clone(),
            });
            let fields = build(&self_ref).unwrap_or_else(|e| {
                failure = Some(e);
                Vec::new()
            });
            RecordSchema {
                name: name.clone(),
                fields,
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }
        check_fields(&name, record.fields())?;
        Ok(Schema::Record(record))
    }

    pub fn union(branches: Vec<Schema>) -> Result<Schema, ConvertError> {
        let mut unnamed = HashSet::new();
        let mut named = HashSet::new();
        for branch in &branches {
            match branch {
                Schema::Union(_) => {
                    return Err(ConvertError::InvalidSchema(
                        "union branches cannot be unions".into(),
                    ));
                }
                other => {
                    let fresh = match other.name() {
                        Some(name) => named.insert(name.fullname()),
                        None => other.kind().is_some_and(|k| unnamed.insert(k)),
                    };
                    if !fresh {
                        return Err(ConvertError::InvalidSchema(format!(
                            "union declares {other} more than once"
                        )));
                    }
                }
            }
        }
        Ok(Schema::Union(Arc::new(UnionSchema { branches })))
    }

    /// Logical kind; `None` for a back reference whose record is gone.
    pub fn kind(&self) -> Option<SchemaKind> {
        Some(match self {
            Schema::Null => SchemaKind::Null,
            Schema::Boolean => SchemaKind::Boolean,
            Schema::Int32 => SchemaKind::Int32,
            Schema::Int64 => SchemaKind::Int64,
            Schema::Float32 => SchemaKind::Float32,
            Schema::Float64 => SchemaKind::Float64,
            Schema::String => SchemaKind::String,
            Schema::Bytes => SchemaKind::Bytes,
            Schema::Fixed(_) => SchemaKind::Fixed,
            Schema::Enum(_) => SchemaKind::Enum,
            Schema::Array(_) => SchemaKind::Array,
            Schema::Map(_) => SchemaKind::Map,
            Schema::Record(_) => SchemaKind::Record,
            Schema::RecordRef(r) => {
                r.resolve()?;
                SchemaKind::Record
            }
            Schema::Union(_) => SchemaKind::Union,
        })
    }

    /// Declared name of record, enum and fixed schemas.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Schema::Fixed(f) => Some(f.name()),
            Schema::Enum(e) => Some(e.name()),
            Schema::Record(r) => Some(r.name()),
            Schema::RecordRef(r) => Some(r.name()),
            _ => None,
        }
    }

    /// Record behind a `Record` or a live `RecordRef`.
    pub fn as_record(&self) -> Option<Arc<RecordSchema>> {
        match self {
            Schema::Record(r) => Some(Arc::clone(r)),
            Schema::RecordRef(r) => r.resolve(),
            _ => None,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Fixed(fixed) => write!(f, "fixed {}[{}]", fixed.name(), fixed.size()),
            Schema::Enum(e) => write!(f, "enum {}", e.name()),
            Schema::Record(r) => write!(f, "record {}", r.name()),
            Schema::RecordRef(r) => write!(f, "record {}", r.name()),
            Schema::Array(items) => write!(f, "array<{items}>"),
            Schema::Map(values) => write!(f, "map<{values}>"),
            Schema::Union(u) => {
                f.write_str("union[")?;
                for (i, branch) in u.branches().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{branch}")?;
                }
                f.write_str("]")
            }
            other => match other.kind() {
                Some(kind) => f.write_str(kind.as_str()),
                None => f.write_str("?"),
            },
        }
    }
}

fn check_fields(name: &Name, fields: &[RecordField]) -> Result<(), ConvertError> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(ConvertError::InvalidSchema(format!(
                "record {name}: duplicate field '{}'",
                field.name
            )));
        }
    }
    Ok(())
}
