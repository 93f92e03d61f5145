//! Decoded output of `tl types`.
//!
//! The compiler's JSON report is decoded once into a [`TypeReport`] and then
//! only read. Numeric keys the JSON encodes as strings are parsed up front,
//! and the scope sentinels in the symbol list become [`SymbolKind`] variants.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::TypeKind;

/// Symbol name the compiler uses to mark the start of a lexical scope.
pub const SCOPE_OPEN: &str = "@{";
/// Symbol name the compiler uses to mark the end of a lexical scope.
pub const SCOPE_CLOSE: &str = "@}";

/// Handle of one entry in the report's type table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a type or symbol was declared, 1-based as the compiler reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// File as the compiler named it; `None` means the analysed file.
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
}

/// A function parameter or return value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub type_id: TypeId,
    pub name: Option<String>,
}

/// One entry of the type table.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeInfo {
    pub id: TypeId,
    /// The compiler's rendering of the type, e.g. `function(string): integer`.
    pub display: String,
    pub kind: TypeKind,
    /// Target of a nominal type.
    pub reference: Option<TypeId>,
    pub fields: BTreeMap<String, TypeId>,
    pub elements: Option<TypeId>,
    pub keys: Option<TypeId>,
    pub values: Option<TypeId>,
    pub args: Vec<Param>,
    pub rets: Vec<Param>,
    /// Members of a union, poly or tuple type.
    pub members: Vec<TypeId>,
    pub enum_values: Vec<String>,
    pub location: Option<Location>,
}

/// What a symbol table entry denotes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Declaration { name: String, type_id: TypeId },
    ScopeOpen,
    /// Closes the scope opened by the entry at `open_index`.
    ScopeClose { open_index: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
    pub line: u32,
    pub column: u32,
    pub kind: SymbolKind,
}

impl SymbolEntry {
    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

/// Failure to decode a type report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("type report is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("type report symbols are out of order at entry {index}")]
    UnsortedSymbols { index: usize },
    #[error("type report closes a scope that was never opened at entry {index}")]
    BadScopeClose { index: usize },
    #[error("type report has a non-numeric key {key:?}")]
    BadKey { key: String },
    #[error("type report has a malformed {what}")]
    BadEntry { what: &'static str },
}

#[derive(Deserialize)]
struct RawReport {
    #[serde(default)]
    symbols: Vec<(u32, u32, String, Option<i64>)>,
    #[serde(default)]
    by_pos: FxHashMap<String, FxHashMap<String, FxHashMap<String, TypeId>>>,
    #[serde(default)]
    types: FxHashMap<String, RawType>,
    #[serde(default)]
    globals: FxHashMap<String, TypeId>,
}

#[derive(Deserialize)]
struct RawType {
    #[serde(default)]
    str: String,
    #[serde(default)]
    t: u32,
    #[serde(rename = "ref")]
    reference: Option<TypeId>,
    #[serde(default)]
    fields: BTreeMap<String, TypeId>,
    elements: Option<TypeId>,
    keys: Option<TypeId>,
    values: Option<TypeId>,
    #[serde(default)]
    args: Vec<RawParam>,
    #[serde(default)]
    rets: Vec<RawParam>,
    #[serde(default)]
    types: Vec<TypeId>,
    #[serde(default)]
    enums: Vec<String>,
    file: Option<String>,
    y: Option<u32>,
    x: Option<u32>,
}

/// Parameters come as `[id]`, `[id, "name"]` or a bare id.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawParam {
    Bare(TypeId),
    Tuple(Vec<Value>),
}

impl RawParam {
    fn decode(self) -> Result<Param, ReportError> {
        match self {
            RawParam::Bare(type_id) => Ok(Param {
                type_id,
                name: None,
            }),
            RawParam::Tuple(items) => {
                let raw = items
                    .first()
                    .and_then(Value::as_u64)
                    .and_then(|id| u32::try_from(id).ok())
                    .ok_or(ReportError::BadEntry { what: "parameter" })?;
                let name = items.get(1).and_then(Value::as_str).map(str::to_owned);
                Ok(Param {
                    type_id: TypeId(raw),
                    name,
                })
            }
        }
    }
}

/// The compiler's view of one analysed file.
#[derive(Clone, Debug, Default)]
pub struct TypeReport {
    symbols: Vec<SymbolEntry>,
    by_pos: FxHashMap<String, FxHashMap<u32, FxHashMap<u32, TypeId>>>,
    types: FxHashMap<TypeId, TypeInfo>,
    globals: FxHashMap<String, TypeId>,
    main_file: String,
}

impl TypeReport {
    /// Decode the stdout of `tl types <main_file>`.
    ///
    /// `main_file` is the path handed to the compiler. The position map is
    /// keyed by whatever spelling of that path the compiler chose, so the
    /// key with the same file name is used when there is no exact match.
    #[tracing::instrument(level = "debug", skip_all, fields(len = json.len()))]
    pub fn from_json(json: &str, main_file: &str) -> Result<Self, ReportError> {
        let raw: RawReport = serde_json::from_str(json)?;

        let symbols = decode_symbols(raw.symbols)?;

        let mut by_pos = FxHashMap::default();
        for (file, lines) in raw.by_pos {
            let mut decoded: FxHashMap<u32, FxHashMap<u32, TypeId>> = FxHashMap::default();
            for (line, columns) in lines {
                let line = parse_key(&line)?;
                let row = decoded.entry(line).or_default();
                for (column, type_id) in columns {
                    row.insert(parse_key(&column)?, type_id);
                }
            }
            by_pos.insert(file, decoded);
        }

        let mut types = FxHashMap::default();
        for (key, raw_type) in raw.types {
            let id = TypeId(parse_key(&key)?);
            types.insert(id, decode_type(id, raw_type)?);
        }

        let main_file = resolve_main_file(&by_pos, main_file);
        tracing::debug!(
            symbols = symbols.len(),
            types = types.len(),
            globals = raw.globals.len(),
            main_file = %main_file,
            "decoded type report"
        );

        Ok(TypeReport {
            symbols,
            by_pos,
            types,
            globals: raw.globals,
            main_file,
        })
    }

    /// Symbol table, sorted by position.
    #[inline]
    pub fn symbols(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    #[inline]
    pub fn globals(&self) -> &FxHashMap<String, TypeId> {
        &self.globals
    }

    pub fn global(&self, name: &str) -> Option<TypeId> {
        self.globals.get(name).copied()
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(&id)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    /// The `by_pos` key of the analysed file.
    #[inline]
    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    /// Whether a location's file refers to the analysed file.
    pub fn is_main_file(&self, file: Option<&str>) -> bool {
        match file {
            None => true,
            Some(file) => file == self.main_file || same_file_name(file, &self.main_file),
        }
    }

    /// Type of the expression starting at a 1-based position of the
    /// analysed file.
    pub fn type_at(&self, line: u32, column: u32) -> Option<TypeId> {
        self.type_at_in(&self.main_file, line, column)
    }

    pub fn type_at_in(&self, file: &str, line: u32, column: u32) -> Option<TypeId> {
        self.by_pos.get(file)?.get(&line)?.get(&column).copied()
    }
}

fn parse_key(key: &str) -> Result<u32, ReportError> {
    key.parse().map_err(|_| ReportError::BadKey {
        key: key.to_owned(),
    })
}

fn decode_symbols(
    raw: Vec<(u32, u32, String, Option<i64>)>,
) -> Result<Vec<SymbolEntry>, ReportError> {
    let mut symbols = Vec::with_capacity(raw.len());
    let mut open_scopes = Vec::new();
    for (index, (line, column, name, id)) in raw.into_iter().enumerate() {
        if symbols
            .last()
            .is_some_and(|prev: &SymbolEntry| prev.position() > (line, column))
        {
            return Err(ReportError::UnsortedSymbols { index });
        }
        let kind = match name.as_str() {
            SCOPE_OPEN => {
                open_scopes.push(index);
                SymbolKind::ScopeOpen
            }
            SCOPE_CLOSE => {
                // The compiler's jump target is recomputed from nesting.
                let open_index = open_scopes
                    .pop()
                    .ok_or(ReportError::BadScopeClose { index })?;
                SymbolKind::ScopeClose { open_index }
            }
            _ => {
                let raw_id = id
                    .and_then(|id| u32::try_from(id).ok())
                    .ok_or(ReportError::BadEntry { what: "symbol" })?;
                SymbolKind::Declaration {
                    name,
                    type_id: TypeId(raw_id),
                }
            }
        };
        symbols.push(SymbolEntry { line, column, kind });
    }
    Ok(symbols)
}

fn decode_type(id: TypeId, raw: RawType) -> Result<TypeInfo, ReportError> {
    let location = match (raw.y, raw.x) {
        (Some(line), Some(column)) => Some(Location {
            file: raw.file,
            line,
            column,
        }),
        _ => None,
    };
    Ok(TypeInfo {
        id,
        display: raw.str,
        kind: TypeKind::from_code(raw.t),
        reference: raw.reference,
        fields: raw.fields,
        elements: raw.elements,
        keys: raw.keys,
        values: raw.values,
        args: raw
            .args
            .into_iter()
            .map(RawParam::decode)
            .collect::<Result<_, _>>()?,
        rets: raw
            .rets
            .into_iter()
            .map(RawParam::decode)
            .collect::<Result<_, _>>()?,
        members: raw.types,
        enum_values: raw.enums,
        location,
    })
}

fn resolve_main_file<V>(by_pos: &FxHashMap<String, V>, main_file: &str) -> String {
    if by_pos.contains_key(main_file) {
        return main_file.to_owned();
    }
    by_pos
        .keys()
        .find(|key| same_file_name(key, main_file))
        .cloned()
        .unwrap_or_else(|| main_file.to_owned())
}

fn same_file_name(a: &str, b: &str) -> bool {
    match (Path::new(a).file_name(), Path::new(b).file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
