//! Structural kind of a reported type.
//!
//! The compiler tags every type with an integer type code: a Lua base type
//! in the low bits, Teal refinements above them. Codes are matched exactly;
//! anything unrecognized is kept as [`TypeKind::Other`] and treated as
//! opaque.

use std::fmt;

/// Type code values as emitted by `tl types`.
pub mod codes {
    pub const NIL: u32 = 0x0000_0001;
    pub const NUMBER: u32 = 0x0000_0002;
    pub const BOOLEAN: u32 = 0x0000_0004;
    pub const STRING: u32 = 0x0000_0008;
    pub const TABLE: u32 = 0x0000_0010;
    pub const FUNCTION: u32 = 0x0000_0020;
    pub const USERDATA: u32 = 0x0000_0040;
    pub const THREAD: u32 = 0x0000_0080;
    pub const INTEGER: u32 = 0x0001_0002;
    pub const ENUM: u32 = 0x0001_0004;
    pub const ARRAY: u32 = 0x0001_0008;
    pub const RECORD: u32 = 0x0002_0008;
    pub const ARRAYRECORD: u32 = 0x0003_0008;
    pub const MAP: u32 = 0x0004_0008;
    pub const TUPLE: u32 = 0x0008_0008;
    pub const INTERFACE: u32 = 0x0010_0008;
    pub const TYPE_VARIABLE: u32 = 0x0800_0000;
    pub const NOMINAL: u32 = 0x1000_0000;
    pub const POLY: u32 = 0x2000_0020;
    pub const UNION: u32 = 0x4000_0000;
    pub const ANY: u32 = 0xffff_ffff;
}

/// Decoded type code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Nil,
    Number,
    Integer,
    Boolean,
    String,
    Table,
    Function,
    Userdata,
    Thread,
    Enum,
    Array,
    Record,
    ArrayRecord,
    Map,
    Tuple,
    Interface,
    TypeVariable,
    Nominal,
    Poly,
    Union,
    Any,
    /// A code this server does not know.
    Other(u32),
}

impl TypeKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            codes::NIL => TypeKind::Nil,
            codes::NUMBER => TypeKind::Number,
            codes::INTEGER => TypeKind::Integer,
            codes::BOOLEAN => TypeKind::Boolean,
            codes::STRING => TypeKind::String,
            codes::TABLE => TypeKind::Table,
            codes::FUNCTION => TypeKind::Function,
            codes::USERDATA => TypeKind::Userdata,
            codes::THREAD => TypeKind::Thread,
            codes::ENUM => TypeKind::Enum,
            codes::ARRAY => TypeKind::Array,
            codes::RECORD => TypeKind::Record,
            codes::ARRAYRECORD => TypeKind::ArrayRecord,
            codes::MAP => TypeKind::Map,
            codes::TUPLE => TypeKind::Tuple,
            codes::INTERFACE => TypeKind::Interface,
            codes::TYPE_VARIABLE => TypeKind::TypeVariable,
            codes::NOMINAL => TypeKind::Nominal,
            codes::POLY => TypeKind::Poly,
            codes::UNION => TypeKind::Union,
            codes::ANY => TypeKind::Any,
            other => TypeKind::Other(other),
        }
    }

    /// Kinds whose members are looked up by field name.
    #[inline]
    pub fn has_fields(self) -> bool {
        matches!(
            self,
            TypeKind::Record | TypeKind::ArrayRecord | TypeKind::Interface
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Nil => "nil",
            TypeKind::Number => "number",
            TypeKind::Integer => "integer",
            TypeKind::Boolean => "boolean",
            TypeKind::String => "string",
            TypeKind::Table => "table",
            TypeKind::Function => "function",
            TypeKind::Userdata => "userdata",
            TypeKind::Thread => "thread",
            TypeKind::Enum => "enum",
            TypeKind::Array => "array",
            TypeKind::Record => "record",
            TypeKind::ArrayRecord => "arrayrecord",
            TypeKind::Map => "map",
            TypeKind::Tuple => "tuple",
            TypeKind::Interface => "interface",
            TypeKind::TypeVariable => "typevar",
            TypeKind::Nominal => "nominal",
            TypeKind::Poly => "poly",
            TypeKind::Union => "union",
            TypeKind::Any => "any",
            TypeKind::Other(_) => "unknown",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Other(code) => write!(f, "unknown(0x{code:08x})"),
            kind => f.write_str(kind.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(TypeKind::from_code(0x0002_0008), TypeKind::Record);
        assert_eq!(TypeKind::from_code(0x0003_0008), TypeKind::ArrayRecord);
        assert_eq!(TypeKind::from_code(0x1000_0000), TypeKind::Nominal);
        assert_eq!(TypeKind::from_code(0x2000_0020), TypeKind::Poly);
        assert_eq!(TypeKind::from_code(0x0001_0002), TypeKind::Integer);
    }

    #[test]
    fn test_unknown_code_is_kept() {
        let kind = TypeKind::from_code(0x0000_1234);
        assert_eq!(kind, TypeKind::Other(0x1234));
        assert_eq!(kind.to_string(), "unknown(0x00001234)");
        assert!(!kind.has_fields());
    }
}
