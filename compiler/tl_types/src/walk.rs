//! Member-chain resolution over the type table.
//!
//! The walker never infers anything. Each step reads the compiler's
//! description of the current type and picks the next type id: a field for
//! records, the element for arrays, the value for maps, the first return
//! value for functions. Nominal types are followed to their target before
//! every step.

use std::collections::BTreeMap;

use tl_parse::Segment;

use crate::kind::TypeKind;
use crate::report::{TypeId, TypeInfo, TypeReport};
use crate::scope;

/// Nominal hops or kind redirections tolerated before a chain is treated as
/// cyclic.
const MAX_HOPS: usize = 64;

/// Why a chain did not resolve. Never shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveMiss {
    #[error("empty chain")]
    EmptyChain,
    #[error("`{0}` is not bound here")]
    UnboundRoot(String),
    #[error("type {0} is not in the report")]
    UnknownType(TypeId),
    #[error("`{ty}` has no member `{field}`")]
    MissingField { field: String, ty: String },
    #[error("cannot look inside a {0} type")]
    Unsupported(TypeKind),
    #[error("function returns nothing")]
    NoReturn,
    #[error("type {0} refers back to itself")]
    Cycle(TypeId),
    #[error("no global `string` library in the report")]
    NoStringLibrary,
}

/// Read-only navigation over one [`TypeReport`].
#[derive(Copy, Clone)]
pub struct TypeWalker<'r> {
    report: &'r TypeReport,
}

impl<'r> TypeWalker<'r> {
    pub fn new(report: &'r TypeReport) -> Self {
        TypeWalker { report }
    }

    #[inline]
    pub fn report(&self) -> &'r TypeReport {
        self.report
    }

    pub fn info(&self, id: TypeId) -> Result<&'r TypeInfo, ResolveMiss> {
        self.report.get(id).ok_or(ResolveMiss::UnknownType(id))
    }

    /// The structural type behind `id`, following `ref` links.
    pub fn deref(&self, id: TypeId) -> Result<&'r TypeInfo, ResolveMiss> {
        let mut current = self.info(id)?;
        for _ in 0..MAX_HOPS {
            match current.reference {
                Some(target) => current = self.info(target)?,
                None => return Ok(current),
            }
        }
        Err(ResolveMiss::Cycle(id))
    }

    /// Type of the first segment of a chain, looked up at a 1-based position.
    pub fn root(&self, segment: &Segment, line: u32, column: u32) -> Result<TypeId, ResolveMiss> {
        match segment {
            Segment::Name(name) => scope::lookup(self.report, name, line, column)
                .map(|binding| binding.type_id)
                .ok_or_else(|| ResolveMiss::UnboundRoot(name.clone())),
            Segment::Str(_) => self.string_library(),
            Segment::Bracket => Err(ResolveMiss::EmptyChain),
        }
    }

    fn string_library(&self) -> Result<TypeId, ResolveMiss> {
        self.report
            .global("string")
            .ok_or(ResolveMiss::NoStringLibrary)
    }

    /// Type of `segment` applied to a value of type `id`.
    pub fn step(&self, id: TypeId, segment: &Segment) -> Result<TypeId, ResolveMiss> {
        let mut current = self.deref(id)?;
        for _ in 0..MAX_HOPS {
            match current.kind {
                TypeKind::Record | TypeKind::Interface => {
                    return field(current, segment);
                }
                TypeKind::ArrayRecord => {
                    return field(current, segment).or_else(|miss| current.elements.ok_or(miss));
                }
                TypeKind::Array => {
                    return current
                        .elements
                        .ok_or(ResolveMiss::Unsupported(TypeKind::Array));
                }
                TypeKind::Map => {
                    return current
                        .values
                        .ok_or(ResolveMiss::Unsupported(TypeKind::Map));
                }
                TypeKind::Function | TypeKind::Poly => {
                    current = self.deref(self.first_return(current)?)?;
                }
                TypeKind::String | TypeKind::Enum => {
                    current = self.deref(self.string_library()?)?;
                }
                kind => return Err(ResolveMiss::Unsupported(kind)),
            }
        }
        Err(ResolveMiss::Cycle(id))
    }

    /// First return type of a function, or of the first overload of a poly.
    pub fn first_return(&self, func: &'r TypeInfo) -> Result<TypeId, ResolveMiss> {
        let func = match func.kind {
            TypeKind::Poly => {
                let first = func.members.first().ok_or(ResolveMiss::NoReturn)?;
                self.deref(*first)?
            }
            _ => func,
        };
        func.rets
            .first()
            .map(|ret| ret.type_id)
            .ok_or(ResolveMiss::NoReturn)
    }

    /// Type id a whole chain evaluates to, without following the final
    /// nominal so its name stays visible.
    #[tracing::instrument(level = "trace", skip(self), ret)]
    pub fn resolve_id(
        &self,
        segments: &[Segment],
        line: u32,
        column: u32,
    ) -> Result<TypeId, ResolveMiss> {
        let (first, rest) = segments.split_first().ok_or(ResolveMiss::EmptyChain)?;
        let root = self.root(first, line, column)?;
        rest.iter()
            .try_fold(root, |id, segment| self.step(id, segment))
    }

    /// Structural type a whole chain evaluates to.
    pub fn resolve(
        &self,
        segments: &[Segment],
        line: u32,
        column: u32,
    ) -> Result<&'r TypeInfo, ResolveMiss> {
        self.deref(self.resolve_id(segments, line, column)?)
    }

    /// Result of calling a value of type `id` `calls` times in a row.
    pub fn call_result(&self, id: TypeId, calls: usize) -> Result<TypeId, ResolveMiss> {
        (0..calls).try_fold(id, |id, _| self.first_return(self.deref(id)?))
    }

    /// Members offered after `.` or `:` on a value of type `id`.
    pub fn members(&self, id: TypeId) -> Result<&'r BTreeMap<String, TypeId>, ResolveMiss> {
        let mut ty = self.deref(id)?;
        if matches!(ty.kind, TypeKind::String | TypeKind::Enum) {
            ty = self.deref(self.string_library()?)?;
        }
        if ty.kind.has_fields() {
            Ok(&ty.fields)
        } else {
            Err(ResolveMiss::Unsupported(ty.kind))
        }
    }

    /// Signatures a value of type `id` can be called with.
    pub fn overloads(&self, id: TypeId) -> Result<Vec<&'r TypeInfo>, ResolveMiss> {
        let ty = self.deref(id)?;
        match ty.kind {
            TypeKind::Function => Ok(vec![ty]),
            TypeKind::Poly => {
                let mut overloads = Vec::with_capacity(ty.members.len());
                for &member in &ty.members {
                    let member = self.deref(member)?;
                    if member.kind == TypeKind::Function {
                        overloads.push(member);
                    }
                }
                Ok(overloads)
            }
            kind => Err(ResolveMiss::Unsupported(kind)),
        }
    }
}

fn field(ty: &TypeInfo, segment: &Segment) -> Result<TypeId, ResolveMiss> {
    segment
        .name()
        .and_then(|name| ty.fields.get(name))
        .copied()
        .ok_or_else(|| ResolveMiss::MissingField {
            field: segment.to_string(),
            ty: ty.display.clone(),
        })
}
