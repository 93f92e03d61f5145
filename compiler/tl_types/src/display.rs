//! Human-readable type text.
//!
//! The compiler renames type variables when it instantiates a generic, so
//! its display strings carry suffixes such as `T@1`, or bare `@2` for
//! variables it invented. [`prettify`] strips them.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::report::{Param, TypeId, TypeInfo, TypeReport};

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static TYPE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w*)@(\w+)").expect("valid type variable pattern"));

/// Readable form of a compiler type string. Idempotent.
pub fn prettify(text: &str) -> String {
    TYPE_VARIABLE
        .replace_all(text, |caps: &Captures<'_>| {
            let base = &caps[1];
            let tag = &caps[2];
            if !base.is_empty() {
                base.to_owned()
            } else if tag.bytes().all(|b| b.is_ascii_digit()) {
                format!("T{tag}")
            } else {
                tag.to_owned()
            }
        })
        .into_owned()
}

/// Prettified display string of a type id.
pub fn type_name(report: &TypeReport, id: TypeId) -> String {
    report
        .get(id)
        .map_or_else(|| "unknown".to_owned(), |ty| prettify(&ty.display))
}

/// A function type laid out for signature help.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub label: String,
    /// Each parameter's text as it appears in `label`.
    pub parameters: Vec<String>,
}

/// Signature of `func`, called as `name`.
///
/// With `skip_self` the first parameter is left out, for calls through `:`
/// that pass the receiver implicitly.
pub fn signature(report: &TypeReport, func: &TypeInfo, name: &str, skip_self: bool) -> Signature {
    let skip = usize::from(skip_self && !func.args.is_empty());
    let parameters: Vec<String> = func.args[skip..]
        .iter()
        .map(|param| param_text(report, param))
        .collect();

    let rets: Vec<String> = func
        .rets
        .iter()
        .map(|ret| type_name(report, ret.type_id))
        .collect();
    let label = if rets.is_empty() {
        format!("{name}({})", parameters.join(", "))
    } else {
        format!("{name}({}): {}", parameters.join(", "), rets.join(", "))
    };
    Signature { label, parameters }
}

fn param_text(report: &TypeReport, param: &Param) -> String {
    let ty = type_name(report, param.type_id);
    match &param.name {
        Some(name) => format!("{name}: {ty}"),
        None => ty,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
