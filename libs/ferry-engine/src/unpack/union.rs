use ferry_api::error::ResultExt;
use ferry_api::external::{External, Shape};
use ferry_api::schema::{Schema, UnionSchema};
use ferry_api::{ConvertError, Value};

use super::bytes;
use crate::Dispatcher;
use crate::options::{Options, UnionResolution};

pub(crate) fn unpack_union<E: External>(
    dispatcher: &Dispatcher,
    value: &E,
    shape: Shape<'_, E>,
    union: &UnionSchema,
) -> Result<Value, ConvertError> {
    let index = resolve(dispatcher.options(), value, &shape, union)?;
    let branch = &union.branches()[index];
    let converted = match shape {
        Shape::Branch { value: inner, .. } => dispatcher.convert(inner, branch),
        _ => dispatcher.convert(value, branch),
    };
    converted.context(format_args!("branch {index}"))
}

/// Pick the branch `value` converts through.
///
/// An explicit branch tag wins; otherwise the candidates are the non-null
/// branches whose kind structurally matches the shape. A value carrying a
/// declared name never matches a named branch of another name, and named
/// branches are preferred over unnamed ones when more than one is left.
pub(crate) fn resolve<E: External>(
    options: &Options,
    value: &E,
    shape: &Shape<'_, E>,
    union: &UnionSchema,
) -> Result<usize, ConvertError> {
    let branches = union.branches();
    let index = match shape {
        Shape::Absent => union.null_branch().ok_or_else(|| no_match(value, union))?,
        Shape::Branch { index, .. } if *index < branches.len() => *index,
        Shape::Branch { .. } => return Err(no_match(value, union)),
        _ => {
            let declared = value.declared_name();
            let mut candidates: Vec<usize> = branches
                .iter()
                .enumerate()
                .filter(|(_, branch)| !matches!(branch, Schema::Null) && matches_shape(shape, branch))
                .filter(|(_, branch)| name_admits(declared, branch))
                .map(|(i, _)| i)
                .collect();

            if candidates.len() > 1 {
                if let Some(declared) = declared {
                    let named: Vec<usize> = candidates
                        .iter()
                        .copied()
                        .filter(|&i| branches[i].name().is_some())
                        .collect();
                    if !named.is_empty() {
                        candidates = named;
                    }
                    tracing::trace!(declared, candidates = candidates.len(), "narrowed by declared name");
                }
            }

            match (candidates.as_slice(), options.union_resolution) {
                ([], _) => return Err(no_match(value, union)),
                ([only], _) => *only,
                ([first, ..], UnionResolution::FirstMatch) => *first,
                (_, UnionResolution::Strict) => {
                    return Err(ConvertError::AmbiguousUnionBranch {
                        shape: value.type_name(),
                        candidates: candidates.iter().map(|&i| branches[i].to_string()).collect(),
                    });
                }
            }
        }
    };

    tracing::debug!(
        branch = index,
        schema = %branches[index],
        shape = shape.label(),
        "union branch selected"
    );
    Ok(index)
}

fn matches_shape<E>(shape: &Shape<'_, E>, branch: &Schema) -> bool {
    match (shape, branch) {
        (Shape::Bool(_), Schema::Boolean)
        | (Shape::Int32(_), Schema::Int32)
        | (Shape::Int64(_), Schema::Int64)
        | (Shape::Float32(_), Schema::Float32)
        | (Shape::Float64(_), Schema::Float64)
        | (Shape::Buffer(_) | Shape::FlatBytes(_), Schema::Bytes)
        | (Shape::Text(_), Schema::String)
        | (Shape::PrimitiveArray(_) | Shape::ObjectArray(_) | Shape::Iterable(_), Schema::Array(_))
        | (Shape::Association(_), Schema::Map(_)) => true,
        (Shape::Buffer(_) | Shape::FlatBytes(_), Schema::Fixed(fixed)) => {
            bytes::readable(shape).is_some_and(|b| b.len() == fixed.size())
        }
        (Shape::Text(text), Schema::Enum(symbols)) => symbols.symbol_index(&**text).is_some(),
        (Shape::Record(accessor), Schema::Record(_) | Schema::RecordRef(_)) => branch
            .as_record()
            .is_some_and(|record| accessor.supplies(&record)),
        _ => false,
    }
}

fn name_admits(declared: Option<&str>, branch: &Schema) -> bool {
    match (declared, branch.name()) {
        (Some(declared), Some(name)) => name.matches(declared),
        _ => true,
    }
}

fn no_match<E: External>(value: &E, union: &UnionSchema) -> ConvertError {
    ConvertError::NoMatchingUnionBranch {
        shape: value.type_name(),
        branches: union.branches().iter().map(Schema::to_string).collect(),
    }
}
