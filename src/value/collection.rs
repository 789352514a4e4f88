use super::{CoercionError, FieldShape, FieldValue, Scalar};
use serde_yml::Value;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

/// Coerce every element of a document sequence.
fn elements<T: Scalar>(node: &Value, shape: &FieldShape) -> Result<Vec<T>, CoercionError> {
    let Value::Sequence(items) = node else {
        return Err(CoercionError::mismatch(shape, node));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::from_scalar(item).map_err(|err| match err {
                CoercionError::Mismatch { found, .. } => CoercionError::Mismatch {
                    expected: shape.to_string(),
                    found: format!("{found} at index {index}"),
                },
                other => other,
            })
        })
        .collect()
}

fn sequence<'a, T: Scalar + 'a>(
    items: impl IntoIterator<Item = &'a T>,
) -> Result<Option<Value>, CoercionError> {
    let nodes = items
        .into_iter()
        .map(T::to_scalar)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Value::Sequence(nodes)))
}

impl<T: Scalar> FieldValue for Vec<T> {
    fn shape() -> FieldShape {
        FieldShape::List(T::KIND)
    }

    fn to_node(&self) -> Result<Option<Value>, CoercionError> {
        sequence(self)
    }

    fn from_node(node: &Value) -> Result<Self, CoercionError> {
        elements(node, &Self::shape())
    }
}

impl<T: Scalar, const N: usize> FieldValue for [T; N] {
    fn shape() -> FieldShape {
        FieldShape::Array(T::KIND, N)
    }

    fn to_node(&self) -> Result<Option<Value>, CoercionError> {
        sequence(self)
    }

    fn from_node(node: &Value) -> Result<Self, CoercionError> {
        let shape = Self::shape();
        let items = elements::<T>(node, &shape)?;
        let len = items.len();
        <[T; N]>::try_from(items).map_err(|_| CoercionError::Mismatch {
            expected: shape.to_string(),
            found: format!("sequence of {len} items"),
        })
    }
}

/// Written sorted so the file does not change between processes.
impl<T: Scalar + Eq + Hash + Ord> FieldValue for HashSet<T> {
    fn shape() -> FieldShape {
        FieldShape::Set(T::KIND)
    }

    fn to_node(&self) -> Result<Option<Value>, CoercionError> {
        let mut sorted: Vec<&T> = self.iter().collect();
        sorted.sort();
        sequence(sorted)
    }

    fn from_node(node: &Value) -> Result<Self, CoercionError> {
        Ok(elements(node, &Self::shape())?.into_iter().collect())
    }
}

impl<T: Scalar + Ord> FieldValue for BTreeSet<T> {
    fn shape() -> FieldShape {
        FieldShape::Set(T::KIND)
    }

    fn to_node(&self) -> Result<Option<Value>, CoercionError> {
        sequence(self)
    }

    fn from_node(node: &Value) -> Result<Self, CoercionError> {
        Ok(elements(node, &Self::shape())?.into_iter().collect())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn shape() -> FieldShape {
        FieldShape::Optional(Box::new(T::shape()))
    }

    fn to_node(&self) -> Result<Option<Value>, CoercionError> {
        match self {
            Some(value) => value.to_node(),
            None => Ok(None),
        }
    }

    fn from_node(node: &Value) -> Result<Self, CoercionError> {
        T::from_node(node).map(Some)
    }

    fn is_unset(&self) -> bool {
        match self {
            Some(value) => value.is_unset(),
            None => true,
        }
    }
}
