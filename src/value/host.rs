use super::{CoercionError, FieldShape, FieldValue, Scalar, ScalarKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yml::Value;
use std::ops::{Deref, DerefMut};

/// Wrapper for a host-defined type stored as an opaque structured value.
///
/// Whatever serde makes of `T` is written under the option key unchanged, so
/// item stacks, locations and similar host objects round-trip as nested
/// mappings. Host values may only appear as single options; collections of
/// them are rejected when the record is registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Host<T>(pub T);

impl<T> Deref for Host<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Host<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Serialize + DeserializeOwned + Clone> Scalar for Host<T> {
    const KIND: ScalarKind = ScalarKind::Host;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        serde_yml::to_value(&self.0).map_err(|e| CoercionError::Encode(e.to_string()))
    }

    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        serde_yml::from_value(node.clone())
            .map(Host)
            .map_err(|e| CoercionError::Mismatch {
                expected: format!("host value ({e})"),
                found: super::describe(node),
            })
    }
}

impl<T: Serialize + DeserializeOwned + Clone> FieldValue for Host<T> {
    fn shape() -> FieldShape {
        FieldShape::Scalar(ScalarKind::Host)
    }

    fn to_node(&self) -> Result<Option<Value>, CoercionError> {
        self.to_scalar().map(Some)
    }

    fn from_node(node: &Value) -> Result<Self, CoercionError> {
        Self::from_scalar(node)
    }
}
