use super::{CoercionError, FieldShape, FieldValue, Scalar, ScalarKind};
use serde_yml::{Number, Value};

/// Read any document number as an `i64`; floats truncate toward zero.
fn integer(node: &Value, kind: ScalarKind) -> Result<i64, CoercionError> {
    let Value::Number(n) = node else {
        return Err(CoercionError::mismatch(kind, node));
    };
    if let Some(v) = n.as_i64() {
        Ok(v)
    } else if let Some(v) = n.as_u64() {
        Ok(v as i64)
    } else if let Some(v) = n.as_f64() {
        Ok(v as i64)
    } else {
        Err(CoercionError::mismatch(kind, node))
    }
}

fn double(node: &Value, kind: ScalarKind) -> Result<f64, CoercionError> {
    match node {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| CoercionError::mismatch(kind, node)),
        _ => Err(CoercionError::mismatch(kind, node)),
    }
}

impl Scalar for i16 {
    const KIND: ScalarKind = ScalarKind::Short;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        Ok(Value::Number(Number::from(i64::from(*self))))
    }

    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        integer(node, Self::KIND).map(|v| v as i16)
    }
}

impl Scalar for i32 {
    const KIND: ScalarKind = ScalarKind::Integer;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        Ok(Value::Number(Number::from(i64::from(*self))))
    }

    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        integer(node, Self::KIND).map(|v| v as i32)
    }
}

impl Scalar for i64 {
    const KIND: ScalarKind = ScalarKind::Long;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        Ok(Value::Number(Number::from(*self)))
    }

    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        integer(node, Self::KIND)
    }
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        // Widen through the shortest decimal form so 0.1f32 is written as 0.1
        let widened = self.to_string().parse::<f64>().unwrap_or(f64::from(*self));
        Ok(Value::Number(Number::from(widened)))
    }

    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        double(node, Self::KIND).map(|v| v as f32)
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Double;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        Ok(Value::Number(Number::from(*self)))
    }

    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        double(node, Self::KIND)
    }
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        Ok(Value::Bool(*self))
    }

    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        node.as_bool()
            .ok_or_else(|| CoercionError::mismatch(Self::KIND, node))
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn to_scalar(&self) -> Result<Value, CoercionError> {
        Ok(Value::String(self.clone()))
    }

    /// Numbers and booleans are accepted and stringified.
    fn from_scalar(node: &Value) -> Result<Self, CoercionError> {
        match node {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(CoercionError::mismatch(Self::KIND, node)),
        }
    }
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn shape() -> FieldShape {
                    FieldShape::Scalar(<$ty as Scalar>::KIND)
                }

                fn to_node(&self) -> Result<Option<Value>, CoercionError> {
                    self.to_scalar().map(Some)
                }

                fn from_node(node: &Value) -> Result<Self, CoercionError> {
                    <$ty as Scalar>::from_scalar(node)
                }
            }
        )*
    };
}

scalar_field!(i16, i32, i64, f32, f64, bool, String);
