use std::fmt;

use crate::core::BenchError;

/// Number of fields every record carries.
pub const FIELD_COUNT: usize = 5;

/// Positional schema: key, int, double, float, long.
pub const SCHEMA: [FieldType; FIELD_COUNT] = [
    FieldType::Str,
    FieldType::Int,
    FieldType::Double,
    FieldType::Float,
    FieldType::Long,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Int,
    Double,
    Float,
    Long,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Str => "string",
            FieldType::Int => "int32",
            FieldType::Double => "float64",
            FieldType::Float => "float32",
            FieldType::Long => "int64",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i32),
    Double(f64),
    Float(f32),
    Long(i64),
}

impl Value {
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Str(_) => FieldType::Str,
            Value::Int(_) => FieldType::Int,
            Value::Double(_) => FieldType::Double,
            Value::Float(_) => FieldType::Float,
            Value::Long(_) => FieldType::Long,
        }
    }
}

/// Types a record field can be read as.
pub trait FieldValue<'a>: Sized {
    const TYPE: FieldType;

    fn view(value: &'a Value) -> Option<Self>;
}

impl<'a> FieldValue<'a> for &'a str {
    const TYPE: FieldType = FieldType::Str;

    fn view(value: &'a Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

macro_rules! copy_field {
    ($ty:ty, $variant:ident) => {
        impl<'a> FieldValue<'a> for $ty {
            const TYPE: FieldType = FieldType::$variant;

            fn view(value: &'a Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

copy_field!(i32, Int);
copy_field!(f64, Double);
copy_field!(f32, Float);
copy_field!(i64, Long);

/// An immutable synthetic row. Only generators build records; everything
/// downstream reads them through [`Record::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: [Value; FIELD_COUNT],
}

impl Record {
    pub fn new(key: String, int: i32, double: f64, float: f32, long: i64) -> Self {
        Self {
            values: [
                Value::Str(key),
                Value::Int(int),
                Value::Double(double),
                Value::Float(float),
                Value::Long(long),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get<'a, T: FieldValue<'a>>(&'a self, index: usize) -> Result<T, BenchError> {
        let value = self.values.get(index).ok_or(BenchError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        T::view(value).ok_or(BenchError::TypeMismatch {
            index,
            expected: T::TYPE,
            actual: value.field_type(),
        })
    }

    pub fn key(&self) -> &str {
        match &self.values[0] {
            Value::Str(key) => key,
            _ => unreachable!("record key is always a string"),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::new("k-1".to_string(), 7, 0.25, 0.5, -9)
    }

    #[test]
    fn test_get_reads_every_position() {
        let record = sample();
        assert_eq!(record.get::<&str>(0), Ok("k-1"));
        assert_eq!(record.get::<i32>(1), Ok(7));
        assert_eq!(record.get::<f64>(2), Ok(0.25));
        assert_eq!(record.get::<f32>(3), Ok(0.5));
        assert_eq!(record.get::<i64>(4), Ok(-9));
        assert_eq!(record.key(), "k-1");
    }

    #[test]
    fn test_get_past_end_is_out_of_range() {
        let record = sample();
        assert_eq!(
            record.get::<i64>(FIELD_COUNT),
            Err(BenchError::IndexOutOfRange {
                index: FIELD_COUNT,
                len: FIELD_COUNT
            })
        );
        assert!(matches!(
            record.get::<&str>(usize::MAX),
            Err(BenchError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_get_wrong_type_is_mismatch() {
        let record = sample();
        assert_eq!(
            record.get::<i64>(1),
            Err(BenchError::TypeMismatch {
                index: 1,
                expected: FieldType::Long,
                actual: FieldType::Int,
            })
        );
        assert!(record.get::<f32>(2).is_err());
        assert!(record.get::<&str>(4).is_err());
    }

    #[test]
    fn test_values_follow_schema() {
        let record = sample();
        let types: Vec<FieldType> = record.values().iter().map(Value::field_type).collect();
        assert_eq!(types, SCHEMA.to_vec());
    }
}
