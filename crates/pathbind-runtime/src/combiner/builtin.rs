#![forbid(unsafe_code)]

//! Built-in combiners.
//!
//! | Name | Inputs | Result | Two-way |
//! |------|--------|--------|---------|
//! | `Single` | 1 | the input | yes |
//! | `Not` | 1 | negated truthiness | yes, for bool writes |
//! | `Add` | 1+ | sum, or concatenation if any input is a string | no |
//! | `Multiply` | 1+ | product | no |
//! | `If` | 2 or 3 | `then` or `else` (`Unset` without `else`) | no |
//!
//! Integer arithmetic stays integral and is checked; any float input
//! promotes the whole operation to float.

use std::rc::Rc;

use pathbind_core::{BindingError, Value, ValueType};

use super::{ValueCombiner, ValueCombinerRegistry, ValueCombinerRegistryFiller};
use crate::binding::SourceBinding;

/// Registers every built-in combiner under its own name.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCombiners;

impl ValueCombinerRegistryFiller for BuiltinCombiners {
    fn fill(&self, registry: &mut ValueCombinerRegistry) {
        let combiners: [Rc<dyn ValueCombiner>; 5] = [
            Rc::new(Single),
            Rc::new(Not),
            Rc::new(Add),
            Rc::new(Multiply),
            Rc::new(If),
        ];
        for combiner in combiners {
            registry.register(combiner.name(), combiner);
        }
    }
}

fn reject(combiner: &'static str, reason: impl Into<String>) -> BindingError {
    BindingError::CombinerRejected {
        combiner,
        reason: reason.into(),
    }
}

fn expect_arity(
    combiner: &'static str,
    values: &[Value],
    arity: std::ops::RangeInclusive<usize>,
) -> Result<(), BindingError> {
    if arity.contains(&values.len()) {
        Ok(())
    } else {
        Err(reject(
            combiner,
            format!(
                "expected {}..={} inputs, got {}",
                arity.start(),
                arity.end(),
                values.len()
            ),
        ))
    }
}

// ---------------------------------------------------------------------------
// Pass-through and negation
// ---------------------------------------------------------------------------

struct Single;

impl ValueCombiner for Single {
    fn name(&self) -> &'static str {
        "Single"
    }

    fn combine(&self, values: &[Value]) -> Result<Value, BindingError> {
        expect_arity(self.name(), values, 1..=1)?;
        Ok(values[0].clone())
    }

    fn combine_back(&self, value: Value, sources: &[Rc<dyn SourceBinding>]) -> Result<(), BindingError> {
        match sources {
            [source] => source.set_value(value),
            _ => Err(reject(self.name(), "write-back needs exactly one source")),
        }
    }

    fn source_type(&self, source_types: &[ValueType]) -> ValueType {
        source_types.first().copied().unwrap_or_default()
    }
}

struct Not;

impl ValueCombiner for Not {
    fn name(&self) -> &'static str {
        "Not"
    }

    fn combine(&self, values: &[Value]) -> Result<Value, BindingError> {
        expect_arity(self.name(), values, 1..=1)?;
        Ok(Value::Bool(!values[0].is_truthy()))
    }

    fn combine_back(&self, value: Value, sources: &[Rc<dyn SourceBinding>]) -> Result<(), BindingError> {
        let Some(flag) = value.as_bool() else {
            return Err(reject(self.name(), format!("cannot negate {}", value.value_type())));
        };
        match sources {
            [source] => source.set_value(Value::Bool(!flag)),
            _ => Err(reject(self.name(), "write-back needs exactly one source")),
        }
    }

    fn source_type(&self, _source_types: &[ValueType]) -> ValueType {
        ValueType::Bool
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn from_value(combiner: &'static str, value: &Value) -> Result<Self, BindingError> {
        match value {
            Value::Int(i) => Ok(Self::Int(*i)),
            Value::Float(f) => Ok(Self::Float(*f)),
            other => Err(reject(
                combiner,
                format!("{} is not a number", other.value_type()),
            )),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Int(i) => Value::Int(i),
            Self::Float(f) => Value::Float(f),
        }
    }
}

/// Fold `values` with integer op `int` (checked) or float op `float`.
fn fold_numbers(
    combiner: &'static str,
    values: &[Value],
    int: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Value, BindingError> {
    let mut numbers = values.iter().map(|v| Number::from_value(combiner, v));
    let Some(first) = numbers.next() else {
        return Err(reject(combiner, "no inputs"));
    };
    let mut acc = first?;
    for next in numbers {
        acc = match (acc, next?) {
            (Number::Int(a), Number::Int(b)) => Number::Int(
                int(a, b).ok_or_else(|| reject(combiner, "integer overflow"))?,
            ),
            (a, b) => Number::Float(float(a.as_f64(), b.as_f64())),
        };
    }
    Ok(acc.into_value())
}

fn numeric_type(source_types: &[ValueType]) -> ValueType {
    if source_types.iter().all(|t| *t == ValueType::Int) {
        ValueType::Int
    } else if source_types
        .iter()
        .all(|t| matches!(t, ValueType::Int | ValueType::Float))
    {
        ValueType::Float
    } else {
        ValueType::Unknown
    }
}

struct Add;

impl ValueCombiner for Add {
    fn name(&self) -> &'static str {
        "Add"
    }

    fn combine(&self, values: &[Value]) -> Result<Value, BindingError> {
        if values.iter().any(|v| matches!(v, Value::Str(_))) {
            let joined: String = values.iter().map(ToString::to_string).collect();
            return Ok(Value::Str(joined));
        }
        fold_numbers(self.name(), values, i64::checked_add, |a, b| a + b)
    }

    fn source_type(&self, source_types: &[ValueType]) -> ValueType {
        if source_types.contains(&ValueType::Str) {
            ValueType::Str
        } else {
            numeric_type(source_types)
        }
    }
}

struct Multiply;

impl ValueCombiner for Multiply {
    fn name(&self) -> &'static str {
        "Multiply"
    }

    fn combine(&self, values: &[Value]) -> Result<Value, BindingError> {
        fold_numbers(self.name(), values, i64::checked_mul, |a, b| a * b)
    }

    fn source_type(&self, source_types: &[ValueType]) -> ValueType {
        numeric_type(source_types)
    }
}

// ---------------------------------------------------------------------------
// Conditional
// ---------------------------------------------------------------------------

struct If;

impl ValueCombiner for If {
    fn name(&self) -> &'static str {
        "If"
    }

    fn combine(&self, values: &[Value]) -> Result<Value, BindingError> {
        expect_arity(self.name(), values, 2..=3)?;
        if values[0].is_truthy() {
            Ok(values[1].clone())
        } else {
            Ok(values.get(2).cloned().unwrap_or(Value::Unset))
        }
    }

    fn source_type(&self, source_types: &[ValueType]) -> ValueType {
        match source_types {
            [_, then] => *then,
            [_, then, otherwise] if then == otherwise => *then,
            _ => ValueType::Unknown,
        }
    }
}
