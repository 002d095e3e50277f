//! Shape validation for population targets.
//!
//! Every entry point accepts anything implementing [`Target`] and refuses to
//! go further unless it is an exclusive, present handle to a record.

use crate::error::ConfError;
use crate::record::Record;

/// What a population target turned out to be.
pub enum Shape<'a> {
    /// No target at all (`None`).
    Nil,
    /// A value handed over by value instead of by `&mut`.
    Value,
    /// A `&mut` to something that is not a record.
    Scalar,
    /// A `&mut` to a record.
    Record(&'a mut dyn Record),
}

/// Something that can be handed to an entry point as the population target.
///
/// Only `&mut R` (with `R: Record`) is accepted. The other implementations
/// exist so that misuse is reported as a typed error.
pub trait Target {
    fn shape(&mut self) -> Shape<'_>;
}

impl<R: Record> Target for &mut R {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Record(&mut **self)
    }
}

impl<T: Target> Target for Option<T> {
    fn shape(&mut self) -> Shape<'_> {
        match self {
            Some(target) => target.shape(),
            None => Shape::Nil,
        }
    }
}

impl Target for &str {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Value
    }
}

macro_rules! impl_scalar_target {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Target for $ty {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Value
                }
            }

            impl Target for &mut $ty {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Scalar
                }
            }
        )*
    };
}

impl_scalar_target!(String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool);

/// Confirm `target` is an exclusive handle to a record and return the record.
///
/// # Errors
///
/// - [`ConfError::NilTarget`] for `None`
/// - [`ConfError::NotAHandle`] for anything passed by value
/// - [`ConfError::NotARecord`] for a `&mut` to a non-record
pub fn validate<T: Target + ?Sized>(target: &mut T) -> Result<&mut dyn Record, ConfError> {
    match target.shape() {
        Shape::Nil => Err(ConfError::NilTarget),
        Shape::Value => Err(ConfError::NotAHandle),
        Shape::Scalar => Err(ConfError::NotARecord),
        Shape::Record(record) => Ok(record),
    }
}
