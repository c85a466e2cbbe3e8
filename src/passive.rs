//! Traits describing the underlying ("passive") scalar types a recording
//! value can wrap.
//!
//! The tiering makes misuse a compile error instead of a runtime one:
//! negation needs a signed type, and the reciprocal/transcendental
//! operations need a floating-point type, so those operators are only
//! available where the corresponding trait is implemented.

use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// The plain numeric type wrapped by a recording value.
pub trait Passive:
    Clone
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
}

/// Passive types with a sign; required for negation.
pub trait SignedPassive: Passive + Neg<Output = Self> {}

/// Floating-point passive types; required for `recip`, `sqrt`, `sin` and
/// `cos`.
pub trait FloatPassive: SignedPassive {
    fn recip(self) -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
}

macro_rules! impl_passive {
    ($($ty:ty),*) => {
        $(impl Passive for $ty {})*
    };
}

macro_rules! impl_signed_passive {
    ($($ty:ty),*) => {
        $(impl SignedPassive for $ty {})*
    };
}

macro_rules! impl_float_passive {
    ($($ty:ty),*) => {
        $(
            impl FloatPassive for $ty {
                fn recip(self) -> Self {
                    <$ty>::recip(self)
                }
                fn sqrt(self) -> Self {
                    <$ty>::sqrt(self)
                }
                fn sin(self) -> Self {
                    <$ty>::sin(self)
                }
                fn cos(self) -> Self {
                    <$ty>::cos(self)
                }
            }
        )*
    };
}

impl_passive!(u32, u64, i32, i64, f32, f64);
impl_signed_passive!(i32, i64, f32, f64);
impl_float_passive!(f32, f64);
