//! Exact numeric-to-`i32` conversion for identifiers and color components.

/// A numeric element that may hold an `i32` value exactly.
///
/// Integers convert when they fit in `i32`. Floats convert only when they
/// are finite, integral and in range; `2.0` is accepted, `2.5` is not.
pub trait IntegerValue: Copy {
    fn to_i32_exact(self) -> Result<i32, String>;
}

macro_rules! impl_integer_value_for_int {
    ($($t:ty),*) => {
        $(
            impl IntegerValue for $t {
                #[inline]
                fn to_i32_exact(self) -> Result<i32, String> {
                    i32::try_from(self).map_err(|_| format!("{self} is out of i32 range"))
                }
            }
        )*
    };
}

macro_rules! impl_integer_value_for_float {
    ($($t:ty),*) => {
        $(
            impl IntegerValue for $t {
                #[inline]
                fn to_i32_exact(self) -> Result<i32, String> {
                    if !self.is_finite() {
                        return Err(format!("{self} is not finite"));
                    }
                    if self.fract() != 0.0 {
                        return Err(format!("{self} is not an integer"));
                    }
                    if self < i32::MIN as $t || self >= -(i32::MIN as $t) {
                        return Err(format!("{self} is out of i32 range"));
                    }
                    Ok(self as i32)
                }
            }
        )*
    };
}

impl_integer_value_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_integer_value_for_float!(f32, f64);

impl<T: IntegerValue> IntegerValue for &T {
    #[inline]
    fn to_i32_exact(self) -> Result<i32, String> {
        (*self).to_i32_exact()
    }
}
