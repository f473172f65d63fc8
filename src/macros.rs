//! Crate-local macros.

/// Converts the given `f64` literal or expression into the
/// given [`Float`](crate::num::Float) type.
macro_rules! float {
    ($f:ty, $value:expr) => {
        ::nalgebra::convert::<f64, $f>($value)
    };
}

/// Generates getters and property-aware setters for the matrix
/// fields of [`Affine3`](crate::Affine3).
///
/// Linear-block fields are listed together with their identity value
/// (`ONE` or `ZERO`). Setting one of them clears the orthonormality
/// flag, and clears the identity and translation flags unless the new
/// value equals the identity value. Setting a translation field to a
/// non-zero value clears the identity flag.
macro_rules! affine_field_accessors {
    (
        linear: [$($lin:ident = $identity_value:ident),* $(,)?],
        translation: [$($trans:ident),* $(,)?] $(,)?
    ) => {
        paste::paste! {
            $(
                #[doc = concat!("Returns the `", stringify!($lin), "` element of the linear block.")]
                #[inline]
                pub fn $lin(&self) -> F {
                    self.$lin
                }

                #[doc = concat!("Sets the `", stringify!($lin), "` element of the linear block.")]
                #[inline]
                pub fn [<set_ $lin>](&mut self, value: F) -> &mut Self {
                    self.$lin = value;
                    self.properties -= AffineProperties::ORTHONORMAL;
                    if value != F::$identity_value {
                        self.properties -= AffineProperties::IDENTITY | AffineProperties::TRANSLATION;
                    }
                    self
                }
            )*
            $(
                #[doc = concat!("Returns the `", stringify!($trans), "` element of the translation column.")]
                #[inline]
                pub fn $trans(&self) -> F {
                    self.$trans
                }

                #[doc = concat!("Sets the `", stringify!($trans), "` element of the translation column.")]
                #[inline]
                pub fn [<set_ $trans>](&mut self, value: F) -> &mut Self {
                    self.$trans = value;
                    if value != F::ZERO {
                        self.properties -= AffineProperties::IDENTITY;
                    }
                    self
                }
            )*
        }
    };
}

/// Generates `<name>_mut` methods that replace `self` with the result
/// of the by-value method `<name>` and return `self` for chaining.
macro_rules! in_place_variants {
    ($($name:ident($($arg:ident: $ty:ty),* $(,)?);)*) => {
        paste::paste! {
            $(
                #[doc = concat!("In-place variant of [`Self::", stringify!($name), "`].")]
                #[inline]
                pub fn [<$name _mut>](&mut self, $($arg: $ty),*) -> &mut Self {
                    *self = self.$name($($arg),*);
                    self
                }
            )*
        }
    };
}

macro_rules! impl_binop {
    ($op:ident, $method:ident, $tl:ty, $tr:ty, $to:ty, |$lhs:ident, $rhs:ident| $body:block) => {
        impl<'a, F: $crate::num::Float> ::std::ops::$op<&'a $tr> for &'a $tl {
            type Output = $to;

            #[inline]
            fn $method(self, rhs: &'a $tr) -> Self::Output {
                let $lhs = self;
                let $rhs = rhs;
                $body
            }
        }

        impl<F: $crate::num::Float> ::std::ops::$op<$tr> for &$tl {
            type Output = $to;

            #[inline]
            fn $method(self, rhs: $tr) -> Self::Output {
                self.$method(&rhs)
            }
        }

        impl<'a, F: $crate::num::Float> ::std::ops::$op<&'a $tr> for $tl {
            type Output = $to;

            #[inline]
            fn $method(self, rhs: &'a $tr) -> Self::Output {
                (&self).$method(rhs)
            }
        }

        impl<F: $crate::num::Float> ::std::ops::$op<$tr> for $tl {
            type Output = $to;

            #[inline]
            fn $method(self, rhs: $tr) -> Self::Output {
                (&self).$method(&rhs)
            }
        }
    };
}

macro_rules! impl_binop_assign {
    ($op:ident, $method:ident, $tl:ty, $tr:ty, |$lhs:ident, $rhs:ident| $body:block) => {
        impl<F: $crate::num::Float> ::std::ops::$op<&$tr> for $tl {
            #[inline]
            fn $method(&mut self, rhs: &$tr) {
                let $lhs = self;
                let $rhs = rhs;
                $body
            }
        }

        impl<F: $crate::num::Float> ::std::ops::$op<$tr> for $tl {
            #[inline]
            fn $method(&mut self, rhs: $tr) {
                self.$method(&rhs);
            }
        }
    };
}
