use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// A type with a recognisable "empty" or zero value.
///
/// Operations such as [`remove_empty`](crate::collections::array::AnyArray::remove_empty),
/// [`join_without_empty`](crate::collections::array::AnyArray::join_without_empty) and
/// [`all_empty`](crate::collections::array::AnyArray::all_empty) use this to decide which elements
/// to skip. Numbers are zero when they equal `0`, strings and collections when they have no
/// elements, and pointer-like wrappers when the value they point to is zero. An [`Option`] is zero
/// when it is [`None`] or wraps a zero value.
///
/// # Examples
/// ```
/// # use aid_collections::traits::IsZero;
/// assert!(0_u8.is_zero());
/// assert!("".is_zero());
/// assert!(Some(String::new()).is_zero());
/// assert!(!Some(1_i32).is_zero());
/// ```
pub trait IsZero {
    /// Returns true if self is the zero value for its type.
    fn is_zero(&self) -> bool;
}

macro_rules! impl_is_zero_num {
    ($zero:literal => $($t:ty),+) => {
        $(
            impl IsZero for $t {
                fn is_zero(&self) -> bool {
                    *self == $zero
                }
            }
        )+
    };
}

impl_is_zero_num!(0 => u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_is_zero_num!(0.0 => f32, f64);

impl IsZero for bool {
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl IsZero for char {
    fn is_zero(&self) -> bool {
        *self == '\0'
    }
}

impl IsZero for () {
    fn is_zero(&self) -> bool {
        true
    }
}

impl IsZero for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsZero for [T] {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsZero for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsZero for VecDeque<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> IsZero for HashMap<K, V, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> IsZero for HashSet<T, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsZero for BTreeMap<K, V> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsZero for BTreeSet<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: IsZero> IsZero for Option<T> {
    fn is_zero(&self) -> bool {
        match self {
            Some(inner) => inner.is_zero(),
            None => true,
        }
    }
}

// Pointer-likes defer to their pointee, matching "nil or zero-pointee".
impl<T: IsZero + ?Sized> IsZero for &T {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: IsZero + ?Sized> IsZero for Box<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: IsZero + ?Sized> IsZero for Rc<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: IsZero + ?Sized> IsZero for Arc<T> {
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

macro_rules! impl_is_zero_tuple {
    ($($name:ident),+) => {
        impl<$($name: IsZero),+> IsZero for ($($name,)+) {
            #[allow(non_snake_case)]
            fn is_zero(&self) -> bool {
                let ($($name,)+) = self;
                $($name.is_zero())&&+
            }
        }
    };
}

impl_is_zero_tuple!(A);
impl_is_zero_tuple!(A, B);
impl_is_zero_tuple!(A, B, C);
impl_is_zero_tuple!(A, B, C, D);
