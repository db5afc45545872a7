use std::fmt;
use std::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicU16, AtomicU32,
    AtomicU64, AtomicU8, AtomicUsize, Ordering,
};
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapAny, ArcSwapOption, RefCnt};

/// The kind of value a field holds. Each kind maps to its own atomic cell,
/// so primitive kinds use the matching machine instruction and reference
/// kinds compare by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Reference,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
}

impl ValueKind {
    pub fn is_reference(self) -> bool {
        matches!(self, ValueKind::Reference)
    }

    pub fn is_primitive(self) -> bool {
        !self.is_reference()
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Reference => "reference",
            ValueKind::Bool => "bool",
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::Isize => "isize",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::Usize => "usize",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Atomic storage for one value of type `V`.
///
/// Every operation acts on the cell as a single indivisible step. The
/// orderings are fixed per operation:
///
/// - `load`: `Acquire`
/// - `store`, `swap`, `compare_and_set`: `SeqCst`
/// - `store_release`: `Release`
/// - `compare_and_set_weak`: `SeqCst`, but allowed to fail spuriously
pub trait AtomicCell<V> {
    fn new(value: V) -> Self;
    fn into_inner(self) -> V;
    fn load(&self) -> V;
    fn store(&self, value: V);
    fn store_release(&self, value: V);
    fn compare_and_set(&self, expected: &V, new: V) -> bool;
    fn compare_and_set_weak(&self, expected: &V, new: V) -> bool;
    fn swap(&self, value: V) -> V;
}

/// A type that can live in a [`Volatile`](crate::Volatile) field and be
/// driven by an [`AtomicFieldUpdater`](crate::AtomicFieldUpdater).
pub trait FieldValue: Clone + Sized + 'static {
    const KIND: ValueKind;
    type Cell: AtomicCell<Self>;
}

macro_rules! impl_integer_cell {
    ($($value:ty => $atomic:ty, $kind:ident;)*) => {$(
        impl AtomicCell<$value> for $atomic {
            #[inline]
            fn new(value: $value) -> Self {
                <$atomic>::new(value)
            }

            #[inline]
            fn into_inner(self) -> $value {
                <$atomic>::into_inner(self)
            }

            #[inline]
            fn load(&self) -> $value {
                <$atomic>::load(self, Ordering::Acquire)
            }

            #[inline]
            fn store(&self, value: $value) {
                <$atomic>::store(self, value, Ordering::SeqCst)
            }

            #[inline]
            fn store_release(&self, value: $value) {
                <$atomic>::store(self, value, Ordering::Release)
            }

            #[inline]
            fn compare_and_set(&self, expected: &$value, new: $value) -> bool {
                <$atomic>::compare_exchange(self, *expected, new, Ordering::SeqCst, Ordering::Acquire)
                    .is_ok()
            }

            #[inline]
            fn compare_and_set_weak(&self, expected: &$value, new: $value) -> bool {
                <$atomic>::compare_exchange_weak(
                    self,
                    *expected,
                    new,
                    Ordering::SeqCst,
                    Ordering::Acquire,
                )
                .is_ok()
            }

            #[inline]
            fn swap(&self, value: $value) -> $value {
                <$atomic>::swap(self, value, Ordering::SeqCst)
            }
        }

        impl FieldValue for $value {
            const KIND: ValueKind = ValueKind::$kind;
            type Cell = $atomic;
        }
    )*};
}

impl_integer_cell! {
    bool => AtomicBool, Bool;
    i8 => AtomicI8, I8;
    i16 => AtomicI16, I16;
    i32 => AtomicI32, I32;
    i64 => AtomicI64, I64;
    isize => AtomicIsize, Isize;
    u8 => AtomicU8, U8;
    u16 => AtomicU16, U16;
    u32 => AtomicU32, U32;
    u64 => AtomicU64, U64;
    usize => AtomicUsize, Usize;
}

macro_rules! impl_float_cell {
    ($($name:ident($bits:ty) for $value:ty, $kind:ident;)*) => {$(
        /// Float cell stored as raw bits. Comparisons are bitwise, so `NaN`
        /// matches an identical `NaN` and `0.0` does not match `-0.0`.
        #[repr(transparent)]
        pub struct $name($bits);

        impl AtomicCell<$value> for $name {
            #[inline]
            fn new(value: $value) -> Self {
                $name(<$bits>::new(value.to_bits()))
            }

            #[inline]
            fn into_inner(self) -> $value {
                <$value>::from_bits(self.0.into_inner())
            }

            #[inline]
            fn load(&self) -> $value {
                <$value>::from_bits(self.0.load(Ordering::Acquire))
            }

            #[inline]
            fn store(&self, value: $value) {
                self.0.store(value.to_bits(), Ordering::SeqCst)
            }

            #[inline]
            fn store_release(&self, value: $value) {
                self.0.store(value.to_bits(), Ordering::Release)
            }

            #[inline]
            fn compare_and_set(&self, expected: &$value, new: $value) -> bool {
                self.0
                    .compare_exchange(
                        expected.to_bits(),
                        new.to_bits(),
                        Ordering::SeqCst,
                        Ordering::Acquire,
                    )
                    .is_ok()
            }

            #[inline]
            fn compare_and_set_weak(&self, expected: &$value, new: $value) -> bool {
                self.0
                    .compare_exchange_weak(
                        expected.to_bits(),
                        new.to_bits(),
                        Ordering::SeqCst,
                        Ordering::Acquire,
                    )
                    .is_ok()
            }

            #[inline]
            fn swap(&self, value: $value) -> $value {
                <$value>::from_bits(self.0.swap(value.to_bits(), Ordering::SeqCst))
            }
        }

        impl FieldValue for $value {
            const KIND: ValueKind = ValueKind::$kind;
            type Cell = $name;
        }
    )*};
}

impl_float_cell! {
    AtomicF32(AtomicU32) for f32, F32;
    AtomicF64(AtomicU64) for f64, F64;
}

#[inline]
fn same_referent<R: RefCnt>(a: &R, b: &R) -> bool {
    R::as_ptr(a) == R::as_ptr(b)
}

// Reference cells. `arc-swap` has no weak CAS, so the weak variant does a
// cheap identity pre-check and then falls back to the strong one. It never
// fails spuriously, which the weak contract permits.
//
// `store_release` is a full store here: the strategy only exposes one store.
impl<R> AtomicCell<R> for ArcSwapAny<R>
where
    R: RefCnt + Send + Sync + 'static,
{
    #[inline]
    fn new(value: R) -> Self {
        ArcSwapAny::new(value)
    }

    #[inline]
    fn into_inner(self) -> R {
        ArcSwapAny::into_inner(self)
    }

    #[inline]
    fn load(&self) -> R {
        ArcSwapAny::load_full(self)
    }

    #[inline]
    fn store(&self, value: R) {
        ArcSwapAny::store(self, value)
    }

    #[inline]
    fn store_release(&self, value: R) {
        ArcSwapAny::store(self, value)
    }

    fn compare_and_set(&self, expected: &R, new: R) -> bool {
        let previous = ArcSwapAny::compare_and_swap(self, expected, new);
        same_referent(&*previous, expected)
    }

    fn compare_and_set_weak(&self, expected: &R, new: R) -> bool {
        if !same_referent(&*ArcSwapAny::load(self), expected) {
            return false;
        }
        AtomicCell::compare_and_set(self, expected, new)
    }

    #[inline]
    fn swap(&self, value: R) -> R {
        ArcSwapAny::swap(self, value)
    }
}

impl<T: Send + Sync + 'static> FieldValue for Arc<T> {
    const KIND: ValueKind = ValueKind::Reference;
    type Cell = ArcSwap<T>;
}

impl<T: Send + Sync + 'static> FieldValue for Option<Arc<T>> {
    const KIND: ValueKind = ValueKind::Reference;
    type Cell = ArcSwapOption<T>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_cell_cas_compares_by_value() {
        let cell = <i64 as FieldValue>::Cell::new(5);
        assert!(!AtomicCell::compare_and_set(&cell, &4, 9));
        assert!(AtomicCell::compare_and_set(&cell, &5, 9));
        assert_eq!(AtomicCell::load(&cell), 9);
        assert_eq!(AtomicCell::swap(&cell, 1), 9);
        assert_eq!(AtomicCell::into_inner(cell), 1);
    }

    #[test]
    fn float_cell_cas_is_bitwise() {
        let cell = AtomicF64::new(f64::NAN);
        assert!(AtomicCell::compare_and_set(&cell, &f64::NAN, 0.0));
        assert!(!AtomicCell::compare_and_set(&cell, &-0.0, 1.0));
        assert_eq!(AtomicCell::load(&cell).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn reference_cell_cas_uses_identity() {
        let a = Arc::new(7);
        let equal_but_distinct = Arc::new(7);
        let cell = <Arc<i32> as FieldValue>::Cell::new(a.clone());

        assert!(!AtomicCell::compare_and_set(&cell, &equal_but_distinct, Arc::new(8)));
        assert!(Arc::ptr_eq(&AtomicCell::load(&cell), &a));

        let b = Arc::new(8);
        assert!(AtomicCell::compare_and_set(&cell, &a, b.clone()));
        assert!(Arc::ptr_eq(&AtomicCell::load(&cell), &b));
    }

    #[test]
    fn optional_reference_cell_handles_none() {
        let cell = <Option<Arc<String>> as FieldValue>::Cell::new(None);
        let s = Arc::new(String::from("x"));
        assert!(AtomicCell::compare_and_set_weak(&cell, &None, Some(s.clone())));
        let previous = AtomicCell::swap(&cell, None);
        assert!(previous.is_some_and(|p| Arc::ptr_eq(&p, &s)));
        assert!(AtomicCell::load(&cell).is_none());
    }

    #[test]
    fn kinds_classify() {
        assert!(<Arc<u8> as FieldValue>::KIND.is_reference());
        assert!(<u8 as FieldValue>::KIND.is_primitive());
        assert_eq!(<f32 as FieldValue>::KIND.to_string(), "f32");
    }
}
