use std::fmt;

use crate::value::{AtomicCell, FieldValue};

/// A field that may be driven by an [`AtomicFieldUpdater`](crate::AtomicFieldUpdater).
///
/// Declaring a field as `Volatile<V>` instead of plain `V` is what makes it
/// eligible for lock-free access: `#[derive(FieldUpdaters)]` records it as
/// volatile, and resolution of a plain field fails with
/// [`UpdaterError::NotVolatile`](crate::UpdaterError::NotVolatile).
///
/// The owning type can still read and write the field directly with
/// [`load`](Self::load) and [`store`](Self::store); those use the same
/// orderings as the updater's `get` and `set`.
#[repr(transparent)]
pub struct Volatile<V: FieldValue> {
    cell: V::Cell,
}

impl<V: FieldValue> Volatile<V> {
    pub fn new(value: V) -> Self {
        Self {
            cell: V::Cell::new(value),
        }
    }

    #[inline]
    pub fn load(&self) -> V {
        self.cell.load()
    }

    #[inline]
    pub fn store(&self, value: V) {
        self.cell.store(value)
    }

    pub fn into_inner(self) -> V {
        self.cell.into_inner()
    }
}

impl<V: FieldValue + Default> Default for Volatile<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: FieldValue> From<V> for Volatile<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

impl<V: FieldValue + fmt::Debug> fmt::Debug for Volatile<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Volatile").field(&self.load()).finish()
    }
}

mod sealed {
    pub trait Sealed {}
}

impl<V: FieldValue> sealed::Sealed for Volatile<V> {}

/// Implemented only by [`Volatile<V>`]; names the value type of a volatile
/// field at the type level.
///
/// The derive macro uses it both to record a field as volatile and to type
/// the generated `*_updater()` constructors. A look-alike type named
/// `Volatile` does not implement it and is rejected at compile time:
///
/// ```compile_fail
/// use field_updater::FieldUpdaters;
///
/// struct Volatile<T>(T);
///
/// #[derive(FieldUpdaters)]
/// struct Sneaky {
///     value: Volatile<u32>,
/// }
/// ```
pub trait VolatileField: sealed::Sealed {
    type Value: FieldValue;
}

impl<V: FieldValue> VolatileField for Volatile<V> {
    type Value = V;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn direct_access_round_trips() {
        let v = Volatile::new(3u32);
        v.store(4);
        assert_eq!(v.load(), 4);
        assert_eq!(v.into_inner(), 4);
    }

    #[test]
    fn layout_is_the_cell() {
        assert_eq!(
            std::mem::size_of::<Volatile<Option<Arc<u8>>>>(),
            std::mem::size_of::<<Option<Arc<u8>> as FieldValue>::Cell>()
        );
        assert_eq!(std::mem::size_of::<Volatile<i16>>(), 2);
    }

    #[test]
    fn debug_shows_current_value() {
        let v: Volatile<i32> = 9.into();
        assert_eq!(format!("{v:?}"), "Volatile(9)");
        let d: Volatile<bool> = Volatile::default();
        assert!(!d.load());
    }
}
