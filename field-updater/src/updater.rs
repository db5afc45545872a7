use std::fmt;
use std::marker::PhantomData;

use crate::descriptor::{FieldDescriptor, FieldTable};
use crate::error::UpdaterError;
use crate::value::{AtomicCell, FieldValue};

/// Lock-free access to one [`Volatile`](crate::Volatile) field of any `O`.
///
/// The updater holds only a resolved [`FieldDescriptor`]; all mutable state
/// lives in the owner instances passed to each call. It is `Copy`, `Send`
/// and `Sync`, so one updater is typically built once and shared.
///
/// | Operation | Ordering |
/// |-----------|----------|
/// | [`get`](Self::get) | `Acquire` |
/// | [`set`](Self::set) | `SeqCst` |
/// | [`lazy_set`](Self::lazy_set) | `Release` |
/// | [`compare_and_set`](Self::compare_and_set) | `SeqCst`, never fails spuriously |
/// | [`weak_compare_and_set`](Self::weak_compare_and_set) | `SeqCst`, may fail spuriously |
/// | [`get_and_set`](Self::get_and_set) | `SeqCst` |
///
/// Comparisons use identity for reference values (`Arc::ptr_eq`), value
/// equality for integers and `bool`, and bit equality for floats.
pub struct AtomicFieldUpdater<O, V> {
    descriptor: FieldDescriptor,
    _marker: PhantomData<fn(&O) -> V>,
}

impl<O: FieldTable, V: FieldValue> AtomicFieldUpdater<O, V> {
    /// Resolve `field` on `O` as a `V` field.
    ///
    /// Fails with [`UpdaterError::LookupFailure`] if there is no such field,
    /// [`UpdaterError::TypeMismatch`] if it is not declared with value type
    /// `V`, and [`UpdaterError::NotVolatile`] if it is not `Volatile`, in
    /// that order.
    pub fn new(field: &str) -> Result<Self, UpdaterError> {
        let descriptor = FieldDescriptor::resolve::<O, V>(field)?;
        Ok(Self {
            descriptor,
            _marker: PhantomData,
        })
    }

    /// Build an updater without a name lookup. Used by the generated
    /// `*_updater()` constructors.
    ///
    /// # Safety
    ///
    /// `offset` must be the byte offset of a `Volatile<V>` field of `O`.
    #[doc(hidden)]
    pub unsafe fn from_volatile_field(field: &'static str, offset: usize) -> Self {
        let () = O::VOLATILE_FIELDS_ALIGNED;
        Self {
            descriptor: unsafe { FieldDescriptor::new_unchecked::<O, V>(field, offset) },
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    fn cell<'a>(&self, owner: &'a O) -> &'a V::Cell {
        let base = (owner as *const O).cast::<u8>();
        // SAFETY: the descriptor was validated against `O`, so the offset
        // addresses a `Volatile<V>` inside `owner`, and `Volatile<V>` is a
        // transparent wrapper around `V::Cell`. The cell is only ever
        // accessed through shared references.
        unsafe { &*base.add(self.descriptor.offset()).cast::<V::Cell>() }
    }

    /// Current value of the field on `owner`.
    #[inline]
    pub fn get(&self, owner: &O) -> V {
        self.cell(owner).load()
    }

    /// Store `value`; every later `get` from any thread observes it.
    #[inline]
    pub fn set(&self, owner: &O, value: V) {
        self.cell(owner).store(value)
    }

    /// Store `value` with release ordering only.
    ///
    /// The calling thread sees the value immediately; other threads see it
    /// eventually. Cheaper than [`set`](Self::set) on platforms where a full
    /// fence costs extra.
    #[inline]
    pub fn lazy_set(&self, owner: &O, value: V) {
        self.cell(owner).store_release(value)
    }

    /// Replace the field with `new` if it currently equals `expected`.
    /// Returns whether the replacement happened.
    #[inline]
    pub fn compare_and_set(&self, owner: &O, expected: &V, new: V) -> bool {
        self.cell(owner).compare_and_set(expected, new)
    }

    /// Like [`compare_and_set`](Self::compare_and_set) but may return `false`
    /// even when the field equals `expected`. Call it in a loop.
    #[inline]
    pub fn weak_compare_and_set(&self, owner: &O, expected: &V, new: V) -> bool {
        self.cell(owner).compare_and_set_weak(expected, new)
    }

    /// Store `value` and return the value it replaced, in one step.
    #[inline]
    pub fn get_and_set(&self, owner: &O, value: V) -> V {
        self.cell(owner).swap(value)
    }

    /// Apply `f` to the current value until the result is installed, and
    /// return the value that was replaced.
    ///
    /// `f` may run more than once under contention and should be free of
    /// side effects.
    pub fn get_and_update<F>(&self, owner: &O, mut f: F) -> V
    where
        F: FnMut(&V) -> V,
    {
        let cell = self.cell(owner);
        let mut current = cell.load();
        loop {
            if cell.compare_and_set_weak(&current, f(&current)) {
                return current;
            }
            current = cell.load();
        }
    }

    /// Apply `f` to the current value until the result is installed, and
    /// return the installed value.
    pub fn update_and_get<F>(&self, owner: &O, mut f: F) -> V
    where
        F: FnMut(&V) -> V,
    {
        let cell = self.cell(owner);
        let mut current = cell.load();
        loop {
            let next = f(&current);
            if cell.compare_and_set_weak(&current, next.clone()) {
                return next;
            }
            current = cell.load();
        }
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn field_name(&self) -> &'static str {
        self.descriptor.name()
    }
}

impl<O, V> Clone for AtomicFieldUpdater<O, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, V> Copy for AtomicFieldUpdater<O, V> {}

impl<O, V> fmt::Debug for AtomicFieldUpdater<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicFieldUpdater")
            .field("owner", &self.descriptor.owner_type_name())
            .field("field", &self.descriptor.name())
            .field("value", &self.descriptor.value_type_name())
            .field("kind", &self.descriptor.kind())
            .finish()
    }
}

// Updaters are shared across threads; keep that a compile-time fact.
#[allow(dead_code)]
fn _assert_send_sync() {
    fn require<T: Send + Sync>() {}
    require::<AtomicFieldUpdater<(), i32>>();
}
