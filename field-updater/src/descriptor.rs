use std::any::{type_name, TypeId};
use std::fmt;

use thiserror::Error;

use crate::error::UpdaterError;
use crate::value::{FieldValue, ValueKind};
use crate::volatile::VolatileField;

/// What `#[derive(FieldUpdaters)]` records about one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    name: &'static str,
    offset: usize,
    value_type: TypeId,
    value_type_name: &'static str,
    volatile: bool,
}

impl FieldMeta {
    /// Metadata for a field declared as `F`, where `F` is some `Volatile<V>`.
    /// The recorded value type is `V`.
    pub fn volatile<F: VolatileField>(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            value_type: TypeId::of::<F::Value>(),
            value_type_name: type_name::<F::Value>(),
            volatile: true,
        }
    }

    /// Metadata for a field declared with a plain type `T`.
    pub fn plain<T: 'static>(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            value_type: TypeId::of::<T>(),
            value_type_name: type_name::<T>(),
            volatile: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    pub fn is_volatile(&self) -> bool {
        self.volatile
    }
}

/// Name-indexed field metadata for a struct. Implemented by
/// `#[derive(FieldUpdaters)]`.
///
/// # Safety
///
/// Every [`FieldMeta`] returned by [`lookup_field`](Self::lookup_field) must
/// describe a real field of `Self`: `offset` is that field's byte offset, and
/// a meta built with [`FieldMeta::volatile::<F>`](FieldMeta::volatile) must
/// belong to a field whose declared type is exactly `F`. That offset must
/// also be a multiple of `align_of::<F>()`, which rules out packed structs.
/// Updaters read and write through the offset without further checks.
///
/// The derive refuses packed structs:
///
/// ```compile_fail
/// use field_updater::{FieldUpdaters, Volatile};
///
/// #[derive(FieldUpdaters)]
/// #[repr(C, packed)]
/// struct Packed {
///     tag: u8,
///     big: Volatile<u64>,
/// }
/// ```
pub unsafe trait FieldTable: Sized + 'static {
    /// Lookup names of every recorded field, in declaration order.
    const FIELD_NAMES: &'static [&'static str];

    /// Evaluates to `()` only if every volatile field is aligned for its
    /// cell. The derive fills it with compile-time assertions.
    #[doc(hidden)]
    const VOLATILE_FIELDS_ALIGNED: () = ();

    fn lookup_field(name: &str) -> Result<FieldMeta, LookupError>;
}

/// A field name that is not recorded for the owner type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no field named `{field}` on `{owner}` (known fields: {})", KnownFields(.known))]
pub struct LookupError {
    owner: &'static str,
    field: String,
    known: &'static [&'static str],
}

impl LookupError {
    pub fn missing<O: FieldTable>(field: &str) -> Self {
        Self {
            owner: type_name::<O>(),
            field: field.to_owned(),
            known: O::FIELD_NAMES,
        }
    }

    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn known_fields(&self) -> &'static [&'static str] {
        self.known
    }
}

struct KnownFields<'a>(&'a [&'static str]);

impl fmt::Display for KnownFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// A validated locator for one field of one owner type.
///
/// Built once by [`resolve`](Self::resolve) and valid for the life of the
/// process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    owner_type: TypeId,
    owner_type_name: &'static str,
    name: &'static str,
    offset: usize,
    value_type: TypeId,
    value_type_name: &'static str,
    kind: ValueKind,
}

impl FieldDescriptor {
    /// Find `name` on `O` and check it can hold a `V` atomically.
    ///
    /// Checks existence, then type, then volatility, and stops at the first
    /// failure.
    pub fn resolve<O: FieldTable, V: FieldValue>(name: &str) -> Result<Self, UpdaterError> {
        let outcome = Self::validate::<O, V>(name);
        match &outcome {
            Ok(d) => tracing::debug!(
                owner = d.owner_type_name,
                field = d.name,
                offset = d.offset,
                kind = %d.kind,
                "resolved field updater"
            ),
            Err(e) => tracing::debug!(
                owner = type_name::<O>(),
                field = name,
                error = %e,
                "field updater resolution failed"
            ),
        }
        outcome
    }

    fn validate<O: FieldTable, V: FieldValue>(name: &str) -> Result<Self, UpdaterError> {
        let () = O::VOLATILE_FIELDS_ALIGNED;
        let meta = O::lookup_field(name)?;

        if meta.value_type != TypeId::of::<V>() {
            return Err(UpdaterError::TypeMismatch {
                field: meta.name,
                expected: type_name::<V>(),
                found: meta.value_type_name,
            });
        }

        if !meta.volatile {
            return Err(UpdaterError::NotVolatile { field: meta.name });
        }

        // SAFETY: the meta came from `O`'s table and passed every check.
        Ok(unsafe { Self::new_unchecked::<O, V>(meta.name, meta.offset) })
    }

    /// # Safety
    ///
    /// `offset` must be the offset of a `Volatile<V>` field of `O`.
    pub(crate) unsafe fn new_unchecked<O: 'static, V: FieldValue>(
        name: &'static str,
        offset: usize,
    ) -> Self {
        Self {
            owner_type: TypeId::of::<O>(),
            owner_type_name: type_name::<O>(),
            name,
            offset,
            value_type: TypeId::of::<V>(),
            value_type_name: type_name::<V>(),
            kind: V::KIND,
        }
    }

    pub fn owner_type(&self) -> TypeId {
        self.owner_type
    }

    pub fn owner_type_name(&self) -> &'static str {
        self.owner_type_name
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}
