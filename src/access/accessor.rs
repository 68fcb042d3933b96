use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::{error, fmt};

use crate::describe::FieldTable;

// -----------------------------------------------------------------------------
// Project

/// A single narrowing step from an instance to an embedded base value.
///
/// Function pointers generated by the derive for `#[describe(extends)]`
/// fields; `None` means the instance was not of the expected type.
#[derive(Clone, Copy)]
pub struct Project {
    as_ref: fn(&dyn Any) -> Option<&dyn Any>,
    as_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
}

impl Project {
    /// Creates a new projection step. Used by the derive.
    #[inline]
    pub const fn new(
        as_ref: fn(&dyn Any) -> Option<&dyn Any>,
        as_mut: fn(&mut dyn Any) -> Option<&mut dyn Any>,
    ) -> Self {
        Self { as_ref, as_mut }
    }

    /// Narrows a shared reference.
    #[inline]
    pub fn apply<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.as_ref)(instance)
    }

    /// Narrows a mutable reference.
    #[inline]
    pub fn apply_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.as_mut)(instance)
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Project")
    }
}

// -----------------------------------------------------------------------------
// ProjectionChain

/// The composition of [`Project`] steps from a leaf instance down to one
/// declaring level.
///
/// The chain for the leaf level itself is empty; each ancestor level appends
/// one step. Chains are assembled fresh per discovery walk.
#[derive(Clone, Default, Debug)]
pub struct ProjectionChain(Vec<Project>);

impl ProjectionChain {
    /// The empty chain: the leaf level itself.
    #[inline]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new chain extended by one step.
    pub fn descend(&self, step: Project) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    /// Returns the number of steps.
    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Narrows a shared reference through every step.
    pub fn apply<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        let mut current = instance;
        for step in &self.0 {
            current = step.apply(current)?;
        }
        Some(current)
    }

    /// Narrows a mutable reference through every step.
    pub fn apply_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let mut current = instance;
        for step in &self.0 {
            current = step.apply_mut(current)?;
        }
        Some(current)
    }
}

// -----------------------------------------------------------------------------
// FieldAccessor

/// The capability to read and write one declared field of an instance,
/// independent of normal visibility rules.
///
/// The function pointers are generated inside the declaring type's derive
/// expansion, which is what grants access to private fields. They expect the
/// declaring type itself; projection across hierarchy levels is layered on by
/// [`MemberAccessor`].
#[derive(Clone, Copy)]
pub struct FieldAccessor {
    get: fn(&dyn Any) -> Option<&dyn Any>,
    set: fn(&mut dyn Any, Box<dyn Any>) -> Result<(), AccessErrorKind>,
    vacant: fn(&dyn Any) -> Option<bool>,
}

impl FieldAccessor {
    /// Creates a new accessor from generated functions. Used by the derive.
    ///
    /// - `get` returns the current field value, `None` when the instance is
    ///   not of the declaring type.
    /// - `set` overwrites the field with an exactly-typed value.
    /// - `vacant` reports whether the current value is null-equivalent
    ///   (an `Option` field holding `None`); plain fields always hold a value
    ///   and report `false`.
    #[inline]
    pub const fn new(
        get: fn(&dyn Any) -> Option<&dyn Any>,
        set: fn(&mut dyn Any, Box<dyn Any>) -> Result<(), AccessErrorKind>,
        vacant: fn(&dyn Any) -> Option<bool>,
    ) -> Self {
        Self { get, set, vacant }
    }

    #[inline]
    pub(crate) fn get<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(instance)
    }

    #[inline]
    pub(crate) fn set(
        &self,
        instance: &mut dyn Any,
        value: Box<dyn Any>,
    ) -> Result<(), AccessErrorKind> {
        (self.set)(instance, value)
    }

    #[inline]
    pub(crate) fn vacant(&self, instance: &dyn Any) -> Option<bool> {
        (self.vacant)(instance)
    }
}

impl fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("FieldAccessor")
    }
}

// -----------------------------------------------------------------------------
// MemberKey

/// The identity of a member within one discovery pass: the declaring level
/// plus the field's position there.
///
/// A member name redeclared at two hierarchy levels yields two distinct keys,
/// never merged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MemberKey {
    declaring: TypeId,
    index: usize,
}

impl MemberKey {
    #[inline]
    pub(crate) const fn new(declaring: TypeId, index: usize) -> Self {
        Self { declaring, index }
    }

    /// Returns the declaring type's [`TypeId`].
    #[inline]
    pub const fn declaring(&self) -> TypeId {
        self.declaring
    }

    /// Returns the field index within the declaring type.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }
}

// -----------------------------------------------------------------------------
// MemberAccessor

/// A [`FieldAccessor`] bound to its declaring level, operating on the leaf
/// instance of a hierarchy.
///
/// Assembled during discovery: the projection narrows the leaf instance to
/// the declaring level, then the declared accessor reads or writes the field.
#[derive(Clone)]
pub struct MemberAccessor {
    projection: ProjectionChain,
    table: &'static FieldTable,
    index: usize,
}

impl MemberAccessor {
    #[inline]
    pub(crate) fn new(
        projection: ProjectionChain,
        table: &'static FieldTable,
        index: usize,
    ) -> Self {
        Self {
            projection,
            table,
            index,
        }
    }

    /// Returns the member identity.
    #[inline]
    pub fn key(&self) -> MemberKey {
        MemberKey::new(self.table.declaring().id(), self.index)
    }

    /// Returns the declared (possibly renamed) member name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.spec().name()
    }

    #[inline]
    pub(crate) fn spec(&self) -> &'static crate::describe::FieldSpec {
        &self.table.fields()[self.index]
    }

    fn declared_path(&self) -> &'static str {
        self.table.declaring().path()
    }

    fn fault(&self, kind: AccessErrorKind) -> AccessError {
        AccessError {
            kind,
            declaring: self.declared_path(),
            field: self.name(),
        }
    }

    /// Reads the member's current value off `instance`.
    pub fn get<'a>(&self, instance: &'a dyn Any) -> Result<&'a dyn Any, AccessError> {
        self.projection
            .apply(instance)
            .and_then(|level| self.spec().accessor().get(level))
            .ok_or_else(|| self.fault(AccessErrorKind::WrongInstance))
    }

    /// Whether the member's current value is null-equivalent.
    pub fn is_vacant(&self, instance: &dyn Any) -> Result<bool, AccessError> {
        self.projection
            .apply(instance)
            .and_then(|level| self.spec().accessor().vacant(level))
            .ok_or_else(|| self.fault(AccessErrorKind::WrongInstance))
    }

    /// Overwrites the member with an exactly-typed value.
    pub fn set(&self, instance: &mut dyn Any, value: Box<dyn Any>) -> Result<(), AccessError> {
        let level = self
            .projection
            .apply_mut(instance)
            .ok_or_else(|| self.fault(AccessErrorKind::WrongInstance))?;
        self.spec()
            .accessor()
            .set(level, value)
            .map_err(|kind| self.fault(kind))
    }
}

impl fmt::Debug for MemberAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberAccessor")
            .field("declaring", &self.declared_path())
            .field("field", &self.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Error

/// The kind of [`AccessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessErrorKind {
    /// The instance was not of the declaring type.
    WrongInstance,
    /// The value was not of the field's type.
    WrongValue,
}

/// An error originating from a member access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError {
    kind: AccessErrorKind,
    declaring: &'static str,
    field: &'static str,
}

impl AccessError {
    /// Returns the kind of failure.
    #[inline]
    pub const fn kind(&self) -> AccessErrorKind {
        self.kind
    }

    /// Returns the declaring type's path.
    #[inline]
    pub const fn declaring(&self) -> &'static str {
        self.declaring
    }

    /// Returns the field name.
    #[inline]
    pub const fn field(&self) -> &'static str {
        self.field
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AccessErrorKind::WrongInstance => write!(
                f,
                "instance passed to `{}.{}` was not a `{0}`",
                self.declaring, self.field
            ),
            AccessErrorKind::WrongValue => write!(
                f,
                "value rejected by field `{}.{}`: type mismatch",
                self.declaring, self.field
            ),
        }
    }
}

impl error::Error for AccessError {}
