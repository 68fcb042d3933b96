use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::{error, fmt};

use crate::access::{AccessErrorKind, FieldAccessor};
use crate::info::{AnnotatedType, AttributeSet, Type, TypePath};

// -----------------------------------------------------------------------------
// Function pointer aliases

/// Zero-argument constructor strategy for a type, emitted by the derive when
/// the type opts in with `#[describe(default)]`.
pub type InstanceMaker = fn() -> Box<dyn Any>;

/// One-shot constructor for a record type, invoked with one argument slot per
/// constructor parameter in declaration order.
pub type Assembler = fn(Vec<Option<Box<dyn Any>>>) -> Result<Box<dyn Any>, AssembleError>;

/// Whole-value replacement for a record type.
pub type Replacer = fn(&mut dyn Any, Box<dyn Any>) -> Result<(), AccessErrorKind>;

// -----------------------------------------------------------------------------
// Describe

/// A type that can describe its own mapping surface.
///
/// Implemented by [`#[derive(Describe)]`](crate::derive::Describe), which
/// emits the descriptor ([`annotated_type`]) and the declaring-level accessor
/// table ([`field_table`]). Leaf types (scalars, collections) implement only
/// the descriptor; the default `field_table` reports no table.
///
/// Descriptors are produced fresh per call; the field table lives in a
/// once-initialized static, so acquisition is a pure function of the type and
/// is safely shared between threads.
///
/// ```ignore
/// use treebind::derive::Describe;
///
/// #[derive(Describe, Default)]
/// #[describe(default)]
/// struct Server {
///     host: String,
///     port: Option<u16>,
/// }
/// ```
///
/// [`annotated_type`]: Describe::annotated_type
/// [`field_table`]: Describe::field_table
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Describe` so it cannot be mapped",
    note = "consider annotating `{Self}` with `#[derive(Describe)]`"
)]
pub trait Describe: TypePath + Any {
    /// Returns this type's descriptor at its own declaring level.
    fn annotated_type() -> AnnotatedType;

    /// Acquires the declaring-level field table, if the type has one.
    fn field_table() -> Option<&'static FieldTable> {
        None
    }
}

// -----------------------------------------------------------------------------
// FieldSpec

/// The static description of one declared field: name, exact type and the
/// privileged accessor.
pub struct FieldSpec {
    name: &'static str,
    ty_id: TypeId,
    // The descriptor is created on demand; a function pointer delays it.
    annotated: fn() -> AnnotatedType,
    accessor: FieldAccessor,
    // Use `Option` to reduce unnecessary heap requests (when empty content).
    attributes: Option<Arc<AttributeSet>>,
}

impl FieldSpec {
    /// Creates a new [`FieldSpec`] for a field of type `F` with the given
    /// (possibly renamed) external `name`. Used by the derive.
    #[inline]
    pub fn new<F: Describe>(name: &'static str, accessor: FieldAccessor) -> Self {
        Self {
            name,
            ty_id: TypeId::of::<F>(),
            annotated: F::annotated_type,
            accessor,
            attributes: None,
        }
    }

    /// Replace the declared attributes.
    #[inline]
    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = Some(Arc::new(attributes));
        self
    }

    /// Returns the external member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the field type's `TypeId`.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Returns the field type's descriptor, produced fresh.
    #[inline]
    pub fn annotated(&self) -> AnnotatedType {
        (self.annotated)()
    }

    /// Returns the declared accessor.
    #[inline]
    pub const fn accessor(&self) -> &FieldAccessor {
        &self.accessor
    }

    /// Returns the attributes declared directly on the field.
    #[inline]
    pub fn attributes(&self) -> &AttributeSet {
        match &self.attributes {
            Some(attrs) => attrs,
            None => AttributeSet::EMPTY,
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec").field("name", &self.name).finish()
    }
}

// -----------------------------------------------------------------------------
// FieldTable

/// The per-declaring-type accessor table: every field physically declared at
/// one hierarchy level, plus the type's construction strategies.
///
/// Emitted once per type into a once-initialized static by the derive;
/// stateless and shared across all discovery passes.
pub struct FieldTable {
    declaring: Type,
    shape: crate::info::TypeShape,
    fields: Box<[FieldSpec]>,
    maker: Option<InstanceMaker>,
    assembler: Option<Assembler>,
    replacer: Option<Replacer>,
}

impl FieldTable {
    /// Creates an empty table for the declaring type `T`. Used by the derive.
    pub fn new<T: TypePath + Any>(shape: crate::info::TypeShape) -> Self {
        Self {
            declaring: Type::of::<T>(),
            shape,
            fields: Box::from([]),
            maker: None,
            assembler: None,
            replacer: None,
        }
    }

    /// Replace the field list.
    ///
    /// The order of internal fields is fixed, depends on the input order.
    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields.into_boxed_slice();
        self
    }

    /// Set the zero-argument constructor strategy.
    #[inline]
    pub fn with_maker(mut self, maker: InstanceMaker) -> Self {
        self.maker = Some(maker);
        self
    }

    /// Set the one-shot record constructor.
    #[inline]
    pub fn with_assembler(mut self, assembler: Assembler) -> Self {
        self.assembler = Some(assembler);
        self
    }

    /// Set the whole-value replacer.
    #[inline]
    pub fn with_replacer(mut self, replacer: Replacer) -> Self {
        self.replacer = Some(replacer);
        self
    }

    /// Returns the declaring [`Type`].
    #[inline]
    pub const fn declaring(&self) -> &Type {
        &self.declaring
    }

    /// Returns the construction shape.
    #[inline]
    pub const fn shape(&self) -> crate::info::TypeShape {
        self.shape
    }

    /// Returns the declared fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns the [`FieldSpec`] at the given index, if present.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldSpec> {
        self.fields.get(index)
    }

    /// Returns the number of declared fields.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the zero-argument constructor strategy, if the type opted in.
    #[inline]
    pub const fn maker(&self) -> Option<InstanceMaker> {
        self.maker
    }

    /// Returns the record constructor, if the type is record-shaped.
    #[inline]
    pub const fn assembler(&self) -> Option<Assembler> {
        self.assembler
    }

    /// Returns the whole-value replacer, if the type is record-shaped.
    #[inline]
    pub const fn replacer(&self) -> Option<Replacer> {
        self.replacer
    }
}

impl fmt::Debug for FieldTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTable")
            .field("declaring", &self.declaring.path())
            .field("shape", &self.shape)
            .field("field_len", &self.field_len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// AssembleError

/// The kind of [`AssembleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssembleErrorKind {
    /// A required constructor parameter had no argument.
    MissingArgument,
    /// An argument was not of the parameter's type.
    MismatchedArgument,
}

/// Error raised by a generated record constructor.
///
/// Carries only the parameter index; the caller maps it back to the member
/// name through the field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleError {
    index: usize,
    kind: AssembleErrorKind,
}

impl AssembleError {
    /// A required parameter at `index` had no argument.
    #[inline]
    pub const fn missing(index: usize) -> Self {
        Self {
            index,
            kind: AssembleErrorKind::MissingArgument,
        }
    }

    /// The argument at `index` was of the wrong type.
    #[inline]
    pub const fn mismatch(index: usize) -> Self {
        Self {
            index,
            kind: AssembleErrorKind::MismatchedArgument,
        }
    }

    /// Returns the parameter index.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the kind of failure.
    #[inline]
    pub const fn kind(&self) -> AssembleErrorKind {
        self.kind
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AssembleErrorKind::MissingArgument => {
                write!(f, "constructor parameter {} had no argument", self.index)
            }
            AssembleErrorKind::MismatchedArgument => {
                write!(f, "constructor argument {} had the wrong type", self.index)
            }
        }
    }
}

impl error::Error for AssembleError {}
