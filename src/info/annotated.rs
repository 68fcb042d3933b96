use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use crate::access::Project;
use crate::describe::{Describe, FieldTable};
use crate::info::{AttributeSet, Generics, Type};

// -----------------------------------------------------------------------------
// TypeShape

/// The construction shape of a described type.
///
/// The shape selects the construction lifecycle: `Struct` types populate
/// member by member, `Record` types gather an ordered argument list and
/// construct in one shot, `Opaque` types are leaves handled entirely by a
/// serializer, and `Abstract` types cannot be instantiated at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Struct,
    Record,
    Opaque,
    Abstract,
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.pad("Struct"),
            Self::Record => f.pad("Record"),
            Self::Opaque => f.pad("Opaque"),
            Self::Abstract => f.pad("Abstract"),
        }
    }
}

// -----------------------------------------------------------------------------
// AncestorLink

/// A link from a described type to the base type it extends.
///
/// The link carries the ancestor's descriptor *as instantiated by the
/// subtype*: `resolve` is a monomorphized function pointer, so a generic base
/// embedded as `Base<u32>` resolves with its parameter bound to `u32`, never
/// erased. `project` narrows a leaf instance to the embedded base value so
/// ancestor members can be accessed through the leaf.
#[derive(Clone, Copy)]
pub struct AncestorLink {
    resolve: fn() -> AnnotatedType,
    project: Project,
}

impl AncestorLink {
    /// Creates a new link. Used by the derive.
    #[inline]
    pub const fn new(resolve: fn() -> AnnotatedType, project: Project) -> Self {
        Self { resolve, project }
    }

    /// Returns the ancestor's exact [`AnnotatedType`].
    #[inline]
    pub fn resolve(&self) -> AnnotatedType {
        (self.resolve)()
    }

    /// Returns the projection from a leaf instance to the embedded ancestor.
    #[inline]
    pub const fn project(&self) -> Project {
        self.project
    }
}

impl fmt::Debug for AncestorLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AncestorLink")
            .field("ancestor", &self.resolve().ty().path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// AnnotatedType

/// A type plus its resolved generic parameterization plus attached metadata,
/// valid at one level of an extends-hierarchy.
///
/// Immutable value, produced fresh per discovery pass by
/// [`Describe::annotated_type`]; callers may cache descriptors externally if
/// they wish.
///
/// # Examples
///
/// ```
/// use treebind::Describe;
/// use treebind::info::AnnotatedType;
///
/// let ty: AnnotatedType = <u32 as Describe>::annotated_type();
/// assert_eq!(ty.ty().path(), "u32");
/// assert!(ty.generics().is_empty());
/// ```
#[derive(Clone)]
pub struct AnnotatedType {
    ty: Type,
    shape: TypeShape,
    generics: Generics,
    // Use `Option` to reduce unnecessary heap requests (when empty content).
    attributes: Option<Arc<AttributeSet>>,
    ancestor: Option<AncestorLink>,
    table: fn() -> Option<&'static FieldTable>,
}

impl AnnotatedType {
    /// Creates a descriptor for `T` with the given shape.
    ///
    /// The derive calls this with the shape it parsed; hand-written
    /// implementations may pass [`TypeShape::Abstract`] to mark a
    /// non-instantiable target.
    #[inline]
    pub fn of<T: Describe>(shape: TypeShape) -> Self {
        Self {
            ty: Type::of::<T>(),
            shape,
            generics: Generics::new(),
            attributes: None,
            ancestor: None,
            table: <T as Describe>::field_table,
        }
    }

    /// Creates a leaf descriptor for `T` (no members of its own).
    #[inline]
    pub fn opaque<T: Describe>() -> Self {
        Self::of::<T>(TypeShape::Opaque)
    }

    /// Replace the generic parameter information.
    #[inline]
    pub fn with_generics(mut self, generics: Generics) -> Self {
        self.generics = generics;
        self
    }

    /// Replace the type-use attributes.
    #[inline]
    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = Some(Arc::new(attributes));
        self
    }

    /// Replace the ancestor link.
    #[inline]
    pub fn with_ancestor(mut self, ancestor: AncestorLink) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    /// Returns the erased [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub const fn id(&self) -> TypeId {
        self.ty.id()
    }

    /// Returns the construction shape.
    #[inline]
    pub const fn shape(&self) -> TypeShape {
        self.shape
    }

    /// Returns the instantiated generic parameters.
    #[inline]
    pub const fn generics(&self) -> &Generics {
        &self.generics
    }

    /// Returns the type-use attributes.
    #[inline]
    pub fn attributes(&self) -> &AttributeSet {
        match &self.attributes {
            Some(attrs) => attrs,
            None => AttributeSet::EMPTY,
        }
    }

    /// Returns the link to the extended base type, if any.
    #[inline]
    pub const fn ancestor(&self) -> Option<&AncestorLink> {
        self.ancestor.as_ref()
    }

    /// Acquires the declaring type's field table.
    ///
    /// `None` for leaves and abstract types. Acquisition is a pure function of
    /// the type; the table itself lives in a once-initialized static emitted
    /// by the derive, so repeated acquisition is cheap and thread-safe.
    #[inline]
    pub fn field_table(&self) -> Option<&'static FieldTable> {
        (self.table)()
    }
}

impl fmt::Debug for AnnotatedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedType")
            .field("ty", &self.ty.path())
            .field("shape", &self.shape)
            .finish()
    }
}
