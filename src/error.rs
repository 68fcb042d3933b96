use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::{error, fmt};

use crate::access::AccessError;
use crate::info::Type;

// -----------------------------------------------------------------------------
// ObjectMappingError

/// An enumeration of all error outcomes of discovery, decoding and
/// construction.
///
/// Every variant carries the offending type and a message. Every failure
/// aborts the entire operation for that object; no partial object is ever
/// handed back. Discovery-time failures occur before any tree access;
/// construction-time failures occur strictly before the instance is returned.
#[derive(Debug)]
pub enum ObjectMappingError {
    /// The target is an abstract type, or no discovery strategy applied.
    ///
    /// Raised before any tree reading.
    TypeNotConstructible {
        type_path: Cow<'static, str>,
        message: Cow<'static, str>,
    },
    /// A privileged member access failed for a declaring type.
    FieldAccessDenied { access: AccessError },
    /// The registry could not resolve a serializer for a leaf member's type.
    ///
    /// Surfaced by the orchestrator, which attaches the full member path.
    NoSerializerFound {
        type_path: Cow<'static, str>,
        path: Vec<Cow<'static, str>>,
    },
    /// The constructor strategy was missing or unusable during
    /// [`construct_new`](crate::factory::InstanceFactory::construct_new).
    ConstructionFailed {
        type_path: Cow<'static, str>,
        message: Cow<'static, str>,
    },
    /// A required constructor parameter had no entry.
    ///
    /// Immutable-construction lifecycle only; raised instead of substituting
    /// a sentinel.
    MissingRequiredMember {
        type_path: Cow<'static, str>,
        member: Cow<'static, str>,
    },
    /// A serializer rejected a node or value.
    ///
    /// The general failure channel for [`ValueSerializer`]
    /// implementations; the mapper core never raises it itself.
    ///
    /// [`ValueSerializer`]: crate::registry::ValueSerializer
    Serialization {
        type_path: Cow<'static, str>,
        message: Cow<'static, str>,
    },
}

impl ObjectMappingError {
    /// A [`TypeNotConstructible`](Self::TypeNotConstructible) for `ty`.
    pub fn type_not_constructible(ty: &Type, message: impl Into<Cow<'static, str>>) -> Self {
        Self::TypeNotConstructible {
            type_path: Cow::Borrowed(ty.path()),
            message: message.into(),
        }
    }

    /// A [`NoSerializerFound`](Self::NoSerializerFound) for `ty`, path still
    /// empty.
    pub fn no_serializer(ty: &Type) -> Self {
        Self::NoSerializerFound {
            type_path: Cow::Borrowed(ty.path()),
            path: Vec::new(),
        }
    }

    /// A [`ConstructionFailed`](Self::ConstructionFailed) for `ty`.
    pub fn construction_failed(ty: &Type, message: impl Into<Cow<'static, str>>) -> Self {
        Self::ConstructionFailed {
            type_path: Cow::Borrowed(ty.path()),
            message: message.into(),
        }
    }

    /// A [`MissingRequiredMember`](Self::MissingRequiredMember) for `ty`.
    pub fn missing_required_member(ty: &Type, member: impl Into<Cow<'static, str>>) -> Self {
        Self::MissingRequiredMember {
            type_path: Cow::Borrowed(ty.path()),
            member: member.into(),
        }
    }

    /// A [`Serialization`](Self::Serialization) failure for `ty`.
    pub fn serialization(ty: &Type, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Serialization {
            type_path: Cow::Borrowed(ty.path()),
            message: message.into(),
        }
    }

    /// Prepends a path segment to a [`NoSerializerFound`](Self::NoSerializerFound);
    /// other variants pass through unchanged.
    pub fn at(mut self, segment: impl Into<Cow<'static, str>>) -> Self {
        if let Self::NoSerializerFound { path, .. } = &mut self {
            path.insert(0, segment.into());
        }
        self
    }
}

impl fmt::Display for ObjectMappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeNotConstructible { type_path, message } => {
                write!(f, "type `{type_path}` is not constructible: {message}")
            }
            Self::FieldAccessDenied { access } => {
                write!(f, "field access denied: {access}")
            }
            Self::NoSerializerFound { type_path, path } => {
                write!(f, "no serializer found for type `{type_path}`")?;
                if !path.is_empty() {
                    write!(f, " at path `")?;
                    for (i, segment) in path.iter().enumerate() {
                        if i > 0 {
                            write!(f, ".")?;
                        }
                        write!(f, "{segment}")?;
                    }
                    write!(f, "`")?;
                }
                Ok(())
            }
            Self::ConstructionFailed { type_path, message } => {
                write!(f, "unable to construct `{type_path}`: {message}")
            }
            Self::MissingRequiredMember { type_path, member } => {
                write!(
                    f,
                    "required member `{member}` of `{type_path}` had no value"
                )
            }
            Self::Serialization { type_path, message } => {
                write!(f, "serialization of `{type_path}` failed: {message}")
            }
        }
    }
}

impl error::Error for ObjectMappingError {}

impl From<AccessError> for ObjectMappingError {
    #[inline]
    fn from(access: AccessError) -> Self {
        Self::FieldAccessDenied { access }
    }
}
