//! Walking the declaring levels of an extends-hierarchy.

use alloc::borrow::Cow;
use alloc::string::ToString;
use core::{error, fmt};

use crate::access::ProjectionChain;
use crate::info::AnnotatedType;

// -----------------------------------------------------------------------------
// LineageLevel

/// One declaring level of a hierarchy walk.
///
/// Pairs the level's exact [`AnnotatedType`] with the projection that narrows
/// a leaf instance down to the value declared at this level.
#[derive(Clone)]
pub struct LineageLevel {
    annotated: AnnotatedType,
    projection: ProjectionChain,
}

impl LineageLevel {
    /// Returns the level's [`AnnotatedType`].
    #[inline]
    pub const fn annotated(&self) -> &AnnotatedType {
        &self.annotated
    }

    /// Returns the projection from the leaf instance to this level.
    #[inline]
    pub const fn projection(&self) -> &ProjectionChain {
        &self.projection
    }
}

// -----------------------------------------------------------------------------
// Lineage

/// A finite, restartable sequence of declaring levels, most-derived first.
///
/// Each call to [`lineage`] produces a fresh walk; each level is yielded
/// exactly once. The chain ends where no further ancestor link exists, so the
/// last yielded level is the root of the extends-chain.
pub struct Lineage {
    next: Option<LineageLevel>,
}

impl Iterator for Lineage {
    type Item = LineageLevel;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.annotated.ancestor().map(|link| LineageLevel {
            annotated: link.resolve(),
            projection: current.projection.descend(link.project()),
        });
        Some(current)
    }
}

/// Starts a hierarchy walk at `target`.
///
/// Pure; the produced iterator owns its state and can be created as many
/// times as needed.
pub fn lineage(target: &AnnotatedType) -> Lineage {
    Lineage {
        next: Some(LineageLevel {
            annotated: target.clone(),
            projection: ProjectionChain::root(),
        }),
    }
}

// -----------------------------------------------------------------------------
// resolve_ancestor

/// Resolves the exact [`AnnotatedType`] of an ancestor as instantiated from
/// `target`.
///
/// `ancestor` names the raw type, without generic arguments: either the bare
/// ident (`"Base"`) or the module-qualified path (`"my_crate::cfg::Base"`).
/// Because descriptors are monomorphized, the returned value carries the
/// concrete generic bindings chosen by `target` — a generic member declared in
/// the ancestor resolves against them, not against an erased placeholder.
///
/// Fails with [`LineageError`] when the named type is not actually an
/// ancestor of `target`. Pure, no side effects.
pub fn resolve_ancestor(
    target: &AnnotatedType,
    ancestor: &str,
) -> Result<AnnotatedType, LineageError> {
    for level in lineage(target) {
        if level.annotated().ty().raw_path_is(ancestor) {
            return Ok(level.annotated);
        }
    }
    Err(LineageError {
        target: Cow::Borrowed(target.ty().path()),
        ancestor: ancestor.to_string().into(),
    })
}

// -----------------------------------------------------------------------------
// LineageError

/// Error returned when a type is not an ancestor of the resolution target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageError {
    target: Cow<'static, str>,
    ancestor: Cow<'static, str>,
}

impl LineageError {
    /// The type resolution started from.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The raw name that matched no declaring level.
    #[inline]
    pub fn ancestor(&self) -> &str {
        &self.ancestor
    }
}

impl fmt::Display for LineageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not an ancestor of `{}`",
            self.ancestor, self.target
        )
    }
}

impl error::Error for LineageError {}
