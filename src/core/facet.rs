//! core::facet
//!
//! The facet model: marker traits, capability declarations, and the keys
//! used to index metadata.
//!
//! # Architecture
//!
//! Every value stored in a metadata store implements the root [`Facet`]
//! trait. A *capability* is a trait extending `Facet` that has been declared
//! with [`capability!`](crate::capability). Capabilities are the only types
//! that can key a store: a value is looked up by "what it can do", never by
//! what it concretely is.
//!
//! Capability sets are declared statically. A concrete value type lists the
//! capabilities it implements with [`facet_value!`](crate::facet_value), and
//! each capability lists its parent capabilities. The full set a value is
//! registered under is the closure of those declarations, see
//! [`capability_closure`].
//!
//! # Example
//!
//! ```
//! use facetwork::core::facet::{capabilities_of, Facet, FacetKind};
//! use facetwork::{capability, facet_value};
//!
//! pub trait Titled: Facet {
//!     fn text(&self) -> &str;
//! }
//! pub trait Headline: Titled {}
//!
//! capability!(Titled);
//! capability!(Headline: Titled);
//!
//! #[derive(Debug)]
//! pub struct Banner(String);
//!
//! impl Titled for Banner {
//!     fn text(&self) -> &str {
//!         &self.0
//!     }
//! }
//! impl Headline for Banner {}
//!
//! facet_value!(Banner: Headline);
//!
//! let kinds = capabilities_of(&Banner("Breaking".into()));
//! assert_eq!(
//!     kinds,
//!     vec![FacetKind::of::<dyn Headline>(), FacetKind::of::<dyn Titled>()]
//! );
//! assert!(!FacetKind::of::<Banner>().is_capability());
//! ```

use std::any::{Any, TypeId};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared reference to a stored facet value.
///
/// One value may be registered under several facet kinds; every
/// registration shares the same allocation.
pub type FacetRef = Arc<dyn Facet>;

/// Root marker for metadata values.
///
/// Implement it through [`facet_value!`](crate::facet_value) rather than by
/// hand; the macro fills in the capability list and the `Any` plumbing.
pub trait Facet: Any + fmt::Debug + Send + Sync {
    /// Capabilities the concrete type declares directly.
    ///
    /// Ancestors of these capabilities are added by [`capability_closure`].
    fn declared_capabilities(&self) -> Vec<FacetKind>;

    /// View the value as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Convert a shared value into a shared `Any` for owned downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Name of the concrete type, for diagnostics.
    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Facet {
    /// Check whether the value is of concrete type `T`.
    pub fn is<T: Facet>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the value as concrete type `T`.
    pub fn downcast_ref<T: Facet>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Downcast a shared facet to its concrete type.
///
/// Returns `None` if the value is not a `T`; the original reference is left
/// untouched either way.
pub fn downcast_facet<T: Facet>(value: &FacetRef) -> Option<Arc<T>> {
    Arc::clone(value).into_any().downcast::<T>().ok()
}

/// Static description of a type that can appear as a facet kind.
///
/// Implemented for capability trait objects (`dyn Titled`) by
/// [`capability!`](crate::capability) and for concrete value types by
/// [`facet_value!`](crate::facet_value).
pub trait FacetType: 'static {
    /// Whether the type is a capability (a valid storage key).
    const IS_CAPABILITY: bool;

    /// Display name of the type.
    fn kind_name() -> &'static str;

    /// Capabilities this type directly extends.
    fn parent_kinds() -> Vec<FacetKind> {
        Vec::new()
    }
}

impl FacetType for dyn Facet {
    const IS_CAPABILITY: bool = true;

    fn kind_name() -> &'static str {
        "Facet"
    }
}

/// Key identifying a facet type.
///
/// Equality and hashing use the type's `TypeId` only; the name and parent
/// list are descriptive.
///
/// # Example
///
/// ```
/// use facetwork::core::facet::{Facet, FacetKind};
///
/// let root = FacetKind::root();
/// assert!(root.is_root());
/// assert!(root.is_capability());
/// assert_eq!(root, FacetKind::of::<dyn Facet>());
/// assert_eq!(root.name(), "Facet");
/// ```
#[derive(Clone, Copy)]
pub struct FacetKind {
    type_id: TypeId,
    name: &'static str,
    capability: bool,
    parents: fn() -> Vec<FacetKind>,
}

impl FacetKind {
    /// Describe the facet type `T`.
    pub fn of<T: ?Sized + FacetType>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::kind_name(),
            capability: T::IS_CAPABILITY,
            parents: T::parent_kinds,
        }
    }

    /// The root [`Facet`] marker.
    pub fn root() -> Self {
        Self::of::<dyn Facet>()
    }

    /// Display name of the described type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `TypeId` of the described type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether this kind may be used as a storage key.
    pub fn is_capability(&self) -> bool {
        self.capability
    }

    /// Whether this kind is the root marker.
    pub fn is_root(&self) -> bool {
        self.type_id == TypeId::of::<dyn Facet>()
    }

    /// Capabilities this kind directly extends.
    pub fn parents(&self) -> Vec<FacetKind> {
        (self.parents)()
    }
}

impl PartialEq for FacetKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for FacetKind {}

impl Hash for FacetKind {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetKind")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .finish()
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Expand declared capabilities into the full set a value is stored under.
///
/// Walks parents breadth-first from the declared kinds, keeping the order
/// in which kinds are first reached. The root marker and non-capability
/// kinds are dropped. Each kind is visited once, so a diamond or a cycle in
/// the declarations terminates.
pub fn capability_closure(declared: &[FacetKind]) -> Vec<FacetKind> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<FacetKind> = declared.iter().copied().collect();
    let mut closure = Vec::new();

    while let Some(kind) = queue.pop_front() {
        if !seen.insert(kind) {
            continue;
        }
        queue.extend(kind.parents());
        if kind.is_capability() && !kind.is_root() {
            closure.push(kind);
        }
    }

    closure
}

/// Full capability set of a value.
pub fn capabilities_of(value: &dyn Facet) -> Vec<FacetKind> {
    capability_closure(&value.declared_capabilities())
}

/// Declare a trait as a capability.
///
/// The trait must extend [`Facet`] (directly or through its parents).
/// Parent capabilities listed after the colon are included whenever a value
/// declaring this capability is auto-registered.
///
/// ```
/// use facetwork::core::facet::{Facet, FacetKind};
/// use facetwork::capability;
///
/// pub trait Dated: Facet {}
/// pub trait Versioned: Dated {}
///
/// capability!(Dated);
/// capability!(Versioned: Dated);
///
/// assert_eq!(
///     FacetKind::of::<dyn Versioned>().parents(),
///     vec![FacetKind::of::<dyn Dated>()]
/// );
/// ```
#[macro_export]
macro_rules! capability {
    ($name:ident $(: $($parent:ident),+ $(,)?)?) => {
        impl $crate::core::facet::FacetType for dyn $name {
            const IS_CAPABILITY: bool = true;

            fn kind_name() -> &'static str {
                ::std::stringify!($name)
            }

            fn parent_kinds() -> ::std::vec::Vec<$crate::core::facet::FacetKind> {
                ::std::vec![$($($crate::core::facet::FacetKind::of::<dyn $parent>()),+)?]
            }
        }
    };
}

/// Declare a concrete type as a facet value with its direct capabilities.
///
/// Each listed capability must be implemented by the type; the macro checks
/// this at compile time. A type declared with no capabilities can still be
/// stored under an explicit kind but fails auto-registration.
#[macro_export]
macro_rules! facet_value {
    ($ty:ty $(: $($cap:ident),+ $(,)?)?) => {
        impl $crate::core::facet::FacetType for $ty {
            const IS_CAPABILITY: bool = false;

            fn kind_name() -> &'static str {
                ::std::stringify!($ty)
            }
        }

        impl $crate::core::facet::Facet for $ty {
            fn declared_capabilities(&self) -> ::std::vec::Vec<$crate::core::facet::FacetKind> {
                ::std::vec![$($({
                    let _: &dyn $cap = self;
                    $crate::core::facet::FacetKind::of::<dyn $cap>()
                }),+)?]
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(
                self: ::std::sync::Arc<Self>,
            ) -> ::std::sync::Arc<dyn ::std::any::Any + ::std::marker::Send + ::std::marker::Sync>
            {
                self
            }
        }
    };
}
