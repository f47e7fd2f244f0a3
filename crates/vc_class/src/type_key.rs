use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypeKey

/// Static identity of a Rust type, used as the registry key.
///
/// Equality and hashing only look at the [`TypeId`]; the type name is kept
/// for diagnostics. Unsized types are allowed, so a trait object type such
/// as `dyn Shape` can be declared as a polymorphic base class.
///
/// # Examples
///
/// ```
/// use vc_class::TypeKey;
///
/// trait Shape {}
///
/// let key = TypeKey::of::<dyn Shape>();
/// assert_eq!(key, TypeKey::of::<dyn Shape>());
/// assert_ne!(key, TypeKey::of::<u32>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the compiler provided type name.
    ///
    /// The format is not stable across compiler versions, do not use it as identity.
    #[inline(always)]
    pub const fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// MetaType

/// Marks a type the registry can declare and resolve.
///
/// The default implementation only provides static identity. A type opts into
/// dynamic identity by setting [`DYNAMIC`](MetaType::DYNAMIC) and reporting
/// its runtime key from [`dynamic_key`](MetaType::dynamic_key); the
/// [`dynamic_type!`](crate::dynamic_type) macro does both.
///
/// # Examples
///
/// ```
/// use vc_class::{MetaType, TypeKey};
///
/// struct Plain;
/// struct Tracked;
///
/// vc_class::meta_type!(Plain);
/// vc_class::dynamic_type!(Tracked);
///
/// assert!(!Plain::DYNAMIC);
/// assert_eq!(Plain.dynamic_key(), None);
///
/// assert!(Tracked::DYNAMIC);
/// assert_eq!(Tracked.dynamic_key(), Some(TypeKey::of::<Tracked>()));
/// ```
///
/// Polymorphic bases are trait objects. Make the trait extend [`ObjectKey`]
/// so the runtime key of the concrete type is reachable through the vtable:
///
/// ```
/// use vc_class::{MetaType, ObjectKey, TypeKey};
///
/// trait Shape: ObjectKey {}
/// vc_class::dynamic_type!(dyn Shape);
///
/// struct Circle;
/// vc_class::dynamic_type!(Circle);
/// impl Shape for Circle {}
///
/// let shape: &dyn Shape = &Circle;
/// assert_eq!(shape.dynamic_key(), Some(TypeKey::of::<Circle>()));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `MetaType` so it cannot be used as a class",
    note = "consider `vc_class::meta_type!({Self})` or `vc_class::dynamic_type!({Self})`"
)]
pub trait MetaType: 'static {
    /// Whether classes declared for this type probe runtime identity.
    const DYNAMIC: bool = false;

    /// The key the registry files this type under.
    #[inline]
    fn static_key() -> TypeKey {
        TypeKey::of::<Self>()
    }

    /// Runtime identity of this object, `None` when not tracked.
    #[inline]
    fn dynamic_key(&self) -> Option<TypeKey> {
        None
    }
}

impl<T: MetaType + ?Sized> MetaType for Box<T> {
    const DYNAMIC: bool = T::DYNAMIC;

    #[inline]
    fn static_key() -> TypeKey {
        T::static_key()
    }

    #[inline]
    fn dynamic_key(&self) -> Option<TypeKey> {
        (**self).dynamic_key()
    }
}

impl<T: MetaType + ?Sized> MetaType for Rc<T> {
    const DYNAMIC: bool = T::DYNAMIC;

    #[inline]
    fn static_key() -> TypeKey {
        T::static_key()
    }

    #[inline]
    fn dynamic_key(&self) -> Option<TypeKey> {
        (**self).dynamic_key()
    }
}

impl<T: MetaType + ?Sized> MetaType for Arc<T> {
    const DYNAMIC: bool = T::DYNAMIC;

    #[inline]
    fn static_key() -> TypeKey {
        T::static_key()
    }

    #[inline]
    fn dynamic_key(&self) -> Option<TypeKey> {
        (**self).dynamic_key()
    }
}

// -----------------------------------------------------------------------------
// ObjectKey

/// Object-safe access to [`MetaType::dynamic_key`].
///
/// Implemented for every sized [`MetaType`]; use it as a supertrait of
/// polymorphic base traits.
pub trait ObjectKey {
    /// Same as [`MetaType::dynamic_key`] of the concrete type.
    fn object_key(&self) -> Option<TypeKey>;
}

impl<T: MetaType> ObjectKey for T {
    #[inline]
    fn object_key(&self) -> Option<TypeKey> {
        self.dynamic_key()
    }
}

// -----------------------------------------------------------------------------
// Macros

/// Implements [`MetaType`] without dynamic identity.
///
/// ```
/// struct A;
/// struct B;
/// vc_class::meta_type!(A, B);
/// ```
#[macro_export]
macro_rules! meta_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::MetaType for $ty {}
        )+
    };
}

/// Implements [`MetaType`] with dynamic identity.
///
/// For a concrete type the runtime key is the type itself. For `dyn Trait`
/// the key is forwarded through [`ObjectKey`], which `Trait` must extend.
#[macro_export]
macro_rules! dynamic_type {
    (dyn $tr:path) => {
        impl $crate::MetaType for dyn $tr {
            const DYNAMIC: bool = true;

            #[inline]
            fn dynamic_key(&self) -> ::core::option::Option<$crate::TypeKey> {
                $crate::ObjectKey::object_key(self)
            }
        }
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::MetaType for $ty {
                const DYNAMIC: bool = true;

                #[inline]
                fn dynamic_key(&self) -> ::core::option::Option<$crate::TypeKey> {
                    ::core::option::Option::Some($crate::TypeKey::of::<Self>())
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::format;
    use alloc::sync::Arc;

    use super::{MetaType, ObjectKey, TypeKey};

    trait Shape: ObjectKey {}
    dynamic_type!(dyn Shape);

    struct Circle;
    struct Square;

    dynamic_type!(Circle);
    meta_type!(Square);

    impl Shape for Circle {}
    impl Shape for Square {}

    #[test]
    fn key_identity() {
        assert_eq!(TypeKey::of::<Circle>(), TypeKey::of::<Circle>());
        assert_ne!(TypeKey::of::<Circle>(), TypeKey::of::<Square>());
        assert_ne!(TypeKey::of::<dyn Shape>(), TypeKey::of::<Circle>());
        assert!(format!("{}", TypeKey::of::<Circle>()).ends_with("Circle"));
    }

    #[test]
    fn dynamic_key_through_trait_object() {
        let circle: &dyn Shape = &Circle;
        let square: &dyn Shape = &Square;

        assert!(<dyn Shape as MetaType>::DYNAMIC);
        assert_eq!(circle.dynamic_key(), Some(TypeKey::of::<Circle>()));
        assert_eq!(square.dynamic_key(), None);
    }

    #[test]
    fn pointers_forward_to_pointee() {
        let boxed: Box<dyn Shape> = Box::new(Circle);
        assert_eq!(<Box<dyn Shape>>::static_key(), TypeKey::of::<dyn Shape>());
        assert_eq!(boxed.dynamic_key(), Some(TypeKey::of::<Circle>()));

        let shared = Arc::new(Square);
        assert!(!<Arc<Square>>::DYNAMIC);
        assert_eq!(<Arc<Square>>::static_key(), TypeKey::of::<Square>());
        assert_eq!(shared.dynamic_key(), None);
    }
}
