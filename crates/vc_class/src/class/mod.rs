//! Class records and their members.
//!
//! ## Menu
//!
//! - [`Class`]: the immutable metadata record of a declared type.
//! - [`ClassBuilder`]: attaches members and bases while a class is declared.
//! - [`Property`]: a named getter with an optional setter.
//! - [`Function`]: a named callable, see [`Method`] for what can be bound.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod function;
mod property;

// -----------------------------------------------------------------------------
// Exports

pub use builder::ClassBuilder;
pub use function::{ByMut, ByRef, Function, Method};
pub use property::Property;

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::registry::ClassRegistry;
use crate::type_key::{MetaType, TypeKey};
use crate::ClassError;

type Constructor = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

// -----------------------------------------------------------------------------
// Class

/// Runtime metadata of a declared type.
///
/// A `Class` is created through [`Class::declare`] (or
/// [`ClassRegistry::declare`]) and lives as long as the process. Two classes
/// compare equal only if they are the same record.
///
/// # Examples
///
/// ```
/// use vc_class::ClassRegistry;
///
/// struct MyClass { prop: i32 }
/// vc_class::meta_type!(MyClass);
///
/// impl MyClass {
///     fn func(&self) {}
/// }
///
/// let registry = ClassRegistry::new();
/// let class = registry
///     .declare::<MyClass>("MyClass").unwrap()
///     .readonly_property("prop", |c: &MyClass| c.prop)
///     .function("func", MyClass::func)
///     .finish().unwrap();
///
/// assert_eq!(class.name(), "MyClass");
/// assert_eq!(class.property_count(), 1);
/// assert!(class.has_property("prop"));
/// assert!(class.has_function("func"));
/// assert!(!class.has_function("xxxx"));
/// ```
pub struct Class {
    name: Box<str>,
    key: TypeKey,
    dynamic: bool,
    properties: Vec<Property>,
    functions: Vec<Function>,
    bases: Vec<&'static Class>,
    constructor: Option<Constructor>,
}

impl Class {
    pub(crate) fn new(name: String, key: TypeKey, dynamic: bool) -> Self {
        Self {
            name: name.into_boxed_str(),
            key,
            dynamic,
            properties: Vec::new(),
            functions: Vec::new(),
            bases: Vec::new(),
            constructor: None,
        }
    }

    /// Declares `T` in the [global registry](ClassRegistry::global).
    ///
    /// See [`ClassRegistry::declare`].
    #[inline]
    pub fn declare<T: MetaType + ?Sized>(
        name: impl Into<String>,
    ) -> Result<ClassBuilder<'static, T>, ClassError> {
        ClassRegistry::global().declare::<T>(name)
    }

    /// Returns the declared name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key of the declared type.
    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Returns the [`TypeId`] of the declared type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.key.id()
    }

    /// Returns `true` if the declared type opted into dynamic identity.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Returns the number of properties.
    #[inline]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if a property named `name` is declared.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name() == name)
    }

    /// Returns the property named `name`.
    ///
    /// This is O(N) complexity.
    pub fn property(&self, name: &str) -> Result<&Property, ClassError> {
        self.properties
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| ClassError::PropertyNotFound {
                class: self.name.to_string(),
                property: name.to_string(),
            })
    }

    /// Returns the property at `index`, in declaration order.
    pub fn property_at(&self, index: usize) -> Result<&Property, ClassError> {
        self.properties.get(index).ok_or(ClassError::OutOfRange {
            index,
            len: self.properties.len(),
        })
    }

    /// Returns an iterator over the properties in declaration order.
    #[inline]
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &Property> {
        self.properties.iter()
    }

    // -------------------------------------------------------------------------
    // Functions

    /// Returns the number of functions.
    #[inline]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if a function named `name` is declared.
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name() == name)
    }

    /// Returns the function named `name`.
    ///
    /// This is O(N) complexity.
    pub fn function(&self, name: &str) -> Result<&Function, ClassError> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ClassError::FunctionNotFound {
                class: self.name.to_string(),
                function: name.to_string(),
            })
    }

    /// Returns the function at `index`, in declaration order.
    pub fn function_at(&self, index: usize) -> Result<&Function, ClassError> {
        self.functions.get(index).ok_or(ClassError::OutOfRange {
            index,
            len: self.functions.len(),
        })
    }

    /// Returns an iterator over the functions in declaration order.
    #[inline]
    pub fn functions(&self) -> impl ExactSizeIterator<Item = &Function> {
        self.functions.iter()
    }

    // -------------------------------------------------------------------------
    // Bases

    /// Returns the number of direct bases.
    #[inline]
    pub fn base_count(&self) -> usize {
        self.bases.len()
    }

    /// Returns the direct base at `index`, in declaration order.
    pub fn base(&self, index: usize) -> Result<&'static Class, ClassError> {
        self.bases
            .get(index)
            .copied()
            .ok_or(ClassError::OutOfRange {
                index,
                len: self.bases.len(),
            })
    }

    /// Returns an iterator over the direct bases in declaration order.
    #[inline]
    pub fn bases(&self) -> impl ExactSizeIterator<Item = &'static Class> + '_ {
        self.bases.iter().copied()
    }

    /// Returns `true` if `other` is this class or one of its ancestors.
    pub fn derives_from(&self, other: &Class) -> bool {
        self == other || self.bases.iter().any(|base| base.derives_from(other))
    }

    /// Returns the nearest class, starting at `this` and walking up the bases
    /// breadth first, that is dynamic and derives from `root`.
    pub(crate) fn nearest_dynamic(this: &'static Class, root: &Class) -> Option<&'static Class> {
        let mut queue = VecDeque::from([this]);
        while let Some(class) = queue.pop_front() {
            if class.dynamic && class.derives_from(root) {
                return Some(class);
            }
            queue.extend(class.bases.iter().copied());
        }
        None
    }

    // -------------------------------------------------------------------------
    // Construction

    /// Returns `true` if a constructor is declared.
    #[inline]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Creates a new instance through the declared constructor.
    pub fn construct(&self) -> Result<Box<dyn Any>, ClassError> {
        match &self.constructor {
            Some(constructor) => Ok(constructor()),
            None => Err(ClassError::NoConstructor(self.name.to_string())),
        }
    }
}

impl PartialEq for Class {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other)
    }
}

impl Eq for Class {}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("dynamic", &self.dynamic)
            .field("properties", &self.properties)
            .field("functions", &self.functions)
            .field(
                "bases",
                &self.bases.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
