use alloc::string::String;
use alloc::vec::Vec;
use std::sync::LazyLock;

use crate::class::{Class, ClassBuilder};
use crate::registry::ClassRegistry;
use crate::type_key::MetaType;
use crate::ClassError;

static GLOBAL: LazyLock<ClassRegistry> = LazyLock::new(|| {
    let registry = ClassRegistry::new();
    if !registry.auto_register() {
        log::trace!("global class registry created without static initializers");
    }
    registry
});

impl ClassRegistry {
    /// Returns the process wide registry.
    ///
    /// Created on first use, with every [`auto_class!`](crate::auto_class)
    /// binding already recorded.
    #[inline]
    pub fn global() -> &'static ClassRegistry {
        &GLOBAL
    }
}

/// See [`ClassRegistry::declare`].
#[inline]
pub fn declare<T: MetaType + ?Sized>(
    name: impl Into<String>,
) -> Result<ClassBuilder<'static, T>, ClassError> {
    ClassRegistry::global().declare::<T>(name)
}

/// See [`ClassRegistry::declare_type`].
#[inline]
pub fn declare_type<T: MetaType + ?Sized>() -> Result<ClassBuilder<'static, T>, ClassError> {
    ClassRegistry::global().declare_type::<T>()
}

/// See [`ClassRegistry::class_count`].
#[inline]
pub fn class_count() -> usize {
    ClassRegistry::global().class_count()
}

/// See [`ClassRegistry::class_by_index`].
#[inline]
pub fn class_by_index(index: usize) -> Result<&'static Class, ClassError> {
    ClassRegistry::global().class_by_index(index)
}

/// See [`ClassRegistry::classes`].
#[inline]
pub fn classes() -> Vec<&'static Class> {
    ClassRegistry::global().classes()
}

/// See [`ClassRegistry::class_by_name`].
#[inline]
pub fn class_by_name(name: &str) -> Result<&'static Class, ClassError> {
    ClassRegistry::global().class_by_name(name)
}

/// See [`ClassRegistry::class_by_type`].
#[inline]
pub fn class_by_type<T: MetaType + ?Sized>() -> Result<&'static Class, ClassError> {
    ClassRegistry::global().class_by_type::<T>()
}

/// See [`ClassRegistry::class_by_type_safe`].
#[inline]
pub fn class_by_type_safe<T: MetaType + ?Sized>() -> Option<&'static Class> {
    ClassRegistry::global().class_by_type_safe::<T>()
}

/// See [`ClassRegistry::class_by_object`].
#[inline]
pub fn class_by_object<T: MetaType + ?Sized>(object: &T) -> Result<&'static Class, ClassError> {
    ClassRegistry::global().class_by_object(object)
}
