use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::Any;
use core::marker::PhantomData;

use crate::class::{Class, Function, Method, Property};
use crate::registry::ClassRegistry;
use crate::type_key::MetaType;
use crate::value::{FromValue, IntoValue};
use crate::ClassError;

// -----------------------------------------------------------------------------
// ClassBuilder

/// Attaches members and bases to a class under declaration.
///
/// Created by [`ClassRegistry::declare`]. Nothing is registered until
/// [`finish`](ClassBuilder::finish) is called, so other threads never observe
/// a partially declared class. The first error raised while chaining is kept
/// and returned by `finish`.
///
/// # Examples
///
/// ```
/// use vc_class::{ClassError, ClassRegistry};
///
/// struct Base;
/// struct Derived;
/// vc_class::meta_type!(Base, Derived);
///
/// let registry = ClassRegistry::new();
/// registry.declare::<Base>("Base")?.finish()?;
/// let derived = registry.declare::<Derived>("Derived")?.base::<Base>().finish()?;
///
/// assert_eq!(derived.base_count(), 1);
/// assert_eq!(derived.base(0)?.name(), "Base");
/// assert!(matches!(derived.base(1), Err(ClassError::OutOfRange { index: 1, len: 1 })));
/// # Ok::<(), ClassError>(())
/// ```
#[must_use = "a class is only registered by `finish`"]
pub struct ClassBuilder<'r, T: ?Sized + 'static> {
    registry: &'r ClassRegistry,
    // Taken by `finish`.
    class: Option<Class>,
    error: Option<ClassError>,
    _marker: PhantomData<fn(&T)>,
}

impl<'r, T: MetaType + ?Sized> ClassBuilder<'r, T> {
    pub(crate) fn new(registry: &'r ClassRegistry, name: String) -> Self {
        Self {
            registry,
            class: Some(Class::new(name, T::static_key(), T::DYNAMIC)),
            error: None,
            _marker: PhantomData,
        }
    }

    /// Applies `f` to the class unless an error is already pending.
    fn update(
        mut self,
        f: impl FnOnce(&'r ClassRegistry, &mut Class) -> Result<(), ClassError>,
    ) -> Self {
        if self.error.is_none()
            && let Some(class) = self.class.as_mut()
            && let Err(e) = f(self.registry, class)
        {
            self.error = Some(e);
        }
        self
    }

    /// Links the class registered for `B` as a direct base.
    ///
    /// `B` must already be declared, or have a lazy initializer that declares it.
    /// Linking the same base twice has no effect.
    pub fn base<B: MetaType + ?Sized>(self) -> Self {
        self.update(|registry, class| {
            let key = B::static_key();
            match registry.try_class_by_key(key)? {
                Some(base) => {
                    if !class.bases.contains(&base) {
                        class.bases.push(base);
                    }
                    Ok(())
                }
                None => Err(ClassError::UnknownBase {
                    class: class.name.to_string(),
                    base: key.type_name(),
                }),
            }
        })
    }

    /// Consumes the builder and registers the class.
    ///
    /// Fails with the first error raised while chaining, or with
    /// [`ClassError::DuplicateDeclaration`] if a class with the same type
    /// or name was registered since [`declare`](ClassRegistry::declare).
    pub fn finish(mut self) -> Result<&'static Class, ClassError> {
        let class = self.class.take();
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let Some(class) = class else {
            unreachable!("the class is only taken by `finish`");
        };
        self.registry.insert(class)
    }
}

impl<'r, T: MetaType> ClassBuilder<'r, T> {
    /// Declares a property with a getter and a setter.
    pub fn property<V, G, S>(self, name: &str, getter: G, setter: S) -> Self
    where
        V: IntoValue + FromValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.add_property(
            Property::new::<T, V, G>(name.into(), getter).with_setter::<T, V, S>(setter),
        )
    }

    /// Declares a property with a getter only.
    pub fn readonly_property<V, G>(self, name: &str, getter: G) -> Self
    where
        V: IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.add_property(Property::new::<T, V, G>(name.into(), getter))
    }

    fn add_property(self, property: Property) -> Self {
        self.update(|_, class| {
            if class.has_property(property.name()) {
                return Err(ClassError::DuplicateMember {
                    class: class.name.to_string(),
                    member: property.name().to_string(),
                });
            }
            class.properties.push(property);
            Ok(())
        })
    }

    /// Declares a function bound to `method`.
    ///
    /// See [`Method`] for the accepted callables.
    pub fn function<M, Marker>(self, name: &str, method: M) -> Self
    where
        M: Method<T, Marker>,
    {
        let function = Function::new::<T, M, Marker>(name.into(), method);
        self.update(|_, class| {
            if class.has_function(function.name()) {
                return Err(ClassError::DuplicateMember {
                    class: class.name.to_string(),
                    member: function.name().to_string(),
                });
            }
            class.functions.push(function);
            Ok(())
        })
    }

    /// Declares the constructor used by [`Class::construct`].
    pub fn constructor<F>(self, constructor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.update(|_, class| {
            class.constructor = Some(Box::new(move || Box::new(constructor()) as Box<dyn Any>));
            Ok(())
        })
    }
}

impl<T: ?Sized + 'static> Drop for ClassBuilder<'_, T> {
    fn drop(&mut self) {
        if let Some(class) = &self.class {
            log::warn!("declaration of class `{}` dropped without `finish`", class.name);
        }
    }
}
