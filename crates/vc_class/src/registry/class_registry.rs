use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use parking_lot::RwLock;

use crate::class::{Class, ClassBuilder};
use crate::hash::{HashMap, KeyHashState};
use crate::registry::initializer::{InitGate, Initializer};
use crate::type_key::{MetaType, TypeKey};
use crate::{ClassError, Conflict};

// -----------------------------------------------------------------------------
// ClassTables

#[derive(Default)]
struct ClassTables {
    by_key: HashMap<TypeId, &'static Class, KeyHashState>,
    by_name: HashMap<&'static str, &'static Class>,
    // Declaration order.
    ordered: Vec<&'static Class>,
}

impl ClassTables {
    fn conflict(&self, key: TypeKey, name: &str) -> Option<Conflict> {
        if self.by_key.contains_key(&key.id()) {
            Some(Conflict::Type)
        } else if self.by_name.contains_key(name) {
            Some(Conflict::Name)
        } else {
            None
        }
    }
}

// -----------------------------------------------------------------------------
// ClassRegistry

/// A registry of declared classes.
///
/// Each class is filed under the [`TypeKey`] of its type and under its
/// name; both must be unique. Classes are leaked on registration and live
/// until the process exits, so lookups hand out `&'static Class`.
///
/// Types can be bound to an [`Initializer`] that declares them on first
/// lookup, see [`register_initializer`](Self::register_initializer) and
/// [`auto_class!`](crate::auto_class).
///
/// Most programs use the [global registry](Self::global) through the free
/// functions of the [crate root](crate). Separate registries are useful for
/// isolation, e.g. in tests.
///
/// # Example
///
/// ```
/// use vc_class::{ClassError, ClassRegistry};
///
/// struct MyClass;
/// struct MyUndeclaredClass;
/// vc_class::meta_type!(MyClass, MyUndeclaredClass);
///
/// let registry = ClassRegistry::new();
/// registry.declare::<MyClass>("MyClass")?.finish()?;
///
/// assert_eq!(registry.class_count(), 1);
/// assert_eq!(registry.class_by_name("MyClass")?.name(), "MyClass");
/// assert_eq!(registry.class_by_type::<MyClass>()?.name(), "MyClass");
/// assert!(registry.class_by_type_safe::<MyUndeclaredClass>().is_none());
/// assert!(matches!(
///     registry.class_by_name("MyUndeclaredClass"),
///     Err(ClassError::ClassNotFound(_))
/// ));
/// # Ok::<(), ClassError>(())
/// ```
pub struct ClassRegistry {
    tables: RwLock<ClassTables>,
    init: InitGate,
}

impl Default for ClassRegistry {
    /// See [`ClassRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Creates an empty registry without initializers.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(ClassTables::default()),
            init: InitGate::default(),
        }
    }

    /// Binds every initializer submitted with [`auto_class!`](crate::auto_class).
    ///
    /// Bindings are only recorded here; each initializer runs on the first
    /// lookup that needs it. Repeated calls are cheap and do not rerun
    /// initializers that already ran.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if the `auto_register` feature is enabled, otherwise
    /// does nothing and returns `false`.
    ///
    /// ## Platform Support
    ///
    /// Static collection relies on the `inventory` crate, which supports
    /// Linux, macOS, Windows, iOS, Android and Web.
    pub fn auto_register(&self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            for (key, init) in crate::registry::initializer::auto_classes() {
                self.init.bind(key, init);
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Binds `init` to `T`, replacing a previous binding.
    ///
    /// The first key lookup of `T` that misses runs `init` and retries.
    /// A function bound to several types runs at most once.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_class::{ClassError, ClassRegistry};
    ///
    /// struct A;
    /// struct B;
    /// vc_class::meta_type!(A, B);
    ///
    /// fn declare(registry: &ClassRegistry) -> Result<(), ClassError> {
    ///     registry.declare::<A>("A")?.finish()?;
    ///     registry.declare::<B>("B")?.base::<A>().finish()?;
    ///     Ok(())
    /// }
    ///
    /// let registry = ClassRegistry::new();
    /// registry.register_initializer::<A>(declare);
    /// registry.register_initializer::<B>(declare);
    ///
    /// assert_eq!(registry.class_count(), 0);
    /// assert_eq!(registry.class_by_type::<B>()?.base(0)?.name(), "A");
    /// assert_eq!(registry.class_count(), 2);
    /// # Ok::<(), ClassError>(())
    /// ```
    #[inline]
    pub fn register_initializer<T: MetaType + ?Sized>(&self, init: Initializer) {
        self.init.bind(T::static_key(), init);
    }

    /// Returns `true` if an initializer is bound to `T`.
    #[inline]
    pub fn has_initializer<T: MetaType + ?Sized>(&self) -> bool {
        self.init.is_bound(T::static_key())
    }

    /// Runs every initializer that has not run yet.
    ///
    /// All pending initializers are attempted, the first error is returned.
    pub fn initialize_all(&self) -> Result<(), ClassError> {
        self.init.run_all(self)
    }

    // -------------------------------------------------------------------------
    // Declaration

    /// Starts the declaration of `T` under `name`.
    ///
    /// Fails with [`ClassError::DuplicateDeclaration`] if `T` or `name` is
    /// already registered; the registry is left unchanged. The class is
    /// registered by [`ClassBuilder::finish`].
    ///
    /// Declaring does not run the initializer bound to `T`.
    pub fn declare<T: MetaType + ?Sized>(
        &self,
        name: impl Into<String>,
    ) -> Result<ClassBuilder<'_, T>, ClassError> {
        let name = name.into();
        if let Some(conflict) = self.tables.read().conflict(T::static_key(), &name) {
            return Err(ClassError::DuplicateDeclaration { name, conflict });
        }
        Ok(ClassBuilder::new(self, name))
    }

    /// Starts the declaration of `T`, named after [`core::any::type_name`].
    #[inline]
    pub fn declare_type<T: MetaType + ?Sized>(&self) -> Result<ClassBuilder<'_, T>, ClassError> {
        self.declare::<T>(T::static_key().type_name())
    }

    pub(crate) fn insert(&self, class: Class) -> Result<&'static Class, ClassError> {
        let mut tables = self.tables.write();
        if let Some(conflict) = tables.conflict(class.key(), class.name()) {
            return Err(ClassError::DuplicateDeclaration {
                name: class.name().to_string(),
                conflict,
            });
        }

        let class: &'static Class = Box::leak(Box::new(class));
        tables.by_key.insert(class.type_id(), class);
        tables.by_name.insert(class.name(), class);
        tables.ordered.push(class);
        drop(tables);

        log::debug!(
            "declared class `{}` for `{}` ({} properties, {} functions, {} bases)",
            class.name(),
            class.key(),
            class.property_count(),
            class.function_count(),
            class.base_count(),
        );
        Ok(class)
    }

    // -------------------------------------------------------------------------
    // Queries

    /// Returns the number of registered classes.
    ///
    /// Pending initializers are not run.
    #[inline]
    pub fn class_count(&self) -> usize {
        self.tables.read().ordered.len()
    }

    /// Returns the class at `index`, in declaration order.
    pub fn class_by_index(&self, index: usize) -> Result<&'static Class, ClassError> {
        let tables = self.tables.read();
        tables
            .ordered
            .get(index)
            .copied()
            .ok_or(ClassError::OutOfRange {
                index,
                len: tables.ordered.len(),
            })
    }

    /// Returns all registered classes, in declaration order.
    pub fn classes(&self) -> Vec<&'static Class> {
        self.tables.read().ordered.clone()
    }

    /// Returns `true` if a class is registered for `key`.
    ///
    /// Pending initializers are not run.
    #[inline]
    pub fn contains(&self, key: TypeKey) -> bool {
        self.tables.read().by_key.contains_key(&key.id())
    }

    fn get_by_key(&self, key: TypeKey) -> Option<&'static Class> {
        self.tables.read().by_key.get(&key.id()).copied()
    }

    fn get_by_name(&self, name: &str) -> Option<&'static Class> {
        self.tables.read().by_name.get(name).copied()
    }

    /// Returns the class registered for `key`, running its initializer first
    /// if needed. Only initializer errors are reported as `Err`.
    pub fn try_class_by_key(&self, key: TypeKey) -> Result<Option<&'static Class>, ClassError> {
        if let Some(class) = self.get_by_key(key) {
            return Ok(Some(class));
        }
        self.init.run_for(self, key)?;
        Ok(self.get_by_key(key))
    }

    /// Returns the class registered for `key`.
    pub fn class_by_key(&self, key: TypeKey) -> Result<&'static Class, ClassError> {
        self.try_class_by_key(key)?
            .ok_or_else(|| ClassError::ClassNotFound(key.type_name().to_string()))
    }

    /// Returns the class registered for `T`.
    #[inline]
    pub fn class_by_type<T: MetaType + ?Sized>(&self) -> Result<&'static Class, ClassError> {
        self.class_by_key(T::static_key())
    }

    /// Returns the class registered for `T`, or `None`.
    ///
    /// Initializer errors are logged and reported as `None`; use
    /// [`try_class_by_type`](Self::try_class_by_type) to observe them.
    pub fn class_by_type_safe<T: MetaType + ?Sized>(&self) -> Option<&'static Class> {
        self.try_class_by_key(T::static_key()).ok().flatten()
    }

    /// Returns the class registered for `T`, or `None`.
    ///
    /// Only a failure of the initializer bound to `T` is reported as `Err`.
    #[inline]
    pub fn try_class_by_type<T: MetaType + ?Sized>(
        &self,
    ) -> Result<Option<&'static Class>, ClassError> {
        self.try_class_by_key(T::static_key())
    }

    /// Returns the class named `name`.
    ///
    /// On a miss every pending initializer runs before the name is looked up
    /// again. Initializer failures are logged and do not hide classes that
    /// other initializers declared.
    pub fn class_by_name(&self, name: &str) -> Result<&'static Class, ClassError> {
        if let Some(class) = self.get_by_name(name) {
            return Ok(class);
        }
        if let Err(e) = self.initialize_all() {
            log::debug!("looking up class `{name}` after failed initializers: {e}");
        }
        self.get_by_name(name)
            .ok_or_else(|| ClassError::ClassNotFound(name.to_string()))
    }

    /// Returns the class named `name`, or `None`.
    pub fn class_by_name_safe(&self, name: &str) -> Option<&'static Class> {
        self.class_by_name(name).ok()
    }

    /// Returns the most derived registered class of `object`.
    ///
    /// The static class is the one registered for `T`. If it is not
    /// [dynamic](Class::is_dynamic), or `object` reports no runtime key, it is
    /// returned without probing further. Otherwise the class registered for
    /// the runtime key is returned when it is dynamic and derives from the
    /// static class. A non-dynamic runtime class resolves to its nearest
    /// dynamic ancestor that derives from the static class. Anything else
    /// falls back to the static class.
    ///
    /// Fails with [`ClassError::ClassNotFound`] only if `T` has no class.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_class::{ClassError, ClassRegistry, ObjectKey};
    ///
    /// trait Base: ObjectKey {}
    /// vc_class::dynamic_type!(dyn Base);
    ///
    /// struct Derived;
    /// struct DerivedNoRtti;
    /// vc_class::dynamic_type!(Derived);
    /// vc_class::meta_type!(DerivedNoRtti);
    /// impl Base for Derived {}
    /// impl Base for DerivedNoRtti {}
    ///
    /// let registry = ClassRegistry::new();
    /// registry.declare::<dyn Base>("Base")?.finish()?;
    /// registry.declare::<Derived>("Derived")?.base::<dyn Base>().finish()?;
    /// registry.declare::<DerivedNoRtti>("DerivedNoRtti")?.base::<dyn Base>().finish()?;
    ///
    /// let derived: Box<dyn Base> = Box::new(Derived);
    /// let nortti: Box<dyn Base> = Box::new(DerivedNoRtti);
    ///
    /// assert_eq!(registry.class_by_object(&derived)?.name(), "Derived");
    /// assert_eq!(registry.class_by_object(&*derived)?.name(), "Derived");
    /// assert_eq!(registry.class_by_object(&*nortti)?.name(), "Base");
    /// # Ok::<(), ClassError>(())
    /// ```
    pub fn class_by_object<T: MetaType + ?Sized>(
        &self,
        object: &T,
    ) -> Result<&'static Class, ClassError> {
        let static_class = self.class_by_type::<T>()?;
        if !static_class.is_dynamic() {
            return Ok(static_class);
        }
        let Some(key) = object.dynamic_key() else {
            return Ok(static_class);
        };
        if key == static_class.key() {
            return Ok(static_class);
        }

        let resolved = match self.try_class_by_key(key) {
            Ok(Some(found)) => Class::nearest_dynamic(found, static_class),
            Ok(None) | Err(_) => None,
        };
        match resolved {
            Some(class) => Ok(class),
            None => {
                log::trace!(
                    "object of runtime type `{key}` resolved to its static class `{static_class}`",
                );
                Ok(static_class)
            }
        }
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.tables.read().ordered.iter().map(|c| c.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::ClassRegistry;
    use crate::type_key::{MetaType, ObjectKey, TypeKey};
    use crate::{ClassError, Conflict};

    // -------------------------------------------------------------------------
    // Fixtures

    struct MyClass {
        prop: i32,
    }

    impl MyClass {
        fn func(&self) -> i32 {
            self.prop
        }
    }

    struct MyClass2;
    struct MyUndeclaredClass;

    crate::meta_type!(MyClass, MyClass2, MyUndeclaredClass);

    trait Base: ObjectKey {}
    crate::dynamic_type!(dyn Base);

    struct Derived;
    struct DerivedNoRtti;
    struct Derived2NoRtti;
    struct Undeclared;

    crate::dynamic_type!(Derived, Undeclared);
    crate::meta_type!(DerivedNoRtti);

    // Reports its own runtime key without being dynamic itself.
    impl MetaType for Derived2NoRtti {
        fn dynamic_key(&self) -> Option<TypeKey> {
            Some(TypeKey::of::<Self>())
        }
    }

    impl Base for Derived {}
    impl Base for DerivedNoRtti {}
    impl Base for Derived2NoRtti {}
    impl Base for Undeclared {}

    fn hierarchy() -> ClassRegistry {
        let registry = ClassRegistry::new();
        registry.declare::<dyn Base>("Base").unwrap().finish().unwrap();
        registry
            .declare::<Derived>("Derived")
            .unwrap()
            .base::<dyn Base>()
            .finish()
            .unwrap();
        registry
            .declare::<DerivedNoRtti>("DerivedNoRtti")
            .unwrap()
            .base::<dyn Base>()
            .finish()
            .unwrap();
        registry
            .declare::<Derived2NoRtti>("Derived2NoRtti")
            .unwrap()
            .base::<Derived>()
            .finish()
            .unwrap();
        registry
    }

    // -------------------------------------------------------------------------
    // Declaration and lookup

    #[test]
    fn declare_and_lookup() {
        let registry = ClassRegistry::new();
        let class = registry
            .declare::<MyClass>("MyClass")
            .unwrap()
            .readonly_property("prop", |c: &MyClass| c.prop)
            .function("func", MyClass::func)
            .finish()
            .unwrap();
        registry.declare::<MyClass2>("MyClass2").unwrap().finish().unwrap();

        assert_eq!(registry.class_count(), 2);
        assert_eq!(registry.class_by_index(0).unwrap(), class);
        assert_eq!(registry.class_by_index(1).unwrap().name(), "MyClass2");
        assert!(matches!(
            registry.class_by_index(2),
            Err(ClassError::OutOfRange { index: 2, len: 2 })
        ));

        assert_eq!(registry.class_by_name("MyClass").unwrap(), class);
        assert_eq!(registry.class_by_type::<MyClass>().unwrap(), class);
        let class2 = registry.class_by_type::<MyClass2>().unwrap();
        assert_ne!(class2, class);
        assert_ne!(class, class2);
        assert!(registry.contains(TypeKey::of::<MyClass>()));

        let names: Vec<&str> = registry.classes().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["MyClass", "MyClass2"]);
    }

    #[test]
    fn not_found() {
        let registry = ClassRegistry::new();
        registry.declare::<MyClass>("MyClass").unwrap().finish().unwrap();

        assert!(matches!(
            registry.class_by_name("MyUndeclaredClass"),
            Err(ClassError::ClassNotFound(_))
        ));
        assert!(matches!(
            registry.class_by_type::<MyUndeclaredClass>(),
            Err(ClassError::ClassNotFound(_))
        ));
        assert!(registry.class_by_type_safe::<MyUndeclaredClass>().is_none());
        assert!(registry.class_by_name_safe("MyUndeclaredClass").is_none());
        assert!(registry.class_by_type_safe::<MyClass>().is_some());
    }

    #[test]
    fn duplicate_declarations() {
        let registry = ClassRegistry::new();
        registry.declare::<MyClass>("MyClass").unwrap().finish().unwrap();

        assert!(matches!(
            registry.declare::<MyClass>("Other"),
            Err(ClassError::DuplicateDeclaration {
                conflict: Conflict::Type,
                ..
            })
        ));
        assert!(matches!(
            registry.declare::<MyClass2>("MyClass"),
            Err(ClassError::DuplicateDeclaration {
                conflict: Conflict::Name,
                ..
            })
        ));
        assert_eq!(registry.class_count(), 1);
    }

    #[test]
    fn declare_type_uses_type_name() {
        let registry = ClassRegistry::new();
        let class = registry.declare_type::<MyClass2>().unwrap().finish().unwrap();

        assert_eq!(class.name(), core::any::type_name::<MyClass2>());
        assert_eq!(registry.class_by_name(class.name()).unwrap(), class);
    }

    #[test]
    fn registries_are_isolated() {
        let first = ClassRegistry::new();
        let second = ClassRegistry::new();
        let a = first.declare::<MyClass>("MyClass").unwrap().finish().unwrap();
        let b = second.declare::<MyClass>("MyClass").unwrap().finish().unwrap();

        assert_ne!(a, b);
        assert_eq!(first.class_count(), 1);
        assert_eq!(second.class_count(), 1);
    }

    // -------------------------------------------------------------------------
    // Dynamic resolution

    #[test]
    fn inheritance() {
        let registry = hierarchy();
        let base = registry.class_by_name("Base").unwrap();
        let derived = registry.class_by_type::<Derived>().unwrap();

        assert!(base.is_dynamic());
        assert_eq!(base.base_count(), 0);
        assert_eq!(derived.base_count(), 1);
        assert_eq!(derived.base(0).unwrap(), base);
        assert!(matches!(
            derived.base(1),
            Err(ClassError::OutOfRange { index: 1, len: 1 })
        ));
        assert!(registry
            .class_by_type::<Derived2NoRtti>()
            .unwrap()
            .derives_from(base));
    }

    #[test]
    fn resolve_dynamic_type() {
        let registry = hierarchy();
        let derived: Box<dyn Base> = Box::new(Derived);
        let nortti: Box<dyn Base> = Box::new(DerivedNoRtti);

        assert_eq!(registry.class_by_object(&*derived).unwrap().name(), "Derived");
        assert_eq!(registry.class_by_object(&derived).unwrap().name(), "Derived");
        assert_eq!(registry.class_by_object(&*nortti).unwrap().name(), "Base");

        // Static types are taken as is.
        assert_eq!(registry.class_by_object(&Derived).unwrap().name(), "Derived");
        assert_eq!(
            registry.class_by_object(&DerivedNoRtti).unwrap().name(),
            "DerivedNoRtti"
        );
    }

    #[test]
    fn resolve_nearest_dynamic_ancestor() {
        let registry = hierarchy();
        let object: &dyn Base = &Derived2NoRtti;

        assert_eq!(registry.class_by_object(object).unwrap().name(), "Derived");
    }

    #[test]
    fn resolve_falls_back_to_static_class() {
        let registry = hierarchy();
        let undeclared: &dyn Base = &Undeclared;
        assert_eq!(registry.class_by_object(undeclared).unwrap().name(), "Base");

        // Runtime class must derive from the static one.
        let other = ClassRegistry::new();
        other.declare::<dyn Base>("Base").unwrap().finish().unwrap();
        other.declare::<Derived>("Derived").unwrap().finish().unwrap();
        let derived: &dyn Base = &Derived;
        assert_eq!(other.class_by_object(derived).unwrap().name(), "Base");
    }

    #[test]
    fn resolve_undeclared_static_type() {
        let registry = ClassRegistry::new();
        let derived: &dyn Base = &Derived;

        assert!(matches!(
            registry.class_by_object(derived),
            Err(ClassError::ClassNotFound(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Lazy initialization

    static SHAPES_RUNS: AtomicUsize = AtomicUsize::new(0);

    fn declare_shapes(registry: &ClassRegistry) -> Result<(), ClassError> {
        SHAPES_RUNS.fetch_add(1, Ordering::SeqCst);
        registry.declare::<dyn Base>("Base")?.finish()?;
        registry.declare::<Derived>("Derived")?.base::<dyn Base>().finish()?;
        Ok(())
    }

    #[test]
    fn initializer_runs_once_across_threads() {
        let registry = ClassRegistry::new();
        registry.register_initializer::<dyn Base>(declare_shapes);
        registry.register_initializer::<Derived>(declare_shapes);
        assert!(registry.has_initializer::<Derived>());
        assert_eq!(registry.class_count(), 0);

        std::thread::scope(|scope| {
            for i in 0..8 {
                let registry = &registry;
                scope.spawn(move || {
                    let class = if i % 2 == 0 {
                        registry.class_by_type::<Derived>().unwrap()
                    } else {
                        registry.class_by_name("Derived").unwrap()
                    };
                    assert_eq!(class.base(0).unwrap().name(), "Base");
                });
            }
        });

        assert_eq!(SHAPES_RUNS.load(Ordering::SeqCst), 1);
        assert_eq!(registry.class_count(), 2);
        registry.initialize_all().unwrap();
        assert_eq!(SHAPES_RUNS.load(Ordering::SeqCst), 1);
    }

    fn declare_derived(registry: &ClassRegistry) -> Result<(), ClassError> {
        // `base` triggers the initializer of `MyClass`.
        registry.declare::<MyClass2>("MyClass2")?.base::<MyClass>().finish()?;
        Ok(())
    }

    fn declare_my_class(registry: &ClassRegistry) -> Result<(), ClassError> {
        registry.declare::<MyClass>("MyClass")?.finish()?;
        Ok(())
    }

    #[test]
    fn initializers_reenter() {
        let registry = ClassRegistry::new();
        registry.register_initializer::<MyClass2>(declare_derived);
        registry.register_initializer::<MyClass>(declare_my_class);

        let class = registry.class_by_type::<MyClass2>().unwrap();
        assert_eq!(class.base(0).unwrap().name(), "MyClass");
        assert_eq!(registry.class_count(), 2);
    }

    static FAILING_RUNS: AtomicUsize = AtomicUsize::new(0);

    fn declare_failing(registry: &ClassRegistry) -> Result<(), ClassError> {
        FAILING_RUNS.fetch_add(1, Ordering::SeqCst);
        registry
            .declare::<MyClass2>("MyClass2")?
            .base::<MyUndeclaredClass>()
            .finish()?;
        Ok(())
    }

    #[test]
    fn failed_initializer_is_not_retried() {
        let registry = ClassRegistry::new();
        registry.register_initializer::<MyClass2>(declare_failing);

        assert!(matches!(
            registry.class_by_type::<MyClass2>(),
            Err(ClassError::UnknownBase { .. })
        ));
        assert!(matches!(
            registry.class_by_type::<MyClass2>(),
            Err(ClassError::ClassNotFound(_))
        ));
        assert!(registry.class_by_type_safe::<MyClass2>().is_none());
        assert_eq!(FAILING_RUNS.load(Ordering::SeqCst), 1);
    }

    fn declare_broken(registry: &ClassRegistry) -> Result<(), ClassError> {
        registry
            .declare::<Undeclared>("Broken")?
            .base::<MyUndeclaredClass>()
            .finish()?;
        Ok(())
    }

    #[test]
    fn failed_initializer_does_not_hide_other_classes() {
        let registry = ClassRegistry::new();
        registry.register_initializer::<Undeclared>(declare_broken);
        registry.register_initializer::<MyClass>(declare_my_class);

        assert_eq!(registry.class_by_name("MyClass").unwrap().name(), "MyClass");
        assert!(matches!(
            registry.class_by_name("Broken"),
            Err(ClassError::ClassNotFound(_))
        ));
        assert_eq!(registry.class_count(), 1);
        assert!(registry.initialize_all().is_ok());
    }

    #[test]
    fn try_lookup_reports_initializer_errors() {
        let registry = ClassRegistry::new();
        registry.register_initializer::<Undeclared>(declare_broken);

        assert!(matches!(
            registry.try_class_by_type::<Undeclared>(),
            Err(ClassError::UnknownBase { .. })
        ));
        assert_eq!(registry.try_class_by_type::<Undeclared>(), Ok(None));
        assert!(registry.class_by_type_safe::<Undeclared>().is_none());
        assert_eq!(registry.try_class_by_type::<MyClass>(), Ok(None));
    }

    #[test]
    fn name_lookup_runs_pending_initializers() {
        let registry = ClassRegistry::new();
        registry.register_initializer::<MyClass>(declare_my_class);

        assert!(registry.class_by_name_safe("Missing").is_none());
        assert_eq!(registry.class_count(), 1);
        assert!(registry.class_by_name("MyClass").is_ok());
    }

    #[test]
    fn debug_lists_names() {
        let registry = ClassRegistry::new();
        registry.declare::<MyClass>("MyClass").unwrap().finish().unwrap();

        let mut out = String::new();
        core::fmt::write(&mut out, format_args!("{registry:?}")).unwrap();
        assert_eq!(out, "[\"MyClass\"]");
    }
}
