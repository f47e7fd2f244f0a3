#[cfg(feature = "auto_register")]
pub use inventory;

/// Binds an [`Initializer`](crate::registry::Initializer) to one or more
/// types in every registry that calls
/// [`auto_register`](crate::ClassRegistry::auto_register), the global one
/// included.
///
/// Expands to nothing without the `auto_register` feature.
///
/// ```
/// use vc_class::{ClassError, ClassRegistry};
///
/// struct Button;
/// struct Label;
/// vc_class::meta_type!(Button, Label);
///
/// fn declare_widgets(registry: &ClassRegistry) -> Result<(), ClassError> {
///     registry.declare::<Button>("Button")?.finish()?;
///     registry.declare::<Label>("Label")?.finish()?;
///     Ok(())
/// }
///
/// vc_class::auto_class!(declare_widgets => Button, Label);
///
/// let registry = ClassRegistry::new();
/// if registry.auto_register() {
///     assert_eq!(registry.class_by_name("Label")?.name(), "Label");
///     assert_eq!(registry.class_count(), 2);
/// }
/// # Ok::<(), ClassError>(())
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_class {
    ($init:path => $($ty:ty),+ $(,)?) => {
        $(
            // The collector registers itself from a link-time constructor.
            #[allow(unsafe_code)]
            const _: () = {
                $crate::__macro_exports::inventory::submit! {
                    $crate::registry::AutoClass::new::<$ty>($init)
                }
            };
        )+
    };
}

/// Binds an [`Initializer`](crate::registry::Initializer) to one or more
/// types in every registry that calls
/// [`auto_register`](crate::ClassRegistry::auto_register).
///
/// Expands to nothing without the `auto_register` feature.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_class {
    ($init:path => $($ty:ty),+ $(,)?) => {};
}
