use alloc::vec::Vec;
use core::any::TypeId;
use core::cell::RefCell;

use parking_lot::ReentrantMutex;

use crate::hash::{HashMap, HashSet, KeyHashState};
use crate::registry::ClassRegistry;
use crate::type_key::{MetaType, TypeKey};
use crate::ClassError;

/// A function that declares one or more classes on first use.
///
/// The same function may be bound to several types; it runs at most once
/// per registry.
///
/// # Identity
///
/// Bindings are grouped by function address, and Rust does not promise that
/// addresses are unique or stable:
///
/// - Two functions with identical bodies may share an address. They then run
///   once in total, which is harmless since they declare the same classes.
/// - One function may get several addresses across codegen units. Each
///   address then runs once; later runs fail with
///   [`ClassError::DuplicateDeclaration`], which is logged and does not
///   affect classes that are already registered.
///
/// Bind all types of a group from one crate, or through a single
/// [`auto_class!`](crate::auto_class), to keep one address per function.
pub type Initializer = fn(&ClassRegistry) -> Result<(), ClassError>;

// See the identity notes on `Initializer`.
#[inline(always)]
fn id_of(init: Initializer) -> usize {
    init as usize
}

// -----------------------------------------------------------------------------
// AutoClass

/// A statically submitted [`Initializer`] binding, see [`auto_class!`](crate::auto_class).
pub struct AutoClass {
    key: fn() -> TypeKey,
    init: Initializer,
}

impl AutoClass {
    /// Binds `init` to `T`.
    #[inline]
    pub const fn new<T: MetaType + ?Sized>(init: Initializer) -> Self {
        Self {
            key: T::static_key,
            init,
        }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(AutoClass);

/// Iterates over every [`AutoClass`] submitted in the final binary.
#[cfg(feature = "auto_register")]
pub(crate) fn auto_classes() -> impl Iterator<Item = (TypeKey, Initializer)> {
    inventory::iter::<AutoClass>
        .into_iter()
        .map(|auto| ((auto.key)(), auto.init))
}

// -----------------------------------------------------------------------------
// InitTable

#[derive(Clone, Copy)]
struct Hook {
    key: TypeKey,
    init: Initializer,
}

#[derive(Default)]
struct InitTable {
    hooks: HashMap<TypeId, Hook, KeyHashState>,
    // Initializers that are running or have run.
    started: HashSet<usize>,
}

impl InitTable {
    // Returns `false` if `init` already ran or is running on this thread.
    #[inline]
    fn begin(&mut self, init: Initializer) -> bool {
        self.started.insert(id_of(init))
    }

    #[inline]
    fn is_pending(&self, init: Initializer) -> bool {
        !self.started.contains(&id_of(init))
    }
}

// -----------------------------------------------------------------------------
// InitGate

/// Runs lazy initializers exactly once.
///
/// A single reentrant lock serializes initializers across threads, so a
/// thread that misses a class waits for a running initializer to finish
/// instead of observing its partial output. The lock is reentrant because
/// an initializer looks up bases, which may trigger other initializers.
#[derive(Default)]
pub(crate) struct InitGate {
    table: ReentrantMutex<RefCell<InitTable>>,
}

impl InitGate {
    /// Binds `init` to `key`, replacing a previous binding.
    pub(crate) fn bind(&self, key: TypeKey, init: Initializer) {
        let guard = self.table.lock();
        guard.borrow_mut().hooks.insert(key.id(), Hook { key, init });
    }

    pub(crate) fn is_bound(&self, key: TypeKey) -> bool {
        self.table.lock().borrow().hooks.contains_key(&key.id())
    }

    /// Runs the initializer bound to `key`, if it has not run yet.
    pub(crate) fn run_for(&self, registry: &ClassRegistry, key: TypeKey) -> Result<(), ClassError> {
        let guard = self.table.lock();
        let hook = {
            let mut table = guard.borrow_mut();
            match table.hooks.get(&key.id()).copied() {
                Some(hook) if table.begin(hook.init) => hook,
                _ => return Ok(()),
            }
        };
        // The `RefCell` is released while the initializer runs, it may reenter.
        run(registry, hook)
    }

    /// Runs every initializer that has not run yet.
    ///
    /// All initializers are attempted; the first error is returned.
    pub(crate) fn run_all(&self, registry: &ClassRegistry) -> Result<(), ClassError> {
        let guard = self.table.lock();
        let pending: Vec<Hook> = {
            let table = guard.borrow();
            table
                .hooks
                .values()
                .filter(|hook| table.is_pending(hook.init))
                .copied()
                .collect()
        };

        let mut first_error = None;
        for hook in pending {
            // Several hooks may share one initializer.
            if !guard.borrow_mut().begin(hook.init) {
                continue;
            }
            if let Err(e) = run(registry, hook) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn run(registry: &ClassRegistry, hook: Hook) -> Result<(), ClassError> {
    let before = registry.class_count();
    let result = (hook.init)(registry);
    match &result {
        Ok(()) => log::debug!(
            "initializer for `{}` declared {} classes",
            hook.key,
            registry.class_count().saturating_sub(before),
        ),
        Err(e) => log::warn!("initializer for `{}` failed: {e}", hook.key),
    }
    result
}
