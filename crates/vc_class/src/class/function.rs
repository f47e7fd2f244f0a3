use alloc::boxed::Box;
use alloc::string::ToString;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::type_key::TypeKey;
use crate::value::{FromValue, IntoValue, Value, ValueError, ValueKind};
use crate::ClassError;

// -----------------------------------------------------------------------------
// Method

/// Receiver marker: the bound callable takes `&T`.
pub struct ByRef<Args>(PhantomData<Args>);

/// Receiver marker: the bound callable takes `&mut T`.
pub struct ByMut<Args>(PhantomData<Args>);

/// A callable that can be bound as a [`Function`] of `T`.
///
/// Implemented for `Fn(&T, A0, .., An) -> R` and `Fn(&mut T, A0, .., An) -> R`
/// with up to six arguments, where every argument is [`FromValue`] and the
/// result is [`IntoValue`]. `Marker` only disambiguates the impls and is
/// always inferred.
pub trait Method<T, Marker>: Send + Sync + 'static {
    /// Kinds of the arguments, in order.
    const ARGS: &'static [ValueKind];

    /// The result type.
    type Output: IntoValue;

    /// Converts `args` and invokes the callable.
    ///
    /// `args.len()` must equal `ARGS.len()`. A failed conversion reports
    /// the index of the argument.
    fn invoke(&self, object: &mut T, args: &[Value]) -> Result<Self::Output, (usize, ValueError)>;
}

macro_rules! impl_method {
    ($($arg:ident $index:tt),*) => {
        impl<T, F, R, $($arg,)*> Method<T, ByRef<($($arg,)*)>> for F
        where
            T: 'static,
            F: Fn(&T, $($arg),*) -> R + Send + Sync + 'static,
            R: IntoValue,
            $($arg: FromValue,)*
        {
            const ARGS: &'static [ValueKind] = &[$(<$arg as FromValue>::KIND),*];

            type Output = R;

            #[allow(unused_variables, reason = "zero arguments")]
            #[inline]
            fn invoke(&self, object: &mut T, args: &[Value]) -> Result<R, (usize, ValueError)> {
                Ok(self(
                    object,
                    $($arg::from_value(&args[$index]).map_err(|e| ($index, e))?),*
                ))
            }
        }

        impl<T, F, R, $($arg,)*> Method<T, ByMut<($($arg,)*)>> for F
        where
            T: 'static,
            F: Fn(&mut T, $($arg),*) -> R + Send + Sync + 'static,
            R: IntoValue,
            $($arg: FromValue,)*
        {
            const ARGS: &'static [ValueKind] = &[$(<$arg as FromValue>::KIND),*];

            type Output = R;

            #[allow(unused_variables, reason = "zero arguments")]
            #[inline]
            fn invoke(&self, object: &mut T, args: &[Value]) -> Result<R, (usize, ValueError)> {
                Ok(self(
                    object,
                    $($arg::from_value(&args[$index]).map_err(|e| ($index, e))?),*
                ))
            }
        }
    };
}

impl_method!();
impl_method!(A0 0);
impl_method!(A0 0, A1 1);
impl_method!(A0 0, A1 1, A2 2);
impl_method!(A0 0, A1 1, A2 2, A3 3);
impl_method!(A0 0, A1 1, A2 2, A3 3, A4 4);
impl_method!(A0 0, A1 1, A2 2, A3 3, A4 4, A5 5);

// -----------------------------------------------------------------------------
// Function

enum CallError {
    Object,
    Argument(usize, ValueError),
}

type Invoker = Box<dyn Fn(&mut dyn Any, &[Value]) -> Result<Value, CallError> + Send + Sync>;

/// A named callable declared on a [`Class`](crate::Class).
///
/// # Examples
///
/// ```
/// use vc_class::{ClassRegistry, Value};
///
/// struct Counter { n: i64 }
/// vc_class::meta_type!(Counter);
///
/// impl Counter {
///     fn get(&self) -> i64 { self.n }
///     fn add(&mut self, by: i64) { self.n += by; }
/// }
///
/// let registry = ClassRegistry::new();
/// let class = registry
///     .declare::<Counter>("Counter").unwrap()
///     .function("get", Counter::get)
///     .function("add", Counter::add)
///     .finish().unwrap();
///
/// let mut counter = Counter { n: 1 };
/// class.function("add").unwrap().call(&mut counter, &[Value::Int(2)]).unwrap();
/// let n = class.function("get").unwrap().call(&mut counter, &[]).unwrap();
/// assert_eq!(n, Value::Int(3));
/// ```
pub struct Function {
    name: Box<str>,
    owner: TypeKey,
    args: &'static [ValueKind],
    returns: ValueKind,
    invoker: Invoker,
}

impl Function {
    pub(crate) fn new<T, M, Marker>(name: Box<str>, method: M) -> Self
    where
        T: Any,
        M: Method<T, Marker>,
    {
        Self {
            name,
            owner: TypeKey::of::<T>(),
            args: M::ARGS,
            returns: <M::Output as IntoValue>::KIND,
            invoker: Box::new(move |object: &mut dyn Any, args: &[Value]| {
                let object = object.downcast_mut::<T>().ok_or(CallError::Object)?;
                match method.invoke(object, args) {
                    Ok(output) => Ok(output.into_value()),
                    Err((index, error)) => Err(CallError::Argument(index, error)),
                }
            }),
        }
    }

    /// Returns the function name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key of the type that owns this function.
    #[inline]
    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    /// Returns the number of arguments, not counting the receiver.
    #[inline]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Returns the kinds of the arguments.
    #[inline]
    pub fn arg_kinds(&self) -> &'static [ValueKind] {
        self.args
    }

    /// Returns the kind of the result.
    #[inline]
    pub fn return_kind(&self) -> ValueKind {
        self.returns
    }

    /// Calls the function on `object`.
    ///
    /// `object` must be the owning type itself, not a reference or box to it.
    pub fn call(&self, object: &mut dyn Any, args: &[Value]) -> Result<Value, ClassError> {
        if args.len() != self.args.len() {
            return Err(ClassError::ArgumentCount {
                function: self.name.to_string(),
                expected: self.args.len(),
                given: args.len(),
            });
        }
        (self.invoker)(object, args).map_err(|error| match error {
            CallError::Object => ClassError::ObjectMismatch {
                expected: self.owner.type_name(),
            },
            CallError::Argument(index, source) => ClassError::BadArgument {
                function: self.name.to_string(),
                index,
                source,
            },
        })
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("returns", &self.returns)
            .finish()
    }
}
