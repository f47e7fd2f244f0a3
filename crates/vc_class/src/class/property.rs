use alloc::boxed::Box;
use alloc::string::ToString;
use core::any::Any;
use core::fmt;

use crate::type_key::TypeKey;
use crate::value::{FromValue, IntoValue, Value, ValueError, ValueKind};
use crate::ClassError;

// `None` when the object is not of the owning type.
type Getter = Box<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Any, &Value) -> Option<Result<(), ValueError>> + Send + Sync>;

// -----------------------------------------------------------------------------
// Property

/// A named accessor declared on a [`Class`](crate::Class).
///
/// The getter is always present; the setter is optional.
///
/// # Examples
///
/// ```
/// use vc_class::{ClassRegistry, Value};
///
/// struct Point { x: i32 }
/// vc_class::meta_type!(Point);
///
/// let registry = ClassRegistry::new();
/// let class = registry
///     .declare::<Point>("Point").unwrap()
///     .property("x", |p: &Point| p.x, |p: &mut Point, v: i32| p.x = v)
///     .finish().unwrap();
///
/// let mut point = Point { x: 1 };
/// let x = class.property("x").unwrap();
///
/// x.set(&mut point, 5).unwrap();
/// assert_eq!(x.get(&point).unwrap(), Value::Int(5));
/// ```
pub struct Property {
    name: Box<str>,
    kind: ValueKind,
    owner: TypeKey,
    getter: Getter,
    setter: Option<Setter>,
}

impl Property {
    pub(crate) fn new<T, V, G>(name: Box<str>, getter: G) -> Self
    where
        T: Any,
        V: IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            name,
            kind: V::KIND,
            owner: TypeKey::of::<T>(),
            getter: Box::new(move |object: &dyn Any| {
                object
                    .downcast_ref::<T>()
                    .map(|object| getter(object).into_value())
            }),
            setter: None,
        }
    }

    pub(crate) fn with_setter<T, V, S>(mut self, setter: S) -> Self
    where
        T: Any,
        V: FromValue,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.setter = Some(Box::new(move |object: &mut dyn Any, value: &Value| {
            let object = object.downcast_mut::<T>()?;
            Some(V::from_value(value).map(|value| setter(object, value)))
        }));
        self
    }

    /// Returns the property name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind produced by the getter.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns the key of the type that owns this property.
    #[inline]
    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    /// Returns `true` if the property has a setter.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Reads the property from `object`.
    ///
    /// `object` must be the owning type itself, not a reference or box to it.
    pub fn get(&self, object: &dyn Any) -> Result<Value, ClassError> {
        (self.getter)(object).ok_or(ClassError::ObjectMismatch {
            expected: self.owner.type_name(),
        })
    }

    /// Writes `value` into the property of `object`.
    pub fn set(&self, object: &mut dyn Any, value: impl Into<Value>) -> Result<(), ClassError> {
        let Some(setter) = &self.setter else {
            return Err(ClassError::ForbiddenWrite(self.name.to_string()));
        };
        match setter(object, &value.into()) {
            Some(result) => result.map_err(ClassError::from),
            None => Err(ClassError::ObjectMismatch {
                expected: self.owner.type_name(),
            }),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("writable", &self.is_writable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Property;
    use crate::value::{Value, ValueError, ValueKind};
    use crate::ClassError;

    struct Named {
        name: String,
        age: u8,
    }

    fn named() -> Named {
        Named {
            name: String::from("ferris"),
            age: 7,
        }
    }

    #[test]
    fn read_write() {
        let age = Property::new("age".into(), |n: &Named| n.age)
            .with_setter(|n: &mut Named, v: u8| n.age = v);
        let mut object = named();

        assert_eq!(age.kind(), ValueKind::Int);
        assert!(age.is_writable());
        assert_eq!(age.get(&object), Ok(Value::Int(7)));

        age.set(&mut object, 9_i64).unwrap();
        assert_eq!(object.age, 9);

        assert!(matches!(
            age.set(&mut object, 1000_i64),
            Err(ClassError::Value(ValueError::Overflow { .. }))
        ));
        assert_eq!(object.age, 9);
    }

    #[test]
    fn read_only() {
        let name = Property::new("name".into(), |n: &Named| n.name.clone());
        let mut object = named();

        assert!(!name.is_writable());
        assert_eq!(name.get(&object), Ok(Value::from("ferris")));
        assert_eq!(
            name.set(&mut object, "crab"),
            Err(ClassError::ForbiddenWrite(String::from("name")))
        );
    }

    #[test]
    fn wrong_object() {
        let age = Property::new("age".into(), |n: &Named| n.age)
            .with_setter(|n: &mut Named, v: u8| n.age = v);
        let mut other = 5_u32;

        assert!(matches!(
            age.get(&other),
            Err(ClassError::ObjectMismatch { .. })
        ));
        assert!(matches!(
            age.set(&mut other, 1_i64),
            Err(ClassError::ObjectMismatch { .. })
        ));
    }
}
