//! Type and member signatures for faked types.
//!
//! This module describes the shape of the members the proxy layer intercepts:
//!
//! - [`PrimitiveKind`]: Primitive value kinds
//! - [`TypeSig`]: Declared types of parameters, properties and return values
//! - [`MethodModifiers`]: Method attribute flags
//! - [`MethodSig`]: Stable identity of an intercepted member
//!
//! # Special Names
//!
//! Accessors are ordinary methods flagged with [`MethodModifiers::SPECIAL_NAME`] whose
//! name carries a well-known prefix:
//!
//! | Prefix | Member |
//! |--------|--------|
//! | `get_` | Property getter |
//! | `set_` | Property setter |
//! | `add_` | Event subscription |
//! | `remove_` | Event unsubscription |
//!
//! A method named `get_Value` without the special-name flag is a plain method.

use std::{fmt, sync::Arc};

use bitflags::bitflags;
use strum::{EnumCount, EnumIter};

use crate::model::value::FakeValue;

/// Prefix of property getter names.
pub const GETTER_PREFIX: &str = "get_";
/// Prefix of property setter names.
pub const SETTER_PREFIX: &str = "set_";
/// Prefix of event subscription method names.
pub const ADDER_PREFIX: &str = "add_";
/// Prefix of event unsubscription method names.
pub const REMOVER_PREFIX: &str = "remove_";

/// Primitive value kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumCount, strum::Display)]
pub enum PrimitiveKind {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 64-bit floating point
    F64,
}

/// Declared type of a parameter, property or return value.
///
/// Interfaces are identified by name; whether an interface can be faked is decided by
/// the [`ProxyFactory`](crate::fake::ProxyFactory), not by the signature itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSig {
    /// No value
    Void,
    /// A primitive value
    Primitive(PrimitiveKind),
    /// A string
    String,
    /// Any object reference
    Object,
    /// An event argument payload
    EventArgs,
    /// An event handler delegate
    EventHandler,
    /// An interface, by name
    Interface(Arc<str>),
}

impl TypeSig {
    /// Creates an interface type signature.
    ///
    /// # Arguments
    ///
    /// * `name` - The interface name, e.g. `"IFoo"`
    #[must_use]
    pub fn interface(name: &str) -> Self {
        TypeSig::Interface(Arc::from(name))
    }

    /// Shorthand for `TypeSig::Primitive(PrimitiveKind::Bool)`.
    pub const BOOL: TypeSig = TypeSig::Primitive(PrimitiveKind::Bool);
    /// Shorthand for `TypeSig::Primitive(PrimitiveKind::Char)`.
    pub const CHAR: TypeSig = TypeSig::Primitive(PrimitiveKind::Char);
    /// Shorthand for `TypeSig::Primitive(PrimitiveKind::I32)`.
    pub const I32: TypeSig = TypeSig::Primitive(PrimitiveKind::I32);
    /// Shorthand for `TypeSig::Primitive(PrimitiveKind::I64)`.
    pub const I64: TypeSig = TypeSig::Primitive(PrimitiveKind::I64);
    /// Shorthand for `TypeSig::Primitive(PrimitiveKind::F64)`.
    pub const F64: TypeSig = TypeSig::Primitive(PrimitiveKind::F64);

    /// Returns `true` for [`TypeSig::Void`].
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeSig::Void)
    }

    /// Returns the interface name if this is an interface type.
    #[must_use]
    pub fn interface_name(&self) -> Option<&str> {
        match self {
            TypeSig::Interface(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the value a member of this type produces when nothing was configured.
    ///
    /// Reference types default to [`FakeValue::Null`]; strings default to the empty
    /// string. Fakable types may instead receive a nested fake, which is decided by the
    /// rules, not here.
    #[must_use]
    pub fn default_value(&self) -> FakeValue {
        match self {
            TypeSig::Void => FakeValue::Void,
            TypeSig::Primitive(PrimitiveKind::Bool) => FakeValue::Bool(false),
            TypeSig::Primitive(PrimitiveKind::Char) => FakeValue::Char('\0'),
            TypeSig::Primitive(PrimitiveKind::I32) => FakeValue::I32(0),
            TypeSig::Primitive(PrimitiveKind::I64) => FakeValue::I64(0),
            TypeSig::Primitive(PrimitiveKind::F64) => FakeValue::F64(0.0),
            TypeSig::String => FakeValue::string(""),
            TypeSig::Object
            | TypeSig::EventArgs
            | TypeSig::EventHandler
            | TypeSig::Interface(_) => FakeValue::Null,
        }
    }

    /// Checks whether `value` can be passed where this type is declared.
    ///
    /// `Null` is accepted for every reference type; `Object` accepts anything but void.
    #[must_use]
    pub fn accepts(&self, value: &FakeValue) -> bool {
        match (self, value) {
            (TypeSig::Void, _) | (_, FakeValue::Void) => false,
            (TypeSig::Object, _) => true,
            (TypeSig::Primitive(kind), value) => value.primitive_kind() == Some(*kind),
            (TypeSig::String, FakeValue::String(_))
            | (TypeSig::EventArgs, FakeValue::EventArgs(_))
            | (TypeSig::EventHandler, FakeValue::Handler(_)) => true,
            (TypeSig::Interface(name), FakeValue::Fake(fake)) => {
                fake.fake_type().interface_name() == Some(&**name)
            }
            (TypeSig::String | TypeSig::EventArgs | TypeSig::EventHandler, FakeValue::Null)
            | (TypeSig::Interface(_), FakeValue::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Void => write!(f, "void"),
            TypeSig::Primitive(kind) => write!(f, "{kind}"),
            TypeSig::String => write!(f, "string"),
            TypeSig::Object => write!(f, "object"),
            TypeSig::EventArgs => write!(f, "EventArgs"),
            TypeSig::EventHandler => write!(f, "EventHandler"),
            TypeSig::Interface(name) => write!(f, "{name}"),
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special (accessor of a property or event)
        const SPECIAL_NAME = 0x0800;
    }
}

/// Identity of an intercepted member: name plus parameter and return type signature.
///
/// Two signatures are equal when declaring type, name, parameter types, return type and
/// modifiers all agree.
///
/// # Examples
///
/// ```rust
/// use dotfake::model::{MethodSig, TypeSig};
///
/// let getter = MethodSig::property_getter("IFoo", "Bar", TypeSig::interface("IBar"));
/// assert!(getter.is_property_getter());
/// assert_eq!(getter.property_name(), Some("Bar"));
///
/// let method = MethodSig::new("IFoo", "get_Bar", vec![], TypeSig::I32);
/// assert!(!method.is_property_getter());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSig {
    /// Name of the type declaring this member
    pub declaring_type: Arc<str>,
    /// Member name, including accessor prefix for special names
    pub name: Arc<str>,
    /// Parameter types in declaration order
    pub params: Vec<TypeSig>,
    /// Declared return type
    pub return_type: TypeSig,
    /// Method modifiers
    pub modifiers: MethodModifiers,
}

impl MethodSig {
    /// Creates a plain abstract virtual method signature.
    ///
    /// # Arguments
    ///
    /// * `declaring_type` - Name of the declaring type
    /// * `name` - Method name
    /// * `params` - Parameter types
    /// * `return_type` - Return type
    #[must_use]
    pub fn new(declaring_type: &str, name: &str, params: Vec<TypeSig>, return_type: TypeSig) -> Self {
        Self {
            declaring_type: Arc::from(declaring_type),
            name: Arc::from(name),
            params,
            return_type,
            modifiers: MethodModifiers::VIRTUAL | MethodModifiers::ABSTRACT,
        }
    }

    fn special(declaring_type: &str, name: String, params: Vec<TypeSig>, ret: TypeSig) -> Self {
        Self {
            declaring_type: Arc::from(declaring_type),
            name: Arc::from(name),
            params,
            return_type: ret,
            modifiers: MethodModifiers::VIRTUAL
                | MethodModifiers::ABSTRACT
                | MethodModifiers::SPECIAL_NAME,
        }
    }

    /// Creates the getter of a property.
    #[must_use]
    pub fn property_getter(declaring_type: &str, property: &str, property_type: TypeSig) -> Self {
        Self::special(
            declaring_type,
            format!("{GETTER_PREFIX}{property}"),
            Vec::new(),
            property_type,
        )
    }

    /// Creates the setter of a property.
    #[must_use]
    pub fn property_setter(declaring_type: &str, property: &str, property_type: TypeSig) -> Self {
        Self::special(
            declaring_type,
            format!("{SETTER_PREFIX}{property}"),
            vec![property_type],
            TypeSig::Void,
        )
    }

    /// Creates the subscription method of an event.
    #[must_use]
    pub fn event_adder(declaring_type: &str, event: &str) -> Self {
        Self::special(
            declaring_type,
            format!("{ADDER_PREFIX}{event}"),
            vec![TypeSig::EventHandler],
            TypeSig::Void,
        )
    }

    /// Creates the unsubscription method of an event.
    #[must_use]
    pub fn event_remover(declaring_type: &str, event: &str) -> Self {
        Self::special(
            declaring_type,
            format!("{REMOVER_PREFIX}{event}"),
            vec![TypeSig::EventHandler],
            TypeSig::Void,
        )
    }

    fn special_suffix(&self, prefix: &str) -> Option<&str> {
        if !self.modifiers.contains(MethodModifiers::SPECIAL_NAME) {
            return None;
        }
        self.name.strip_prefix(prefix).filter(|rest| !rest.is_empty())
    }

    /// Returns `true` if this member is a property getter.
    #[must_use]
    pub fn is_property_getter(&self) -> bool {
        self.params.is_empty()
            && !self.return_type.is_void()
            && self.special_suffix(GETTER_PREFIX).is_some()
    }

    /// Returns `true` if this member is a property setter.
    #[must_use]
    pub fn is_property_setter(&self) -> bool {
        self.params.len() == 1
            && self.return_type.is_void()
            && self.special_suffix(SETTER_PREFIX).is_some()
    }

    /// Returns `true` if this member subscribes a handler to an event.
    #[must_use]
    pub fn is_event_adder(&self) -> bool {
        self.params.len() == 1 && self.special_suffix(ADDER_PREFIX).is_some()
    }

    /// Returns `true` if this member unsubscribes a handler from an event.
    #[must_use]
    pub fn is_event_remover(&self) -> bool {
        self.params.len() == 1 && self.special_suffix(REMOVER_PREFIX).is_some()
    }

    /// Name of the property this accessor belongs to.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        if self.is_property_getter() {
            self.special_suffix(GETTER_PREFIX)
        } else if self.is_property_setter() {
            self.special_suffix(SETTER_PREFIX)
        } else {
            None
        }
    }

    /// Declared type of the property this accessor belongs to.
    #[must_use]
    pub fn property_type(&self) -> Option<&TypeSig> {
        if self.is_property_getter() {
            Some(&self.return_type)
        } else if self.is_property_setter() {
            self.params.first()
        } else {
            None
        }
    }

    /// Name of the event this accessor belongs to.
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        if self.is_event_adder() {
            self.special_suffix(ADDER_PREFIX)
        } else if self.is_event_remover() {
            self.special_suffix(REMOVER_PREFIX)
        } else {
            None
        }
    }

    /// Returns `true` if `other` is an accessor of the same property on the same type.
    #[must_use]
    pub fn is_same_property(&self, other: &MethodSig) -> bool {
        self.declaring_type == other.declaring_type
            && self.property_name().is_some()
            && self.property_name() == other.property_name()
            && self.property_type() == other.property_type()
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}::{}(", self.return_type, self.declaring_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")
    }
}
