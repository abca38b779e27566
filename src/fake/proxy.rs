//! The proxy-generation capability and the interface catalog implementing it.
//!
//! The dispatch engine never builds proxies itself. Anything that needs a new fake
//! (auto-fake properties, default return values) asks the [`ProxyFactory`] it was
//! handed at construction. [`InterfaceCatalog`] is the factory shipped with the crate:
//! it fakes interfaces described by [`InterfaceDef`]s.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::{
    fake::{config::FakeConfig, object::FakeObject},
    model::{
        FakeRef, FakeValue, MethodSig, TypeSig, ADDER_PREFIX, GETTER_PREFIX, REMOVER_PREFIX,
        SETTER_PREFIX,
    },
    Error, Result,
};

/// Capability that synthesizes fakes.
///
/// # Implementing a Factory
///
/// Only [`create_fake`](ProxyFactory::create_fake) is required.
/// [`is_fakable`](ProxyFactory::is_fakable) probes by attempting a creation and
/// discarding the result; override it if a cheaper exact check exists. Either way it
/// must have no observable effect besides the probe.
pub trait ProxyFactory: Send + Sync {
    /// Creates a fresh fake of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFakable`] if this factory cannot fake `ty`.
    fn create_fake(&self, ty: &TypeSig) -> Result<FakeValue>;

    /// Returns `true` if [`create_fake`](ProxyFactory::create_fake) succeeds for `ty`.
    fn is_fakable(&self, ty: &TypeSig) -> bool {
        self.create_fake(ty).is_ok()
    }
}

/// Member table of a fakable interface.
///
/// Members are looked up by their method name, so overloads are not supported.
/// Properties and events expand into their accessor methods.
///
/// # Examples
///
/// ```rust
/// use dotfake::{fake::InterfaceDef, model::TypeSig};
///
/// let def = InterfaceDef::new("IFoo")
///     .method("Bar", vec![TypeSig::I32], TypeSig::String)
///     .property("Name", TypeSig::String)
///     .read_only_property("Count", TypeSig::I32)
///     .event("SomethingHappened");
///
/// assert!(def.member("Bar").is_some());
/// assert!(def.getter("Name").is_some() && def.setter("Name").is_some());
/// assert!(def.setter("Count").is_none());
/// assert!(def.adder("SomethingHappened").is_some());
/// ```
#[derive(Clone, Debug)]
pub struct InterfaceDef {
    name: Arc<str>,
    members: Vec<Arc<MethodSig>>,
}

impl InterfaceDef {
    /// Creates an interface without members.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            members: Vec::new(),
        }
    }

    /// Name of the interface.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a method, replacing any member of the same name.
    ///
    /// # Arguments
    ///
    /// * `name` - Method name
    /// * `params` - Parameter types in positional order
    /// * `return_type` - Declared return type
    #[must_use]
    pub fn method(self, name: &str, params: Vec<TypeSig>, return_type: TypeSig) -> Self {
        let sig = MethodSig::new(&self.name, name, params, return_type);
        self.with_member(sig)
    }

    /// Adds a read-write property.
    #[must_use]
    pub fn property(self, name: &str, property_type: TypeSig) -> Self {
        let setter = MethodSig::property_setter(&self.name, name, property_type.clone());
        self.read_only_property(name, property_type).with_member(setter)
    }

    /// Adds a property with a getter only.
    #[must_use]
    pub fn read_only_property(self, name: &str, property_type: TypeSig) -> Self {
        let getter = MethodSig::property_getter(&self.name, name, property_type);
        self.with_member(getter)
    }

    /// Adds an event with its adder and remover.
    #[must_use]
    pub fn event(self, name: &str) -> Self {
        let adder = MethodSig::event_adder(&self.name, name);
        let remover = MethodSig::event_remover(&self.name, name);
        self.with_member(adder).with_member(remover)
    }

    fn with_member(mut self, sig: MethodSig) -> Self {
        self.members.retain(|m| m.name != sig.name);
        self.members.push(Arc::new(sig));
        self
    }

    /// Member whose method name is `method_name`.
    #[must_use]
    pub fn member(&self, method_name: &str) -> Option<&Arc<MethodSig>> {
        self.members.iter().find(|m| &*m.name == method_name)
    }

    /// Getter of property `property`.
    #[must_use]
    pub fn getter(&self, property: &str) -> Option<&Arc<MethodSig>> {
        self.member(&format!("{GETTER_PREFIX}{property}"))
    }

    /// Setter of property `property`.
    #[must_use]
    pub fn setter(&self, property: &str) -> Option<&Arc<MethodSig>> {
        self.member(&format!("{SETTER_PREFIX}{property}"))
    }

    /// Adder of event `event`.
    #[must_use]
    pub fn adder(&self, event: &str) -> Option<&Arc<MethodSig>> {
        self.member(&format!("{ADDER_PREFIX}{event}"))
    }

    /// Remover of event `event`.
    #[must_use]
    pub fn remover(&self, event: &str) -> Option<&Arc<MethodSig>> {
        self.member(&format!("{REMOVER_PREFIX}{event}"))
    }

    /// Iterates all members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &Arc<MethodSig>> {
        self.members.iter()
    }
}

/// Registry of fakable interfaces, and the [`ProxyFactory`] over them.
///
/// The catalog is a cheap handle: clones share the registered interfaces, so an
/// interface registered after a fake was created is fakable from that fake's nested
/// properties too.
///
/// # Examples
///
/// ```rust
/// use dotfake::{
///     fake::{InterfaceCatalog, InterfaceDef},
///     model::{FakeValue, TypeSig},
/// };
///
/// let catalog = InterfaceCatalog::new();
/// catalog.register(InterfaceDef::new("IFoo").method("Baz", vec![], TypeSig::I32));
///
/// let foo = catalog.fake("IFoo").unwrap();
/// assert_eq!(foo.call("Baz", vec![]).unwrap(), FakeValue::I32(0));
/// assert_eq!(foo.history().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InterfaceCatalog {
    interfaces: Arc<DashMap<Arc<str>, Arc<InterfaceDef>>>,
    config: FakeConfig,
}

impl InterfaceCatalog {
    /// Creates an empty catalog using [`FakeConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty catalog whose fakes use `config`.
    #[must_use]
    pub fn with_config(config: FakeConfig) -> Self {
        Self {
            interfaces: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Configuration of the fakes this catalog creates.
    #[must_use]
    pub fn config(&self) -> &FakeConfig {
        &self.config
    }

    /// Registers an interface, replacing an earlier one of the same name.
    pub fn register(&self, definition: InterfaceDef) -> Arc<InterfaceDef> {
        let definition = Arc::new(definition);
        self.interfaces
            .insert(Arc::clone(&definition.name), Arc::clone(&definition));
        definition
    }

    /// Definition registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<InterfaceDef>> {
        self.interfaces.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    /// Number of registered interfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Creates a fake of the registered interface `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFakable`] if `name` is not registered.
    pub fn fake(&self, name: &str) -> Result<FakeRef> {
        let definition = self
            .get(name)
            .ok_or_else(|| Error::NotFakable(name.to_string()))?;
        let factory: Arc<dyn ProxyFactory> = Arc::new(self.clone());
        let fake = FakeObject::new(definition, factory, self.config.clone());
        debug!(fake = fake.id(), interface = name, "created fake");
        Ok(fake)
    }
}

impl ProxyFactory for InterfaceCatalog {
    fn create_fake(&self, ty: &TypeSig) -> Result<FakeValue> {
        match ty.interface_name() {
            Some(name) => self.fake(name).map(FakeValue::Fake),
            None => Err(Error::NotFakable(ty.to_string())),
        }
    }
}

impl std::fmt::Debug for InterfaceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceCatalog")
            .field("interfaces", &self.interfaces.len())
            .field("config", &self.config)
            .finish()
    }
}
