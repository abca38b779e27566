//! Fake objects and the proxy capability behind them.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | [`FakeConfig`] and its presets |
//! | `proxy` | The [`ProxyFactory`] capability, [`InterfaceDef`] and [`InterfaceCatalog`] |
//! | `object` | [`FakeObject`], the aggregate owning a fake's rules and recorded calls |
//!
//! # Creating Fakes
//!
//! ```rust
//! use dotfake::{
//!     fake::{InterfaceCatalog, InterfaceDef},
//!     model::TypeSig,
//! };
//!
//! let catalog = InterfaceCatalog::new();
//! catalog.register(InterfaceDef::new("IBar").property("Value", TypeSig::I32));
//! catalog.register(InterfaceDef::new("IFoo").property("Nested", TypeSig::interface("IBar")));
//!
//! let foo = catalog.fake("IFoo").unwrap();
//! let nested = foo.get("Nested").unwrap();
//! assert_eq!(foo.get("Nested").unwrap(), nested);
//! ```

mod config;
mod object;
mod proxy;

pub use config::FakeConfig;
pub use object::FakeObject;
pub use proxy::{InterfaceCatalog, InterfaceDef, ProxyFactory};
