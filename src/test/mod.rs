use crate::{
    fake::{FakeConfig, InterfaceCatalog, InterfaceDef},
    model::{FakeRef, TypeSig},
};

// Helper function to describe IFoo, the interface most tests fake
pub fn foo_definition() -> InterfaceDef {
    InterfaceDef::new("IFoo")
        .method("Bar", vec![TypeSig::I32], TypeSig::String)
        .method("Baz", vec![], TypeSig::I32)
        .method("CreateBar", vec![], TypeSig::interface("IBar"))
        .method("DoWork", vec![TypeSig::String], TypeSig::Void)
        .property("Nested", TypeSig::interface("IBar"))
        .property("Name", TypeSig::String)
        .read_only_property("Count", TypeSig::I32)
        .event("SomethingHappened")
}

// Helper function to describe IBar, reachable from IFoo through properties
pub fn bar_definition() -> InterfaceDef {
    InterfaceDef::new("IBar")
        .property("Value", TypeSig::I32)
        .property("Next", TypeSig::interface("IBar"))
        .method("Compute", vec![TypeSig::I32, TypeSig::I32], TypeSig::I32)
}

// Helper function to create a catalog holding IFoo and IBar
pub fn create_catalog() -> InterfaceCatalog {
    create_catalog_with(FakeConfig::default())
}

// Helper function to create a catalog holding IFoo and IBar with a custom config
pub fn create_catalog_with(config: FakeConfig) -> InterfaceCatalog {
    let catalog = InterfaceCatalog::with_config(config);
    catalog.register(foo_definition());
    catalog.register(bar_definition());
    catalog
}

// Helper function to create a fake IFoo with the default config
pub fn create_foo() -> FakeRef {
    create_catalog().fake("IFoo").unwrap()
}
