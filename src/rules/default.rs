//! The catch-all rule every fake ends its rule list with.

use std::sync::Arc;

use tracing::trace;

use crate::{
    fake::ProxyFactory,
    model::{FakeCall, WritableCall},
    rules::types::FakeCallRule,
    Result,
};

/// Catch-all rule producing a default return value.
///
/// Applies to every call and never runs out. Fakable return types receive a fresh fake
/// on every call; everything else receives [`TypeSig::default_value`](crate::model::TypeSig::default_value).
/// If creating the fake fails the plain default is used, so the rule always completes.
pub struct DefaultReturnValueRule {
    factory: Arc<dyn ProxyFactory>,
}

impl DefaultReturnValueRule {
    /// Creates the rule.
    ///
    /// # Arguments
    ///
    /// * `factory` - Creates fakes for fakable return types
    #[must_use]
    pub fn new(factory: Arc<dyn ProxyFactory>) -> Self {
        Self { factory }
    }
}

impl FakeCallRule for DefaultReturnValueRule {
    fn is_applicable_to(&self, _call: &FakeCall) -> bool {
        true
    }

    fn apply(&self, call: &mut WritableCall<'_>) -> Result<()> {
        let value = match self.factory.create_fake(call.return_type()) {
            Ok(fake) => fake,
            Err(_) => call.return_type().default_value(),
        };
        trace!(method = %call.method(), "default return value");
        call.set_return_value(value);
        Ok(())
    }

    fn description(&self) -> String {
        "default return value".to_string()
    }
}

impl std::fmt::Debug for DefaultReturnValueRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultReturnValueRule").finish_non_exhaustive()
    }
}
