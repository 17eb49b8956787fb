//! Rendering options for the printer

use crate::contract::Contract;

type Transform = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Optional name transforms applied while printing
///
/// Each transform defaults to the identity.
#[derive(Default)]
pub struct PrintOptions {
    /// Applied to capitalized type names (`Uint256`, `HashBuiltin*`)
    pub transform_name: Option<Transform>,
    /// Applied to dotted import module paths
    pub transform_import: Option<Transform>,
    /// Applied to each rendered variable declaration
    pub transform_variable: Option<Transform>,
}

/// Print options resolved against one contract
pub struct Helpers<'a> {
    pub upgradeable: bool,
    options: &'a PrintOptions,
}

impl<'a> Helpers<'a> {
    pub fn new(contract: &Contract, options: &'a PrintOptions) -> Self {
        Self {
            upgradeable: contract.is_upgradeable(),
            options,
        }
    }

    pub fn transform_name(&self, name: &str) -> String {
        apply(&self.options.transform_name, name)
    }

    pub fn transform_import(&self, path: &str) -> String {
        apply(&self.options.transform_import, path)
    }

    pub fn transform_variable(&self, code: &str) -> String {
        apply(&self.options.transform_variable, code)
    }
}

fn apply(transform: &Option<Transform>, s: &str) -> String {
    match transform {
        Some(f) => f(s),
        None => s.to_string(),
    }
}
