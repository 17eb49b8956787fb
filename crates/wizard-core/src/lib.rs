//! Wizard Core - Cairo contract source generator
//!
//! Turns a declarative description of a token contract into StarkNet Cairo
//! source that references the OpenZeppelin-style base libraries by path.
//!
//! # Architecture
//!
//! ```text
//! Options → Assembler (build_erc20) → Contract IR → Printer → Cairo text
//!                  ↓
//!        Feature functions (access control, pausable, upgradeable, info)
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: the same options always print byte-identical text
//! - **Idempotent mixins**: repeated feature calls never duplicate imports,
//!   role constants or constructor grants
//! - **Fail fast**: invalid option combinations are rejected before any IR
//!   exists; builder misuse and unrepresentable numbers are errors, not
//!   silently ignored

pub mod common;
pub mod contract;
pub mod erc20;
pub mod error;
pub mod features;
pub mod format;
pub mod generic;
pub mod identifier;
pub mod options;
pub mod print;
pub mod value;

pub use contract::{
    BaseFunction, Contract, ContractFunction, FunctionArgument, FunctionBody, FunctionKind,
    Parent, ParentContract,
};
pub use erc20::{build_erc20, print_erc20, Erc20Options};
pub use error::{Error, OptionsError, OptionsErrorMessages, Result};
pub use features::{Access, Info};
pub use generic::{build_generic, print_generic, sanitize_kind, GenericOptions, Kind};
pub use options::PrintOptions;
pub use print::{print_contract, source_hash};
pub use value::Value;

/// Version of the generator library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CommonOptions;

    fn coin(access: Access) -> Erc20Options {
        Erc20Options {
            name: "Coin".into(),
            symbol: "COIN".into(),
            mintable: true,
            common: CommonOptions {
                access,
                ..CommonOptions::default()
            },
            ..Erc20Options::default()
        }
    }

    #[test]
    fn test_roles_mintable_scenario() {
        let out = print_erc20(&coin(Access::Roles)).unwrap();

        let role_decls = out
            .lines()
            .filter(|l| l.starts_with("const MINTER_ROLE"))
            .count();
        assert_eq!(role_decls, 1);

        let grants: Vec<&str> = out
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with("AccessControl_grant_role("))
            .collect();
        assert_eq!(
            grants,
            vec![
                "AccessControl_grant_role(DEFAULT_ADMIN_ROLE, owner)",
                "AccessControl_grant_role(MINTER_ROLE, owner)",
            ]
        );

        let mint = out.find("func mint{").unwrap();
        let end = mint + out[mint..].find("\nend\n").unwrap();
        assert!(out[mint..end].contains("AccessControl_only_role(MINTER_ROLE)"));
    }

    #[test]
    fn test_determinism_100_iterations() {
        let opts = GenericOptions::Erc20(coin(Access::Roles));
        let first = print_generic(&opts).unwrap();
        let first_hash = source_hash(&first);
        for i in 0..100 {
            let result = print_generic(&opts).unwrap();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
            assert_eq!(first_hash, source_hash(&result));
        }
    }

    #[test]
    fn test_contract_json_dump() {
        let c = build_erc20(&coin(Access::Ownable)).unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["name"], "Coin");
        assert_eq!(json["parents"][0]["contract"]["name"], "ERC20");
        assert_eq!(json["parents"][1]["contract"]["name"], "Ownable");
        let mint = json["functions"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == "mint")
            .unwrap();
        assert_eq!(mint["modifiers"][0], "Ownable_only_owner()");
        assert_eq!(mint["body"]["state"], "empty");
    }
}
