//! Upgradeability mixin - proxy-compatible initialization

use crate::common::IMPLICIT_ARGS;
use crate::contract::{
    BaseFunction, Contract, FunctionArgument, FunctionKind, ParentContract, INITIALIZABLE,
};
use crate::features::access::{set_access_control, Access};
use crate::value::Value;

/// Guard run once before any other initializer
pub const INITIALIZE_GUARD: &str = "Initializable_initialize()";

pub const INITIALIZABLE_PARENT: ParentContract =
    ParentContract::new(INITIALIZABLE, "contracts/upgrades/Initializable_base")
        .self_initializing()
        .with_symbols(&["Initializable_initialize"]);

pub const PROXY: ParentContract = ParentContract::new("Proxy", "contracts/upgrades/Proxy_base");

pub mod functions {
    use super::*;

    pub const UPGRADE: BaseFunction = BaseFunction {
        module: Some("Proxy"),
        name: "upgrade",
        implicit_args: IMPLICIT_ARGS,
        args: &[FunctionArgument::typed("new_implementation", "felt")],
        returns: None,
        return_value: None,
        kind: Some(FunctionKind::External),
    };
}

/// Mark the contract upgradeable; a no-op when `upgradeable` is false.
///
/// The upgrade entry point is guarded by the `UPGRADER` role (or the owner),
/// and the proxy admin is the same `owner` account access control adds.
pub fn set_upgradeable(c: &mut Contract, upgradeable: bool, access: Access) {
    if !upgradeable {
        return;
    }
    tracing::debug!(%access, "set_upgradeable");

    c.set_upgradeable(true);
    c.add_parent(INITIALIZABLE_PARENT, vec![]);
    set_access_control(c, &functions::UPGRADE, access, "UPGRADER");
    c.add_parent(PROXY, vec![Value::lit("owner")]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_noop() {
        let mut c = Contract::new("Coin");
        set_upgradeable(&mut c, false, Access::Roles);
        assert!(!c.is_upgradeable());
        assert!(c.parents().is_empty());
        assert_eq!(c.functions().count(), 0);
    }

    #[test]
    fn test_enabled_puts_initializable_first() {
        let mut c = Contract::new("Coin");
        c.add_parent(ParentContract::new("ERC20", "contracts/token/ERC20_base"), vec![]);
        set_upgradeable(&mut c, true, Access::Ownable);

        assert!(c.is_upgradeable());
        let names: Vec<&str> = c.parents().iter().map(|p| p.contract.name).collect();
        assert_eq!(names, vec![INITIALIZABLE, "ERC20", "Ownable", "Proxy"]);
        assert_eq!(c.imports()[0], "contracts/upgrades/Initializable_base");
    }

    #[test]
    fn test_upgrade_is_guarded() {
        let mut c = Contract::new("Coin");
        set_upgradeable(&mut c, true, Access::Roles);
        assert_eq!(
            c.function(&functions::UPGRADE).unwrap().modifiers(),
            &["AccessControl_only_role(UPGRADER_ROLE)".to_string()]
        );
    }
}
