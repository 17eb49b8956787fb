//! Access control mixin - ownable or role-based guards on entry points

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::contract::{BaseFunction, Contract, FunctionArgument, ParentContract};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    #[default]
    Ownable,
    Roles,
}

pub const ACCESS_OPTIONS: &[Access] = &[Access::Ownable, Access::Roles];

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Access::Ownable => write!(f, "ownable"),
            Access::Roles => write!(f, "roles"),
        }
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ACCESS_OPTIONS
            .iter()
            .copied()
            .find(|a| a.to_string() == s)
            .ok_or_else(|| format!("unknown access mode '{}' (expected ownable or roles)", s))
    }
}

pub const OWNABLE: ParentContract = ParentContract::new("Ownable", "contracts/Ownable_base")
    .with_symbols(&["Ownable_only_owner"]);

pub const ACCESS_CONTROL: ParentContract =
    ParentContract::new("AccessControl", "contracts/AccessControl_base").with_symbols(&[
        "AccessControl_only_role",
        "AccessControl_grant_role",
        "DEFAULT_ADMIN_ROLE",
    ]);

/// Account receiving ownership or the initial role grants
const OWNER_ARG: FunctionArgument = FunctionArgument::typed("owner", "felt");

/// Guard `func` so only the owner, or holders of `<role>_ROLE`, may call it.
///
/// Safe to call once per guarded entry point: the access parent, the
/// `owner` constructor argument, the admin grant, the role constant and its
/// grant are each added exactly once per contract.
pub fn set_access_control(c: &mut Contract, func: &BaseFunction, access: Access, role: &str) {
    tracing::debug!(function = func.name, %access, role, "set_access_control");
    match access {
        Access::Ownable => {
            if c.add_parent(OWNABLE, vec![Value::lit("owner")]) {
                c.add_constructor_argument(OWNER_ARG);
            }
            c.add_modifier("Ownable_only_owner()", func);
        }
        Access::Roles => {
            let role_id = format!("{}_ROLE", role);
            if c.add_parent(ACCESS_CONTROL, vec![]) {
                c.add_constructor_argument(OWNER_ARG);
                c.add_constructor_code("AccessControl_grant_role(DEFAULT_ADMIN_ROLE, owner)");
            }
            if c.add_variable(format!("const {} = '{}'", role_id, role_id)) {
                c.add_constructor_code(format!("AccessControl_grant_role({}, owner)", role_id));
            }
            c.add_modifier(format!("AccessControl_only_role({})", role_id), func);
        }
    }
}
