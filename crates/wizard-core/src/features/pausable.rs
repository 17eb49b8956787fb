//! Pausable mixin - emergency stop on state-mutating entry points

use crate::common::IMPLICIT_ARGS;
use crate::contract::{BaseFunction, Contract, FunctionArgument, FunctionKind, ParentContract};
use crate::features::access::{set_access_control, Access};

pub const PAUSABLE: ParentContract =
    ParentContract::new("Pausable", "contracts/security/Pausable_base")
        .self_initializing()
        .with_symbols(&["Pausable_when_not_paused"]);

pub const WHEN_NOT_PAUSED: &str = "Pausable_when_not_paused()";

pub mod functions {
    use super::*;

    pub const PAUSED: BaseFunction = BaseFunction {
        module: Some("Pausable"),
        name: "paused",
        implicit_args: IMPLICIT_ARGS,
        args: &[],
        returns: Some(&[FunctionArgument::typed("paused", "felt")]),
        return_value: None,
        kind: Some(FunctionKind::View),
    };

    pub const PAUSE: BaseFunction = BaseFunction {
        module: Some("Pausable"),
        name: "pause",
        implicit_args: IMPLICIT_ARGS,
        args: &[],
        returns: None,
        return_value: None,
        kind: Some(FunctionKind::External),
    };

    pub const UNPAUSE: BaseFunction = BaseFunction {
        module: Some("Pausable"),
        name: "unpause",
        implicit_args: IMPLICIT_ARGS,
        args: &[],
        returns: None,
        return_value: None,
        kind: Some(FunctionKind::External),
    };
}

/// Make the contract pausable.
///
/// Every function in `pausable_fns` gets the not-paused guard; callers must
/// pass every state-mutating entry point. `pause` and `unpause` are guarded
/// by the `PAUSER` role (or the owner).
pub fn add_pausable(c: &mut Contract, access: Access, pausable_fns: &[BaseFunction]) {
    tracing::debug!(targets = pausable_fns.len(), "add_pausable");
    c.add_parent(PAUSABLE, vec![]);

    for func in pausable_fns {
        c.add_modifier(WHEN_NOT_PAUSED, func);
    }

    c.add_function(&functions::PAUSED);
    set_access_control(c, &functions::PAUSE, access, "PAUSER");
    set_access_control(c, &functions::UNPAUSE, access, "PAUSER");
}
