//! Options and argument lists shared by every contract kind

use serde::{Deserialize, Serialize};

use crate::contract::FunctionArgument;
use crate::features::access::Access;
use crate::features::info::Info;

/// Implicit arguments threaded through every StarkNet entry point
pub const IMPLICIT_ARGS: &[FunctionArgument] = &[
    FunctionArgument::typed("syscall_ptr", "felt*"),
    FunctionArgument::typed("pedersen_ptr", "HashBuiltin*"),
    FunctionArgument::untyped("range_check_ptr"),
];

/// Options every assembler accepts, already defaulted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonOptions {
    pub access: Access,
    pub upgradeable: bool,
    pub info: Info,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            access: Access::Ownable,
            upgradeable: false,
            info: Info::default(),
        }
    }
}
