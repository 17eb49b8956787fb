//! Kind-tagged entry point over every supported contract kind

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::erc20::{build_erc20, Erc20Options};
use crate::options::PrintOptions;
use crate::print::print_contract;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "ERC20")]
    Erc20,
}

pub const KINDS: &[Kind] = &[Kind::Erc20];

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Erc20 => write!(f, "ERC20"),
        }
    }
}

/// Map free text to a known kind, falling back to ERC20
pub fn sanitize_kind(kind: &str) -> Kind {
    KINDS
        .iter()
        .copied()
        .find(|k| k.to_string().eq_ignore_ascii_case(kind))
        .unwrap_or(Kind::Erc20)
}

/// Options for any kind, tagged by `"kind"` in JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GenericOptions {
    #[serde(rename = "ERC20")]
    Erc20(Erc20Options),
}

impl GenericOptions {
    pub fn kind(&self) -> Kind {
        match self {
            GenericOptions::Erc20(_) => Kind::Erc20,
        }
    }
}

pub fn build_generic(opts: &GenericOptions) -> Result<Contract> {
    match opts {
        GenericOptions::Erc20(opts) => build_erc20(opts),
    }
}

pub fn print_generic(opts: &GenericOptions) -> Result<String> {
    print_contract(&build_generic(opts)?, &PrintOptions::default())
}
