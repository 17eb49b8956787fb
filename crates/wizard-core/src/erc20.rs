//! ERC20 assembler - fungible token contracts
//!
//! [`build_erc20`] is a fixed script over the feature functions. The order
//! matters: pausable guards only the entry points registered before it runs,
//! so every mixin that adds a state-mutating function comes first.
//!
//! 1. validate options (no contract exists yet)
//! 2. base token, constructor arguments and standard entry points
//! 3. burnable, snapshots, mintable
//! 4. permit, votes, flash minting
//! 5. pausable
//! 6. upgradeable, info

use serde::{Deserialize, Serialize};

use crate::common::{CommonOptions, IMPLICIT_ARGS};
use crate::contract::{BaseFunction, Contract, FunctionArgument, FunctionKind, ParentContract};
use crate::error::{OptionsError, OptionsErrorMessages};
use crate::features::access::{set_access_control, Access};
use crate::features::{add_pausable, set_info, set_upgradeable};
use crate::identifier::to_identifier;
use crate::options::PrintOptions;
use crate::print::print_contract;
use crate::value::Value;
use crate::Result;

/// Longest Cairo short-string literal
const MAX_SHORT_STRING: usize = 31;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Erc20Options {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub burnable: bool,
    pub snapshots: bool,
    pub pausable: bool,
    pub mintable: bool,
    pub permit: bool,
    pub votes: bool,
    pub flashmint: bool,
    #[serde(flatten)]
    pub common: CommonOptions,
}

impl Default for Erc20Options {
    fn default() -> Self {
        Self {
            name: "MyToken".to_string(),
            symbol: "MTK".to_string(),
            decimals: 18,
            burnable: false,
            snapshots: false,
            pausable: false,
            mintable: false,
            permit: false,
            votes: false,
            flashmint: false,
            common: CommonOptions::default(),
        }
    }
}

// ── Base modules ──────────────────────────────────────────

pub const ERC20: ParentContract = ParentContract::new("ERC20", "contracts/token/ERC20_base");

pub const ERC20_BURNABLE: ParentContract =
    ParentContract::new("ERC20Burnable", "contracts/token/ERC20/extensions/ERC20Burnable_base")
        .self_initializing();

pub const ERC20_SNAPSHOT: ParentContract =
    ParentContract::new("ERC20Snapshot", "contracts/token/ERC20/extensions/ERC20Snapshot_base")
        .self_initializing();

pub const ERC20_PERMIT: ParentContract =
    ParentContract::new("ERC20Permit", "contracts/token/ERC20/extensions/ERC20Permit_base");

pub const ERC20_VOTES: ParentContract =
    ParentContract::new("ERC20Votes", "contracts/token/ERC20/extensions/ERC20Votes_base")
        .self_initializing();

pub const ERC20_FLASH_MINT: ParentContract = ParentContract::new(
    "ERC20FlashMint",
    "contracts/token/ERC20/extensions/ERC20FlashMint_base",
)
.self_initializing();

// ── Public API ─────────────────────────────────────────────

/// Build the ERC20 contract IR for fully defaulted options
///
/// # Errors
/// `Options` for invalid option combinations, before any IR is built.
#[tracing::instrument(level = "debug", skip_all, fields(name = %opts.name))]
pub fn build_erc20(opts: &Erc20Options) -> Result<Contract> {
    validate(opts)?;

    let CommonOptions {
        access,
        upgradeable,
        ref info,
    } = opts.common;

    let mut c = Contract::new(&opts.name);
    c.add_constructor_argument(FunctionArgument::typed("initial_supply", "Uint256"));
    c.add_constructor_argument(FunctionArgument::typed("recipient", "felt"));

    add_base(&mut c, opts);

    if opts.burnable {
        add_burnable(&mut c);
    }

    if opts.snapshots {
        add_snapshot(&mut c, access);
    }

    if opts.mintable {
        add_mintable(&mut c, access);
    }

    if opts.permit {
        add_permit(&mut c, &opts.name);
    }

    if opts.votes {
        add_votes(&mut c)?;
    }

    if opts.flashmint {
        add_flash_mint(&mut c);
    }

    if opts.pausable {
        let mut guarded = vec![
            functions::TRANSFER,
            functions::TRANSFER_FROM,
            functions::APPROVE,
            functions::INCREASE_ALLOWANCE,
            functions::DECREASE_ALLOWANCE,
        ];
        if opts.burnable {
            guarded.push(functions::BURN);
        }
        if opts.mintable {
            guarded.push(functions::MINT);
        }
        if opts.permit {
            guarded.push(functions::PERMIT);
        }
        if opts.flashmint {
            guarded.push(functions::FLASH_LOAN);
        }
        add_pausable(&mut c, access, &guarded);
    }

    set_upgradeable(&mut c, upgradeable, access);

    set_info(&mut c, info)?;

    Ok(c)
}

/// Build and print in one step
pub fn print_erc20(opts: &Erc20Options) -> Result<String> {
    print_contract(&build_erc20(opts)?, &PrintOptions::default())
}

/// Check cross-option constraints; collects every failing field
pub fn validate(opts: &Erc20Options) -> std::result::Result<(), OptionsError> {
    let mut messages = OptionsErrorMessages::new();

    if to_identifier(&opts.name, true).is_empty() {
        messages.insert("name".into(), "Not a valid identifier".into());
    } else if let Some(msg) = short_string_error(&opts.name) {
        messages.insert("name".into(), msg);
    }

    if opts.symbol.is_empty() {
        messages.insert("symbol".into(), "Required".into());
    } else if let Some(msg) = short_string_error(&opts.symbol) {
        messages.insert("symbol".into(), msg);
    }

    if opts.votes && !opts.permit {
        messages.insert("votes".into(), "Requires permit".into());
    }

    if messages.is_empty() {
        Ok(())
    } else {
        tracing::debug!(fields = messages.len(), "rejected ERC20 options");
        Err(OptionsError::new(messages))
    }
}

// Printed inside `'...'`, so the text must be a valid Cairo short string
fn short_string_error(s: &str) -> Option<String> {
    if !s.is_ascii() || s.contains('\'') {
        Some("Must be ASCII without single quotes".to_string())
    } else if s.len() > MAX_SHORT_STRING {
        Some(format!("Must be at most {} characters", MAX_SHORT_STRING))
    } else {
        None
    }
}

// ── Mixins ────────────────────────────────────────────────

fn add_base(c: &mut Contract, opts: &Erc20Options) {
    c.add_parent(
        ERC20,
        vec![
            opts.name.as_str().into(),
            opts.symbol.as_str().into(),
            opts.decimals.into(),
            Value::lit("initial_supply"),
            Value::lit("recipient"),
        ],
    );

    for func in functions::BASE {
        c.add_function(func);
    }
}

fn add_burnable(c: &mut Contract) {
    c.add_parent(ERC20_BURNABLE, vec![]);
    c.add_function(&functions::BURN);
}

fn add_snapshot(c: &mut Contract, access: Access) {
    c.add_parent(ERC20_SNAPSHOT, vec![]);
    set_access_control(c, &functions::SNAPSHOT, access, "SNAPSHOT");
    c.add_function(&functions::BALANCE_OF_AT);
}

fn add_mintable(c: &mut Contract, access: Access) {
    set_access_control(c, &functions::MINT, access, "MINTER");
}

fn add_permit(c: &mut Contract, name: &str) {
    c.add_parent(ERC20_PERMIT, vec![name.into()]);
    c.add_function(&functions::PERMIT);
    c.add_function(&functions::NONCES);
}

fn add_votes(c: &mut Contract) -> std::result::Result<(), OptionsError> {
    if !c.has_parent(ERC20_PERMIT.name) {
        return Err(OptionsError::field(
            "votes",
            "Missing ERC20Permit requirement for ERC20Votes",
        ));
    }

    c.add_parent(ERC20_VOTES, vec![]);
    c.add_function(&functions::DELEGATE);
    c.add_function(&functions::DELEGATES);
    c.add_function(&functions::GET_VOTES);
    Ok(())
}

fn add_flash_mint(c: &mut Contract) {
    c.add_parent(ERC20_FLASH_MINT, vec![]);
    c.add_function(&functions::FLASH_LOAN);
    c.add_function(&functions::MAX_FLASH_LOAN);
}

// ── Function templates ─────────────────────────────────────

pub mod functions {
    use super::*;

    const fn view(
        module: &'static str,
        name: &'static str,
        args: &'static [FunctionArgument],
        returns: &'static [FunctionArgument],
    ) -> BaseFunction {
        BaseFunction {
            module: Some(module),
            name,
            implicit_args: IMPLICIT_ARGS,
            args,
            returns: Some(returns),
            return_value: None,
            kind: Some(FunctionKind::View),
        }
    }

    const SUCCESS: &[FunctionArgument] = &[FunctionArgument::typed("success", "felt")];

    const fn external(
        module: &'static str,
        name: &'static str,
        args: &'static [FunctionArgument],
    ) -> BaseFunction {
        BaseFunction {
            module: Some(module),
            name,
            implicit_args: IMPLICIT_ARGS,
            args,
            returns: None,
            return_value: None,
            kind: Some(FunctionKind::External),
        }
    }

    // Externals answering `(success: felt)` with a literal TRUE
    const fn succeeding(
        module: &'static str,
        name: &'static str,
        args: &'static [FunctionArgument],
    ) -> BaseFunction {
        BaseFunction {
            module: Some(module),
            name,
            implicit_args: IMPLICIT_ARGS,
            args,
            returns: Some(SUCCESS),
            return_value: Some("1"),
            kind: Some(FunctionKind::External),
        }
    }

    pub const NAME: BaseFunction =
        view("ERC20", "name", &[], &[FunctionArgument::typed("name", "felt")]);

    pub const SYMBOL: BaseFunction =
        view("ERC20", "symbol", &[], &[FunctionArgument::typed("symbol", "felt")]);

    pub const TOTAL_SUPPLY: BaseFunction = view(
        "ERC20",
        "totalSupply",
        &[],
        &[FunctionArgument::typed("totalSupply", "Uint256")],
    );

    pub const DECIMALS: BaseFunction =
        view("ERC20", "decimals", &[], &[FunctionArgument::typed("decimals", "felt")]);

    pub const BALANCE_OF: BaseFunction = view(
        "ERC20",
        "balanceOf",
        &[FunctionArgument::typed("account", "felt")],
        &[FunctionArgument::typed("balance", "Uint256")],
    );

    pub const ALLOWANCE: BaseFunction = view(
        "ERC20",
        "allowance",
        &[
            FunctionArgument::typed("owner", "felt"),
            FunctionArgument::typed("spender", "felt"),
        ],
        &[FunctionArgument::typed("remaining", "Uint256")],
    );

    pub const TRANSFER: BaseFunction = succeeding(
        "ERC20",
        "transfer",
        &[
            FunctionArgument::typed("recipient", "felt"),
            FunctionArgument::typed("amount", "Uint256"),
        ],
    );

    pub const TRANSFER_FROM: BaseFunction = succeeding(
        "ERC20",
        "transferFrom",
        &[
            FunctionArgument::typed("sender", "felt"),
            FunctionArgument::typed("recipient", "felt"),
            FunctionArgument::typed("amount", "Uint256"),
        ],
    );

    pub const APPROVE: BaseFunction = succeeding(
        "ERC20",
        "approve",
        &[
            FunctionArgument::typed("spender", "felt"),
            FunctionArgument::typed("amount", "Uint256"),
        ],
    );

    pub const INCREASE_ALLOWANCE: BaseFunction = succeeding(
        "ERC20",
        "increaseAllowance",
        &[
            FunctionArgument::typed("spender", "felt"),
            FunctionArgument::typed("added_value", "Uint256"),
        ],
    );

    pub const DECREASE_ALLOWANCE: BaseFunction = succeeding(
        "ERC20",
        "decreaseAllowance",
        &[
            FunctionArgument::typed("spender", "felt"),
            FunctionArgument::typed("subtracted_value", "Uint256"),
        ],
    );

    /// Entry points every ERC20 contract re-exports
    pub const BASE: &[BaseFunction] = &[
        NAME,
        SYMBOL,
        TOTAL_SUPPLY,
        DECIMALS,
        BALANCE_OF,
        ALLOWANCE,
        TRANSFER,
        TRANSFER_FROM,
        APPROVE,
        INCREASE_ALLOWANCE,
        DECREASE_ALLOWANCE,
    ];

    pub const MINT: BaseFunction = external(
        "ERC20",
        "mint",
        &[
            FunctionArgument::typed("to", "felt"),
            FunctionArgument::typed("amount", "Uint256"),
        ],
    );

    pub const BURN: BaseFunction = external(
        "ERC20Burnable",
        "burn",
        &[FunctionArgument::typed("amount", "Uint256")],
    );

    pub const SNAPSHOT: BaseFunction = external("ERC20Snapshot", "snapshot", &[]);

    pub const BALANCE_OF_AT: BaseFunction = view(
        "ERC20Snapshot",
        "balanceOfAt",
        &[
            FunctionArgument::typed("account", "felt"),
            FunctionArgument::typed("snapshot_id", "felt"),
        ],
        &[FunctionArgument::typed("balance", "Uint256")],
    );

    pub const PERMIT: BaseFunction = external(
        "ERC20Permit",
        "permit",
        &[
            FunctionArgument::typed("owner", "felt"),
            FunctionArgument::typed("spender", "felt"),
            FunctionArgument::typed("amount", "Uint256"),
            FunctionArgument::typed("deadline", "felt"),
            FunctionArgument::typed("signature_len", "felt"),
            FunctionArgument::typed("signature", "felt*"),
        ],
    );

    pub const NONCES: BaseFunction = view(
        "ERC20Permit",
        "nonces",
        &[FunctionArgument::typed("owner", "felt")],
        &[FunctionArgument::typed("nonce", "felt")],
    );

    pub const DELEGATE: BaseFunction = external(
        "ERC20Votes",
        "delegate",
        &[FunctionArgument::typed("delegatee", "felt")],
    );

    pub const DELEGATES: BaseFunction = view(
        "ERC20Votes",
        "delegates",
        &[FunctionArgument::typed("account", "felt")],
        &[FunctionArgument::typed("delegatee", "felt")],
    );

    pub const GET_VOTES: BaseFunction = view(
        "ERC20Votes",
        "getVotes",
        &[FunctionArgument::typed("account", "felt")],
        &[FunctionArgument::typed("votes", "Uint256")],
    );

    pub const FLASH_LOAN: BaseFunction = succeeding(
        "ERC20FlashMint",
        "flashLoan",
        &[
            FunctionArgument::typed("receiver", "felt"),
            FunctionArgument::typed("token", "felt"),
            FunctionArgument::typed("amount", "Uint256"),
            FunctionArgument::typed("data_len", "felt"),
            FunctionArgument::typed("data", "felt*"),
        ],
    );

    pub const MAX_FLASH_LOAN: BaseFunction = view(
        "ERC20FlashMint",
        "maxFlashLoan",
        &[FunctionArgument::typed("token", "felt")],
        &[FunctionArgument::typed("amount", "Uint256")],
    );
}

// ── Tests ─────────────────────────────────────────────────
