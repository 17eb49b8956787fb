//! Printer - renders a finished contract to Cairo source text
//!
//! The printer is a pure function of the contract and the print options:
//! printing the same contract twice yields byte-identical text.
//!
//! # Layout
//!
//! ```text
//! license header / %lang / builtin imports
//! base-module imports, one grouped block per path
//! natspec comments
//! variables
//! constructor (or stub + initializer when upgradeable)
//! functions with code
//! functions with modifiers only
//! # Externals  (pure pass-through functions)
//! ```

use indexmap::{IndexMap, IndexSet};
use sha2::{Digest, Sha256};

use crate::contract::{Contract, ContractFunction, FunctionArgument, Parent, INITIALIZABLE};
use crate::features::upgradeable::INITIALIZE_GUARD;
use crate::format::{format_lines, lines, space_between, Lines};
use crate::options::{Helpers, PrintOptions};
use crate::value::print_value;
use crate::Result;

const BUILTIN_IMPORTS: &[&str] = &[
    "from starkware.cairo.common.cairo_builtins import HashBuiltin",
    "from starkware.cairo.common.uint256 import Uint256",
];

const UNSAFE_CONSTRUCTOR_ANNOTATION: &str = "# @custom:oz-upgrades-unsafe-allow constructor";

// ── Public API ─────────────────────────────────────────────

/// Render a contract as Cairo source
///
/// # Errors
/// `UnrepresentableNumber` if an initializer argument is not a safe integer.
#[tracing::instrument(level = "debug", skip_all, fields(contract = contract.name()))]
pub fn print_contract(contract: &Contract, opts: &PrintOptions) -> Result<String> {
    let helpers = Helpers::new(contract, opts);
    let fns = sorted_functions(contract);
    let has_overrides = !fns.overrides.is_empty();

    let mut sections = vec![
        lines([format!("# SPDX-License-Identifier: {}", contract.license())]),
        lines(["%lang starknet"]),
        lines(BUILTIN_IMPORTS.iter().copied()),
        print_imports(contract, &helpers),
        print_natspec_tags(contract),
        lines(contract.variables().map(|v| helpers.transform_variable(v))),
        print_constructor(contract, &helpers)?,
    ];
    sections.extend(fns.code.iter().map(|f| print_function(f, &helpers)));
    sections.extend(fns.modifiers.iter().map(|f| print_function(f, &helpers)));
    if has_overrides {
        sections.push(lines(["#", "# Externals", "#"]));
    }
    sections.extend(fns.overrides.iter().map(|f| print_function(f, &helpers)));

    tracing::debug!(
        code = fns.code.len(),
        modifiers = fns.modifiers.len(),
        overrides = fns.overrides.len(),
        "printed functions"
    );

    Ok(format_lines(&space_between(sections)))
}

/// SHA-256 of printed source, lowercase hex
///
/// Stable across runs because printing is deterministic; usable as a cache
/// key for generated contracts.
pub fn source_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ── Function bucketing ─────────────────────────────────────

struct SortedFunctions<'a> {
    code: Vec<&'a ContractFunction>,
    modifiers: Vec<&'a ContractFunction>,
    overrides: Vec<&'a ContractFunction>,
}

// Functions with code first, then those with modifiers, then the rest
fn sorted_functions(contract: &Contract) -> SortedFunctions<'_> {
    let mut fns = SortedFunctions {
        code: Vec::new(),
        modifiers: Vec::new(),
        overrides: Vec::new(),
    };

    for func in contract.functions() {
        if !func.code().is_empty() {
            fns.code.push(func);
        } else if !func.modifiers().is_empty() {
            fns.modifiers.push(func);
        } else {
            fns.overrides.push(func);
        }
    }

    fns
}

// ── Imports ────────────────────────────────────────────────

/// One `from <path> import (...)` block per module path.
///
/// Blocks follow parent order (so `Initializable` leads), then using
/// libraries. Within a block: the initializer (when the constructor calls
/// it), the symbols the base declares, then `<module>_<fn>` for every
/// function forwarding to that base, in function order.
fn print_imports(contract: &Contract, helpers: &Helpers) -> Vec<Lines> {
    let parents = contract.parents();
    let constructor = has_constructor(contract);
    let mut groups: IndexMap<String, IndexSet<String>> = IndexMap::new();

    for parent in &parents {
        let symbols = groups.entry(parent.contract.import_path()).or_default();
        if constructor && parent.contract.has_initializer() {
            symbols.insert(parent.contract.initializer_symbol());
        }
        symbols.extend(parent.contract.symbols.iter().map(|s| s.to_string()));
    }

    for func in contract.functions() {
        let Some(module) = func.base().module else {
            continue;
        };
        if let Some(parent) = parents.iter().find(|p| p.contract.name == module) {
            groups
                .entry(parent.contract.import_path())
                .or_default()
                .insert(format!("{}_{}", module, func.name()));
        }
    }

    for using in contract.using() {
        groups
            .entry(using.library.import_path())
            .or_default()
            .insert(using.library.name.to_string());
    }

    let mut out = Vec::new();
    for (path, symbols) in groups {
        if symbols.is_empty() {
            continue;
        }
        out.push(Lines::from(format!(
            "from {} import (",
            helpers.transform_import(&path)
        )));
        out.push(Lines::Nested(lines(symbols.into_iter().map(|s| s + ","))));
        out.push(Lines::from(")"));
    }
    out
}

fn print_natspec_tags(contract: &Contract) -> Vec<Lines> {
    lines(
        contract
            .natspec_tags()
            .iter()
            .map(|tag| format!("# {} {}", tag.key, tag.value)),
    )
}

// ── Constructor ────────────────────────────────────────────

fn has_constructor(contract: &Contract) -> bool {
    contract.parents().iter().any(|p| !p.params.is_empty()) || !contract.constructor_code().is_empty()
}

fn print_constructor(contract: &Contract, helpers: &Helpers) -> Result<Vec<Lines>> {
    if !has_constructor(contract) {
        return Ok(Vec::new());
    }

    let guard = if helpers.upgradeable && contract.has_parent(INITIALIZABLE) {
        lines([INITIALIZE_GUARD])
    } else {
        Vec::new()
    };

    let mut initializers = guard.clone();
    for parent in contract.parents() {
        if parent.contract.has_initializer() {
            initializers.push(Lines::from(print_parent_constructor(parent)?));
        }
    }

    let body = space_between(vec![
        initializers,
        lines(contract.constructor_code().iter().cloned()),
    ]);
    let implicit_args = print_arguments(contract.constructor_implicit_args(), helpers);
    let args = print_arguments(contract.constructor_args(), helpers);

    if !helpers.upgradeable {
        return Ok(print_function_frame(
            Some("constructor"),
            "constructor",
            &implicit_args,
            &args,
            None,
            None,
            body,
        ));
    }

    // Implementation contracts lock themselves; proxies call `initializer`
    let mut stub = lines([UNSAFE_CONSTRUCTOR_ANNOTATION]);
    stub.extend(print_function_frame(
        Some("constructor"),
        "constructor",
        &implicit_args,
        &[],
        None,
        None,
        guard,
    ));
    let initializer = print_function_frame(
        Some("external"),
        "initializer",
        &implicit_args,
        &args,
        None,
        None,
        body,
    );
    Ok(space_between(vec![stub, initializer]))
}

fn print_parent_constructor(parent: &Parent) -> Result<String> {
    let params = parent
        .params
        .iter()
        .map(print_value)
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "{}({})",
        parent.contract.initializer_symbol(),
        params.join(", ")
    ))
}

// ── Functions ──────────────────────────────────────────────

fn print_function(func: &ContractFunction, helpers: &Helpers) -> Vec<Lines> {
    let base = func.base();
    let mut code = lines(func.modifiers().iter().cloned());

    if let Some(module) = base.module {
        let call = format!(
            "{}_{}({})",
            module,
            base.name,
            argument_names(base.args).join(", ")
        );
        match (base.returns, base.return_value) {
            (Some(returns), None) if !returns.is_empty() => code.push(Lines::from(format!(
                "let ({}) = {}",
                argument_names(returns).join(", "),
                call
            ))),
            _ => code.push(Lines::from(call)),
        }
    }

    code.extend(lines(func.code().iter().cloned()));

    let return_vars: Option<Vec<String>> = match base.return_value {
        Some(value) => Some(vec![value.to_string()]),
        None => base
            .returns
            .map(|r| argument_names(r).into_iter().map(String::from).collect()),
    };
    let returns = base.returns.map(|r| print_arguments(r, helpers));

    print_function_frame(
        base.kind.map(|k| k.as_str()),
        base.name,
        &print_arguments(base.implicit_args, helpers),
        &print_arguments(base.args, helpers),
        returns.as_deref(),
        return_vars.as_deref(),
        code,
    )
}

/// Shared frame for functions and constructors
///
/// ```text
/// @kind
/// func name{
///         implicit,
///         args
///     }(args) -> (returns):
///     body
///     return (vars)
/// end
/// ```
fn print_function_frame(
    kind: Option<&str>,
    name: &str,
    implicit_args: &[String],
    args: &[String],
    returns: Option<&[String]>,
    return_vars: Option<&[String]>,
    code: Vec<Lines>,
) -> Vec<Lines> {
    let mut out = Vec::new();

    if let Some(kind) = kind {
        out.push(Lines::from(format!("@{}", kind)));
    }

    let tail = match returns {
        Some(returns) => format!("({}) -> ({}):", args.join(", "), returns.join(", ")),
        None => format!("({}):", args.join(", ")),
    };

    if implicit_args.is_empty() {
        out.push(Lines::from(format!("func {}{}", name, tail)));
    } else {
        out.push(Lines::from(format!("func {}{{", name)));
        let last = implicit_args.len() - 1;
        let formatted = implicit_args.iter().enumerate().map(|(i, arg)| {
            if i < last {
                format!("{},", arg)
            } else {
                arg.clone()
            }
        });
        out.push(Lines::Nested(vec![Lines::Nested(lines(formatted))]));
        out.push(Lines::Nested(lines([format!("}}{}", tail)])));
    }

    let mut body = code;
    let vars = return_vars.map(|v| v.join(", ")).unwrap_or_default();
    body.push(Lines::from(format!("return ({})", vars)));
    out.push(Lines::Nested(body));
    out.push(Lines::from("end"));

    out
}

fn argument_names(args: &[FunctionArgument]) -> Vec<&'static str> {
    args.iter().map(|a| a.name).collect()
}

fn print_arguments(args: &[FunctionArgument], helpers: &Helpers) -> Vec<String> {
    args.iter().map(|a| print_argument(a, helpers)).collect()
}

// Capitalized types are library types and go through the name transform;
// primitives like `felt` and `felt*` pass through verbatim.
fn print_argument(arg: &FunctionArgument, helpers: &Helpers) -> String {
    match arg.ty {
        Some(ty) if ty.starts_with(|c: char| c.is_ascii_uppercase()) => {
            format!("{}: {}", arg.name, helpers.transform_name(ty))
        }
        Some(ty) => format!("{}: {}", arg.name, ty),
        None => arg.name.to_string(),
    }
}

// ── Tests ──────────────────────────────────────────────────
