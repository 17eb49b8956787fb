//! Contract IR - the single structure every feature function mutates
//!
//! A [`Contract`] is created once per generation request, mutated by the
//! feature functions an assembler selects, then handed to the printer.
//!
//! # Registries
//!
//! - **Parents** are keyed by base-module name. Re-adding a parent overwrites
//!   its params in place and reports that it was not new.
//! - **Functions** are keyed by signature (`name(arg1,arg2)`), so every
//!   feature function addressing the same logical function accumulates
//!   modifiers and code onto one entry.
//! - **Variables** are keyed by their rendered declaration text.
//!
//! All three preserve insertion order. The only reordering is presentation
//! of parents, where `Initializable` always comes first.

use indexmap::{IndexMap, IndexSet};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::common::IMPLICIT_ARGS;
use crate::identifier::to_identifier;
use crate::value::Value;
use crate::{Error, Result};

/// Base whose initialization guard must run before any other initializer
pub const INITIALIZABLE: &str = "Initializable";

// ── Base modules ──────────────────────────────────────────

/// How a base module gets initialized from the contract constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    /// The constructor calls `<Name>_initializer(params...)`
    Explicit,
    /// The base initializes itself; no call is emitted
    Implicit,
}

/// An external base module, referenced by name and import path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentContract {
    pub name: &'static str,
    pub path: &'static str,
    pub initializer: Initializer,
    /// Library symbols imported whenever this base is used
    pub symbols: &'static [&'static str],
}

impl ParentContract {
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            initializer: Initializer::Explicit,
            symbols: &[],
        }
    }

    pub const fn self_initializing(mut self) -> Self {
        self.initializer = Initializer::Implicit;
        self
    }

    pub const fn with_symbols(mut self, symbols: &'static [&'static str]) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn has_initializer(&self) -> bool {
        self.initializer == Initializer::Explicit
    }

    /// Symbol of the initializer function exported by the base
    pub fn initializer_symbol(&self) -> String {
        format!("{}_initializer", self.name)
    }

    /// Dotted module path used in `from ... import` lines
    pub fn import_path(&self) -> String {
        self.path.replace('/', ".")
    }
}

/// A base added to the contract, with its initializer arguments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parent {
    pub contract: ParentContract,
    pub params: Vec<Value>,
}

/// A library attached to a type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Using {
    pub library: ParentContract,
    pub using_for: String,
}

// ── Functions ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    View,
    External,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionKind::View => "view",
            FunctionKind::External => "external",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FunctionArgument {
    pub name: &'static str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<&'static str>,
}

impl FunctionArgument {
    pub const fn typed(name: &'static str, ty: &'static str) -> Self {
        Self { name, ty: Some(ty) }
    }

    pub const fn untyped(name: &'static str) -> Self {
        Self { name, ty: None }
    }
}

/// Identity template for a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseFunction {
    /// Base module whose same-named function this one forwards to
    pub module: Option<&'static str>,
    pub name: &'static str,
    pub implicit_args: &'static [FunctionArgument],
    pub args: &'static [FunctionArgument],
    pub returns: Option<&'static [FunctionArgument]>,
    /// Literal returned instead of the declared return names
    pub return_value: Option<&'static str>,
    pub kind: Option<FunctionKind>,
}

impl BaseFunction {
    /// Identity key: name plus ordered argument names
    pub fn signature(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(|a| a.name).collect();
        format!("{}({})", self.name, args.join(","))
    }
}

/// Body state of a function
///
/// `Empty → Accumulating → Accumulating` through incremental appends,
/// `Empty → Finalized` through a one-shot body. Nothing leaves `Finalized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "code", rename_all = "lowercase")]
pub enum FunctionBody {
    Empty,
    Accumulating(Vec<String>),
    Finalized(Vec<String>),
}

impl FunctionBody {
    pub fn code(&self) -> &[String] {
        match self {
            FunctionBody::Empty => &[],
            FunctionBody::Accumulating(code) | FunctionBody::Finalized(code) => code,
        }
    }
}

/// A function of the contract with everything feature functions attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractFunction {
    #[serde(flatten)]
    base: BaseFunction,
    modifiers: Vec<String>,
    body: FunctionBody,
}

impl ContractFunction {
    fn new(base: BaseFunction) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
            body: FunctionBody::Empty,
        }
    }

    pub fn base(&self) -> &BaseFunction {
        &self.base
    }

    pub fn name(&self) -> &'static str {
        self.base.name
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn body(&self) -> &FunctionBody {
        &self.body
    }

    pub fn code(&self) -> &[String] {
        self.body.code()
    }

    pub fn is_final(&self) -> bool {
        matches!(self.body, FunctionBody::Finalized(_))
    }

    fn push_code(&mut self, line: String) -> Result<()> {
        match &mut self.body {
            FunctionBody::Finalized(_) => Err(Error::FunctionFinalized {
                function: self.base.name.to_string(),
            }),
            FunctionBody::Accumulating(code) => {
                code.push(line);
                Ok(())
            }
            FunctionBody::Empty => {
                self.body = FunctionBody::Accumulating(vec![line]);
                Ok(())
            }
        }
    }

    fn set_body(&mut self, lines: Vec<String>) -> Result<()> {
        match self.body {
            FunctionBody::Empty => {
                self.body = FunctionBody::Finalized(lines);
                Ok(())
            }
            FunctionBody::Accumulating(_) => Err(Error::FunctionHasCode {
                function: self.base.name.to_string(),
            }),
            FunctionBody::Finalized(_) => Err(Error::FunctionFinalized {
                function: self.base.name.to_string(),
            }),
        }
    }
}

// ── Contract ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NatspecTag {
    pub key: String,
    pub value: String,
}

/// The contract under construction
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    license: String,
    upgradeable: bool,
    using: Vec<Using>,
    natspec_tags: Vec<NatspecTag>,
    constructor_args: Vec<FunctionArgument>,
    constructor_implicit_args: &'static [FunctionArgument],
    constructor_code: Vec<String>,
    parent_map: IndexMap<&'static str, Parent>,
    function_map: IndexMap<String, ContractFunction>,
    variable_set: IndexSet<String>,
}

impl Contract {
    /// Start an empty contract; the name is turned into an identifier
    pub fn new(name: &str) -> Self {
        Self {
            name: to_identifier(name, true),
            license: "MIT".to_string(),
            upgradeable: false,
            using: Vec::new(),
            natspec_tags: Vec::new(),
            constructor_args: Vec::new(),
            constructor_implicit_args: IMPLICIT_ARGS,
            constructor_code: Vec::new(),
            parent_map: IndexMap::new(),
            function_map: IndexMap::new(),
            variable_set: IndexSet::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn is_upgradeable(&self) -> bool {
        self.upgradeable
    }

    pub fn using(&self) -> &[Using] {
        &self.using
    }

    pub fn natspec_tags(&self) -> &[NatspecTag] {
        &self.natspec_tags
    }

    pub fn constructor_args(&self) -> &[FunctionArgument] {
        &self.constructor_args
    }

    pub fn constructor_implicit_args(&self) -> &[FunctionArgument] {
        self.constructor_implicit_args
    }

    pub fn constructor_code(&self) -> &[String] {
        &self.constructor_code
    }

    /// Parents in presentation order: `Initializable` first, otherwise
    /// insertion order
    pub fn parents(&self) -> Vec<&Parent> {
        let mut parents: Vec<&Parent> = self.parent_map.values().collect();
        parents.sort_by_key(|p| p.contract.name != INITIALIZABLE);
        parents
    }

    pub fn has_parent(&self, name: &str) -> bool {
        self.parent_map.contains_key(name)
    }

    /// Parent paths followed by using-library paths
    pub fn imports(&self) -> Vec<&'static str> {
        self.parents()
            .into_iter()
            .map(|p| p.contract.path)
            .chain(self.using.iter().map(|u| u.library.path))
            .collect()
    }

    pub fn functions(&self) -> impl Iterator<Item = &ContractFunction> {
        self.function_map.values()
    }

    pub fn function(&self, base: &BaseFunction) -> Option<&ContractFunction> {
        self.function_map.get(&base.signature())
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variable_set.iter().map(String::as_str)
    }

    // ── Mutation ──────────────────────────────────────────

    pub fn set_license(&mut self, license: impl Into<String>) {
        self.license = license.into();
    }

    pub fn set_upgradeable(&mut self, upgradeable: bool) {
        self.upgradeable = upgradeable;
    }

    /// Add a base module, or replace the params of one already present.
    ///
    /// Returns `true` only the first time a base with this name is added.
    pub fn add_parent(&mut self, contract: ParentContract, params: Vec<Value>) -> bool {
        let previous = self
            .parent_map
            .insert(contract.name, Parent { contract, params });
        tracing::trace!(parent = contract.name, new = previous.is_none(), "add_parent");
        previous.is_none()
    }

    pub fn add_using(&mut self, library: ParentContract, using_for: impl Into<String>) {
        self.using.push(Using {
            library,
            using_for: using_for.into(),
        });
    }

    /// Live function for the signature of `base`, created empty if absent
    pub fn add_function(&mut self, base: &BaseFunction) -> &mut ContractFunction {
        self.function_map
            .entry(base.signature())
            .or_insert_with(|| {
                tracing::trace!(function = base.name, "add_function");
                ContractFunction::new(*base)
            })
    }

    pub fn add_modifier(&mut self, modifier: impl Into<String>, base: &BaseFunction) {
        self.add_function(base).modifiers.push(modifier.into());
    }

    /// Append one statement to a function body
    ///
    /// # Errors
    /// `FunctionFinalized` if the body was set with [`Self::set_function_body`].
    pub fn add_function_code(&mut self, code: impl Into<String>, base: &BaseFunction) -> Result<()> {
        self.add_function(base).push_code(code.into())
    }

    /// Set a function body in one shot and finalize it
    ///
    /// # Errors
    /// `FunctionHasCode` if code was already appended, `FunctionFinalized`
    /// if the body was already set.
    pub fn set_function_body(&mut self, code: Vec<String>, base: &BaseFunction) -> Result<()> {
        self.add_function(base).set_body(code)
    }

    pub fn add_constructor_argument(&mut self, arg: FunctionArgument) {
        self.constructor_args.push(arg);
    }

    pub fn add_constructor_code(&mut self, code: impl Into<String>) {
        self.constructor_code.push(code.into());
    }

    /// Declare a variable by its rendered text.
    ///
    /// Returns `true` only the first time this exact text is added.
    pub fn add_variable(&mut self, code: impl Into<String>) -> bool {
        self.variable_set.insert(code.into())
    }

    /// # Errors
    /// `InvalidNatspecKey` unless `key` matches `^(@custom:)?[a-z][a-z-]*$`.
    pub fn add_natspec_tag(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        if !is_valid_natspec_key(key) {
            return Err(Error::InvalidNatspecKey(key.to_string()));
        }
        self.natspec_tags.push(NatspecTag {
            key: key.to_string(),
            value: value.into(),
        });
        Ok(())
    }
}

fn is_valid_natspec_key(key: &str) -> bool {
    let rest = key.strip_prefix("@custom:").unwrap_or(key);
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => chars.all(|c| c.is_ascii_lowercase() || c == '-'),
        _ => false,
    }
}

/// Equal contracts print identically: registries compare in presentation order
impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.license == other.license
            && self.upgradeable == other.upgradeable
            && self.using == other.using
            && self.natspec_tags == other.natspec_tags
            && self.constructor_args == other.constructor_args
            && self.constructor_implicit_args == other.constructor_implicit_args
            && self.constructor_code == other.constructor_code
            && self.parents() == other.parents()
            && self.functions().eq(other.functions())
            && self.variables().eq(other.variables())
    }
}

/// Serialized through the derived views, so JSON dumps show presentation order
impl Serialize for Contract {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let functions: Vec<&ContractFunction> = self.functions().collect();
        let variables: Vec<&str> = self.variables().collect();

        let mut s = serializer.serialize_struct("Contract", 12)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("license", &self.license)?;
        s.serialize_field("upgradeable", &self.upgradeable)?;
        s.serialize_field("parents", &self.parents())?;
        s.serialize_field("using", &self.using)?;
        s.serialize_field("imports", &self.imports())?;
        s.serialize_field("natspecTags", &self.natspec_tags)?;
        s.serialize_field("functions", &functions)?;
        s.serialize_field("constructorArgs", &self.constructor_args)?;
        s.serialize_field("constructorImplicitArgs", &self.constructor_implicit_args)?;
        s.serialize_field("constructorCode", &self.constructor_code)?;
        s.serialize_field("variables", &variables)?;
        s.end()
    }
}
