//! Per-build render state.
//!
//! One [`RenderContext`] is created by [`build`](super::query::build) and threaded
//! by `&mut` through the statement tree. It owns the alias counters, the
//! identity → name maps for variables and params, the parameter table and the
//! stack of variable scopes opened by CALL and EXISTS bodies.

use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::errors::CypherBuildError;
use super::references::{Param, Variable, VariableKind};
use crate::config::BuilderConfig;
use crate::utils::naming::{child_scope_prefix, indent_block, scoped_name};

/// Parameter table: generated name → bound literal, in binding order.
pub type Params = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub indent_width: usize,
    pub param_prefix: String,
    pub variable_prefix: String,
    pub value_prefix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::from(&BuilderConfig::default())
    }
}

impl From<&BuilderConfig> for RenderOptions {
    fn from(config: &BuilderConfig) -> Self {
        RenderOptions {
            indent_width: config.indent_width,
            param_prefix: config.param_prefix.clone(),
            variable_prefix: config.variable_prefix.clone(),
            value_prefix: config.value_prefix.clone(),
        }
    }
}

#[derive(Debug)]
struct Scope {
    prefix: String,
    declared: HashSet<usize>,
    /// EXISTS bodies see the enclosing variables, CALL bodies only their imports
    inherits: bool,
}

#[derive(Debug)]
pub struct RenderContext {
    options: RenderOptions,
    counters: HashMap<String, usize>,
    scopes: Vec<Scope>,
    // The handle is kept alongside the name so its address cannot be reused
    // by another element while the build is running.
    variable_names: HashMap<usize, (Variable, String)>,
    param_names: HashMap<usize, (Param, String)>,
    // Every name handed out so far. Bases may end up sharing a text prefix
    // (`v` and `v1`), so counters alone do not keep names distinct.
    issued: HashSet<String>,
    params: Params,
    depth: usize,
}

impl RenderContext {
    pub fn new(options: RenderOptions) -> Self {
        RenderContext {
            options,
            counters: HashMap::new(),
            scopes: vec![Scope {
                prefix: String::new(),
                declared: HashSet::new(),
                inherits: false,
            }],
            variable_names: HashMap::new(),
            param_names: HashMap::new(),
            issued: HashSet::new(),
            params: Params::new(),
            depth: 0,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn current_scope(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Fresh identifier `<prefix><base><n>` for the current scope. Names
    /// already issued under another base are skipped.
    pub fn allocate(&mut self, base: &str) -> String {
        let prefix = self.current_scope().prefix.clone();
        let counter = self
            .counters
            .entry(format!("{}{}", prefix, base))
            .or_insert(0);
        loop {
            let name = scoped_name(&prefix, base, *counter);
            *counter += 1;
            if self.issued.insert(name.clone()) {
                return name;
            }
            log::trace!("Skipping alias '{}', already issued", name);
        }
    }

    /// Allocate a parameter name and record `value` under it.
    pub fn bind(&mut self, value: Value) -> String {
        let base = self.options.param_prefix.clone();
        let name = self.allocate(&base);
        log::trace!("Bound parameter ${} = {}", name, value);
        self.params.insert(name.clone(), value);
        name
    }

    /// Name of `param`, binding its value the first time it is rendered.
    pub fn param_name(&mut self, param: &Param) -> String {
        if let Some((_, name)) = self.param_names.get(&param.identity()) {
            return name.clone();
        }
        let name = self.bind(param.value().clone());
        self.param_names
            .insert(param.identity(), (param.clone(), name.clone()));
        name
    }

    /// Base a generated alias of this variable starts with.
    pub fn base_for(&self, variable: &Variable) -> String {
        match variable.name() {
            Some(name) => name.to_string(),
            None => match variable.kind() {
                VariableKind::Node | VariableKind::Relationship => {
                    self.options.variable_prefix.clone()
                }
                VariableKind::Value => self.options.value_prefix.clone(),
            },
        }
    }

    /// Name of `variable`; fixed names render verbatim, others are allocated
    /// on first use and reused afterwards.
    pub fn variable_name(&mut self, variable: &Variable) -> String {
        if let Some(name) = variable.name() {
            return name.to_string();
        }
        if let Some((_, name)) = self.variable_names.get(&variable.identity()) {
            return name.clone();
        }
        let base = self.base_for(variable);
        let name = self.allocate(&base);
        self.variable_names
            .insert(variable.identity(), (variable.clone(), name.clone()));
        name
    }

    /// Mark `variable` as introduced in the current scope.
    pub fn declare(&mut self, variable: &Variable) {
        self.current_scope_mut()
            .declared
            .insert(variable.identity());
    }

    /// Replace the variables visible in the current scope, as a projecting
    /// `WITH` does.
    pub fn retain_declared(&mut self, variables: &[Variable]) {
        self.current_scope_mut().declared = variables.iter().map(Variable::identity).collect();
    }

    pub fn is_declared(&self, variable: &Variable) -> bool {
        for scope in self.scopes.iter().rev() {
            if scope.declared.contains(&variable.identity()) {
                return true;
            }
            if !scope.inherits {
                break;
            }
        }
        false
    }

    pub fn require_declared(
        &mut self,
        variable: &Variable,
        clause: &'static str,
    ) -> Result<(), CypherBuildError> {
        if self.is_declared(variable) {
            Ok(())
        } else {
            Err(CypherBuildError::UndeclaredVariable {
                name: self.variable_name(variable),
                clause,
            })
        }
    }

    /// Run `render` inside a CALL body scope whose prefix is allocated from
    /// `base` in the current scope. Only `imports` are visible inside.
    pub fn in_child_scope<T>(
        &mut self,
        base: &str,
        imports: &[Variable],
        render: impl FnOnce(&mut Self) -> Result<T, CypherBuildError>,
    ) -> Result<T, CypherBuildError> {
        let prefix = child_scope_prefix(&self.allocate(base));
        log::trace!("Entering CALL scope '{}'", prefix);
        self.scopes.push(Scope {
            prefix,
            declared: imports.iter().map(Variable::identity).collect(),
            inherits: false,
        });
        self.depth += 1;
        let result = render(self);
        self.depth -= 1;
        self.scopes.pop();
        result
    }

    /// Run `render` inside an EXISTS body, which keeps the current prefix and
    /// sees every variable of the enclosing scopes.
    pub fn in_nested_scope<T>(
        &mut self,
        render: impl FnOnce(&mut Self) -> Result<T, CypherBuildError>,
    ) -> Result<T, CypherBuildError> {
        let prefix = self.current_scope().prefix.clone();
        self.scopes.push(Scope {
            prefix,
            declared: HashSet::new(),
            inherits: true,
        });
        self.depth += 1;
        let result = render(self);
        self.depth -= 1;
        self.scopes.pop();
        result
    }

    /// Number of CALL/EXISTS bodies currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn indent(&self, text: &str) -> String {
        indent_block(text, self.options.indent_width)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}
