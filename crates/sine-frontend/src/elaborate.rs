//! Elaboration: convert S-expressions to hash-consed terms
//!
//! Handles:
//! - Sort and function declarations
//! - Term internalization into the [`TermStore`]
//! - `let` and `define-fun` expansion
//! - Quantifiers with `:pattern` annotations

use crate::script::{Command, Script};
use crate::sexp::{ParseError, SExpr};
use hashbrown::HashMap;
use num_bigint::BigInt;
use sine_core::{FuncId, Op, QuantKind, Sort, TermId, TermStore};
use thiserror::Error;
use tracing::{debug, warn};

/// Error during elaboration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElaborateError {
    /// Syntax error
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Undefined symbol
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),
    /// Undefined sort
    #[error("undefined sort: {0}")]
    UndefinedSort(String),
    /// Symbol or sort declared twice
    #[error("symbol already declared: {0}")]
    DuplicateSymbol(String),
    /// Wrong number of arguments
    #[error("arity mismatch for {name}: expected {expected}, got {actual}")]
    ArityMismatch {
        /// The applied symbol
        name: String,
        /// Expected argument count
        expected: String,
        /// Actual argument count
        actual: usize,
    },
    /// Invalid constant
    #[error("invalid constant: {0}")]
    InvalidConstant(String),
    /// Ill-formed command or term
    #[error("malformed {what}: {text}")]
    Malformed {
        /// What was being elaborated
        what: &'static str,
        /// The offending S-expression
        text: String,
    },
    /// Unsupported feature
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Result type for elaboration
pub type Result<T> = std::result::Result<T, ElaborateError>;

fn malformed(what: &'static str, sexp: &SExpr) -> ElaborateError {
    ElaborateError::Malformed {
        what,
        text: sexp.to_string(),
    }
}

/// A `define-fun` macro, expanded at each use.
#[derive(Debug, Clone)]
struct FunDef {
    params: Vec<String>,
    body: SExpr,
}

type Env = HashMap<String, TermId>;

/// Deepest chain of `define-fun` uses expanded inside one another.
pub const MAX_EXPANSION_DEPTH: usize = 256;

/// Elaboration context
#[derive(Default)]
pub struct Context {
    terms: TermStore,
    sorts: HashMap<String, Sort>,
    fun_defs: HashMap<String, FunDef>,
    named: HashMap<String, TermId>,
    commands: Vec<Command>,
    /// Number of `define-fun` bodies currently being expanded
    macro_depth: usize,
    fresh_vars: u32,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Terms built so far.
    #[must_use]
    pub fn terms(&self) -> &TermStore {
        &self.terms
    }

    /// Term annotated with `:named name`, if any.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<TermId> {
        self.named.get(name).copied()
    }

    /// Finish elaboration, yielding the script.
    #[must_use]
    pub fn into_script(self) -> Script {
        Script::new(self.terms, self.commands)
    }

    /// Elaborate one top-level command.
    pub fn process_command(&mut self, sexp: &SExpr) -> Result<()> {
        let items = sexp
            .as_list()
            .filter(|items| !items.is_empty())
            .ok_or_else(|| malformed("command", sexp))?;
        let head = items[0]
            .as_symbol()
            .ok_or_else(|| malformed("command", sexp))?;

        match head {
            "set-logic" | "set-info" | "set-option" | "check-sat" | "exit" | "get-model"
            | "get-info" | "get-option" | "get-unsat-core" | "get-proof" => {
                self.commands.push(Command::Verbatim(sexp.clone()));
            }
            "declare-sort" => {
                let [_, name, rest @ ..] = items else {
                    return Err(malformed("declare-sort", sexp));
                };
                let name = name
                    .as_symbol()
                    .ok_or_else(|| malformed("declare-sort", sexp))?;
                let arity = match rest {
                    [] => "0",
                    [n] => n.as_numeral().ok_or_else(|| malformed("declare-sort", sexp))?,
                    _ => return Err(malformed("declare-sort", sexp)),
                };
                if arity != "0" {
                    return Err(ElaborateError::Unsupported(format!(
                        "parametric sort {name}"
                    )));
                }
                if self.sorts.contains_key(name) {
                    return Err(ElaborateError::DuplicateSymbol(name.to_string()));
                }
                self.sorts
                    .insert(name.to_string(), Sort::Uninterpreted(name.to_string()));
                self.commands.push(Command::DeclareSort(name.to_string()));
            }
            "declare-fun" => {
                let [_, name, SExpr::List(domain), range] = items else {
                    return Err(malformed("declare-fun", sexp));
                };
                let domain = domain
                    .iter()
                    .map(|s| self.elaborate_sort(s))
                    .collect::<Result<Vec<_>>>()?;
                let range = self.elaborate_sort(range)?;
                let f = self.declare(name, domain, range, sexp)?;
                self.commands.push(Command::DeclareFun(f));
            }
            "declare-const" => {
                let [_, name, sort] = items else {
                    return Err(malformed("declare-const", sexp));
                };
                let sort = self.elaborate_sort(sort)?;
                let f = self.declare(name, Vec::new(), sort, sexp)?;
                self.commands.push(Command::DeclareFun(f));
            }
            "define-fun" => {
                let [_, name, SExpr::List(params), sort, body] = items else {
                    return Err(malformed("define-fun", sexp));
                };
                let name = name
                    .as_symbol()
                    .ok_or_else(|| malformed("define-fun", sexp))?;
                self.elaborate_sort(sort)?;
                if self.is_declared(name) {
                    return Err(ElaborateError::DuplicateSymbol(name.to_string()));
                }
                let mut param_names = Vec::with_capacity(params.len());
                let mut env = Env::new();
                for param in params {
                    let (pname, psort) = self.elaborate_binding(param)?;
                    env.insert(pname.clone(), self.terms.mk_var(pname.clone(), psort));
                    param_names.push(pname);
                }
                // The name is not bound yet, so a recursive body fails here.
                self.elaborate_term(body, &env)?;
                self.fun_defs.insert(
                    name.to_string(),
                    FunDef {
                        params: param_names,
                        body: body.clone(),
                    },
                );
                self.commands.push(Command::Verbatim(sexp.clone()));
            }
            "assert" => {
                let [_, body] = items else {
                    return Err(malformed("assert", sexp));
                };
                let t = self.elaborate_term(body, &Env::new())?;
                self.commands.push(Command::Assert(t));
            }
            // push, pop, define-sort, check-sat-assuming, ...
            other => return Err(ElaborateError::Unsupported(format!("command {other}"))),
        }
        Ok(())
    }

    fn is_declared(&self, name: &str) -> bool {
        self.terms.lookup_func(name).is_some()
            || self.fun_defs.contains_key(name)
            || Op::from_name(name).is_some()
    }

    fn declare(
        &mut self,
        name: &SExpr,
        domain: Vec<Sort>,
        range: Sort,
        cmd: &SExpr,
    ) -> Result<FuncId> {
        let name = name.as_symbol().ok_or_else(|| malformed("declaration", cmd))?;
        if self.is_declared(name) {
            return Err(ElaborateError::DuplicateSymbol(name.to_string()));
        }
        Ok(self.terms.declare_fun(name, domain, range))
    }

    /// Convert a sort expression.
    pub fn elaborate_sort(&self, sexp: &SExpr) -> Result<Sort> {
        let name = sexp.as_symbol().ok_or_else(|| {
            ElaborateError::Unsupported(format!("sort expression {sexp}"))
        })?;
        match name {
            "Bool" => Ok(Sort::Bool),
            "Int" => Ok(Sort::Int),
            "Real" => Ok(Sort::Real),
            other => self
                .sorts
                .get(other)
                .cloned()
                .ok_or_else(|| ElaborateError::UndefinedSort(other.to_string())),
        }
    }

    fn elaborate_binding(&self, sexp: &SExpr) -> Result<(String, Sort)> {
        match sexp.as_list() {
            Some([SExpr::Symbol(name), sort]) => Ok((name.clone(), self.elaborate_sort(sort)?)),
            _ => Err(malformed("binding", sexp)),
        }
    }

    /// Convert a term under the bound-variable environment `env`.
    pub fn elaborate_term(
        &mut self,
        sexp: &SExpr,
        env: &HashMap<String, TermId>,
    ) -> Result<TermId> {
        match sexp {
            SExpr::True => Ok(self.terms.true_term()),
            SExpr::False => Ok(self.terms.false_term()),
            SExpr::Numeral(n) => {
                let value: BigInt = n
                    .parse()
                    .map_err(|_| ElaborateError::InvalidConstant(n.clone()))?;
                Ok(self.terms.mk_int(value))
            }
            SExpr::Decimal(d) => Err(ElaborateError::Unsupported(format!("decimal literal {d}"))),
            SExpr::String(s) => Err(ElaborateError::Unsupported(format!("string literal {s}"))),
            SExpr::Keyword(_) => Err(malformed("term", sexp)),
            SExpr::Symbol(name) => self.elaborate_symbol(name, env),
            SExpr::List(items) => {
                let Some((head, args)) = items.split_first() else {
                    return Err(malformed("term", sexp));
                };
                match head.as_symbol() {
                    Some("let") => self.elaborate_let(args, env, sexp),
                    Some("forall") => self.elaborate_quantifier(QuantKind::Forall, args, env, sexp),
                    Some("exists") => self.elaborate_quantifier(QuantKind::Exists, args, env, sexp),
                    Some("!") => {
                        let Some((body, attrs)) = args.split_first() else {
                            return Err(malformed("annotation", sexp));
                        };
                        let t = self.elaborate_term(body, env)?;
                        let patterns = self.elaborate_attributes(t, attrs, env)?;
                        if !patterns.is_empty() {
                            warn!("ignoring :pattern outside of a quantifier body");
                        }
                        Ok(t)
                    }
                    Some(name) => {
                        let args = args
                            .iter()
                            .map(|a| self.elaborate_term(a, env))
                            .collect::<Result<Vec<_>>>()?;
                        self.elaborate_app(name, args)
                    }
                    None => Err(ElaborateError::Unsupported(format!(
                        "higher-order application {sexp}"
                    ))),
                }
            }
        }
    }

    fn elaborate_symbol(&mut self, name: &str, env: &Env) -> Result<TermId> {
        if let Some(&t) = env.get(name) {
            return Ok(t);
        }
        if let Some(abs) = name.strip_prefix('-') {
            if !abs.is_empty() && abs.chars().all(|c| c.is_ascii_digit()) {
                let value: BigInt = name
                    .parse()
                    .map_err(|_| ElaborateError::InvalidConstant(name.to_string()))?;
                return Ok(self.terms.mk_int(value));
            }
        }
        self.elaborate_app(name, Vec::new())
    }

    fn elaborate_app(&mut self, name: &str, args: Vec<TermId>) -> Result<TermId> {
        if let Some(def) = self.fun_defs.get(name).cloned() {
            check_arity(name, def.params.len(), args.len())?;
            if self.macro_depth >= MAX_EXPANSION_DEPTH {
                return Err(ElaborateError::Unsupported(format!(
                    "define-fun expansions nested deeper than {MAX_EXPANSION_DEPTH}"
                )));
            }
            let env: Env = def.params.into_iter().zip(args).collect();
            self.macro_depth += 1;
            let body = self.elaborate_term(&def.body, &env);
            self.macro_depth -= 1;
            return body;
        }
        if let Some(f) = self.terms.lookup_func(name) {
            check_arity(name, self.terms.func(f).arity(), args.len())?;
            return Ok(self.terms.mk_app(f, args));
        }
        if let Some(op) = Op::from_name(name) {
            let ok = match op {
                Op::Not => args.len() == 1,
                Op::Ite => args.len() == 3,
                Op::Sub | Op::And | Op::Or | Op::Add | Op::Mul => !args.is_empty(),
                Op::Implies
                | Op::Xor
                | Op::Eq
                | Op::Distinct
                | Op::Lt
                | Op::Le
                | Op::Gt
                | Op::Ge => args.len() >= 2,
            };
            if !ok {
                return Err(ElaborateError::ArityMismatch {
                    name: name.to_string(),
                    expected: "a valid operand count".to_string(),
                    actual: args.len(),
                });
            }
            return Ok(self.terms.mk_builtin(op, args));
        }
        Err(ElaborateError::UndefinedSymbol(name.to_string()))
    }

    fn elaborate_let(&mut self, args: &[SExpr], env: &Env, sexp: &SExpr) -> Result<TermId> {
        let [SExpr::List(bindings), body] = args else {
            return Err(malformed("let", sexp));
        };
        // Bindings are parallel: every value is elaborated in the outer scope.
        let mut new_env = env.clone();
        for binding in bindings {
            let Some([SExpr::Symbol(name), value]) = binding.as_list() else {
                return Err(malformed("let binding", binding));
            };
            let value = self.elaborate_term(value, env)?;
            new_env.insert(name.clone(), value);
        }
        self.elaborate_term(body, &new_env)
    }

    fn elaborate_quantifier(
        &mut self,
        kind: QuantKind,
        args: &[SExpr],
        env: &Env,
        sexp: &SExpr,
    ) -> Result<TermId> {
        let [SExpr::List(bindings), body] = args else {
            return Err(malformed(kind.keyword(), sexp));
        };
        if bindings.is_empty() {
            return Err(malformed(kind.keyword(), sexp));
        }

        let mut vars = Vec::with_capacity(bindings.len());
        let mut new_env = env.clone();
        for binding in bindings {
            let (name, sort) = self.elaborate_binding(binding)?;
            // Inside a macro body the arguments may mention outer variables
            // with the same name.
            let var_name = if self.macro_depth > 0 {
                self.fresh_vars += 1;
                format!("{name}!{}", self.fresh_vars)
            } else {
                name.clone()
            };
            let var = self.terms.mk_var(var_name.clone(), sort.clone());
            new_env.insert(name, var);
            vars.push((var_name, sort));
        }

        let (body, patterns) = match body.as_list() {
            Some([bang, inner, attrs @ ..]) if bang.is_symbol("!") => {
                let t = self.elaborate_term(inner, &new_env)?;
                let patterns = self.elaborate_attributes(t, attrs, &new_env)?;
                (t, patterns)
            }
            _ => (self.elaborate_term(body, &new_env)?, Vec::new()),
        };

        if kind == QuantKind::Exists && !patterns.is_empty() {
            debug!("dropping patterns of an existential quantifier");
            return Ok(self.terms.mk_exists(vars, body));
        }
        Ok(self.terms.mk_quantifier(kind, vars, body, patterns))
    }

    /// Process `:keyword value` pairs attached to `t`; returns the
    /// multi-patterns found.
    fn elaborate_attributes(
        &mut self,
        t: TermId,
        attrs: &[SExpr],
        env: &Env,
    ) -> Result<Vec<TermId>> {
        let mut patterns = Vec::new();
        let mut rest = attrs;
        while let Some((key, tail)) = rest.split_first() {
            let SExpr::Keyword(key) = key else {
                return Err(malformed("attribute", key));
            };
            let (value, tail) = match tail.split_first() {
                Some((v, t)) if !matches!(v, SExpr::Keyword(_)) => (Some(v), t),
                _ => (None, tail),
            };
            rest = tail;

            match (key.as_str(), value) {
                (":pattern", Some(SExpr::List(terms))) if !terms.is_empty() => {
                    let terms = terms
                        .iter()
                        .map(|p| self.elaborate_term(p, env))
                        .collect::<Result<Vec<_>>>()?;
                    patterns.push(self.terms.mk_pattern(terms));
                }
                (":pattern", _) => {
                    return Err(malformed(":pattern", value.unwrap_or(&SExpr::List(Vec::new()))));
                }
                (":named", Some(SExpr::Symbol(name))) => {
                    self.named.insert(name.clone(), t);
                }
                (other, _) => debug!(attribute = other, "ignoring attribute"),
            }
        }
        Ok(patterns)
    }
}

fn check_arity(name: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ElaborateError::ArityMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}
