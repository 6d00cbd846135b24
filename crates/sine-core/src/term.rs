//! Hash-consed term representation
//!
//! Every term lives in a [`TermStore`] and is referred to by a [`TermId`].
//! Structurally identical terms are interned once, so two occurrences of the
//! same sub-term always share a handle. Consumers may therefore key maps and
//! sets by `TermId` (and uninterpreted symbols by [`FuncId`]) without ever
//! comparing terms structurally.

use crate::sort::Sort;
use hashbrown::HashMap;
use num_bigint::BigInt;
use std::fmt;

/// Handle to a term in a [`TermStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub u32);

impl TermId {
    /// Index into the store's term table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Handle to an uninterpreted function (or constant) declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncId(pub u32);

impl FuncId {
    /// Index into the store's declaration table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declaration of an uninterpreted function symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Declared name
    pub name: String,
    /// Argument sorts (empty for constants)
    pub domain: Vec<Sort>,
    /// Result sort
    pub range: Sort,
}

impl FuncDecl {
    /// Number of arguments the symbol takes.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.domain.len()
    }
}

/// Interpreted (built-in) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Boolean conjunction
    And,
    /// Boolean disjunction
    Or,
    /// Boolean negation
    Not,
    /// Implication
    Implies,
    /// Exclusive or
    Xor,
    /// Equality
    Eq,
    /// Pairwise disequality
    Distinct,
    /// If-then-else
    Ite,
    /// Addition
    Add,
    /// Subtraction (or negation with one argument)
    Sub,
    /// Multiplication
    Mul,
    /// Less than
    Lt,
    /// Less or equal
    Le,
    /// Greater than
    Gt,
    /// Greater or equal
    Ge,
}

impl Op {
    const ALL: [Op; 15] = [
        Op::And,
        Op::Or,
        Op::Not,
        Op::Implies,
        Op::Xor,
        Op::Eq,
        Op::Distinct,
        Op::Ite,
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Lt,
        Op::Le,
        Op::Gt,
        Op::Ge,
    ];

    /// SMT-LIB name of the operator.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Op::And => "and",
            Op::Or => "or",
            Op::Not => "not",
            Op::Implies => "=>",
            Op::Xor => "xor",
            Op::Eq => "=",
            Op::Distinct => "distinct",
            Op::Ite => "ite",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
        }
    }

    /// Look up an operator by its SMT-LIB name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// The head symbol of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Interpreted operator
    Builtin(Op),
    /// Uninterpreted function or constant
    Func(FuncId),
}

impl Symbol {
    /// The declaration handle if this symbol is uninterpreted.
    #[must_use]
    pub fn as_func(self) -> Option<FuncId> {
        match self {
            Symbol::Func(f) => Some(f),
            Symbol::Builtin(_) => None,
        }
    }
}

/// Literal constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(BigInt),
}

/// Quantifier polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantKind {
    /// Universal quantifier
    Forall,
    /// Existential quantifier
    Exists,
}

impl QuantKind {
    /// SMT-LIB binder keyword.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            QuantKind::Forall => "forall",
            QuantKind::Exists => "exists",
        }
    }
}

/// A quantified formula.
///
/// `patterns` holds handles to [`TermData::Pattern`] nodes; each one is a
/// multi-pattern whose terms must all match for the trigger to fire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantifier {
    /// Polarity
    pub kind: QuantKind,
    /// Bound variables with their sorts
    pub vars: Vec<(String, Sort)>,
    /// Quantified body
    pub body: TermId,
    /// Trigger patterns (possibly empty)
    pub patterns: Vec<TermId>,
}

impl Quantifier {
    /// Returns true for universal quantifiers.
    #[must_use]
    pub fn is_forall(&self) -> bool {
        self.kind == QuantKind::Forall
    }

    /// Returns true for existential quantifiers.
    #[must_use]
    pub fn is_exists(&self) -> bool {
        self.kind == QuantKind::Exists
    }

    /// Returns true if at least one trigger pattern is attached.
    #[must_use]
    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }
}

/// The content of a term node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermData {
    /// Literal constant
    Const(Constant),
    /// Bound variable
    Var(String, Sort),
    /// Application of an interpreted or uninterpreted symbol
    App(Symbol, Vec<TermId>),
    /// Quantified formula
    Quant(Quantifier),
    /// Multi-pattern wrapper used as a quantifier trigger
    Pattern(Vec<TermId>),
}

/// Interning store for terms and uninterpreted declarations.
#[derive(Debug, Clone)]
pub struct TermStore {
    terms: Vec<TermData>,
    interned: HashMap<TermData, TermId>,
    funcs: Vec<FuncDecl>,
    func_names: HashMap<String, FuncId>,
    true_term: TermId,
    false_term: TermId,
}

impl Default for TermStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TermStore {
    /// Create a store containing only the Boolean literals.
    #[must_use]
    pub fn new() -> Self {
        let mut store = TermStore {
            terms: Vec::new(),
            interned: HashMap::new(),
            funcs: Vec::new(),
            func_names: HashMap::new(),
            true_term: TermId(0),
            false_term: TermId(0),
        };
        store.true_term = store.intern(TermData::Const(Constant::Bool(true)));
        store.false_term = store.intern(TermData::Const(Constant::Bool(false)));
        store
    }

    fn intern(&mut self, data: TermData) -> TermId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let id = TermId(self.terms.len() as u32);
        self.terms.push(data.clone());
        self.interned.insert(data, id);
        id
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if no term has been interned (never the case in practice).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Look up a term.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this store.
    #[must_use]
    pub fn get(&self, id: TermId) -> &TermData {
        &self.terms[id.index()]
    }

    /// Look up a term, returning `None` for foreign handles.
    #[must_use]
    pub fn try_get(&self, id: TermId) -> Option<&TermData> {
        self.terms.get(id.index())
    }

    /// Declare a new uninterpreted function. A later declaration with the
    /// same name shadows the earlier one for [`TermStore::lookup_func`].
    pub fn declare_fun(
        &mut self,
        name: impl Into<String>,
        domain: Vec<Sort>,
        range: Sort,
    ) -> FuncId {
        let name = name.into();
        let id = FuncId(self.funcs.len() as u32);
        self.func_names.insert(name.clone(), id);
        self.funcs.push(FuncDecl {
            name,
            domain,
            range,
        });
        id
    }

    /// Declare an uninterpreted constant.
    pub fn declare_const(&mut self, name: impl Into<String>, sort: Sort) -> FuncId {
        self.declare_fun(name, Vec::new(), sort)
    }

    /// Find a declaration by name.
    #[must_use]
    pub fn lookup_func(&self, name: &str) -> Option<FuncId> {
        self.func_names.get(name).copied()
    }

    /// Declaration of `f`.
    #[must_use]
    pub fn func(&self, f: FuncId) -> &FuncDecl {
        &self.funcs[f.index()]
    }

    /// All declarations in declaration order.
    pub fn funcs(&self) -> impl Iterator<Item = (FuncId, &FuncDecl)> {
        self.funcs
            .iter()
            .enumerate()
            .map(|(i, decl)| (FuncId(i as u32), decl))
    }

    /// The literal `true`.
    #[must_use]
    pub fn true_term(&self) -> TermId {
        self.true_term
    }

    /// The literal `false`.
    #[must_use]
    pub fn false_term(&self) -> TermId {
        self.false_term
    }

    /// Boolean literal.
    #[must_use]
    pub fn mk_bool(&self, value: bool) -> TermId {
        if value {
            self.true_term
        } else {
            self.false_term
        }
    }

    /// Integer literal.
    pub fn mk_int(&mut self, value: impl Into<BigInt>) -> TermId {
        self.intern(TermData::Const(Constant::Int(value.into())))
    }

    /// Bound variable.
    pub fn mk_var(&mut self, name: impl Into<String>, sort: Sort) -> TermId {
        self.intern(TermData::Var(name.into(), sort))
    }

    /// Application of an uninterpreted function.
    pub fn mk_app(&mut self, f: FuncId, args: Vec<TermId>) -> TermId {
        self.intern(TermData::App(Symbol::Func(f), args))
    }

    /// Occurrence of an uninterpreted constant.
    pub fn mk_const(&mut self, f: FuncId) -> TermId {
        self.mk_app(f, Vec::new())
    }

    /// Application of an interpreted operator. No simplification is applied.
    pub fn mk_builtin(&mut self, op: Op, args: Vec<TermId>) -> TermId {
        self.intern(TermData::App(Symbol::Builtin(op), args))
    }

    /// `(and args...)`
    pub fn mk_and(&mut self, args: Vec<TermId>) -> TermId {
        self.mk_builtin(Op::And, args)
    }

    /// `(or args...)`
    pub fn mk_or(&mut self, args: Vec<TermId>) -> TermId {
        self.mk_builtin(Op::Or, args)
    }

    /// `(not t)`
    pub fn mk_not(&mut self, t: TermId) -> TermId {
        self.mk_builtin(Op::Not, vec![t])
    }

    /// `(=> a b)`
    pub fn mk_implies(&mut self, a: TermId, b: TermId) -> TermId {
        self.mk_builtin(Op::Implies, vec![a, b])
    }

    /// `(= a b)`
    pub fn mk_eq(&mut self, a: TermId, b: TermId) -> TermId {
        self.mk_builtin(Op::Eq, vec![a, b])
    }

    /// `(ite c t e)`
    pub fn mk_ite(&mut self, c: TermId, t: TermId, e: TermId) -> TermId {
        self.mk_builtin(Op::Ite, vec![c, t, e])
    }

    /// Multi-pattern wrapper for use as a quantifier trigger.
    pub fn mk_pattern(&mut self, terms: Vec<TermId>) -> TermId {
        self.intern(TermData::Pattern(terms))
    }

    /// Quantifier of the given polarity.
    pub fn mk_quantifier(
        &mut self,
        kind: QuantKind,
        vars: Vec<(String, Sort)>,
        body: TermId,
        patterns: Vec<TermId>,
    ) -> TermId {
        self.intern(TermData::Quant(Quantifier {
            kind,
            vars,
            body,
            patterns,
        }))
    }

    /// Universal quantifier with optional trigger patterns.
    pub fn mk_forall(
        &mut self,
        vars: Vec<(String, Sort)>,
        body: TermId,
        patterns: Vec<TermId>,
    ) -> TermId {
        self.mk_quantifier(QuantKind::Forall, vars, body, patterns)
    }

    /// Existential quantifier.
    pub fn mk_exists(&mut self, vars: Vec<(String, Sort)>, body: TermId) -> TermId {
        self.mk_quantifier(QuantKind::Exists, vars, body, Vec::new())
    }

    /// Uninterpreted symbol at the head of `t`, if any.
    #[must_use]
    pub fn head_func(&self, t: TermId) -> Option<FuncId> {
        match self.try_get(t)? {
            TermData::App(sym, _) => sym.as_func(),
            _ => None,
        }
    }

    /// Render `t` in SMT-LIB syntax.
    #[must_use]
    pub fn display(&self, t: TermId) -> TermDisplay<'_> {
        TermDisplay {
            store: self,
            term: t,
        }
    }
}

/// Write a symbol name, quoting it when it is not a simple SMT-LIB symbol.
pub fn write_symbol(f: &mut impl fmt::Write, name: &str) -> fmt::Result {
    let simple = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "~!@$%^&*_+=<>.?/-".contains(c));
    if simple {
        write!(f, "{name}")
    } else {
        write!(f, "|{name}|")
    }
}

/// [`fmt::Display`] adapter returned by [`TermStore::display`].
pub struct TermDisplay<'a> {
    store: &'a TermStore,
    term: TermId,
}

/// Printer work: a term still to print, or closing text.
enum Piece {
    Term(TermId),
    Text(&'static str),
}

impl TermDisplay<'_> {
    /// Print the head of `t` and push what follows it onto `stack`.
    fn write_head(
        &self,
        f: &mut fmt::Formatter<'_>,
        t: TermId,
        stack: &mut Vec<Piece>,
    ) -> fmt::Result {
        let Some(data) = self.store.try_get(t) else {
            return write!(f, "<unknown {t}>");
        };
        match data {
            TermData::Const(Constant::Bool(b)) => write!(f, "{b}"),
            TermData::Const(Constant::Int(n)) => {
                if n.sign() == num_bigint::Sign::Minus {
                    write!(f, "(- {})", -n)
                } else {
                    write!(f, "{n}")
                }
            }
            TermData::Var(name, _) => write_symbol(f, name),
            TermData::App(sym, args) => {
                if !args.is_empty() {
                    write!(f, "(")?;
                    stack.push(Piece::Text(")"));
                }
                for &arg in args.iter().rev() {
                    stack.push(Piece::Term(arg));
                    stack.push(Piece::Text(" "));
                }
                match sym {
                    Symbol::Builtin(op) => write!(f, "{}", op.name()),
                    Symbol::Func(func) => write_symbol(f, &self.store.func(*func).name),
                }
            }
            TermData::Quant(q) => {
                write!(f, "({} (", q.kind.keyword())?;
                for (i, (name, sort)) in q.vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "(")?;
                    write_symbol(f, name)?;
                    write!(f, " {sort})")?;
                }
                write!(f, ") ")?;
                stack.push(Piece::Text(")"));
                if q.has_patterns() {
                    write!(f, "(! ")?;
                    stack.push(Piece::Text(")"));
                    for &p in q.patterns.iter().rev() {
                        stack.push(Piece::Term(p));
                        stack.push(Piece::Text(" :pattern "));
                    }
                }
                stack.push(Piece::Term(q.body));
                Ok(())
            }
            TermData::Pattern(terms) => {
                write!(f, "(")?;
                stack.push(Piece::Text(")"));
                for (i, &term) in terms.iter().enumerate().rev() {
                    stack.push(Piece::Term(term));
                    if i > 0 {
                        stack.push(Piece::Text(" "));
                    }
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Term(self.term)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Term(t) => self.write_head(f, t, &mut stack)?,
                Piece::Text(text) => f.write_str(text)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uninterpreted() -> Sort {
        Sort::Uninterpreted("U".to_string())
    }

    #[test]
    fn test_hash_consing_shares_identical_terms() {
        let mut store = TermStore::new();
        let p = store.declare_fun("P", vec![uninterpreted()], Sort::Bool);
        let a = store.declare_const("a", uninterpreted());

        let a1 = store.mk_const(a);
        let a2 = store.mk_const(a);
        assert_eq!(a1, a2);

        let pa1 = store.mk_app(p, vec![a1]);
        let pa2 = store.mk_app(p, vec![a2]);
        assert_eq!(pa1, pa2);
    }

    #[test]
    fn test_distinct_declarations_with_same_name_are_distinct_symbols() {
        let mut store = TermStore::new();
        let a = store.declare_const("a", Sort::Int);
        let a_shadow = store.declare_const("a", Sort::Int);
        assert_ne!(a, a_shadow);
        assert_ne!(store.mk_const(a), store.mk_const(a_shadow));
        assert_eq!(store.lookup_func("a"), Some(a_shadow));
    }

    #[test]
    fn test_boolean_literals_are_preinterned() {
        let store = TermStore::new();
        assert_eq!(store.len(), 2);
        assert_eq!(store.mk_bool(true), store.true_term());
        assert_eq!(store.mk_bool(false), store.false_term());
        assert_ne!(store.true_term(), store.false_term());
    }

    #[test]
    fn test_head_func() {
        let mut store = TermStore::new();
        let f = store.declare_fun("f", vec![Sort::Int], Sort::Int);
        let one = store.mk_int(1);
        let f1 = store.mk_app(f, vec![one]);
        let sum = store.mk_builtin(Op::Add, vec![f1, one]);

        assert_eq!(store.head_func(f1), Some(f));
        assert_eq!(store.head_func(sum), None);
        assert_eq!(store.head_func(one), None);
        assert_eq!(store.head_func(TermId(999)), None);
    }

    #[test]
    fn test_op_names_round_trip() {
        for op in Op::ALL {
            assert_eq!(Op::from_name(op.name()), Some(op));
        }
        assert_eq!(Op::from_name("select"), None);
    }

    #[test]
    fn test_display_quantifier_with_pattern() {
        let mut store = TermStore::new();
        let p = store.declare_fun("P", vec![Sort::Int], Sort::Bool);
        let q = store.declare_fun("Q", vec![Sort::Int], Sort::Bool);
        let x = store.mk_var("x", Sort::Int);
        let px = store.mk_app(p, vec![x]);
        let qx = store.mk_app(q, vec![x]);
        let body = store.mk_implies(px, qx);
        let pat = store.mk_pattern(vec![px]);
        let forall = store.mk_forall(vec![("x".to_string(), Sort::Int)], body, vec![pat]);

        assert_eq!(
            store.display(forall).to_string(),
            "(forall ((x Int)) (! (=> (P x) (Q x)) :pattern ((P x))))"
        );
    }

    #[test]
    fn test_display_quotes_unusual_symbols_and_negative_ints() {
        let mut store = TermStore::new();
        let c = store.declare_const("has space", Sort::Int);
        let k = store.mk_const(c);
        let neg = store.mk_int(-3);
        let eq = store.mk_eq(k, neg);
        assert_eq!(store.display(eq).to_string(), "(= |has space| (- 3))");
    }

    #[test]
    fn test_display_multi_patterns() {
        let mut store = TermStore::new();
        let f = store.declare_fun("f", vec![Sort::Int, Sort::Int], Sort::Int);
        let x = store.mk_var("x", Sort::Int);
        let y = store.mk_var("y", Sort::Int);
        let fxy = store.mk_app(f, vec![x, y]);
        let fyx = store.mk_app(f, vec![y, x]);
        let body = store.mk_eq(fxy, fyx);
        let both = store.mk_pattern(vec![fxy, fyx]);
        let one = store.mk_pattern(vec![fxy]);
        let vars = vec![("x".to_string(), Sort::Int), ("y".to_string(), Sort::Int)];
        let forall = store.mk_forall(vars, body, vec![both, one]);

        assert_eq!(
            store.display(forall).to_string(),
            "(forall ((x Int) (y Int)) (! (= (f x y) (f y x)) \
             :pattern ((f x y) (f y x)) :pattern ((f x y))))"
        );
    }

    #[test]
    fn test_display_deeply_nested_term() {
        let mut store = TermStore::new();
        let g = store.declare_fun("g", vec![Sort::Int], Sort::Int);
        let mut t = store.mk_int(0);
        for _ in 0..100_000 {
            t = store.mk_app(g, vec![t]);
        }
        let printed = store.display(t).to_string();
        assert!(printed.starts_with("(g (g (g "));
        assert_eq!(printed.matches('(').count(), 100_000);
        assert!(printed.ends_with(" 0))"));
    }
}
