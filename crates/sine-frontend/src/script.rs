//! Elaborated SMT-LIB scripts and their printer.

use crate::sexp::SExpr;
use sine_core::term::write_symbol;
use sine_core::{FuncId, Goal, TermId, TermStore};
use std::fmt::{self, Write};

/// One elaborated top-level command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `(declare-sort name 0)`
    DeclareSort(String),
    /// `(declare-fun ...)` or `(declare-const ...)`
    DeclareFun(FuncId),
    /// `(assert t)`
    Assert(TermId),
    /// Any other command, reprinted as read
    Verbatim(SExpr),
}

/// A script: its terms plus the commands in input order.
pub struct Script {
    terms: TermStore,
    commands: Vec<Command>,
}

impl Script {
    pub(crate) fn new(terms: TermStore, commands: Vec<Command>) -> Self {
        Script { terms, commands }
    }

    /// Term store owning every asserted formula.
    #[must_use]
    pub fn terms(&self) -> &TermStore {
        &self.terms
    }

    /// Commands in input order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Asserted formulas in input order.
    #[must_use]
    pub fn assertions(&self) -> Vec<TermId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Assert(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// The assertions as a goal; the last assertion is the conjecture.
    #[must_use]
    pub fn to_goal(&self) -> Goal {
        Goal::from_formulas(self.assertions())
    }

    /// Print the whole script.
    #[must_use]
    pub fn to_smtlib(&self) -> String {
        self.to_string()
    }

    /// Print the script keeping only the assertions in `kept`.
    ///
    /// `kept` must be a subsequence of [`Script::assertions`]; assertions are
    /// matched against it in order, so duplicates are resolved left to right.
    #[must_use]
    pub fn to_smtlib_filtered(&self, kept: &[TermId]) -> String {
        FilteredScript { script: self, kept }.to_string()
    }

    fn render(&self, out: &mut impl Write, mut keep: impl FnMut(TermId) -> bool) -> fmt::Result {
        for cmd in &self.commands {
            match cmd {
                Command::Assert(t) if !keep(*t) => {}
                Command::Assert(t) => writeln!(out, "(assert {})", self.terms.display(*t))?,
                Command::DeclareSort(name) => {
                    out.write_str("(declare-sort ")?;
                    write_symbol(out, name)?;
                    writeln!(out, " 0)")?;
                }
                Command::DeclareFun(f) => self.write_declaration(out, *f)?,
                Command::Verbatim(sexp) => writeln!(out, "{sexp}")?,
            }
        }
        Ok(())
    }

    fn write_declaration(&self, out: &mut impl Write, f: FuncId) -> fmt::Result {
        let decl = self.terms.func(f);
        out.write_str("(declare-fun ")?;
        write_symbol(out, &decl.name)?;
        out.write_str(" (")?;
        for (i, sort) in decl.domain.iter().enumerate() {
            if i > 0 {
                out.write_char(' ')?;
            }
            write!(out, "{sort}")?;
        }
        writeln!(out, ") {})", decl.range)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, |_| true)
    }
}

/// A script printed with only some of its assertions.
struct FilteredScript<'a> {
    script: &'a Script,
    kept: &'a [TermId],
}

impl fmt::Display for FilteredScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut next = self.kept.iter().peekable();
        self.script.render(f, |t| {
            if next.peek() == Some(&&t) {
                next.next();
                true
            } else {
                false
            }
        })
    }
}
