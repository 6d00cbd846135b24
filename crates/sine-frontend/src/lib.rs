//! SINE Frontend - SMT-LIB 2 input and output
//!
//! Reads the uninterpreted-function fragment of SMT-LIB 2 (with integer
//! arithmetic and quantifiers carrying `:pattern` annotations) into a
//! [`sine_core::TermStore`], and prints scripts back out.
//!
//! ```
//! let script = sine_frontend::parse_script(
//!     "(declare-fun P (Int) Bool) (assert (P 1)) (check-sat)",
//! )
//! .unwrap();
//! assert_eq!(script.assertions().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod elaborate;
pub mod lexer;
pub mod script;
pub mod sexp;

pub use elaborate::{Context, ElaborateError};
pub use script::{Command, Script};
pub use sexp::{parse_sexp, parse_sexps, ParseError, SExpr};

/// Parse and elaborate a complete SMT-LIB script.
pub fn parse_script(input: &str) -> Result<Script, ElaborateError> {
    let mut ctx = Context::new();
    for sexp in parse_sexps(input)? {
        ctx.process_command(&sexp)?;
    }
    Ok(ctx.into_script())
}
