//! sine CLI
//!
//! Reads an SMT-LIB 2 script, drops the assertions that are not relevant to
//! the last one, and prints the reduced script.
//!
//! ```text
//! sine problem.smt2 > reduced.smt2
//! sine --stats -v -o reduced.smt2 problem.smt2
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use sine_filter::{ParamValue, SineTactic, Tactic};
use sine_frontend::parse_script;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "sine")]
#[command(about = "Sine Qua Non premise selection for SMT-LIB problems")]
#[command(version)]
struct Cli {
    /// SMT-LIB 2 input file (`-` for stdin)
    file: PathBuf,

    /// Write the reduced script here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print filter statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Tactic parameter, e.g. `sine.verbose=true` (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Parse `key=value`; values are read as bool, then unsigned, then string.
fn parse_param(setting: &str) -> Result<(&str, ParamValue)> {
    let Some((key, value)) = setting.split_once('=') else {
        bail!("expected KEY=VALUE, got `{setting}`");
    };
    let value = if let Ok(b) = value.parse::<bool>() {
        ParamValue::Bool(b)
    } else if let Ok(n) = value.parse::<u64>() {
        ParamValue::Uint(n)
    } else {
        ParamValue::Str(value.to_string())
    };
    Ok((key.trim(), value))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Run the filter over `input`, returning the reduced script.
fn reduce(input: &str, params: &[String], show_stats: bool) -> Result<String> {
    let mut tactic = SineTactic::default();
    for setting in params {
        let (key, value) = parse_param(setting)?;
        if !tactic.update_param(key, &value) {
            let known: Vec<_> = tactic.param_descrs().iter().map(|d| d.name).collect();
            bail!("unknown parameter `{key}={value}` (known: {})", known.join(", "));
        }
    }

    let script = parse_script(input).context("failed to parse input")?;
    let goal = script.to_goal();
    debug!(assertions = goal.len(), "parsed script");

    let out = tactic
        .apply(script.terms(), goal)
        .with_context(|| format!("{} failed", tactic.name()))?;
    let Some(reduced) = out.goals.first() else {
        bail!("{} produced no goal", tactic.name());
    };
    info!(
        kept = out.stats.formulas_out,
        dropped = out.stats.formulas_dropped(),
        "premise selection done"
    );
    if show_stats {
        eprintln!("{}", out.stats);
    }

    Ok(script.to_smtlib_filtered(reduced.formulas()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let input = read_input(&cli.file)?;
    let reduced = reduce(&input, &cli.params, cli.stats)?;

    match &cli.output {
        Some(path) => std::fs::write(path, reduced)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{reduced}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PROBLEM: &str = "(set-logic UF)
(declare-sort U 0)
(declare-fun P (U) Bool)
(declare-fun Q (U) Bool)
(declare-const a U)
(declare-const b U)
(assert (Q b))
(assert (forall ((x U)) (! (=> (P x) (not (P x))) :pattern ((P x)))))
(assert (P a))
(check-sat)
";

    #[test]
    fn test_reduce_drops_unrelated_assertion() {
        let reduced = reduce(PROBLEM, &[], false).unwrap();
        assert!(!reduced.contains("(assert (Q b))"));
        assert!(reduced.contains("(assert (P a))"));
        assert!(reduced.contains(":pattern ((P x))"));
        assert!(reduced.contains("(declare-fun Q (U) Bool)"));
        assert!(reduced.ends_with("(check-sat)\n"));
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PROBLEM.as_bytes()).unwrap();
        assert_eq!(read_input(file.path()).unwrap(), PROBLEM);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(&dir.path().join("missing.smt2")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_params() {
        assert_eq!(
            parse_param("sine.verbose=true").unwrap(),
            ("sine.verbose", ParamValue::Bool(true))
        );
        assert_eq!(parse_param("k=3").unwrap().1, ParamValue::Uint(3));
        assert!(parse_param("novalue").is_err());

        assert!(reduce(PROBLEM, &["sine.verbose=true".to_string()], false).is_ok());
        let err = reduce(PROBLEM, &["sine.depth=2".to_string()], false).unwrap_err();
        assert!(err.to_string().contains("unknown parameter"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = reduce("(assert (P a)", &[], false).unwrap_err();
        assert!(err.to_string().contains("failed to parse input"));
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::parse_from(["sine", "-vv", "--stats", "-o", "out.smt2", "in.smt2"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.stats);
        assert_eq!(cli.output, Some(PathBuf::from("out.smt2")));
        assert_eq!(cli.file, PathBuf::from("in.smt2"));
    }
}
