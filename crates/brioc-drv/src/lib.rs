//! brioc-drv - Driver
//!
//! Entry point and orchestrator for the Brio front-end pipeline:
//!
//! ```text
//!   Source file (.brio)
//!        │
//!        ▼
//!   [brioc-lex / brioc-par] ──▶ parse tree
//!        │
//!        ▼
//!   [brioc-sem] ──▶ diagnostics + scope tree
//!        │
//!        ▼
//!   report: success line or diagnostic list, then the symbol table
//! ```
//!
//! Exit codes: 0 on a clean analysis, 1 on any diagnostic or pipeline
//! failure, 2 on a command-line error.
//!
//! A syntax error aborts the run before the analyzer starts: the semantic
//! phase only accepts well-formed trees. Semantic diagnostics never abort;
//! they are all collected and printed together.

pub mod table;

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Driver configuration: what to analyze.
#[derive(Debug)]
pub struct Config {
    pub source_path: PathBuf,
}

impl Config {
    /// Build the configuration from command-line arguments (without the
    /// program name). Exactly one positional argument: the source path.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Config> {
        let source_path = args
            .next()
            .ok_or_else(|| anyhow!("Uso: brioc <archivo.brio>"))?;
        if args.next().is_some() {
            return Err(anyhow!("Uso: brioc <archivo.brio>"));
        }
        Ok(Config {
            source_path: PathBuf::from(source_path),
        })
    }
}

/// Run the whole pipeline over the configured source file.
///
/// Prints the analysis report to stdout and returns whether the analysis
/// was clean. Read and syntax failures surface as errors.
pub fn run(config: &Config) -> Result<bool> {
    let source = fs::read_to_string(&config.source_path)
        .with_context(|| format!("no se pudo leer {}", config.source_path.display()))?;

    let program =
        brioc_par::parse(&source).map_err(|e| anyhow!("error de sintaxis: {e}"))?;

    let analysis = brioc_sem::analyze(&program);

    if analysis.reporter.has_errors() {
        println!("Errores semánticos encontrados:");
        for diag in &analysis.reporter {
            println!("    {diag}");
        }
    } else {
        println!("Análisis semántico completado sin errores.");
    }

    println!();
    print!("{}", table::render_symbol_table(&analysis.scopes));

    Ok(!analysis.reporter.has_errors())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_takes_one_positional() {
        let config = Config::from_args(["programa.brio".to_string()].into_iter()).unwrap();
        assert_eq!(config.source_path, PathBuf::from("programa.brio"));
    }

    #[test]
    fn test_config_rejects_missing_argument() {
        assert!(Config::from_args(std::iter::empty()).is_err());
    }

    #[test]
    fn test_config_rejects_extra_arguments() {
        let args = ["a.brio".to_string(), "b.brio".to_string()];
        assert!(Config::from_args(args.into_iter()).is_err());
    }
}
