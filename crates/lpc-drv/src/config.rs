//! Hand-rolled argument parsing: no `clap`, matching the plain `-flag`
//! loop the rest of this toolchain's CLI contract was distilled from.

use std::path::PathBuf;

/// Optimization level, `0..=3`. Stored as a raw `u8` rather than an enum
/// because both `lpc-gen` and the linker map it by threshold (`>=3`
/// aggressive, `else` by exact value), not by exhaustive match.
pub type OptLevel = u8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub emit_llvm: bool,
    pub opt_level: OptLevel,
    pub verbose: bool,
}

/// What a parsed command line asks the driver to do. Kept distinct from
/// `Config` so `--version`/`--help` can short-circuit without ever
/// constructing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    Run(Config),
    PrintVersion,
    PrintHelp,
}

/// Usage text, printed to stderr on a bare invocation or `--help`.
pub fn usage(prog: &str) -> String {
    format!(
        "Lambda Photon {}\nUsage: {prog} <input.lp> [options]\nOptions:\n  \
         -o <file>       Output file\n  \
         --emit-llvm     Output LLVM IR only\n  \
         -O<n>           Optimization level (0-3)\n  \
         --version       Show version\n  \
         --help          Show this message\n",
        crate::VERSION,
    )
}

impl Config {
    /// Parses `argv[1..]` (the program name is not part of `args`).
    ///
    /// Mirrors the reference's single left-to-right scan: an argument
    /// not starting with `-` is the input path (last one wins), `-o`
    /// consumes the following argument, `-O<n>` reads its digit off the
    /// same token, and anything else starting with `-` that isn't
    /// recognized is silently ignored rather than rejected.
    pub fn parse(args: &[String]) -> Result<ConfigAction, CliError> {
        if args.is_empty() {
            return Err(CliError::NoArguments);
        }

        let mut input: Option<PathBuf> = None;
        let mut output = PathBuf::from("a.out");
        let mut emit_llvm = false;
        let mut opt_level: OptLevel = 2;
        let mut verbose = false;

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            if let Some(rest) = arg.strip_prefix('-') {
                if arg == "-o" {
                    if let Some(next) = args.get(i + 1) {
                        output = PathBuf::from(next);
                        i += 1;
                    }
                } else if arg == "--emit-llvm" {
                    emit_llvm = true;
                } else if arg == "--verbose" {
                    verbose = true;
                } else if arg == "--version" {
                    return Ok(ConfigAction::PrintVersion);
                } else if arg == "--help" || arg == "-h" {
                    return Ok(ConfigAction::PrintHelp);
                } else if let Some(digit) = rest.strip_prefix('O').and_then(|d| d.chars().next()) {
                    if let Some(n) = digit.to_digit(10) {
                        opt_level = n as OptLevel;
                    }
                }
            } else {
                input = Some(PathBuf::from(arg));
            }
            i += 1;
        }

        match input {
            Some(input) => Ok(ConfigAction::Run(Config {
                input,
                output,
                emit_llvm,
                opt_level,
                verbose,
            })),
            None => Err(CliError::NoInput),
        }
    }
}

/// Splits the reference's single "missing input" outcome into the two
/// distinct cases it actually prints differently for: an entirely bare
/// invocation gets usage text, a flag-only one gets `E: no input`. Both
/// exit `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliError {
    NoArguments,
    NoInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_is_no_arguments() {
        assert_eq!(Config::parse(&[]), Err(CliError::NoArguments));
    }

    #[test]
    fn flags_with_no_positional_is_no_input() {
        let result = Config::parse(&args(&["-O2", "--emit-llvm"]));
        assert_eq!(result, Err(CliError::NoInput));
    }

    #[test]
    fn defaults_are_opt_level_2_and_a_dot_out() {
        let action = Config::parse(&args(&["main.lp"])).unwrap();
        match action {
            ConfigAction::Run(cfg) => {
                assert_eq!(cfg.opt_level, 2);
                assert_eq!(cfg.output, PathBuf::from("a.out"));
                assert!(!cfg.emit_llvm);
                assert!(!cfg.verbose);
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn o_flag_consumes_the_following_argument() {
        let action = Config::parse(&args(&["main.lp", "-o", "out"])).unwrap();
        match action {
            ConfigAction::Run(cfg) => assert_eq!(cfg.output, PathBuf::from("out")),
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn last_positional_wins() {
        let action = Config::parse(&args(&["first.lp", "second.lp"])).unwrap();
        match action {
            ConfigAction::Run(cfg) => assert_eq!(cfg.input, PathBuf::from("second.lp")),
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn o_digit_sets_opt_level() {
        let action = Config::parse(&args(&["main.lp", "-O3"])).unwrap();
        match action {
            ConfigAction::Run(cfg) => assert_eq!(cfg.opt_level, 3),
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn version_short_circuits_before_any_input_check() {
        let action = Config::parse(&args(&["--version"])).unwrap();
        assert!(matches!(action, ConfigAction::PrintVersion));
    }

    #[test]
    fn help_short_circuits_via_either_spelling() {
        assert!(matches!(
            Config::parse(&args(&["--help"])).unwrap(),
            ConfigAction::PrintHelp
        ));
        assert!(matches!(
            Config::parse(&args(&["-h"])).unwrap(),
            ConfigAction::PrintHelp
        ));
    }

    #[test]
    fn unrecognized_dash_flag_is_ignored_not_rejected() {
        let action = Config::parse(&args(&["--bogus", "main.lp"])).unwrap();
        assert!(matches!(action, ConfigAction::Run(_)));
    }
}
