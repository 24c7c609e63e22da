//! pqc-bist entry point.
//!
//! ## CLI
//!
//! - `pqc-bist --bist [--vectors-out PATH] [--report-out PATH] [--quick]` - run the self-test
//! - `pqc-bist help` / `pqc-bist version`
//!
//! Exit code is the exit-criteria verdict: 0 pass, 1 fail, 2 usage error.

use anyhow::{anyhow, Context};
use pqc_bist::bist::{report, validate_test_vector, BistRunner, ThresholdTable};
use pqc_bist::config::Config;
use pqc_bist::crypto::PostQuantumSuiteProvider;
use pqc_bist::utils::logging::init_logging;

type Suite = PostQuantumSuiteProvider;

/// Число векторов в демонстрации ad hoc проверки
const ADHOC_VALIDATION_COUNT: usize = 5;
const QUICK_KEM_STRESS_ITERATIONS: u32 = 5;
const QUICK_SIGNATURE_STRESS_ITERATIONS: u32 = 2;

#[derive(Debug, Default, PartialEq)]
struct BistOptions {
    vectors_out: Option<String>,
    report_out: Option<String>,
    quick: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Bist(BistOptions),
    Help,
    Version,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let code = match parse_args(&args) {
        Ok(Command::Help) => {
            print_usage();
            0
        }
        Ok(Command::Version) => {
            println!("pqc-bist {}", env!("CARGO_PKG_VERSION"));
            0
        }
        Ok(Command::Bist(options)) => match run_bist(options) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("BIST error: {:#}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            2
        }
    };

    std::process::exit(code);
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut options = BistOptions::default();
    let mut bist = false;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--bist" | "bist" => bist = true,
            "--quick" => options.quick = true,
            "--vectors-out" => {
                let path = iter.next().ok_or_else(|| anyhow!("--vectors-out requires a path"))?;
                options.vectors_out = Some(path.clone());
            }
            "--report-out" => {
                let path = iter.next().ok_or_else(|| anyhow!("--report-out requires a path"))?;
                options.report_out = Some(path.clone());
            }
            "help" | "--help" | "-h" => return Ok(Command::Help),
            "version" | "--version" | "-V" => return Ok(Command::Version),
            other => return Err(anyhow!("Unknown argument: {}", other)),
        }
    }

    if bist {
        Ok(Command::Bist(options))
    } else {
        Err(anyhow!("No mode selected"))
    }
}

fn run_bist(options: BistOptions) -> anyhow::Result<i32> {
    let mut config = Config::from_env();
    if let Some(path) = options.vectors_out {
        config.vectors_output_path = path;
    }
    if let Some(path) = options.report_out {
        config.report_output_path = path;
    }
    if options.quick {
        config.kem_stress_iterations = QUICK_KEM_STRESS_ITERATIONS;
        config.signature_stress_iterations = QUICK_SIGNATURE_STRESS_ITERATIONS;
    }

    init_logging(&config.log_level, config.log_format).context("failed to initialize logging")?;
    Config::init_with(config).map_err(|e| anyhow!(e))?;
    let config = Config::global();

    println!("Post-Quantum Cryptography BIST");
    println!("{}", "=".repeat(80));

    let run = BistRunner::<Suite>::new(config.clone(), ThresholdTable::default_thresholds()).run();
    let suite = &run.suite;

    print!("{}", report::render_summary(suite));

    // Ошибки записи отчётов не меняют вердикт
    match report::save_test_vectors(suite, &config.vectors_output_path) {
        Ok(_) => println!("Saved test vectors to: {}", config.vectors_output_path),
        Err(e) => eprintln!("Warning: failed to save test vectors: {}", e),
    }
    match report::save_report(suite, &config.report_output_path) {
        Ok(bytes) => println!(
            "Saved BIST report to: {} ({} bytes)",
            config.report_output_path, bytes
        ),
        Err(e) => eprintln!("Warning: failed to save BIST report: {}", e),
    }

    println!();
    println!("Exit Criteria Evaluation:");
    println!("  Critical Tests Passed: {}", run.exit_report.critical_tests_passed);
    println!(
        "  Overall Pass Rate: {:.1}% (required: {:.1}%)",
        run.exit_report.pass_rate * 100.0,
        config.min_pass_rate * 100.0
    );
    println!(
        "  Test Vectors Generated: {} (KEM: {}, SIG: {})",
        run.exit_report.total_vectors,
        run.exit_report.kem_vectors,
        run.exit_report.signature_vectors
    );
    println!("  Vector Requirements Met: {}", run.exit_report.vector_requirements_met);
    println!("  EXIT CRITERIA MET: {}", run.exit_report.exit_criteria_met);

    if !suite.exit_criteria_met() {
        println!();
        println!("BIST FAILED - exit criteria not met");
        for error in suite.errors() {
            println!("  - {}", error);
        }
    } else {
        println!();
        println!("BIST PASSED - all exit criteria met");
    }

    println!();
    println!("Test vector validation demonstration:");
    for vector in suite.test_vectors().iter().take(ADHOC_VALIDATION_COUNT) {
        match validate_test_vector::<Suite>(vector) {
            Ok(()) => println!("  [PASS] {}: {}", vector.id, vector.description),
            Err(failure) => println!("  [FAIL] {}: {}", vector.id, failure),
        }
    }

    Ok(run.exit_code())
}

fn print_usage() {
    eprintln!(
        "pqc-bist v{}

USAGE:
    pqc-bist --bist [OPTIONS]
    pqc-bist help | version

OPTIONS:
    --vectors-out PATH   Test vector JSON output (default: pqc_test_vectors.json)
    --report-out PATH    Full BIST report JSON output (default: pqc_bist_report.json)
    --quick              Fewer stress-test iterations (5 KEM / 2 signature)

ENVIRONMENT:
    BIST_KEM_VECTORS_PER_LEVEL, BIST_KEM_STRESS_ITERATIONS,
    BIST_SIGNATURE_STRESS_ITERATIONS, BIST_MIN_PASS_RATE, BIST_MIN_KEM_VECTORS,
    BIST_MIN_SIGNATURE_VECTORS, BIST_DISABLE_THRESHOLDS, BIST_VECTORS_OUTPUT,
    BIST_REPORT_OUTPUT, BIST_LOG (default: info), BIST_LOG_FORMAT (pretty|json)

EXIT CODES:
    0  Exit criteria met
    1  Exit criteria not met
    2  Usage error",
        env!("CARGO_PKG_VERSION")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_bist_with_options() {
        let command = parse_args(&args(&["--bist", "--quick", "--report-out", "r.json"])).unwrap();
        assert_eq!(
            command,
            Command::Bist(BistOptions {
                vectors_out: None,
                report_out: Some("r.json".to_string()),
                quick: true,
            })
        );
    }

    #[test]
    fn test_parse_requires_mode() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&args(&["--quick"])).is_err());
        assert!(parse_args(&args(&["--bist", "--vectors-out"])).is_err());
        assert!(parse_args(&args(&["--bist", "--frobnicate"])).is_err());
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse_args(&args(&["help"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["--version"])).unwrap(), Command::Version);
    }
}
