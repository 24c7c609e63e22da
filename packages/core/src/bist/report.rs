//! Отчёты BIST: JSON на диск и текстовая сводка

use crate::bist::suite::BistSuite;
use crate::crypto::levels::VectorFamily;
use crate::utils::error::Result;
use crate::utils::serialization::to_json_pretty;
use std::fmt::Write as _;
use std::path::Path;

const WIDE_RULE: usize = 80;
const NARROW_RULE: usize = 40;

/// Записать плоский массив векторов. Возвращает число записанных байт.
pub fn save_test_vectors(suite: &BistSuite, path: impl AsRef<Path>) -> Result<usize> {
    let json = to_json_pretty(&suite.test_vectors())?;
    std::fs::write(path.as_ref(), &json)?;
    tracing::info!(
        target: "bist::report",
        path = %path.as_ref().display(),
        vectors = suite.test_vectors().len(),
        "Saved test vectors"
    );
    Ok(json.len())
}

/// Записать полное состояние suite. Возвращает число записанных байт.
pub fn save_report(suite: &BistSuite, path: impl AsRef<Path>) -> Result<usize> {
    let json = to_json_pretty(suite)?;
    std::fs::write(path.as_ref(), &json)?;
    tracing::info!(
        target: "bist::report",
        path = %path.as_ref().display(),
        bytes = json.len(),
        "Saved BIST report"
    );
    Ok(json.len())
}

/// Человекочитаемая сводка: итоги, результаты по категориям, сводка по векторам
pub fn render_summary(suite: &BistSuite) -> String {
    let mut out = String::new();
    // Запись в String не завершается ошибкой
    let _ = write_summary(&mut out, suite);
    out
}

fn write_summary(out: &mut String, suite: &BistSuite) -> std::fmt::Result {
    let wide = "=".repeat(WIDE_RULE);

    writeln!(out, "{}", wide)?;
    writeln!(out, "POST-QUANTUM CRYPTOGRAPHY BIST COMPREHENSIVE REPORT")?;
    writeln!(out, "{}", wide)?;

    writeln!(out, "Run ID: {}", suite.run_id())?;
    if let Some(end) = suite.end_time() {
        let elapsed = (end - suite.start_time()).to_std().unwrap_or_default();
        writeln!(out, "Execution Time: {:?}", elapsed)?;
    }
    writeln!(out, "Total Tests: {}", suite.total_tests())?;
    writeln!(out, "Passed: {}", suite.passed_tests())?;
    writeln!(out, "Failed: {}", suite.failed_tests())?;
    writeln!(out, "Success Rate: {:.1}%", suite.pass_rate() * 100.0)?;
    writeln!(out, "Test Vectors: {}", suite.test_vectors().len())?;
    writeln!(out, "Exit Criteria Met: {}", suite.exit_criteria_met())?;

    writeln!(out)?;
    writeln!(out, "DETAILED RESULTS:")?;
    writeln!(out, "{}", "-".repeat(WIDE_RULE))?;

    for (category, results) in suite.grouped() {
        writeln!(out)?;
        writeln!(out, "{}:", category.label())?;
        for result in results {
            write!(
                out,
                "  {:<15} {:<35} [{}] {:>10}",
                result.algorithm,
                result.test_name,
                result.status(),
                format!("{:?}", result.execution_time)
            )?;
            if let Some(iterations) = result.iterations {
                write!(out, " ({} iter)", iterations)?;
            }
            if let Some(vectors) = result.test_vectors {
                write!(out, " ({} vectors)", vectors)?;
            }
            writeln!(out)?;

            if let (false, Some(message)) = (result.passed, &result.error_message) {
                writeln!(out, "    Error: {}", message)?;
            }
        }
    }

    let valid = suite.test_vectors().iter().filter(|v| v.expected_result).count();
    let invalid = suite.test_vectors().len() - valid;

    writeln!(out)?;
    writeln!(out, "TEST VECTOR SUMMARY:")?;
    writeln!(out, "{}", "-".repeat(NARROW_RULE))?;
    writeln!(out, "KEM Test Vectors: {}", suite.vector_count(VectorFamily::Kem))?;
    writeln!(out, "Signature Test Vectors: {}", suite.vector_count(VectorFamily::Signature))?;
    writeln!(out, "Valid Cases: {}", valid)?;
    writeln!(out, "Invalid Cases: {}", invalid)?;
    writeln!(out, "Total: {}", suite.test_vectors().len())?;
    writeln!(out, "{}", wide)?;

    Ok(())
}
