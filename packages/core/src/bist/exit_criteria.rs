//! Критерии выхода (go / no-go)
//!
//! Вердикт = AND четырёх условий:
//! 1. все критические тесты присутствуют и пройдены;
//! 2. доля пройденных тестов >= `min_pass_rate`;
//! 3. векторов KEM и подписи не меньше минимумов;
//! 4. корпус не пуст.

use crate::bist::suite::BistSuite;
use crate::config::Config;
use crate::crypto::levels::VectorFamily;
use serde::Serialize;

pub const KEM_VECTOR_VALIDATION_ID: &str = "KEM-BIST-001";
pub const SIGNATURE_VECTOR_VALIDATION_ID: &str = "SIG-BIST-001";
pub const INTERFERENCE_TEST_ID: &str = "CROSS-VAL-001";

pub const CRITICAL_TESTS: [&str; 3] = [
    KEM_VECTOR_VALIDATION_ID,
    SIGNATURE_VECTOR_VALIDATION_ID,
    INTERFERENCE_TEST_ID,
];

#[derive(Debug, Clone, PartialEq)]
pub struct ExitPolicy {
    pub critical_tests: Vec<String>,
    pub min_pass_rate: f64,
    pub min_kem_vectors: usize,
    /// 42 по умолчанию: пустое сообщение не получает вектора с чужим сообщением
    pub min_signature_vectors: usize,
}

/// Подробности оценки (для логов и отчёта)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitCriteriaReport {
    pub critical_tests_passed: bool,
    /// Критические тесты, которые отсутствуют или не прошли
    pub failed_critical_tests: Vec<String>,
    pub pass_rate: f64,
    pub pass_rate_met: bool,
    pub total_vectors: usize,
    pub kem_vectors: usize,
    pub signature_vectors: usize,
    pub vector_requirements_met: bool,
    pub exit_criteria_met: bool,
}

impl ExitCriteriaReport {
    pub fn exit_code(&self) -> i32 {
        exit_code(self.exit_criteria_met)
    }
}

pub fn exit_code(exit_criteria_met: bool) -> i32 {
    if exit_criteria_met {
        0
    } else {
        1
    }
}

impl Default for ExitPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ExitPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            critical_tests: CRITICAL_TESTS.iter().map(|id| id.to_string()).collect(),
            min_pass_rate: config.min_pass_rate,
            min_kem_vectors: config.min_kem_vectors,
            min_signature_vectors: config.min_signature_vectors,
        }
    }

    /// Оценить состояние suite. Не зависит ни от чего, кроме результатов и корпуса.
    pub fn assess(&self, suite: &BistSuite) -> ExitCriteriaReport {
        let failed_critical_tests: Vec<String> = self
            .critical_tests
            .iter()
            .filter(|id| !suite.result(id).map(|r| r.passed).unwrap_or(false))
            .cloned()
            .collect();
        let critical_tests_passed = failed_critical_tests.is_empty();

        let pass_rate = suite.pass_rate();
        let pass_rate_met = pass_rate >= self.min_pass_rate;

        let kem_vectors = suite.vector_count(VectorFamily::Kem);
        let signature_vectors = suite.vector_count(VectorFamily::Signature);
        let total_vectors = suite.test_vectors().len();
        let vector_requirements_met =
            kem_vectors >= self.min_kem_vectors && signature_vectors >= self.min_signature_vectors;

        let exit_criteria_met =
            critical_tests_passed && pass_rate_met && vector_requirements_met && total_vectors > 0;

        ExitCriteriaReport {
            critical_tests_passed,
            failed_critical_tests,
            pass_rate,
            pass_rate_met,
            total_vectors,
            kem_vectors,
            signature_vectors,
            vector_requirements_met,
            exit_criteria_met,
        }
    }

    /// Оценить и записать вердикт в suite
    pub fn evaluate(&self, suite: &mut BistSuite) -> ExitCriteriaReport {
        let report = self.assess(suite);
        suite.record_exit_criteria(report.exit_criteria_met);

        tracing::info!(
            target: "bist::exit_criteria",
            critical_tests_passed = report.critical_tests_passed,
            pass_rate = report.pass_rate,
            required_pass_rate = self.min_pass_rate,
            total_vectors = report.total_vectors,
            kem_vectors = report.kem_vectors,
            signature_vectors = report.signature_vectors,
            vector_requirements_met = report.vector_requirements_met,
            exit_criteria_met = report.exit_criteria_met,
            "Exit criteria evaluated"
        );
        if !report.failed_critical_tests.is_empty() {
            tracing::warn!(
                target: "bist::exit_criteria",
                failed = ?report.failed_critical_tests,
                "Critical tests missing or failed"
            );
        }

        report
    }
}
