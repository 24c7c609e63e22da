//! Агрегатор прогона BIST
//!
//! Владеет корпусом векторов и последовательностью результатов одного
//! прогона. Мутации только добавляющие; `passed + failed == total` всегда.

use crate::bist::result::BistResult;
use crate::bist::vector::TestVector;
use crate::crypto::levels::VectorFamily;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Категория результата в сгруппированном отчёте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCategory {
    KemAlgorithms,
    SignatureAlgorithms,
    PerformanceTests,
    CrossValidation,
    TestVectorValidation,
}

impl ResultCategory {
    /// Порядок вывода в отчёте
    pub const ALL: [ResultCategory; 5] = [
        ResultCategory::KemAlgorithms,
        ResultCategory::SignatureAlgorithms,
        ResultCategory::PerformanceTests,
        ResultCategory::CrossValidation,
        ResultCategory::TestVectorValidation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResultCategory::KemAlgorithms => "KEM Algorithms",
            ResultCategory::SignatureAlgorithms => "Signature Algorithms",
            ResultCategory::PerformanceTests => "Performance Tests",
            ResultCategory::CrossValidation => "Cross-Validation",
            ResultCategory::TestVectorValidation => "Test Vector Validation",
        }
    }

    /// Первое совпавшее правило выигрывает; `None` - результат не попадает в группы
    pub fn of(result: &BistResult) -> Option<ResultCategory> {
        let id = result.test_id.as_str();
        if id.contains("KEM-") && !id.contains("PERF") {
            Some(ResultCategory::KemAlgorithms)
        } else if id.contains("SIG-") && !id.contains("PERF") {
            Some(ResultCategory::SignatureAlgorithms)
        } else if id.contains("PERF-") {
            Some(ResultCategory::PerformanceTests)
        } else if id.contains("CROSS-") {
            Some(ResultCategory::CrossValidation)
        } else if result.test_name.contains("Test Vector") {
            Some(ResultCategory::TestVectorValidation)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BistSuite {
    run_id: Uuid,
    results: Vec<BistResult>,
    test_vectors: Vec<TestVector>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    total_tests: usize,
    passed_tests: usize,
    failed_tests: usize,
    exit_criteria_met: bool,
    errors: Vec<String>,
    #[serde(skip)]
    verdict_recorded: bool,
}

impl Default for BistSuite {
    fn default() -> Self {
        Self::new()
    }
}

impl BistSuite {
    /// Новый прогон; время старта фиксируется здесь
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            results: Vec::new(),
            test_vectors: Vec::new(),
            start_time: Utc::now(),
            end_time: None,
            total_tests: 0,
            passed_tests: 0,
            failed_tests: 0,
            exit_criteria_met: false,
            errors: Vec::new(),
            verdict_recorded: false,
        }
    }

    pub fn add_result(&mut self, result: BistResult) {
        self.total_tests += 1;
        if result.passed {
            self.passed_tests += 1;
        } else {
            self.failed_tests += 1;
        }
        self.results.push(result);
    }

    pub fn add_vector(&mut self, vector: TestVector) {
        self.test_vectors.push(vector);
    }

    pub fn add_vectors(&mut self, vectors: impl IntoIterator<Item = TestVector>) {
        self.test_vectors.extend(vectors);
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Зафиксировать время окончания. Повторный вызов ничего не меняет.
    pub fn finalize(&mut self) {
        if self.end_time.is_none() {
            self.end_time = Some(Utc::now());
        }
    }

    /// Записать вердикт критериев выхода. Записывается один раз.
    pub(crate) fn record_exit_criteria(&mut self, met: bool) {
        if !self.verdict_recorded {
            self.exit_criteria_met = met;
            self.verdict_recorded = true;
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn results(&self) -> &[BistResult] {
        &self.results
    }

    pub fn test_vectors(&self) -> &[TestVector] {
        &self.test_vectors
    }

    pub fn vectors_of(&self, family: VectorFamily) -> impl Iterator<Item = &TestVector> {
        self.test_vectors.iter().filter(move |v| v.family == family)
    }

    pub fn vector_count(&self, family: VectorFamily) -> usize {
        self.vectors_of(family).count()
    }

    pub fn result(&self, test_id: &str) -> Option<&BistResult> {
        self.results.iter().find(|r| r.test_id == test_id)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn total_tests(&self) -> usize {
        self.total_tests
    }

    pub fn passed_tests(&self) -> usize {
        self.passed_tests
    }

    pub fn failed_tests(&self) -> usize {
        self.failed_tests
    }

    /// Доля пройденных тестов; 0 при пустом прогоне
    pub fn pass_rate(&self) -> f64 {
        if self.total_tests == 0 {
            0.0
        } else {
            self.passed_tests as f64 / self.total_tests as f64
        }
    }

    pub fn exit_criteria_met(&self) -> bool {
        self.exit_criteria_met
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Группировка результатов по категориям в порядке [`ResultCategory::ALL`].
    /// Пустые категории не возвращаются.
    pub fn grouped(&self) -> Vec<(ResultCategory, Vec<&BistResult>)> {
        ResultCategory::ALL
            .iter()
            .map(|category| {
                let members: Vec<&BistResult> = self
                    .results
                    .iter()
                    .filter(|r| ResultCategory::of(r) == Some(*category))
                    .collect();
                (*category, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }
}
