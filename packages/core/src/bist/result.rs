//! Результаты отдельных тестов BIST
//!
//! Сообщение об ошибке предназначено человеку, а [`FailureKind`] -
//! машинной обработке (отчёты, фильтрация без разбора строк).

use crate::utils::serialization::duration_nanos;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Категория провала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Фаза не получила ни одного вектора
    MissingVectors,
    /// Не удалось декодировать hex-поле вектора
    Decode,
    /// Фактический результат расходится с ожидаемым
    Mismatch,
    /// Повреждённый вход дал тот же секрет, что и валидный
    UnexpectedMatch,
    /// Вызов примитива вернул ошибку
    PrimitiveFailure,
    /// Размер материала не совпал с реестром
    SizeMismatch,
    ThresholdExceeded,
    /// Часть векторов пакета не прошла классификацию
    VectorFailures,
}

/// Провал классификации одного вектора
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl VectorFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for VectorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

impl std::error::Error for VectorFailure {}

/// Один результат теста. После добавления в suite не меняется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BistResult {
    pub test_id: String,
    pub algorithm: String,
    pub test_name: String,
    pub passed: bool,
    #[serde(with = "duration_nanos")]
    pub execution_time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_vectors: Option<usize>,
}

impl BistResult {
    pub fn pass(
        test_id: impl Into<String>,
        algorithm: impl Into<String>,
        test_name: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            algorithm: algorithm.into(),
            test_name: test_name.into(),
            passed: true,
            execution_time,
            error_message: None,
            failure_kind: None,
            iterations: None,
            test_vectors: None,
        }
    }

    pub fn fail(
        test_id: impl Into<String>,
        algorithm: impl Into<String>,
        test_name: impl Into<String>,
        execution_time: Duration,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            passed: false,
            error_message: Some(message.into()),
            failure_kind: Some(kind),
            ..Self::pass(test_id, algorithm, test_name, execution_time)
        }
    }

    /// `Ok(())` -> pass, `Err(failure)` -> fail с kind и detail
    pub fn from_outcome(
        test_id: impl Into<String>,
        algorithm: impl Into<String>,
        test_name: impl Into<String>,
        execution_time: Duration,
        outcome: Result<(), VectorFailure>,
    ) -> Self {
        match outcome {
            Ok(()) => Self::pass(test_id, algorithm, test_name, execution_time),
            Err(failure) => Self::fail(
                test_id,
                algorithm,
                test_name,
                execution_time,
                failure.kind,
                failure.detail,
            ),
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn with_test_vectors(mut self, count: usize) -> Self {
        self.test_vectors = Some(count);
        self
    }

    pub fn status(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }
}
