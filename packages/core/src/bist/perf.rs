//! Замер производительности примитивов
//!
//! Порог задаётся на пару (алгоритм, операция). Нет порога - операция
//! проходит по времени. Провал вызова примитива - провал независимо от времени.

use crate::bist::result::{BistResult, FailureKind, VectorFailure};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    KeyGen,
    Encap,
    Decap,
    Sign,
    Verify,
    Hash,
}

impl OpKind {
    /// Суффикс идентификатора теста: `PERF-<alg>-<SUFFIX>`
    pub fn id_suffix(&self) -> &'static str {
        match self {
            OpKind::KeyGen => "KEYGEN",
            OpKind::Encap => "ENCAP",
            OpKind::Decap => "DECAP",
            OpKind::Sign => "SIGN",
            OpKind::Verify => "VERIFY",
            OpKind::Hash => "HASH",
        }
    }

    pub fn test_name(&self) -> &'static str {
        match self {
            OpKind::KeyGen => "Key Generation Performance",
            OpKind::Encap => "Encapsulation Performance",
            OpKind::Decap => "Decapsulation Performance",
            OpKind::Sign => "Signing Performance",
            OpKind::Verify => "Verification Performance",
            OpKind::Hash => "Hash Performance",
        }
    }

    pub fn test_id(&self, algorithm: &str) -> String {
        format!("PERF-{}-{}", algorithm, self.id_suffix())
    }
}

/// Таблица порогов (алгоритм, операция) → максимальная длительность
#[derive(Debug, Clone, Default)]
pub struct ThresholdTable {
    thresholds: HashMap<(String, OpKind), Duration>,
}

impl ThresholdTable {
    /// Пустая таблица: все операции проходят по времени
    pub fn empty() -> Self {
        Self::default()
    }

    /// Эталонные пороги
    pub fn default_thresholds() -> Self {
        let mut table = Self::empty();
        let ms = Duration::from_millis;

        table.set("Kyber512", OpKind::KeyGen, ms(50));
        table.set("Kyber512", OpKind::Encap, ms(20));
        table.set("Kyber512", OpKind::Decap, ms(20));
        table.set("Kyber768", OpKind::KeyGen, ms(100));
        table.set("Kyber1024", OpKind::KeyGen, ms(150));
        table.set("Dilithium2", OpKind::KeyGen, ms(200));
        table.set("Dilithium2", OpKind::Sign, ms(100));
        table.set("Dilithium2", OpKind::Verify, ms(50));
        table.set("Dilithium3", OpKind::KeyGen, ms(300));
        table.set("Dilithium5", OpKind::KeyGen, ms(500));

        table
    }

    pub fn set(&mut self, algorithm: &str, op: OpKind, threshold: Duration) {
        self.thresholds.insert((algorithm.to_string(), op), threshold);
    }

    pub fn get(&self, algorithm: &str, op: OpKind) -> Option<Duration> {
        self.thresholds.get(&(algorithm.to_string(), op)).copied()
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PerformanceProbe {
    thresholds: ThresholdTable,
}

impl PerformanceProbe {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    /// Выполнить одну операцию и замерить wall-clock время
    pub fn measure<T>(op: impl FnOnce() -> T) -> (T, Duration) {
        let start = Instant::now();
        let value = op();
        (value, start.elapsed())
    }

    pub fn check_threshold(
        &self,
        algorithm: &str,
        op: OpKind,
        elapsed: Duration,
    ) -> Result<(), VectorFailure> {
        match self.thresholds.get(algorithm, op) {
            Some(threshold) if elapsed > threshold => Err(VectorFailure::new(
                FailureKind::ThresholdExceeded,
                format!("Performance threshold exceeded: {:?} > {:?}", elapsed, threshold),
            )),
            _ => Ok(()),
        }
    }

    /// Результат `PERF-<alg>-<op>`. Провал `call` важнее порога.
    pub fn result_for(
        &self,
        algorithm: &str,
        op: OpKind,
        elapsed: Duration,
        call: Result<(), VectorFailure>,
    ) -> BistResult {
        let outcome = call.and_then(|()| self.check_threshold(algorithm, op, elapsed));
        if let Err(failure) = &outcome {
            tracing::warn!(
                target: "bist::perf",
                algorithm,
                op = ?op,
                elapsed = ?elapsed,
                "{}",
                failure.detail
            );
        }
        BistResult::from_outcome(op.test_id(algorithm), algorithm, op.test_name(), elapsed, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let table = ThresholdTable::default_thresholds();
        assert_eq!(table.len(), 10);
        assert_eq!(table.get("Kyber512", OpKind::KeyGen), Some(Duration::from_millis(50)));
        assert_eq!(table.get("Dilithium2", OpKind::Verify), Some(Duration::from_millis(50)));
        assert_eq!(table.get("Kyber768", OpKind::Encap), None);
        assert!(ThresholdTable::empty().is_empty());
    }

    #[test]
    fn test_missing_threshold_passes() {
        let probe = PerformanceProbe::new(ThresholdTable::empty());
        assert!(probe
            .check_threshold("Kyber512", OpKind::KeyGen, Duration::from_secs(3600))
            .is_ok());
    }

    #[test]
    fn test_exceeded_threshold_names_both_durations() {
        let mut table = ThresholdTable::empty();
        table.set("Kyber512", OpKind::KeyGen, Duration::from_nanos(1));
        let probe = PerformanceProbe::new(table);

        let failure = probe
            .check_threshold("Kyber512", OpKind::KeyGen, Duration::from_micros(20))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::ThresholdExceeded);
        assert_eq!(failure.detail, "Performance threshold exceeded: 20µs > 1ns");

        // на пороге - ещё проходит
        assert!(probe
            .check_threshold("Kyber512", OpKind::KeyGen, Duration::from_nanos(1))
            .is_ok());
    }

    #[test]
    fn test_result_for_prefers_call_failure() {
        let probe = PerformanceProbe::new(ThresholdTable::default_thresholds());
        let result = probe.result_for(
            "Dilithium2",
            OpKind::Verify,
            Duration::from_secs(1),
            Err(VectorFailure::new(FailureKind::Mismatch, "Signature verification returned false")),
        );
        assert_eq!(result.test_id, "PERF-Dilithium2-VERIFY");
        assert_eq!(result.test_name, "Verification Performance");
        assert_eq!(result.failure_kind, Some(FailureKind::Mismatch));

        let ok = probe.result_for("Dilithium5", OpKind::Sign, Duration::from_secs(1), Ok(()));
        assert!(ok.passed);
    }

    #[test]
    fn test_measure() {
        let (value, elapsed) = PerformanceProbe::measure(|| 2 + 2);
        assert_eq!(value, 4);
        assert!(elapsed < Duration::from_secs(1));
    }
}
