//! Централизованная конфигурация BIST
//!
//! Все параметры прогона (размер корпуса, число итераций стресс-тестов,
//! пороги критериев выхода, пути отчётов, логирование) определены здесь.
//! Значения по умолчанию соответствуют эталонной политике; каждое можно
//! переопределить переменной окружения `BIST_*`.

use crate::utils::logging::LogFormat;
use std::str::FromStr;
use std::sync::OnceLock;

/// Глобальная конфигурация (синглтон)
static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Config {
    // ============================================
    // КОРПУС ТЕСТОВЫХ ВЕКТОРОВ
    // ============================================

    /// Число пар (валидный + повреждённый) KEM векторов на уровень
    pub kem_vectors_per_level: usize,

    /// Подпись длиннее этого порога получает вектор с повреждённой подписью
    pub signature_corruption_min_len: usize,

    // ============================================
    // СТРЕСС-ТЕСТЫ
    // ============================================

    /// Итерации keygen → encap → decap на уровень
    pub kem_stress_iterations: u32,

    /// Итерации keygen → sign → verify на уровень
    pub signature_stress_iterations: u32,

    // ============================================
    // КРИТЕРИИ ВЫХОДА
    // ============================================

    /// Минимальная доля пройденных тестов
    pub min_pass_rate: f64,

    pub min_kem_vectors: usize,

    pub min_signature_vectors: usize,

    // ============================================
    // ПРОИЗВОДИТЕЛЬНОСТЬ
    // ============================================

    /// `false` отключает таблицу порогов (каждая операция проходит по времени)
    pub thresholds_enabled: bool,

    // ============================================
    // ОТЧЁТЫ И ЛОГИ
    // ============================================

    pub vectors_output_path: String,

    pub report_output_path: String,

    /// Директива EnvFilter, например `info` или `pqc_bist=debug`
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Корпус
            kem_vectors_per_level: 5,
            signature_corruption_min_len: 10,

            // Стресс-тесты
            kem_stress_iterations: 50,
            signature_stress_iterations: 25,

            // Критерии выхода
            min_pass_rate: 0.95,
            min_kem_vectors: 30,
            // 3 уровня x (5 валидных + 5 с повреждённой подписью + 4 с чужим сообщением):
            // у пустого сообщения нет варианта с чужим сообщением, поэтому 42, а не 45
            min_signature_vectors: 42,

            // Производительность
            thresholds_enabled: true,

            // Отчёты
            vectors_output_path: "pqc_test_vectors.json".to_string(),
            report_output_path: "pqc_bist_report.json".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Создать конфигурацию из переменных окружения
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Как [`Config::from_env`], но с произвольным источником значений.
    /// Нераспознанные значения игнорируются, доля прохождения вне [0, 1] тоже.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        override_parsed(&lookup, "BIST_KEM_VECTORS_PER_LEVEL", &mut config.kem_vectors_per_level);
        override_parsed(&lookup, "BIST_KEM_STRESS_ITERATIONS", &mut config.kem_stress_iterations);
        override_parsed(
            &lookup,
            "BIST_SIGNATURE_STRESS_ITERATIONS",
            &mut config.signature_stress_iterations,
        );
        let pass_rate = lookup("BIST_MIN_PASS_RATE").and_then(|v| v.trim().parse::<f64>().ok());
        if let Some(rate) = pass_rate {
            // NaN не попадает в диапазон
            if (0.0..=1.0).contains(&rate) {
                config.min_pass_rate = rate;
            } else {
                tracing::warn!(
                    target: "config",
                    value = rate,
                    "BIST_MIN_PASS_RATE outside [0, 1], ignored"
                );
            }
        }
        override_parsed(&lookup, "BIST_MIN_KEM_VECTORS", &mut config.min_kem_vectors);
        override_parsed(&lookup, "BIST_MIN_SIGNATURE_VECTORS", &mut config.min_signature_vectors);

        if let Some(val) = lookup("BIST_DISABLE_THRESHOLDS") {
            if matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config.thresholds_enabled = false;
            }
        }

        if let Some(val) = lookup("BIST_VECTORS_OUTPUT") {
            config.vectors_output_path = val;
        }

        if let Some(val) = lookup("BIST_REPORT_OUTPUT") {
            config.report_output_path = val;
        }

        if let Some(val) = lookup("BIST_LOG") {
            config.log_level = val;
        }

        if let Some(val) = lookup("BIST_LOG_FORMAT") {
            config.log_format = LogFormat::parse(&val);
        }

        config
    }

    /// Получить глобальный экземпляр конфигурации
    ///
    /// Автоматически инициализирует конфигурацию со значениями по умолчанию при первом вызове
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(Config::default)
    }

    /// Инициализировать глобальную конфигурацию с кастомным экземпляром
    ///
    /// # Errors
    ///
    /// Возвращает ошибку, если конфигурация уже была инициализирована
    pub fn init_with(config: Config) -> Result<(), &'static str> {
        GLOBAL_CONFIG.set(config)
            .map_err(|_| "Config already initialized")
    }
}

fn override_parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(val) = lookup(key) {
        if let Ok(parsed) = val.trim().parse() {
            *target = parsed;
        }
    }
}
