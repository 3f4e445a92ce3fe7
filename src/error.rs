//! Ошибки генератора и загрузки конфигурации.

use thiserror::Error;

/// Ошибки, возникающие во время генерации карты.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    /// Некорректный аргумент вспомогательной функции ГСЧ (пустой выбор, min >= max).
    /// Это ошибка вызывающего кода, а не состояние времени выполнения.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Итоговая карта не прошла проверку связности.
    /// Нарушение внутреннего инварианта: при корректном построении не возникает никогда.
    #[error("connectivity invariant violated: {reachable} of {total} hexagons reachable")]
    ConnectivityViolation { reachable: usize, total: usize },
}

/// Ошибки загрузки и проверки параметров генерации.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid generation parameters: {0}")]
    Invalid(String),
}
