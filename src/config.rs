// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Доля коридоров и размеры комнат
//! - Допустимые ширины коридоров
//! - Эвристические константы роста и обрезки связей
//! - Параметры запроса (сид, число гексов) для CLI
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Верхняя граница размера комнаты.
pub const MAX_ROOM_SIZE: usize = 20;
/// Допустимый диапазон ширины коридора.
pub const MIN_CORRIDOR_WIDTH: usize = 1;
pub const MAX_CORRIDOR_WIDTH: usize = 3;

/// Эвристические константы роста коридоров и комнат и обрезки связей.
///
/// Значения по умолчанию подобраны под карты от десятков до нескольких сотен гексов.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowthTuning {
    /// Максимальная длина одного сегмента коридора
    pub max_corridor_length: usize,

    /// Вероятность ветвления коридора из более ранней клетки при тупике
    pub branch_probability: f64,

    /// Вероятность «забыть» направление после шага (менее прямые коридоры)
    pub direction_reset_probability: f64,

    /// Максимум занятых/посещённых соседей у клетки-продолжения коридора
    pub corridor_density_limit: usize,

    /// Стартовая точка комнаты предпочитается, если у неё не больше стольких занятых соседей
    pub room_start_crowding_limit: usize,

    /// Максимум уже занятых соседей у кандидата на рост комнаты
    pub room_density_limit: usize,

    /// Порог медленного роста (добавить 1 клетку)
    pub slow_growth_threshold: f64,

    /// Порог среднего роста (добавить 2–3 клетки); выше — быстрый рост (3–5)
    pub medium_growth_threshold: f64,

    /// Амплитуда случайной добавки к оценке кандидата комнаты
    pub score_jitter: f64,

    /// Вероятность взять кандидата ниже по рейтингу
    pub selection_jitter_probability: f64,

    /// Вес бонуса за близость к центру комнаты
    pub centroid_bonus_weight: f64,

    /// Радиус, внутри которого начисляется бонус за близость к центру
    pub centroid_bonus_radius: f64,

    /// Базовая вероятность продолжить рост из новой клетки комнаты
    pub growth_continue_base: f64,

    /// Насколько падает вероятность продолжения по мере заполнения комнаты
    pub growth_continue_decay: f64,

    /// Вес линейности при оценке важности связи коридора
    pub linearity_weight: f64,

    /// Амплитуда случайной добавки к важности связи
    pub importance_jitter: f64,
}

impl Default for GrowthTuning {
    fn default() -> Self {
        Self {
            max_corridor_length: 8,
            branch_probability: 0.3,
            direction_reset_probability: 0.2,
            corridor_density_limit: 2,
            room_start_crowding_limit: 3,
            room_density_limit: 2,
            slow_growth_threshold: 0.3,
            medium_growth_threshold: 0.7,
            score_jitter: 0.5,
            selection_jitter_probability: 0.2,
            centroid_bonus_weight: 0.1,
            centroid_bonus_radius: 3.0,
            growth_continue_base: 0.8,
            growth_continue_decay: 0.3,
            linearity_weight: 3.0,
            importance_jitter: 0.05,
        }
    }
}

impl GrowthTuning {
    /// Проверяет эвристические константы.
    ///
    /// # Ошибки
    /// [`ConfigError::Invalid`] с именем первого недопустимого поля.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_corridor_length < 1 {
            return Err(ConfigError::Invalid(
                "tuning.max_corridor_length must be at least 1".to_string(),
            ));
        }

        let probabilities = [
            ("branch_probability", self.branch_probability),
            ("direction_reset_probability", self.direction_reset_probability),
            ("slow_growth_threshold", self.slow_growth_threshold),
            ("medium_growth_threshold", self.medium_growth_threshold),
            ("selection_jitter_probability", self.selection_jitter_probability),
            ("growth_continue_base", self.growth_continue_base),
            ("growth_continue_decay", self.growth_continue_decay),
        ];
        if let Some((name, value)) = probabilities
            .iter()
            .find(|(_, v)| !(0.0..=1.0).contains(v))
        {
            return Err(ConfigError::Invalid(format!(
                "tuning.{name} must be between 0.0 and 1.0 (got {value})"
            )));
        }
        if self.slow_growth_threshold > self.medium_growth_threshold {
            return Err(ConfigError::Invalid(
                "tuning.slow_growth_threshold must not exceed medium_growth_threshold".to_string(),
            ));
        }

        // Веса и амплитуды: конечные и неотрицательные
        let weights = [
            ("score_jitter", self.score_jitter),
            ("centroid_bonus_weight", self.centroid_bonus_weight),
            ("centroid_bonus_radius", self.centroid_bonus_radius),
            ("linearity_weight", self.linearity_weight),
            ("importance_jitter", self.importance_jitter),
        ];
        if let Some((name, value)) = weights
            .iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "tuning.{name} must be a finite non-negative number (got {value})"
            )));
        }
        Ok(())
    }
}

/// Параметры формы карты.
///
/// Легальность значений проверяет вызывающая сторона ([`GenerationOptions::validate`]);
/// ядро генератора считает их корректными.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOptions {
    /// Доля коридоров (0.0 = только комнаты, 1.0 = только коридоры)
    #[serde(default = "default_corridor_ratio")]
    pub corridor_ratio: f64,

    /// Минимальный размер комнаты в гексах
    #[serde(default = "default_room_size_min")]
    pub room_size_min: usize,

    /// Максимальный размер комнаты в гексах (не больше 20)
    #[serde(default = "default_room_size_max")]
    pub room_size_max: usize,

    /// Допустимые ширины коридора (каждая от 1 до 3)
    #[serde(default = "default_corridor_widths")]
    pub corridor_widths: Vec<usize>,

    /// Эвристические константы
    #[serde(default)]
    pub tuning: GrowthTuning,
}

fn default_corridor_ratio() -> f64 {
    0.7
}
fn default_room_size_min() -> usize {
    4
}
fn default_room_size_max() -> usize {
    8
}
fn default_corridor_widths() -> Vec<usize> {
    vec![1, 2]
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            corridor_ratio: 0.7,
            room_size_min: 4,
            room_size_max: 8,
            corridor_widths: vec![1, 2],
            tuning: GrowthTuning::default(),
        }
    }
}

impl GenerationOptions {
    /// Проверяет легальность параметров.
    ///
    /// # Ошибки
    /// [`ConfigError::Invalid`] с описанием первого нарушенного ограничения.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.corridor_ratio) {
            return Err(ConfigError::Invalid(
                "corridor ratio must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.room_size_min < 1 || self.room_size_min > self.room_size_max {
            return Err(ConfigError::Invalid(
                "room size min must be positive and less than or equal to max".to_string(),
            ));
        }
        if self.room_size_max > MAX_ROOM_SIZE {
            return Err(ConfigError::Invalid(format!(
                "room size max must be between 1 and {MAX_ROOM_SIZE}"
            )));
        }
        if self.corridor_widths.is_empty() {
            return Err(ConfigError::Invalid(
                "corridor widths cannot be empty".to_string(),
            ));
        }
        if let Some(w) = self
            .corridor_widths
            .iter()
            .find(|w| !(MIN_CORRIDOR_WIDTH..=MAX_CORRIDOR_WIDTH).contains(w))
        {
            return Err(ConfigError::Invalid(format!(
                "corridor width {w} is outside {MIN_CORRIDOR_WIDTH}..={MAX_CORRIDOR_WIDTH}"
            )));
        }
        self.tuning.validate()
    }
}

/// Параметры одного запуска генерации
///
/// Полная конфигурация запроса. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    /// Сид (если не задан, генерируется случайный)
    #[serde(default)]
    pub seed: Option<String>,

    /// Требуемое число гексов (по умолчанию 50)
    #[serde(default = "default_hexagon_count")]
    pub hexagon_count: usize,

    /// Верхний предел числа гексов для одного запроса (по умолчанию 200)
    #[serde(default = "default_max_hexagon_count")]
    pub max_hexagon_count: usize,

    /// Параметры формы карты
    #[serde(default)]
    pub options: GenerationOptions,
}

fn default_hexagon_count() -> usize {
    50
}
fn default_max_hexagon_count() -> usize {
    200
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: None,
            hexagon_count: 50,
            max_hexagon_count: 200,
            options: GenerationOptions::default(),
        }
    }
}

impl GenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Аргументы
    /// * `path` - путь к файлу конфигурации в формате TOML
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # dungeon.toml
    /// seed = "catacombs"
    /// hexagon_count = 120
    ///
    /// [options]
    /// corridor_ratio = 0.6
    /// corridor_widths = [1, 2, 3]
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Проверяет число гексов и параметры формы.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hexagon_count < 1 {
            return Err(ConfigError::Invalid(
                "hexagon count must be at least 1".to_string(),
            ));
        }
        if self.hexagon_count > self.max_hexagon_count {
            return Err(ConfigError::Invalid(format!(
                "hexagon count cannot exceed {}",
                self.max_hexagon_count
            )));
        }
        self.options.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = GenerationOptions::default();
        assert_eq!(options.corridor_ratio, 0.7);
        assert_eq!(options.corridor_widths, vec![1, 2]);
        assert!(options.validate().is_ok());
        assert!(GenerationParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_options() {
        let bad_ratio = GenerationOptions {
            corridor_ratio: 1.5,
            ..GenerationOptions::default()
        };
        assert!(matches!(bad_ratio.validate(), Err(ConfigError::Invalid(_))));

        let inverted = GenerationOptions {
            room_size_min: 9,
            room_size_max: 4,
            ..GenerationOptions::default()
        };
        assert!(inverted.validate().is_err());

        let zero_min = GenerationOptions {
            room_size_min: 0,
            ..GenerationOptions::default()
        };
        assert!(zero_min.validate().is_err());

        let huge_room = GenerationOptions {
            room_size_max: 21,
            ..GenerationOptions::default()
        };
        assert!(huge_room.validate().is_err());

        let no_widths = GenerationOptions {
            corridor_widths: vec![],
            ..GenerationOptions::default()
        };
        assert!(no_widths.validate().is_err());

        let wide = GenerationOptions {
            corridor_widths: vec![1, 4],
            ..GenerationOptions::default()
        };
        assert!(wide.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_tuning() {
        assert!(GrowthTuning::default().validate().is_ok());

        let cases = [
            GrowthTuning {
                max_corridor_length: 0,
                ..GrowthTuning::default()
            },
            GrowthTuning {
                branch_probability: -3.0,
                ..GrowthTuning::default()
            },
            GrowthTuning {
                direction_reset_probability: f64::NAN,
                ..GrowthTuning::default()
            },
            GrowthTuning {
                slow_growth_threshold: 9.0,
                ..GrowthTuning::default()
            },
            GrowthTuning {
                slow_growth_threshold: 0.8,
                medium_growth_threshold: 0.4,
                ..GrowthTuning::default()
            },
            GrowthTuning {
                linearity_weight: f64::INFINITY,
                ..GrowthTuning::default()
            },
            GrowthTuning {
                score_jitter: -0.1,
                ..GrowthTuning::default()
            },
        ];
        for tuning in cases {
            let options = GenerationOptions {
                tuning,
                ..GenerationOptions::default()
            };
            assert!(
                matches!(options.validate(), Err(ConfigError::Invalid(_))),
                "{tuning:?} passed validation"
            );
        }
    }

    #[test]
    fn tuning_from_toml_is_validated() {
        let params = GenerationParams::from_toml_str(
            r#"
            hexagon_count = 50

            [options]
            corridor_ratio = 1.0

            [options.tuning]
            max_corridor_length = 0
            "#,
        )
        .unwrap();
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));

        let params = GenerationParams::from_toml_str(
            r#"
            [options.tuning]
            branch_probability = -3.0
            slow_growth_threshold = 9.0
            "#,
        )
        .unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_bad_hexagon_counts() {
        let zero = GenerationParams {
            hexagon_count: 0,
            ..GenerationParams::default()
        };
        assert!(zero.validate().is_err());

        let too_many = GenerationParams {
            hexagon_count: 201,
            ..GenerationParams::default()
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let params = GenerationParams::from_toml_str(
            r#"
            seed = "catacombs"
            hexagon_count = 120

            [options]
            corridor_ratio = 0.6
            corridor_widths = [1, 2, 3]

            [options.tuning]
            branch_probability = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(params.seed.as_deref(), Some("catacombs"));
        assert_eq!(params.hexagon_count, 120);
        assert_eq!(params.max_hexagon_count, 200);
        assert_eq!(params.options.corridor_ratio, 0.6);
        assert_eq!(params.options.room_size_min, 4);
        assert_eq!(params.options.corridor_widths, vec![1, 2, 3]);
        assert_eq!(params.options.tuning.branch_probability, 0.5);
        assert_eq!(params.options.tuning.max_corridor_length, 8);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let params = GenerationParams::from_toml_str("").unwrap();
        assert_eq!(params, GenerationParams::default());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GenerationParams::from_toml_str("hexagon_count = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GenerationParams::from_toml_file("/nonexistent/hexgen.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
