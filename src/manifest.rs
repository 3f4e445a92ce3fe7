//! Результат генерации в виде, пригодном для сериализации.

use crate::hex::Hexagon;
use serde::{Deserialize, Serialize};

/// Версия формата манифеста.
pub const MANIFEST_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub metadata: Metadata,
    /// Гексы в порядке добавления; первый всегда находится в начале координат
    pub hexagons: Vec<Hexagon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Использованный сид (сгенерированный, если не был задан)
    pub seed: String,
    pub requested_count: usize,
    /// Время генерации по настенным часам; не участвует в сравнении детерминированности
    pub generation_time_ms: u64,
    pub version: String,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub actual_count: usize,
    pub corridor_count: usize,
    pub room_count: usize,
    /// Средняя степень, округлённая до сотых
    pub average_connections: f64,
    pub max_connections: usize,
    /// Приближение: глубина одного обхода в ширину из случайного гекса, а не диаметр графа
    pub longest_path: usize,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_q: i32,
    pub max_q: i32,
    pub min_r: i32,
    pub max_r: i32,
}

impl Manifest {
    /// Доля коридоров среди всех гексов (0.0 для пустой карты).
    #[must_use]
    pub fn corridor_fraction(&self) -> f64 {
        let stats = &self.metadata.statistics;
        if stats.actual_count == 0 {
            return 0.0;
        }
        stats.corridor_count as f64 / stats.actual_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{HexCoord, HexType};

    #[test]
    fn serializes_with_wire_field_names() {
        let manifest = Manifest {
            metadata: Metadata {
                seed: "abc".to_string(),
                requested_count: 1,
                generation_time_ms: 3,
                version: MANIFEST_VERSION.to_string(),
                statistics: Statistics {
                    actual_count: 1,
                    corridor_count: 1,
                    room_count: 0,
                    average_connections: 0.0,
                    max_connections: 0,
                    longest_path: 0,
                    bounding_box: BoundingBox::default(),
                },
            },
            hexagons: vec![Hexagon::new(HexCoord::ORIGIN, HexType::Corridor)],
        };

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["metadata"]["requestedCount"], 1);
        assert_eq!(json["metadata"]["generationTimeMs"], 3);
        assert_eq!(json["metadata"]["statistics"]["actualCount"], 1);
        assert_eq!(json["metadata"]["statistics"]["boundingBox"]["minQ"], 0);
        assert_eq!(json["hexagons"][0]["id"], "hex_0_0");
        assert_eq!(json["hexagons"][0]["type"], "corridor");
        assert_eq!(json["hexagons"][0]["connections"], serde_json::json!([]));

        let back: Manifest = serde_json::from_value(json).unwrap();
        assert_eq!(back, manifest);
        assert_eq!(back.corridor_fraction(), 1.0);
    }
}
