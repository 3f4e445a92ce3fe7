//! Структурные проверки готовой карты.
//!
//! Все функции чистые: принимают список гексов и ничего не меняют.

use crate::graph;
use crate::hex::{HexType, Hexagon};
use serde::Serialize;
use std::collections::HashMap;

/// Допуск доли коридоров, используемый [`validate_map`].
pub const DEFAULT_RATIO_TOLERANCE: f64 = 0.15;

/// Конкретное нарушение, найденное при проверке.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Связь ссылается на отсутствующий гекс
    Dangling { hexagon: String, connection: String },
    /// Связь не продублирована в обратную сторону
    Asymmetric { hexagon: String, connection: String },
    /// Связь между несоседними гексами
    NonAdjacent { hexagon: String, connection: String },
    /// Гексы, недостижимые из первого
    Unreachable { hexagons: Vec<String> },
    /// Доля коридоров вне допуска
    RatioDeviation {
        expected: f64,
        actual: f64,
        tolerance: f64,
    },
}

/// Сводный результат [`validate_map`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub connected: bool,
    pub bidirectional: bool,
    pub adjacent: bool,
    pub ratio_ok: bool,
    pub issues: Vec<ValidationIssue>,
}

fn index_by_id(hexagons: &[Hexagon]) -> HashMap<&str, &Hexagon> {
    hexagons.iter().map(|h| (h.id.as_str(), h)).collect()
}

/// Все гексы достижимы обходом в ширину из первого. Пустая карта и карта из одного гекса связны.
#[must_use]
pub fn validate_connectivity(hexagons: &[Hexagon]) -> bool {
    connectivity_issue(hexagons).is_none()
}

fn connectivity_issue(hexagons: &[Hexagon]) -> Option<ValidationIssue> {
    if hexagons.len() <= 1 {
        return None;
    }
    if let Some(dangling) = dangling_issue(hexagons) {
        return Some(dangling);
    }
    let unreachable = graph::unreachable_ids(hexagons);
    if unreachable.is_empty() {
        None
    } else {
        Some(ValidationIssue::Unreachable {
            hexagons: unreachable,
        })
    }
}

fn dangling_issue(hexagons: &[Hexagon]) -> Option<ValidationIssue> {
    let by_id = index_by_id(hexagons);
    hexagons.iter().find_map(|hex| {
        hex.connections
            .iter()
            .find(|c| !by_id.contains_key(c.as_str()))
            .map(|c| ValidationIssue::Dangling {
                hexagon: hex.id.clone(),
                connection: c.clone(),
            })
    })
}

/// Каждая связь ведёт к существующему гексу, который ссылается обратно.
#[must_use]
pub fn validate_bidirectional_connections(hexagons: &[Hexagon]) -> bool {
    bidirectional_issue(hexagons).is_none()
}

fn bidirectional_issue(hexagons: &[Hexagon]) -> Option<ValidationIssue> {
    let by_id = index_by_id(hexagons);
    for hex in hexagons {
        for conn in &hex.connections {
            match by_id.get(conn.as_str()) {
                None => {
                    return Some(ValidationIssue::Dangling {
                        hexagon: hex.id.clone(),
                        connection: conn.clone(),
                    });
                }
                Some(other) if !other.is_connected_to(&hex.id) => {
                    return Some(ValidationIssue::Asymmetric {
                        hexagon: hex.id.clone(),
                        connection: conn.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }
    None
}

/// Каждая связь соединяет гексы на расстоянии 1.
#[must_use]
pub fn validate_adjacent_connections(hexagons: &[Hexagon]) -> bool {
    adjacency_issue(hexagons).is_none()
}

fn adjacency_issue(hexagons: &[Hexagon]) -> Option<ValidationIssue> {
    hexagons.iter().find_map(|hex| {
        let expected: Vec<String> = hex.coord().neighbors().iter().map(|n| n.to_id()).collect();
        hex.connections
            .iter()
            .find(|c| !expected.contains(*c))
            .map(|c| ValidationIssue::NonAdjacent {
                hexagon: hex.id.clone(),
                connection: c.clone(),
            })
    })
}

/// |доля коридоров − ожидаемая| ≤ `tolerance`. Пустая карта проходит.
#[must_use]
pub fn validate_corridor_room_ratio(hexagons: &[Hexagon], expected: f64, tolerance: f64) -> bool {
    ratio_issue(hexagons, expected, tolerance).is_none()
}

fn ratio_issue(hexagons: &[Hexagon], expected: f64, tolerance: f64) -> Option<ValidationIssue> {
    if hexagons.is_empty() {
        return None;
    }
    let corridors = hexagons
        .iter()
        .filter(|h| h.hex_type == HexType::Corridor)
        .count();
    let actual = corridors as f64 / hexagons.len() as f64;
    if (actual - expected).abs() <= tolerance {
        None
    } else {
        Some(ValidationIssue::RatioDeviation {
            expected,
            actual,
            tolerance,
        })
    }
}

/// Прогоняет все четыре проверки.
#[must_use]
pub fn validate_map(hexagons: &[Hexagon], expected_corridor_ratio: f64) -> ValidationReport {
    let connectivity = connectivity_issue(hexagons);
    let bidirectional = bidirectional_issue(hexagons);
    let adjacency = adjacency_issue(hexagons);
    let ratio = ratio_issue(hexagons, expected_corridor_ratio, DEFAULT_RATIO_TOLERANCE);

    let connected = connectivity.is_none();
    let bidirectional_ok = bidirectional.is_none();
    let adjacent = adjacency.is_none();
    let ratio_ok = ratio.is_none();

    ValidationReport {
        is_valid: connected && bidirectional_ok && adjacent && ratio_ok,
        connected,
        bidirectional: bidirectional_ok,
        adjacent,
        ratio_ok,
        issues: [connectivity, bidirectional, adjacency, ratio]
            .into_iter()
            .flatten()
            .collect(),
    }
}
