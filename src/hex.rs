//! Осевые координаты гексагональной сетки и запись гекса.
//!
//! Сетка с плоской вершиной (flat-top). Координата хранит две оси (q, r),
//! третья выводится как s = -q - r, поэтому инвариант q + r + s = 0 выполняется всегда.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Осевая координата гекса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    /// Шесть направлений к соседям (восток, северо-восток, северо-запад, запад, юго-запад, юго-восток).
    /// Порядок фиксирован: от него зависят порядок связей и последовательность обращений к ГСЧ.
    pub const DIRECTIONS: [Self; 6] = [
        Self { q: 1, r: 0 },
        Self { q: 1, r: -1 },
        Self { q: 0, r: -1 },
        Self { q: -1, r: 0 },
        Self { q: -1, r: 1 },
        Self { q: 0, r: 1 },
    ];

    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Третья (неявная) ось.
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        Self::DIRECTIONS.map(|d| self + d)
    }

    /// Гексагональное расстояние: (|dq| + |dq + dr| + |dr|) / 2.
    #[must_use]
    pub fn distance(self, other: Self) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + (dq + dr).abs() + dr.abs()) / 2
    }

    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }

    /// Строковый идентификатор `hex_{q}_{r}`. Формат является частью внешнего контракта.
    #[must_use]
    pub fn to_id(self) -> String {
        format!("hex_{}_{}", self.q, self.r)
    }
}

impl Add for HexCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.q + other.q, self.r + other.r)
    }
}

impl Sub for HexCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.q - other.q, self.r - other.r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Тип гекса: коридор (линейные ветвящиеся пути) или комната (органические кластеры).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexType {
    Corridor,
    Room,
}

impl fmt::Display for HexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexType::Corridor => f.write_str("corridor"),
            HexType::Room => f.write_str("room"),
        }
    }
}

/// Одна ячейка карты.
///
/// Координаты и тип неизменяемы, меняется только список связей.
/// Связи хранятся в `Vec` без дубликатов: порядок обхода должен быть воспроизводимым.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hexagon {
    pub id: String,
    pub q: i32,
    pub r: i32,
    #[serde(rename = "type")]
    pub hex_type: HexType,
    pub connections: Vec<String>,
}

impl Hexagon {
    #[must_use]
    pub fn new(coord: HexCoord, hex_type: HexType) -> Self {
        Self {
            id: coord.to_id(),
            q: coord.q,
            r: coord.r,
            hex_type,
            connections: Vec::new(),
        }
    }

    #[must_use]
    pub fn coord(&self) -> HexCoord {
        HexCoord::new(self.q, self.r)
    }

    #[must_use]
    pub fn is_corridor(&self) -> bool {
        self.hex_type == HexType::Corridor
    }

    /// Добавляет связь, если её ещё нет. Возвращает `true`, если связь добавлена.
    pub fn add_connection(&mut self, id: &str) -> bool {
        if self.is_connected_to(id) {
            return false;
        }
        self.connections.push(id.to_string());
        true
    }

    /// Удаляет связь с сохранением порядка остальных. Возвращает `true`, если связь была.
    pub fn remove_connection(&mut self, id: &str) -> bool {
        match self.connections.iter().position(|c| c == id) {
            Some(pos) => {
                self.connections.remove(pos);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_connected_to(&self, id: &str) -> bool {
        self.connections.iter().any(|c| c == id)
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn six_neighbors_at_distance_one() {
        let origin = HexCoord::ORIGIN;
        let neighbors = origin.neighbors();
        for n in neighbors {
            assert_eq!(origin.distance(n), 1);
            assert!(origin.is_adjacent(n));
        }
        let mut sorted = neighbors.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 6);
    }

    #[test]
    fn distance_matches_known_values() {
        let a = HexCoord::new(0, 0);
        assert_eq!(a.distance(HexCoord::new(2, 0)), 2);
        assert_eq!(a.distance(HexCoord::new(1, 1)), 2);
        assert_eq!(a.distance(HexCoord::new(2, -1)), 2);
        assert_eq!(a.distance(HexCoord::new(-3, 3)), 3);
        assert_eq!(HexCoord::new(1, 2).distance(HexCoord::new(1, 2)), 0);
    }

    #[test]
    fn id_format_is_stable() {
        assert_eq!(HexCoord::new(0, 0).to_id(), "hex_0_0");
        assert_eq!(HexCoord::new(-2, 5).to_id(), "hex_-2_5");
        assert_eq!(Hexagon::new(HexCoord::new(3, -1), HexType::Room).id, "hex_3_-1");
    }

    #[test]
    fn connections_stay_ordered_and_unique() {
        let mut hex = Hexagon::new(HexCoord::ORIGIN, HexType::Corridor);
        assert!(hex.add_connection("hex_1_0"));
        assert!(hex.add_connection("hex_0_1"));
        assert!(!hex.add_connection("hex_1_0"));
        assert!(hex.add_connection("hex_-1_0"));
        assert_eq!(hex.connections, vec!["hex_1_0", "hex_0_1", "hex_-1_0"]);

        assert!(hex.remove_connection("hex_0_1"));
        assert!(!hex.remove_connection("hex_0_1"));
        assert_eq!(hex.connections, vec!["hex_1_0", "hex_-1_0"]);
        assert_eq!(hex.connection_count(), 2);
    }

    #[test]
    fn hex_type_serializes_lowercase() {
        let hex = Hexagon::new(HexCoord::new(1, 0), HexType::Corridor);
        let json = serde_json::to_value(&hex).unwrap();
        assert_eq!(json["type"], "corridor");
        assert_eq!(json["id"], "hex_1_0");
        assert_eq!(serde_json::to_value(HexType::Room).unwrap(), "room");
    }

    proptest! {
        #[test]
        fn cube_invariant_holds(q in -1000i32..1000, r in -1000i32..1000) {
            let c = HexCoord::new(q, r);
            prop_assert_eq!(c.q + c.r + c.s(), 0);
        }

        #[test]
        fn distance_is_symmetric_and_triangular(
            aq in -20i32..20, ar in -20i32..20,
            bq in -20i32..20, br in -20i32..20,
            cq in -20i32..20, cr in -20i32..20,
        ) {
            let a = HexCoord::new(aq, ar);
            let b = HexCoord::new(bq, br);
            let c = HexCoord::new(cq, cr);
            prop_assert_eq!(a.distance(b), b.distance(a));
            prop_assert!(a.distance(c) <= a.distance(b) + b.distance(c));
        }

        #[test]
        fn neighbor_relation_is_symmetric(q in -50i32..50, r in -50i32..50) {
            let c = HexCoord::new(q, r);
            for n in c.neighbors() {
                prop_assert!(n.neighbors().contains(&c));
            }
        }
    }
}
