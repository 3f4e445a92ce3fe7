//! Хранилище карты на время генерации и фронтир роста.

use crate::hex::{HexCoord, HexType, Hexagon};
use std::collections::{BTreeSet, HashMap};

/// Свободные координаты, соседние хотя бы с одним занятым гексом.
/// Упорядоченное множество: порядок обхода влияет на выбор стартовых точек.
pub type Frontier = BTreeSet<HexCoord>;

/// Карта гексов в порядке добавления с индексами по координате и идентификатору.
///
/// Гексы только добавляются; после вставки меняются лишь их связи.
#[derive(Debug, Clone, Default)]
pub struct HexLayout {
    hexagons: Vec<Hexagon>,
    by_coord: HashMap<HexCoord, usize>,
    by_id: HashMap<String, usize>,
}

impl HexLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hexagons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hexagons.is_empty()
    }

    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.by_coord.contains_key(&coord)
    }

    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<&Hexagon> {
        self.by_coord.get(&coord).map(|&i| &self.hexagons[i])
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Hexagon> {
        self.by_id.get(id).map(|&i| &self.hexagons[i])
    }

    #[must_use]
    pub fn hexagons(&self) -> &[Hexagon] {
        &self.hexagons
    }

    #[must_use]
    pub fn into_hexagons(self) -> Vec<Hexagon> {
        self.hexagons
    }

    /// Число занятых соседей координаты.
    #[must_use]
    pub fn occupied_neighbors(&self, coord: HexCoord) -> usize {
        coord.neighbors().iter().filter(|&&n| self.contains(n)).count()
    }

    /// Добавляет гекс и связывает его в обе стороны со всеми уже занятыми соседями.
    /// Возвращает `false`, если координата уже занята (карта не меняется).
    pub fn insert(&mut self, coord: HexCoord, hex_type: HexType) -> bool {
        if self.contains(coord) {
            return false;
        }
        let idx = self.hexagons.len();
        let hex = Hexagon::new(coord, hex_type);
        self.by_id.insert(hex.id.clone(), idx);
        self.by_coord.insert(coord, idx);
        self.hexagons.push(hex);

        for neighbor in coord.neighbors() {
            if let Some(&n_idx) = self.by_coord.get(&neighbor) {
                self.link(idx, n_idx);
            }
        }
        true
    }

    /// Удаляет связь между двумя гексами в обе стороны. Возвращает `true`, если связь была.
    pub fn disconnect(&mut self, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.by_id.get(a), self.by_id.get(b)) else {
            return false;
        };
        let removed = self.hexagons[ia].remove_connection(b);
        self.hexagons[ib].remove_connection(a);
        removed
    }

    /// Восстанавливает связь в обе стороны.
    pub fn connect(&mut self, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.by_id.get(a), self.by_id.get(b)) else {
            return false;
        };
        self.link(ia, ib);
        true
    }

    fn link(&mut self, a: usize, b: usize) {
        let id_a = self.hexagons[a].id.clone();
        let id_b = self.hexagons[b].id.clone();
        self.hexagons[a].add_connection(&id_b);
        self.hexagons[b].add_connection(&id_a);
    }
}
