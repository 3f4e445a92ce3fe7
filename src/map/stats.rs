//! Статистика готовой карты для метаданных манифеста.

use crate::error::GenerationError;
use crate::graph;
use crate::hex::{HexType, Hexagon};
use crate::manifest::{BoundingBox, Statistics};
use crate::seed::SeedManager;

/// Сводная статистика по готовой карте.
///
/// «Самый длинный путь» считается одним обходом в ширину из случайного гекса: это нижняя
/// оценка диаметра, а не точное значение. Выбор стартового гекса берётся из общего потока ГСЧ.
pub fn calculate_statistics(
    hexagons: &[Hexagon],
    rng: &mut SeedManager,
) -> Result<Statistics, GenerationError> {
    let corridor_count = hexagons
        .iter()
        .filter(|h| h.hex_type == HexType::Corridor)
        .count();
    let room_count = hexagons.len() - corridor_count;

    let total_connections: usize = hexagons.iter().map(Hexagon::connection_count).sum();
    let average_connections = if hexagons.is_empty() {
        0.0
    } else {
        round_hundredths(total_connections as f64 / hexagons.len() as f64)
    };
    let max_connections = hexagons
        .iter()
        .map(Hexagon::connection_count)
        .max()
        .unwrap_or(0);

    let longest_path = if hexagons.is_empty() {
        0
    } else {
        let start = rng.next_int(hexagons.len())?;
        graph::bfs_depth(hexagons, start)
    };

    Ok(Statistics {
        actual_count: hexagons.len(),
        corridor_count,
        room_count,
        average_connections,
        max_connections,
        longest_path,
        bounding_box: bounding_box(hexagons),
    })
}

pub fn bounding_box(hexagons: &[Hexagon]) -> BoundingBox {
    let Some(first) = hexagons.first() else {
        return BoundingBox::default();
    };
    hexagons.iter().fold(
        BoundingBox {
            min_q: first.q,
            max_q: first.q,
            min_r: first.r,
            max_r: first.r,
        },
        |bb, h| BoundingBox {
            min_q: bb.min_q.min(h.q),
            max_q: bb.max_q.max(h.q),
            min_r: bb.min_r.min(h.r),
            max_r: bb.max_r.max(h.r),
        },
    )
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;
    use crate::map::layout::HexLayout;

    #[test]
    fn statistics_for_small_layout() {
        let mut layout = HexLayout::new();
        layout.insert(HexCoord::new(0, 0), HexType::Corridor);
        layout.insert(HexCoord::new(1, 0), HexType::Corridor);
        layout.insert(HexCoord::new(2, 0), HexType::Room);
        layout.insert(HexCoord::new(2, -1), HexType::Room);

        let mut rng = SeedManager::new(Some("stats"));
        let stats = calculate_statistics(layout.hexagons(), &mut rng).unwrap();

        assert_eq!(stats.actual_count, 4);
        assert_eq!(stats.corridor_count, 2);
        assert_eq!(stats.room_count, 2);
        // Рёбра: (0,0)-(1,0), (1,0)-(2,0), (1,0)-(2,-1), (2,0)-(2,-1)
        assert_eq!(stats.average_connections, 2.0);
        assert_eq!(stats.max_connections, 3);
        assert!((1..=2).contains(&stats.longest_path));
        assert_eq!(
            stats.bounding_box,
            BoundingBox {
                min_q: 0,
                max_q: 2,
                min_r: -1,
                max_r: 0
            }
        );
    }

    #[test]
    fn empty_map_statistics() {
        let mut rng = SeedManager::new(Some("empty"));
        let stats = calculate_statistics(&[], &mut rng).unwrap();
        assert_eq!(stats.actual_count, 0);
        assert_eq!(stats.average_connections, 0.0);
        assert_eq!(stats.longest_path, 0);
        assert_eq!(stats.bounding_box, BoundingBox::default());
    }

    #[test]
    fn rounding_to_hundredths() {
        assert_eq!(round_hundredths(2.0 / 3.0), 0.67);
        assert_eq!(round_hundredths(1.234_9), 1.23);
    }
}
