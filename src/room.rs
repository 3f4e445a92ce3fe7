//! Генерация комнат: компактные кластеры неправильной формы.
//!
//! Комната растёт из точки фронтира волной: из очередной клетки добавляется от одной до
//! пяти соседних, лучшие по оценке (связность с комнатой, близость к центру, шум).
//! Вероятность продолжить рост из новой клетки падает по мере заполнения комнаты.

use crate::config::{GenerationOptions, GrowthTuning};
use crate::error::GenerationError;
use crate::hex::HexCoord;
use crate::map::layout::{Frontier, HexLayout};
use crate::seed::SeedManager;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct RoomGenerator {
    tuning: GrowthTuning,
}

impl RoomGenerator {
    #[must_use]
    pub fn new(options: &GenerationOptions) -> Self {
        Self {
            tuning: options.tuning,
        }
    }

    /// Строит одну комнату размером не более `target_size` клеток.
    ///
    /// Порядок результата не несёт смысла. Пустой результат: нет стартовой точки или `target_size == 0`.
    pub fn generate_room(
        &self,
        rng: &mut SeedManager,
        frontier: &Frontier,
        layout: &HexLayout,
        target_size: usize,
    ) -> Result<Vec<HexCoord>, GenerationError> {
        if frontier.is_empty() || target_size == 0 {
            return Ok(Vec::new());
        }
        let Some(start) = self.select_start(rng, frontier, layout)? else {
            return Ok(Vec::new());
        };
        self.grow(rng, start, layout, target_size)
    }

    /// Предпочитает точки с небольшим числом занятых соседей, чтобы комнаты
    /// не сливались с плотной застройкой; при отсутствии таких берёт любую примыкающую.
    fn select_start(
        &self,
        rng: &mut SeedManager,
        frontier: &Frontier,
        layout: &HexLayout,
    ) -> Result<Option<HexCoord>, GenerationError> {
        let attached: Vec<(HexCoord, usize)> = frontier
            .iter()
            .map(|&c| (c, layout.occupied_neighbors(c)))
            .filter(|&(_, n)| n > 0)
            .collect();

        let mut valid: Vec<HexCoord> = attached
            .iter()
            .filter(|&&(_, n)| n <= self.tuning.room_start_crowding_limit)
            .map(|&(c, _)| c)
            .collect();
        if valid.is_empty() {
            valid = attached.iter().map(|&(c, _)| c).collect();
        }
        if valid.is_empty() {
            return Ok(None);
        }
        Ok(Some(valid[rng.next_int(valid.len())?]))
    }

    fn grow(
        &self,
        rng: &mut SeedManager,
        start: HexCoord,
        layout: &HexLayout,
        target_size: usize,
    ) -> Result<Vec<HexCoord>, GenerationError> {
        let mut room = vec![start];
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while room.len() < target_size {
            let Some(current) = queue.pop_front() else {
                break;
            };

            let candidates: Vec<HexCoord> = current
                .neighbors()
                .into_iter()
                .filter(|n| !visited.contains(n) && !layout.contains(*n))
                .filter(|&n| layout.occupied_neighbors(n) <= self.tuning.room_density_limit)
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let remaining = target_size - room.len();
            let count = self.growth_amount(rng, candidates.len(), remaining)?;
            let selected = self.select_positions(rng, &candidates, count, &room, &visited)?;

            for pos in selected {
                if room.len() >= target_size {
                    break;
                }
                // Подстановка соседа по рейтингу может выбрать одну клетку дважды
                if !visited.insert(pos) {
                    continue;
                }
                room.push(pos);
                if self.should_continue_growth(rng, room.len(), target_size) {
                    queue.push_back(pos);
                }
            }
        }

        Ok(room)
    }

    /// Сколько клеток добавить на этом шаге: иногда медленно, иногда рывком.
    fn growth_amount(
        &self,
        rng: &mut SeedManager,
        available: usize,
        remaining: usize,
    ) -> Result<usize, GenerationError> {
        if available == 0 || remaining == 0 {
            return Ok(0);
        }
        let factor = rng.next_double();
        let max_growth = available.min(remaining);

        let amount = if factor < self.tuning.slow_growth_threshold {
            1
        } else if factor < self.tuning.medium_growth_threshold {
            max_growth.min(2 + rng.next_int(2)?)
        } else {
            max_growth.min(3 + rng.next_int(3)?)
        };
        Ok(amount)
    }

    fn select_positions(
        &self,
        rng: &mut SeedManager,
        candidates: &[HexCoord],
        count: usize,
        room: &[HexCoord],
        visited: &HashSet<HexCoord>,
    ) -> Result<Vec<HexCoord>, GenerationError> {
        if candidates.is_empty() || count == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(HexCoord, f64)> = candidates
            .iter()
            .map(|&c| (c, self.growth_score(rng, c, room, visited)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let last = scored.len() - 1;
        let mut selected = Vec::with_capacity(count);
        for i in 0..count.min(scored.len()) {
            let mut index = i;
            if rng.next_double() < self.tuning.selection_jitter_probability && i < last {
                index = (i + 1 + rng.next_int(2)?).min(last);
            }
            selected.push(scored[index].0);
        }
        Ok(selected)
    }

    fn growth_score(
        &self,
        rng: &mut SeedManager,
        candidate: HexCoord,
        room: &[HexCoord],
        visited: &HashSet<HexCoord>,
    ) -> f64 {
        let room_neighbors = candidate
            .neighbors()
            .iter()
            .filter(|n| visited.contains(*n))
            .count();

        let mut score = match room_neighbors {
            0 => 0.0,
            1 => 1.0,
            2 | 3 => 2.0,
            _ => 0.5,
        };

        score += rng.next_double() * self.tuning.score_jitter;

        if !room.is_empty() {
            let distance = f64::from(candidate.distance(room_center(room)));
            score += (self.tuning.centroid_bonus_radius - distance).max(0.0)
                * self.tuning.centroid_bonus_weight;
        }
        score
    }

    /// Рост затухает по мере заполнения комнаты.
    fn should_continue_growth(&self, rng: &mut SeedManager, size: usize, target_size: usize) -> bool {
        if size >= target_size {
            return false;
        }
        let probability = self.tuning.growth_continue_base
            - (size as f64 / target_size as f64) * self.tuning.growth_continue_decay;
        rng.next_double() < probability
    }
}

/// Целочисленный центр масс комнаты.
fn room_center(room: &[HexCoord]) -> HexCoord {
    if room.is_empty() {
        return HexCoord::ORIGIN;
    }
    let n = room.len() as i32;
    let sum_q: i32 = room.iter().map(|c| c.q).sum();
    let sum_r: i32 = room.iter().map(|c| c.r).sum();
    HexCoord::new(sum_q / n, sum_r / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexType;

    fn seeded_layout() -> (HexLayout, Frontier) {
        let mut layout = HexLayout::new();
        layout.insert(HexCoord::ORIGIN, HexType::Corridor);
        let frontier: Frontier = HexCoord::ORIGIN.neighbors().into_iter().collect();
        (layout, frontier)
    }

    #[test]
    fn room_stays_within_budget_and_is_contiguous() {
        let (layout, frontier) = seeded_layout();
        let generator = RoomGenerator::new(&GenerationOptions::default());
        for (seed, size) in [("r1", 4), ("r2", 8), ("r3", 12), ("r4", 20), ("r5", 1)] {
            let mut rng = SeedManager::new(Some(seed));
            let room = generator
                .generate_room(&mut rng, &frontier, &layout, size)
                .unwrap();
            assert!(!room.is_empty());
            assert!(room.len() <= size);
            assert!(frontier.contains(&room[0]));
            let unique: HashSet<_> = room.iter().collect();
            assert_eq!(unique.len(), room.len());
            for (i, cell) in room.iter().enumerate().skip(1) {
                assert!(!layout.contains(*cell));
                assert!(room[..i].iter().any(|p| p.is_adjacent(*cell)));
            }
        }
    }

    #[test]
    fn zero_target_gives_empty_room() {
        let (layout, frontier) = seeded_layout();
        let generator = RoomGenerator::new(&GenerationOptions::default());
        let mut rng = SeedManager::new(Some("zero"));
        assert!(
            generator
                .generate_room(&mut rng, &frontier, &layout, 0)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn crowded_start_points_are_avoided() {
        // Кольцо вокруг (0,0) без одной клетки: у центра 5 занятых соседей
        let mut layout = HexLayout::new();
        let ring: Vec<HexCoord> = HexCoord::ORIGIN.neighbors()[..5].to_vec();
        for &c in &ring {
            layout.insert(c, HexType::Corridor);
        }
        let mut frontier: Frontier = ring
            .iter()
            .flat_map(|c| c.neighbors())
            .filter(|n| !layout.contains(*n))
            .collect();
        frontier.insert(HexCoord::ORIGIN);

        let generator = RoomGenerator::new(&GenerationOptions::default());
        for seed in ["c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8"] {
            let mut rng = SeedManager::new(Some(seed));
            let room = generator
                .generate_room(&mut rng, &frontier, &layout, 1)
                .unwrap();
            assert_eq!(room.len(), 1);
            assert_ne!(room[0], HexCoord::ORIGIN);
            assert!(layout.occupied_neighbors(room[0]) <= 3);
        }
    }

    #[test]
    fn crowding_limit_is_relaxed_when_needed() {
        let mut layout = HexLayout::new();
        for c in HexCoord::ORIGIN.neighbors() {
            layout.insert(c, HexType::Room);
        }
        let frontier: Frontier = [HexCoord::ORIGIN].into_iter().collect();
        let generator = RoomGenerator::new(&GenerationOptions::default());
        let mut rng = SeedManager::new(Some("relaxed"));
        let room = generator
            .generate_room(&mut rng, &frontier, &layout, 5)
            .unwrap();
        // Центр окружён со всех сторон: комната из единственной клетки
        assert_eq!(room, vec![HexCoord::ORIGIN]);
    }

    #[test]
    fn growth_amount_is_capped() {
        let generator = RoomGenerator::new(&GenerationOptions::default());
        let mut rng = SeedManager::new(Some("amount"));
        for _ in 0..200 {
            let n = generator.growth_amount(&mut rng, 2, 10).unwrap();
            assert!((1..=2).contains(&n));
            let m = generator.growth_amount(&mut rng, 6, 10).unwrap();
            assert!((1..=5).contains(&m));
        }
        assert_eq!(generator.growth_amount(&mut rng, 0, 5).unwrap(), 0);
        assert_eq!(generator.growth_amount(&mut rng, 3, 0).unwrap(), 0);
    }

    #[test]
    fn room_center_truncates() {
        let room = [HexCoord::new(0, 0), HexCoord::new(1, 0), HexCoord::new(2, -1)];
        assert_eq!(room_center(&room), HexCoord::new(1, 0));
        assert_eq!(room_center(&[]), HexCoord::ORIGIN);
    }

    #[test]
    fn same_seed_same_room() {
        let (layout, frontier) = seeded_layout();
        let generator = RoomGenerator::new(&GenerationOptions::default());
        let mut a = SeedManager::new(Some("twin"));
        let mut b = SeedManager::new(Some("twin"));
        assert_eq!(
            generator.generate_room(&mut a, &frontier, &layout, 8).unwrap(),
            generator.generate_room(&mut b, &frontier, &layout, 8).unwrap()
        );
    }
}
