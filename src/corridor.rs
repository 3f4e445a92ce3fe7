//! Генерация коридоров: линейные пути со случайными ветвлениями.
//!
//! Коридор растёт случайным блужданием от точки фронтира. Клетка-продолжение допускается,
//! только если у неё мало занятых соседей, поэтому коридоры остаются тонкими.
//! Предыдущее направление движения предпочитается, но периодически забывается.

use crate::config::{GenerationOptions, GrowthTuning};
use crate::error::GenerationError;
use crate::hex::HexCoord;
use crate::map::layout::{Frontier, HexLayout};
use crate::seed::SeedManager;
use std::collections::{HashSet, VecDeque};

/// Больше двух дополнительных клеток ширины за шаг не добавляется.
const MAX_EXTRA_WIDTH: usize = 2;

#[derive(Debug, Clone)]
pub struct CorridorGenerator {
    widths: Vec<usize>,
    tuning: GrowthTuning,
}

impl CorridorGenerator {
    #[must_use]
    pub fn new(options: &GenerationOptions) -> Self {
        Self {
            widths: options.corridor_widths.clone(),
            tuning: options.tuning,
        }
    }

    /// Строит один сегмент коридора длиной не более `max_length` клеток.
    ///
    /// Возвращает координаты в порядке прокладки; первая — стартовая точка на фронтире.
    /// Пустой результат означает, что подходящей стартовой точки нет.
    pub fn generate_corridor(
        &self,
        rng: &mut SeedManager,
        frontier: &Frontier,
        layout: &HexLayout,
        max_length: usize,
    ) -> Result<Vec<HexCoord>, GenerationError> {
        if frontier.is_empty() || max_length == 0 {
            return Ok(Vec::new());
        }
        let Some(start) = select_start(rng, frontier, layout)? else {
            return Ok(Vec::new());
        };
        let width = *rng.random_choice(&self.widths)?;
        self.walk(rng, start, layout, max_length, width)
    }

    fn walk(
        &self,
        rng: &mut SeedManager,
        start: HexCoord,
        layout: &HexLayout,
        max_length: usize,
        width: usize,
    ) -> Result<Vec<HexCoord>, GenerationError> {
        let mut path = vec![start];
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut last_direction: Option<HexCoord> = None;

        while path.len() < max_length {
            let Some(current) = queue.pop_front() else {
                break;
            };

            let candidates = self.extensions(current, layout, &visited);
            if candidates.is_empty() {
                // Тупик: иногда ответвляемся от более ранней клетки пути
                if path.len() > 1 && rng.next_double() < self.tuning.branch_probability {
                    let branch_point = path[rng.next_int((path.len() - 2).max(1))?];
                    let branches = self.extensions(branch_point, layout, &visited);
                    if !branches.is_empty() {
                        let next = branches[rng.next_int(branches.len())?];
                        queue.push_back(next);
                        path.push(next);
                        visited.insert(next);
                        last_direction = Some(next - branch_point);
                        continue;
                    }
                }
                break;
            }

            let next = choose_next(rng, current, &candidates, last_direction)?;
            let extra = width_cells(rng, next, layout, &visited, width);

            queue.push_back(next);
            path.push(next);
            visited.insert(next);

            for cell in extra {
                if path.len() >= max_length {
                    break;
                }
                path.push(cell);
                visited.insert(cell);
            }

            last_direction = Some(next - current);
            if rng.next_double() < self.tuning.direction_reset_probability {
                last_direction = None;
            }
        }

        Ok(path)
    }

    /// Свободные соседи `cell`, не делающие коридор слишком плотным.
    fn extensions(
        &self,
        cell: HexCoord,
        layout: &HexLayout,
        visited: &HashSet<HexCoord>,
    ) -> Vec<HexCoord> {
        cell.neighbors()
            .into_iter()
            .filter(|n| !visited.contains(n) && !layout.contains(*n))
            .filter(|&n| {
                let crowd = n
                    .neighbors()
                    .iter()
                    .filter(|m| layout.contains(**m) || visited.contains(*m))
                    .count();
                crowd <= self.tuning.corridor_density_limit
            })
            .collect()
    }
}

/// Случайная точка фронтира, примыкающая к занятому гексу.
fn select_start(
    rng: &mut SeedManager,
    frontier: &Frontier,
    layout: &HexLayout,
) -> Result<Option<HexCoord>, GenerationError> {
    let valid: Vec<HexCoord> = frontier
        .iter()
        .copied()
        .filter(|&c| layout.occupied_neighbors(c) > 0)
        .collect();
    if valid.is_empty() {
        return Ok(None);
    }
    Ok(Some(valid[rng.next_int(valid.len())?]))
}

fn choose_next(
    rng: &mut SeedManager,
    current: HexCoord,
    candidates: &[HexCoord],
    last_direction: Option<HexCoord>,
) -> Result<HexCoord, GenerationError> {
    if let [only] = candidates {
        return Ok(*only);
    }
    if let Some(dir) = last_direction {
        if let Some(&pos) = candidates
            .iter()
            .find(|&&pos| is_similar_direction(dir, pos - current))
        {
            return Ok(pos);
        }
    }
    Ok(*rng.random_choice(candidates)?)
}

/// Направления считаются близкими, если отличаются не больше чем на 1 по обеим осям.
fn is_similar_direction(a: HexCoord, b: HexCoord) -> bool {
    (a.q - b.q).abs() <= 1 && (a.r - b.r).abs() <= 1
}

/// Дополнительные клетки вокруг `center` для коридоров шириной больше 1.
fn width_cells(
    rng: &mut SeedManager,
    center: HexCoord,
    layout: &HexLayout,
    visited: &HashSet<HexCoord>,
    width: usize,
) -> Vec<HexCoord> {
    if width <= 1 {
        return Vec::new();
    }
    let mut available: Vec<HexCoord> = center
        .neighbors()
        .into_iter()
        .filter(|n| !visited.contains(n) && !layout.contains(*n))
        .collect();
    rng.shuffle(&mut available);
    available.truncate((width - 1).min(MAX_EXTRA_WIDTH));
    available
}
