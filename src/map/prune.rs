//! Разгрузка коридоров после фазы роста.
//!
//! Рост связывает каждый новый гекс со всеми занятыми соседями, поэтому коридоры выходят
//! перегруженными связями. Здесь у коридоров с тремя и более связями по одной удаляются
//! наименее важные связи, пока степень не станет 2. Каждое удаление проверяется обходом
//! всего графа: если карта распалась, связь возвращается.
//!
//! Жадный проход может оставить коридор точкой сочленения с четырьмя и более мостами.
//! Для таких коридоров выполняется второй проход с перекладкой связей.

use crate::config::GrowthTuning;
use crate::error::GenerationError;
use crate::events::{EventSink, GenerationEvent};
use crate::graph;
use crate::hex::{HexCoord, Hexagon};
use crate::map::layout::HexLayout;
use crate::seed::SeedManager;
use std::cmp::Reverse;

/// Целевая степень коридора.
const TARGET_DEGREE: usize = 2;
/// Коридоры с меньшим числом связей не обрабатываются.
const MIN_PRUNE_DEGREE: usize = 3;
/// Жёсткий предел степени коридора после разгрузки.
pub const MAX_CORRIDOR_DEGREE: usize = 3;

/// Цена перекладки для гекса, который получает новую связь.
const COST_FREE: u8 = 0;
const COST_NEW_JUNCTION: u8 = 1;
const COST_OVERLOAD: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    pub removed: usize,
    pub processed: usize,
    pub corridors: usize,
    /// Связи, заменённые связью между соседями коридора
    pub rerouted: usize,
}

pub fn prune_corridors<S: EventSink>(
    layout: &mut HexLayout,
    rng: &mut SeedManager,
    tuning: &GrowthTuning,
    sink: &mut S,
) -> Result<PruneSummary, GenerationError> {
    // Сначала самые перегруженные; при равенстве сохраняется порядок добавления
    let mut corridors: Vec<(String, usize)> = layout
        .hexagons()
        .iter()
        .filter(|h| h.is_corridor())
        .map(|h| (h.id.clone(), h.connection_count()))
        .collect();
    corridors.sort_by_key(|&(_, degree)| Reverse(degree));

    let mut summary = PruneSummary {
        corridors: corridors.len(),
        ..PruneSummary::default()
    };

    for (id, _) in &corridors {
        if degree(layout, id) < MIN_PRUNE_DEGREE {
            continue;
        }
        summary.removed += reduce_connections(layout, id, rng, tuning, sink)?;
        summary.processed += 1;
    }

    let (removed, rerouted) = repair_hubs(layout, sink);
    summary.removed += removed;
    summary.rerouted = rerouted;

    sink.record(GenerationEvent::PruningCompleted {
        removed: summary.removed,
        processed: summary.processed,
        corridors: summary.corridors,
        rerouted: summary.rerouted,
    });
    Ok(summary)
}

fn degree(layout: &HexLayout, id: &str) -> usize {
    layout.get_by_id(id).map_or(0, Hexagon::connection_count)
}

fn is_connected(layout: &HexLayout) -> bool {
    graph::reachable_count(layout.hexagons()) == layout.len()
}

fn reduce_connections<S: EventSink>(
    layout: &mut HexLayout,
    id: &str,
    rng: &mut SeedManager,
    tuning: &GrowthTuning,
    sink: &mut S,
) -> Result<usize, GenerationError> {
    let Some(hex) = layout.get_by_id(id) else {
        return Ok(0);
    };
    let center = hex.coord();
    let neighbors: Vec<(String, HexCoord)> = hex
        .connections
        .iter()
        .filter_map(|c| layout.get_by_id(c).map(|n| (c.clone(), n.coord())))
        .collect();

    let mut scored: Vec<(String, f64)> = Vec::with_capacity(neighbors.len());
    for (conn, coord) in &neighbors {
        let score = connection_importance(center, *coord, &neighbors, rng, tuning);
        scored.push((conn.clone(), score));
    }
    // Наименее важные первыми
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut removed = 0;
    for (conn, _) in scored {
        if degree(layout, id) <= TARGET_DEGREE {
            break;
        }
        layout.disconnect(id, &conn);
        if is_connected(layout) {
            removed += 1;
            sink.record(GenerationEvent::ConnectionPruned {
                hexagon: id.to_string(),
                connection: conn,
            });
        } else {
            layout.connect(id, &conn);
            sink.record(GenerationEvent::ConnectionRestored {
                hexagon: id.to_string(),
                connection: conn,
            });
        }
    }
    Ok(removed)
}

/// Второй проход по коридорам, у которых осталось больше двух связей.
///
/// Сначала пробуется простое удаление связи, затем перекладка: если соседи хаба A и B
/// смежны на сетке, но не связаны, связь A–B возвращается, а хаб–A удаляется.
/// Треугольник хаб–A–B сохраняет связность. Рост связал все занятые соседние клетки,
/// поэтому возвращаемая связь всегда была в исходном наборе.
///
/// Коридор с тремя связями разгружается только перекладкой, которая никому не добавляет
/// развилку. Коридор с четырьмя и более связями разгружается любой ценой; если перекладка
/// перегрузила соседа, он обрабатывается в следующем круге.
///
/// Возвращает число удалённых и переложенных связей.
fn repair_hubs<S: EventSink>(layout: &mut HexLayout, sink: &mut S) -> (usize, usize) {
    let mut removed = 0;
    let mut rerouted = 0;

    for _ in 0..layout.len().max(1) {
        let mut hubs: Vec<(String, usize)> = layout
            .hexagons()
            .iter()
            .filter(|h| h.is_corridor() && h.connection_count() > TARGET_DEGREE)
            .map(|h| (h.id.clone(), h.connection_count()))
            .collect();
        hubs.sort_by_key(|&(_, degree)| Reverse(degree));

        let mut changed = false;
        for (id, _) in &hubs {
            while degree(layout, id) > TARGET_DEGREE {
                let overloaded = degree(layout, id) > MAX_CORRIDOR_DEGREE;
                if let Some(connection) = remove_redundant(layout, id) {
                    removed += 1;
                    sink.record(GenerationEvent::ConnectionPruned {
                        hexagon: id.clone(),
                        connection,
                    });
                } else if let Some((connection, via)) = reroute(layout, id, overloaded) {
                    rerouted += 1;
                    sink.record(GenerationEvent::ConnectionRerouted {
                        hexagon: id.clone(),
                        connection,
                        via,
                    });
                } else {
                    break;
                }
                changed = true;
            }
        }

        if !changed || !has_overloaded_corridor(layout) {
            break;
        }
    }
    (removed, rerouted)
}

fn has_overloaded_corridor(layout: &HexLayout) -> bool {
    layout
        .hexagons()
        .iter()
        .any(|h| h.is_corridor() && h.connection_count() > MAX_CORRIDOR_DEGREE)
}

/// Удаляет первую связь хаба, без которой карта остаётся связной.
fn remove_redundant(layout: &mut HexLayout, id: &str) -> Option<String> {
    let connections = layout.get_by_id(id)?.connections.clone();
    for conn in connections {
        layout.disconnect(id, &conn);
        if is_connected(layout) {
            return Some(conn);
        }
        layout.connect(id, &conn);
    }
    None
}

/// Перекладывает одну связь хаба на пару его смежных соседей.
/// Возвращает (удалённый сосед, сосед, с которым он теперь связан).
fn reroute(layout: &mut HexLayout, id: &str, overloaded: bool) -> Option<(String, String)> {
    let hub = layout.get_by_id(id)?;
    let neighbors: Vec<(String, HexCoord)> = hub
        .connections
        .iter()
        .filter_map(|c| layout.get_by_id(c).map(|n| (c.clone(), n.coord())))
        .collect();

    // (цена, сосед, теряющий связь с хабом, сосед, получающий связь)
    let mut options: Vec<(u8, String, String)> = Vec::new();
    for (i, (a, coord_a)) in neighbors.iter().enumerate() {
        for (b, coord_b) in &neighbors[i + 1..] {
            if !coord_a.is_adjacent(*coord_b)
                || layout.get_by_id(a).is_some_and(|h| h.is_connected_to(b))
            {
                continue;
            }
            options.push((gain_cost(layout, b), a.clone(), b.clone()));
            options.push((gain_cost(layout, a), b.clone(), a.clone()));
        }
    }

    let limit = if overloaded { COST_OVERLOAD } else { COST_FREE };
    options.retain(|&(cost, ..)| cost <= limit);
    options.sort_by_key(|&(cost, ..)| cost);

    for (_, dropped, via) in options {
        layout.connect(&dropped, &via);
        layout.disconnect(id, &dropped);
        if is_connected(layout) {
            return Some((dropped, via));
        }
        layout.connect(id, &dropped);
        layout.disconnect(&dropped, &via);
    }
    None
}

/// Во что обойдётся лишняя связь для гекса `id`. Комнаты не ограничены.
fn gain_cost(layout: &HexLayout, id: &str) -> u8 {
    match layout.get_by_id(id) {
        Some(h) if h.is_corridor() => match h.connection_count() + 1 {
            0..=TARGET_DEGREE => COST_FREE,
            MAX_CORRIDOR_DEGREE => COST_NEW_JUNCTION,
            _ => COST_OVERLOAD,
        },
        _ => COST_FREE,
    }
}

/// Важность связи `center -> target`: выше у связей, продолжающих прямую линию через центр.
fn connection_importance(
    center: HexCoord,
    target: HexCoord,
    neighbors: &[(String, HexCoord)],
    rng: &mut SeedManager,
    tuning: &GrowthTuning,
) -> f64 {
    let max_linearity = neighbors
        .iter()
        .filter(|(_, other)| *other != target)
        .map(|(_, other)| linearity(target, center, *other))
        .fold(0.0_f64, f64::max);

    let distance = f64::from(center.distance(target));
    max_linearity * tuning.linearity_weight
        + 1.0 / (distance + 1.0)
        + rng.next_double() * tuning.importance_jitter
}

/// −cos угла между векторами `center -> p1` и `center -> p2`:
/// 1.0 для противоположных направлений, 0.0 для перпендикулярных, −1.0 для совпадающих.
fn linearity(p1: HexCoord, center: HexCoord, p2: HexCoord) -> f64 {
    let v1 = p1 - center;
    let v2 = p2 - center;
    let (x1, y1) = (f64::from(v1.q), f64::from(v1.r));
    let (x2, y2) = (f64::from(v2.q), f64::from(v2.r));

    let mag1 = x1.hypot(y1);
    let mag2 = x2.hypot(y2);
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }
    let cos = ((x1 * x2 + y1 * y2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    -cos
}
