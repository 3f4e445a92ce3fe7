//! Структурированные события генерации.
//!
//! Генератор не пишет в глобальный журнал напрямую: он получает приёмник событий
//! при создании. [`TracingSink`] передаёт события в `tracing`, [`MemorySink`] собирает их в память.

use crate::hex::HexType;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// Генерация началась
    Started { seed: String, target: usize },
    /// Сегмент (коридор или комната) добавлен на карту
    SegmentCommitted {
        hex_type: HexType,
        proposed: usize,
        committed: usize,
        total: usize,
    },
    /// Рост остановлен раньше цели: фронтир исчерпан или сегмент ничего не добавил
    FrontierExhausted { generated: usize, target: usize },
    /// Фаза роста завершена
    GrowthCompleted { generated: usize },
    /// Связь коридора удалена без потери связности
    ConnectionPruned { hexagon: String, connection: String },
    /// Связь коридора восстановлена: без неё карта распадается
    ConnectionRestored { hexagon: String, connection: String },
    /// Связь коридора заменена связью между двумя его соседями (`connection` и `via`)
    ConnectionRerouted {
        hexagon: String,
        connection: String,
        via: String,
    },
    /// Обрезка связей коридоров завершена
    PruningCompleted {
        removed: usize,
        processed: usize,
        corridors: usize,
        rerouted: usize,
    },
    /// Карта готова
    Completed { hexagons: usize, elapsed_ms: u64 },
}

/// Приёмник событий генерации.
pub trait EventSink {
    fn record(&mut self, event: GenerationEvent);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn record(&mut self, event: GenerationEvent) {
        (**self).record(event);
    }
}

/// Передаёт события в `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: GenerationEvent) {
        match event {
            GenerationEvent::Started { seed, target } => {
                tracing::info!(%seed, target, "map generation started");
            }
            GenerationEvent::SegmentCommitted {
                hex_type,
                proposed,
                committed,
                total,
            } => {
                tracing::debug!(%hex_type, proposed, committed, total, "segment committed");
            }
            GenerationEvent::FrontierExhausted { generated, target } => {
                tracing::warn!(generated, target, "frontier exhausted before target");
            }
            GenerationEvent::GrowthCompleted { generated } => {
                tracing::info!(generated, "growth phase completed");
            }
            GenerationEvent::ConnectionPruned { hexagon, connection } => {
                tracing::debug!(%hexagon, %connection, "corridor connection removed");
            }
            GenerationEvent::ConnectionRestored { hexagon, connection } => {
                tracing::debug!(%hexagon, %connection, "corridor connection restored");
            }
            GenerationEvent::ConnectionRerouted {
                hexagon,
                connection,
                via,
            } => {
                tracing::debug!(%hexagon, %connection, %via, "corridor connection rerouted");
            }
            GenerationEvent::PruningCompleted {
                removed,
                processed,
                corridors,
                rerouted,
            } => {
                tracing::info!(
                    removed,
                    processed,
                    corridors,
                    rerouted,
                    "corridor pruning completed"
                );
            }
            GenerationEvent::Completed {
                hexagons,
                elapsed_ms,
            } => {
                tracing::info!(hexagons, elapsed_ms, "map generation completed");
            }
        }
    }
}

/// Собирает события в вектор.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub events: Vec<GenerationEvent>,
}

impl EventSink for MemorySink {
    fn record(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }
}
