//! Генератор карты: рост от фронтира, разгрузка коридоров, проверка и статистика.
//!
//! Одна генерация проходит фазы:
//! 1. Инициализация — коридор в начале координат, шесть соседей во фронтире.
//! 2. Рост — по жребию коридор или комната из текущего фронтира, пока не набрано нужное число гексов.
//! 3. Разгрузка коридоров ([`prune`]) — удаление лишних связей без потери связности.
//! 4. Проверка связности — сбой означает нарушение внутреннего инварианта.
//! 5. Статистика ([`stats`]).

pub mod layout;
pub mod prune;
pub mod stats;

use crate::config::GenerationOptions;
use crate::corridor::CorridorGenerator;
use crate::error::GenerationError;
use crate::events::{EventSink, GenerationEvent, TracingSink};
use crate::graph;
use crate::hex::{HexCoord, HexType};
use crate::manifest::{MANIFEST_VERSION, Manifest, Metadata};
use crate::room::RoomGenerator;
use crate::seed::SeedManager;
use crate::validator;
use layout::{Frontier, HexLayout};
use std::time::Instant;

/// Генерирует карту с приёмником событий [`TracingSink`].
///
/// # Пример
/// ```
/// use hexgen::{GenerationOptions, generate};
/// let manifest = generate(Some("test123"), 25, &GenerationOptions::default()).unwrap();
/// assert_eq!(manifest.hexagons.len(), 25);
/// assert_eq!(manifest.hexagons[0].id, "hex_0_0");
/// ```
pub fn generate(
    seed: Option<&str>,
    target_count: usize,
    options: &GenerationOptions,
) -> Result<Manifest, GenerationError> {
    MapGenerator::new(seed, options.clone()).generate(target_count)
}

/// Состояние одной генерации. Используется один раз: [`MapGenerator::generate`] поглощает генератор.
pub struct MapGenerator<S: EventSink = TracingSink> {
    rng: SeedManager,
    options: GenerationOptions,
    corridors: CorridorGenerator,
    rooms: RoomGenerator,
    layout: HexLayout,
    frontier: Frontier,
    sink: S,
}

impl MapGenerator<TracingSink> {
    #[must_use]
    pub fn new(seed: Option<&str>, options: GenerationOptions) -> Self {
        Self::with_sink(seed, options, TracingSink)
    }
}

impl<S: EventSink> MapGenerator<S> {
    /// Параметры считаются проверенными вызывающей стороной ([`GenerationOptions::validate`]).
    pub fn with_sink(seed: Option<&str>, options: GenerationOptions, sink: S) -> Self {
        Self {
            rng: SeedManager::new(seed),
            corridors: CorridorGenerator::new(&options),
            rooms: RoomGenerator::new(&options),
            options,
            layout: HexLayout::new(),
            frontier: Frontier::new(),
            sink,
        }
    }

    /// Сид, из которого строится карта (сгенерированный, если не был задан).
    #[must_use]
    pub fn seed(&self) -> &str {
        self.rng.seed()
    }

    /// Строит карту из `target_count` гексов (меньше, если фронтир исчерпан раньше).
    ///
    /// # Ошибки
    /// - [`GenerationError::ConnectivityViolation`] — итоговая карта несвязна (внутренний сбой);
    /// - [`GenerationError::InvalidArgument`] — некорректный аргумент вспомогательной функции ГСЧ.
    pub fn generate(mut self, target_count: usize) -> Result<Manifest, GenerationError> {
        let started = Instant::now();
        self.sink.record(GenerationEvent::Started {
            seed: self.rng.seed().to_string(),
            target: target_count,
        });

        self.initialize();
        self.grow(target_count)?;
        prune::prune_corridors(
            &mut self.layout,
            &mut self.rng,
            &self.options.tuning,
            &mut self.sink,
        )?;
        self.check_connectivity()?;

        let statistics = stats::calculate_statistics(self.layout.hexagons(), &mut self.rng)?;
        let generation_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.sink.record(GenerationEvent::Completed {
            hexagons: self.layout.len(),
            elapsed_ms: generation_time_ms,
        });

        Ok(Manifest {
            metadata: Metadata {
                seed: self.rng.seed().to_string(),
                requested_count: target_count,
                generation_time_ms,
                version: MANIFEST_VERSION.to_string(),
                statistics,
            },
            hexagons: self.layout.into_hexagons(),
        })
    }

    fn initialize(&mut self) {
        self.layout.insert(HexCoord::ORIGIN, HexType::Corridor);
        self.frontier.extend(HexCoord::ORIGIN.neighbors());
    }

    fn grow(&mut self, target_count: usize) -> Result<(), GenerationError> {
        while self.layout.len() < target_count && !self.frontier.is_empty() {
            let remaining = target_count - self.layout.len();

            let (hex_type, cells) = if self.rng.should_generate_corridor(self.options.corridor_ratio)
            {
                let max_length = remaining.min(self.options.tuning.max_corridor_length);
                let cells = self.corridors.generate_corridor(
                    &mut self.rng,
                    &self.frontier,
                    &self.layout,
                    max_length,
                )?;
                (HexType::Corridor, cells)
            } else {
                let size = self.room_size(remaining)?;
                let cells =
                    self.rooms
                        .generate_room(&mut self.rng, &self.frontier, &self.layout, size)?;
                (HexType::Room, cells)
            };

            let committed = self.commit(&cells, hex_type);
            self.sink.record(GenerationEvent::SegmentCommitted {
                hex_type,
                proposed: cells.len(),
                committed,
                total: self.layout.len(),
            });
            if committed == 0 {
                break;
            }
        }

        if self.layout.len() < target_count {
            self.sink.record(GenerationEvent::FrontierExhausted {
                generated: self.layout.len(),
                target: target_count,
            });
        }
        self.sink.record(GenerationEvent::GrowthCompleted {
            generated: self.layout.len(),
        });
        Ok(())
    }

    /// Размер комнаты из [min, max], урезанный до оставшегося бюджета.
    fn room_size(&mut self, remaining: usize) -> Result<usize, GenerationError> {
        let hi = self.options.room_size_max.min(remaining);
        let lo = self.options.room_size_min.min(hi);
        if lo == hi {
            return Ok(lo);
        }
        self.rng.next_int_range(lo, hi + 1)
    }

    /// Добавляет новые координаты по одной: гекс, связи с соседями, обновление фронтира.
    fn commit(&mut self, cells: &[HexCoord], hex_type: HexType) -> usize {
        let mut committed = 0;
        for &coord in cells {
            if !self.layout.insert(coord, hex_type) {
                continue;
            }
            committed += 1;
            self.frontier.remove(&coord);
            for neighbor in coord.neighbors() {
                if !self.layout.contains(neighbor) {
                    self.frontier.insert(neighbor);
                }
            }
        }
        committed
    }

    fn check_connectivity(&self) -> Result<(), GenerationError> {
        let hexagons = self.layout.hexagons();
        if validator::validate_connectivity(hexagons) {
            return Ok(());
        }
        Err(GenerationError::ConnectivityViolation {
            reachable: graph::reachable_count(hexagons),
            total: hexagons.len(),
        })
    }
}
