//! Детерминированный источник случайности.
//!
//! Все решения генератора берутся из одного потока `ChaCha8Rng` в строго заданном порядке.
//! Строковый сид хэшируется BLAKE3, 32 байта дайджеста становятся состоянием ГСЧ:
//! одинаковый сид даёт одинаковую последовательность на любой платформе.
//! Целые выбираются из диапазонов `u64`, а не `usize`: ширина `usize` меняет число
//! потребляемых слов, и потоки 32- и 64-битных сборок разошлись бы.

use crate::error::GenerationError;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Длина автоматически сгенерированного сида.
const GENERATED_SEED_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct SeedManager {
    seed: String,
    rng: ChaCha8Rng,
}

impl SeedManager {
    /// Создаёт поток из сида. Пустой сид или `None` заменяется случайным,
    /// который затем возвращается через [`SeedManager::seed`].
    #[must_use]
    pub fn new(seed: Option<&str>) -> Self {
        let seed = match seed.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => generate_random_seed(),
        };
        let rng = ChaCha8Rng::from_seed(*blake3::hash(seed.as_bytes()).as_bytes());
        Self { seed, rng }
    }

    #[must_use]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Целое из [0, bound).
    pub fn next_int(&mut self, bound: usize) -> Result<usize, GenerationError> {
        if bound == 0 {
            return Err(GenerationError::InvalidArgument(
                "bound must be positive".to_string(),
            ));
        }
        Ok(self.rng.gen_range(0..(bound as u64)) as usize)
    }

    /// Целое из [min, max).
    pub fn next_int_range(&mut self, min: usize, max: usize) -> Result<usize, GenerationError> {
        if min >= max {
            return Err(GenerationError::InvalidArgument(format!(
                "min must be less than max (got {min}..{max})"
            )));
        }
        Ok(self.rng.gen_range((min as u64)..(max as u64)) as usize)
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.r#gen()
    }

    /// Вещественное из [0, 1).
    pub fn next_double(&mut self) -> f64 {
        self.rng.r#gen()
    }

    /// Испытание Бернулли: `true` с вероятностью `corridor_ratio`.
    pub fn should_generate_corridor(&mut self, corridor_ratio: f64) -> bool {
        self.next_double() < corridor_ratio
    }

    /// Равновероятный выбор элемента.
    pub fn random_choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, GenerationError> {
        if items.is_empty() {
            return Err(GenerationError::InvalidArgument(
                "cannot choose from an empty slice".to_string(),
            ));
        }
        let idx = self.next_int(items.len())?;
        Ok(&items[idx])
    }

    /// Перемешивание на месте из того же потока.
    /// `SliceRandom` берёт индексы из `u32` для срезов короче 2³², так что порядок не зависит от платформы.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

fn generate_random_seed() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SEED_LEN)
        .map(char::from)
        .collect()
}
