use clap::Parser;
use hexgen::{GenerationParams, MapGenerator, validate_map};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор гексагональных карт подземелий
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию — встроенные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид генерации (перекрывает значение из конфигурации)
    #[arg(short, long)]
    seed: Option<String>,

    /// Число гексов (перекрывает значение из конфигурации)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Путь для сохранения манифеста (по умолчанию: ./map.json)
    #[arg(short, long, default_value = "map.json")]
    output: PathBuf,

    /// Вывести полный отчёт проверки карты
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let mut params = match &cli.config {
        Some(path) => GenerationParams::from_toml_file(path)?,
        None => GenerationParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = Some(seed);
    }
    if let Some(count) = cli.count {
        params.hexagon_count = count;
    }
    params.validate()?;

    let generator = MapGenerator::new(params.seed.as_deref(), params.options.clone());
    println!(
        "Генерация карты (гексов: {}, сид: {})...",
        params.hexagon_count,
        generator.seed()
    );
    let manifest = generator.generate(params.hexagon_count)?;

    let stats = &manifest.metadata.statistics;
    println!(
        "Коридоров: {}, комнат: {}, средняя степень: {:.2}, путь: {}, время: {} мс",
        stats.corridor_count,
        stats.room_count,
        stats.average_connections,
        stats.longest_path,
        manifest.metadata.generation_time_ms
    );

    if cli.validate {
        let report = validate_map(&manifest.hexagons, params.options.corridor_ratio);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    println!("Сохранение в {:?}", cli.output);
    std::fs::write(&cli.output, serde_json::to_string_pretty(&manifest)?)?;

    println!("\nГотово! Карта сохранена.");
    Ok(())
}
