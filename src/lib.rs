pub mod config;
pub mod corridor;
pub mod error;
pub mod events;
pub mod graph;
pub mod hex;
pub mod manifest;
pub mod map;
pub mod room;
pub mod seed;
pub mod validator;

pub use config::{GenerationOptions, GenerationParams, GrowthTuning};
pub use error::{ConfigError, GenerationError};
pub use events::{EventSink, GenerationEvent, MemorySink, TracingSink};
pub use hex::{HexCoord, HexType, Hexagon};
pub use manifest::{BoundingBox, Manifest, Metadata, Statistics};
pub use map::{MapGenerator, generate};
pub use seed::SeedManager;
pub use validator::{ValidationReport, validate_map};
