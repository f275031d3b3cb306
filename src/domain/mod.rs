//! Domain types and models

mod garment;
mod body;
mod tryon;

pub use garment::{ClothingItem, ClothingType};
pub use body::{BodyMeasurements, DEFAULT_HEIGHT_CM};
pub use tryon::{Composition, CompositionPath, FitAnalysis, TryOnResult};
