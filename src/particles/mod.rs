//! Particle systems: foliage cloud, instanced ornaments, ambient dust, and
//! the apex star

pub mod dust;
pub mod foliage;
pub mod ornaments;
pub mod star;

pub use dust::DustField;
pub use foliage::{FoliageField, FoliagePalette, FOLIAGE_STRIDE};
pub use ornaments::{
    DualPosition, GroupConfig, OrnamentGroup, OrnamentKind, OrnamentRecord, OrnamentSet,
};
pub use star::TopStar;
