//! Spatial statistics tools.

mod enums;
mod gwr;
mod hot_spots;

pub use enums::{
    DistanceMethod, FdrCorrection, ModelType, NeighborhoodType, ScaleData, SelectionMethod,
    SpatialRelationship, Standardization, WeightingScheme,
};
pub use gwr::GeographicallyWeightedRegression;
pub use hot_spots::HotSpotAnalysis;

/// Toolbox alias shared by the spatial statistics tools.
pub const TOOLBOX: &str = "stats";
