//! Network analysis tools.

mod add_locations;
mod enums;
mod make_route_layer;

pub use add_locations::{AddLocations, FieldMapping, SearchCriteria};
pub use enums::{
    AppendMode, InvalidLocations, LineShape, MatchType, RestrictedElements, Sequence, SnapType,
    TimeZoneUsage, UturnPolicy,
};
pub use make_route_layer::MakeRouteLayer;

/// Toolbox alias shared by the network analysis tools.
pub const TOOLBOX: &str = "na";
