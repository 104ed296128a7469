use super::TOOLBOX;
use super::enums::{AppendMode, MatchType, RestrictedElements, SnapType};
use geobind_rs_tools::{
    DescriptorError, Domain, FieldRef, GpTool, InvocationError, LinearUnit, LinearUnitKind,
    ParamType, ParamValue, ParameterDescriptor, ToolDescriptor, ToolParams, env_keys,
};

/// Upper bound accepted for search tolerance and snap offset, in any unit.
const MAX_DISTANCE: f64 = 1_000_000.0;

/// Add Locations: load features into a network analysis sublayer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddLocations {
    params: ToolParams,
}

gp_tool!(AddLocations, describe);

fn describe() -> Result<ToolDescriptor, DescriptorError> {
    let snap = Domain::coded::<SnapType>()?;
    ToolDescriptor::builder("AddLocations", TOOLBOX)
        .parameter(ParameterDescriptor::required(
            "in_network_analysis_layer",
            ParamType::FeatureReference,
        ))
        .parameter(ParameterDescriptor::required("sub_layer", ParamType::String))
        .parameter(ParameterDescriptor::required("in_table", ParamType::FeatureReference))
        .parameter(
            ParameterDescriptor::optional("field_mappings", ParamType::ValueTable)
                .with_domain(Domain::ValueTable(vec![None, None, None])),
        )
        .parameter(
            ParameterDescriptor::optional("search_tolerance", ParamType::LinearUnit)
                .with_domain(Domain::range(0.0, MAX_DISTANCE))
                .with_default(LinearUnit::new(5000.0, LinearUnitKind::Meters))
                .with_category("Network Location"),
        )
        .parameter(ParameterDescriptor::optional("sort_field", ParamType::Field))
        .parameter(
            ParameterDescriptor::optional("search_criteria", ParamType::Composite)
                .with_domain(Domain::Composite(vec![
                    Domain::ValueTable(vec![None, Some(snap.clone())]),
                    snap,
                ]))
                .with_category("Network Location"),
        )
        .parameter(
            ParameterDescriptor::optional("match_type", ParamType::String)
                .with_domain(Domain::coded::<MatchType>()?)
                .with_default(MatchType::Closest),
        )
        .parameter(
            ParameterDescriptor::optional("append", ParamType::Boolean)
                .with_domain(Domain::coded::<AppendMode>()?)
                .with_default(AppendMode::Append),
        )
        .parameter(
            ParameterDescriptor::optional("snap_to_position_along_network", ParamType::Boolean)
                .with_default(false),
        )
        .parameter(
            ParameterDescriptor::optional("snap_offset", ParamType::LinearUnit)
                .with_domain(Domain::range(0.0, MAX_DISTANCE))
                .with_default(LinearUnit::new(5.0, LinearUnitKind::Meters)),
        )
        .parameter(
            ParameterDescriptor::optional("exclude_restricted_elements", ParamType::Boolean)
                .with_domain(Domain::coded::<RestrictedElements>()?)
                .with_default(RestrictedElements::Exclude),
        )
        .parameter(
            ParameterDescriptor::optional("search_query", ParamType::ValueTable)
                .with_domain(Domain::ValueTable(vec![None, None])),
        )
        .parameter(ParameterDescriptor::derived(
            "output_layer",
            ParamType::FeatureReference,
        ))
        .environment_keys([env_keys::WORKSPACE, env_keys::SCRATCH_WORKSPACE])
        .build()
}

/// One row of the `field_mappings` value table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub property: String,
    pub field: Option<String>,
    pub default_value: Option<String>,
}

impl FieldMapping {
    /// Read a location property from an input field.
    pub fn field(property: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            field: Some(field.into()),
            default_value: None,
        }
    }

    /// Set a location property to a constant.
    pub fn constant(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            field: None,
            default_value: Some(value.into()),
        }
    }

    fn into_row(self) -> Vec<ParamValue> {
        vec![
            ParamValue::String(self.property),
            ParamValue::String(self.field.unwrap_or_default()),
            ParamValue::String(self.default_value.unwrap_or_default()),
        ]
    }
}

/// Snap rules for the `search_criteria` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// One snap type for every network source.
    All(SnapType),
    /// Snap type per named network source.
    PerSource(Vec<(String, SnapType)>),
}

impl From<SearchCriteria> for ParamValue {
    fn from(criteria: SearchCriteria) -> Self {
        match criteria {
            SearchCriteria::All(snap) => ParamValue::from(snap),
            SearchCriteria::PerSource(rows) => ParamValue::Table(
                rows.into_iter()
                    .map(|(source, snap)| vec![ParamValue::String(source), ParamValue::from(snap)])
                    .collect(),
            ),
        }
    }
}

impl AddLocations {
    pub fn new(
        in_network_analysis_layer: impl Into<String>,
        sub_layer: impl Into<String>,
        in_table: impl Into<String>,
    ) -> Self {
        let mut tool = Self::default();
        let values = &mut tool.params.values;
        values.insert(
            "in_network_analysis_layer",
            ParamValue::FeatureRef(in_network_analysis_layer.into()),
        );
        values.insert("sub_layer", ParamValue::String(sub_layer.into()));
        values.insert("in_table", ParamValue::FeatureRef(in_table.into()));
        tool
    }

    pub fn field_mappings(
        &mut self,
        mappings: impl IntoIterator<Item = FieldMapping>,
    ) -> Result<&mut Self, InvocationError> {
        let rows = mappings.into_iter().map(FieldMapping::into_row).collect();
        self.try_set("field_mappings", ParamValue::Table(rows))?;
        Ok(self)
    }

    pub fn search_tolerance(&mut self, tolerance: LinearUnit) -> Result<&mut Self, InvocationError> {
        self.try_set("search_tolerance", tolerance)?;
        Ok(self)
    }

    pub fn sort_field(&mut self, field: FieldRef) -> Result<&mut Self, InvocationError> {
        self.try_set("sort_field", field)?;
        Ok(self)
    }

    pub fn search_criteria(&mut self, criteria: SearchCriteria) -> Result<&mut Self, InvocationError> {
        self.try_set("search_criteria", criteria)?;
        Ok(self)
    }

    pub fn match_type(&mut self, match_type: MatchType) -> Result<&mut Self, InvocationError> {
        self.try_set("match_type", match_type)?;
        Ok(self)
    }

    pub fn append(&mut self, mode: AppendMode) -> Result<&mut Self, InvocationError> {
        self.try_set("append", mode)?;
        Ok(self)
    }

    pub fn snap_to_position_along_network(
        &mut self,
        snap: bool,
        offset: Option<LinearUnit>,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("snap_to_position_along_network", snap)?;
        if let Some(offset) = offset {
            self.try_set("snap_offset", offset)?;
        }
        Ok(self)
    }

    pub fn exclude_restricted_elements(
        &mut self,
        restricted: RestrictedElements,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("exclude_restricted_elements", restricted)?;
        Ok(self)
    }

    /// Limit candidate features per network source with a where clause.
    pub fn search_query<I, S, Q>(&mut self, queries: I) -> Result<&mut Self, InvocationError>
    where
        I: IntoIterator<Item = (S, Q)>,
        S: Into<String>,
        Q: Into<String>,
    {
        let rows = queries
            .into_iter()
            .map(|(source, query)| {
                vec![
                    ParamValue::String(source.into()),
                    ParamValue::String(query.into()),
                ]
            })
            .collect();
        self.try_set("search_query", ParamValue::Table(rows))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobind_rs_protocol::WireValue;
    use geobind_rs_tools::{BuildOptions, DomainKind, ValidationError};
    use pretty_assertions::assert_eq;

    fn tool() -> AddLocations {
        AddLocations::new("Route", "Stops", "C:/data/stores.shp")
    }

    #[test]
    fn search_criteria_accepts_scalar_or_table() {
        let mut scalar = tool();
        scalar
            .search_criteria(SearchCriteria::All(SnapType::Shape))
            .expect("scalar");
        let payload = scalar.to_payload(&BuildOptions::default()).expect("payload");
        assert_eq!(payload.ordered_values[6].to_string(), "SHAPE");

        let mut table = tool();
        table
            .search_criteria(SearchCriteria::PerSource(vec![
                ("Streets".to_string(), SnapType::Shape),
                ("Streets_ND_Junctions".to_string(), SnapType::NoSnapping),
            ]))
            .expect("table");
        let payload = table.to_payload(&BuildOptions::default()).expect("payload");
        assert_eq!(
            payload.ordered_values[6].to_string(),
            "Streets SHAPE;Streets_ND_Junctions NONE"
        );
    }

    #[test]
    fn ragged_search_criteria_is_a_composite_violation() {
        let mut tool = tool();
        let err = tool
            .try_set(
                "search_criteria",
                ParamValue::Table(vec![vec![ParamValue::from("Streets")]]),
            )
            .unwrap_err();
        let errors = err.validation_errors().expect("validation");
        let ValidationError::DomainViolation(domain_err) = &errors.0[0] else {
            panic!("expected domain violation");
        };
        assert_eq!(domain_err.domain_kind, DomainKind::Composite);
        assert_eq!(domain_err.parameter_name, "search_criteria");
    }

    #[test]
    fn boolean_mappings_travel_as_booleans() {
        let mut tool = tool();
        tool.append(AppendMode::Clear).expect("append");
        let payload = tool.to_payload(&BuildOptions::default()).expect("payload");
        assert_eq!(payload.ordered_values[8], WireValue::Bool(false));
        assert_eq!(payload.ordered_values[9], WireValue::Bool(false));
        assert_eq!(payload.ordered_values[11], WireValue::Bool(true));
    }

    #[test]
    fn field_mappings_fill_missing_cells() {
        let mut tool = tool();
        tool.field_mappings([
            FieldMapping::field("Name", "STORE_NAME"),
            FieldMapping::constant("Attr_TravelTime", "5"),
        ])
        .expect("mappings");
        let payload = tool.to_payload(&BuildOptions::default()).expect("payload");
        assert_eq!(
            payload.ordered_values[3],
            WireValue::Table(vec![
                vec![
                    WireValue::String("Name".to_string()),
                    WireValue::String("STORE_NAME".to_string()),
                    WireValue::String(String::new()),
                ],
                vec![
                    WireValue::String("Attr_TravelTime".to_string()),
                    WireValue::String(String::new()),
                    WireValue::String("5".to_string()),
                ],
            ])
        );
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let mut tool = tool();
        let err = tool
            .search_tolerance(LinearUnit::new(-1.0, LinearUnitKind::Meters))
            .unwrap_err();
        assert_eq!(err.validation_errors().map(|errors| errors.len()), Some(1));
    }
}
