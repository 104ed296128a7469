use super::TOOLBOX;
use super::enums::{ModelType, NeighborhoodType, ScaleData, SelectionMethod, WeightingScheme};
use geobind_rs_tools::{
    DescriptorError, Domain, FieldRef, FieldType, GpTool, InvocationError, LinearUnit, ParamType,
    ParamValue, ParameterDescriptor, ToolDescriptor, ToolParams, env_keys,
};

const MIN_NEIGHBORS: f64 = 2.0;
const MAX_NEIGHBORS: f64 = 1000.0;

/// Geographically Weighted Regression: fit a local regression model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeographicallyWeightedRegression {
    params: ToolParams,
}

gp_tool!(GeographicallyWeightedRegression, describe);

fn neighbors(name: &str) -> ParameterDescriptor {
    ParameterDescriptor::optional(name, ParamType::Long)
        .with_domain(Domain::range(MIN_NEIGHBORS, MAX_NEIGHBORS))
        .with_category("Neighborhood")
}

fn describe() -> Result<ToolDescriptor, DescriptorError> {
    let numeric = Domain::field_types(FieldType::NUMERIC);
    ToolDescriptor::builder("GeographicallyWeightedRegression", TOOLBOX)
        .execute_name("GWR_stats")
        .parameter(ParameterDescriptor::required("in_features", ParamType::FeatureReference))
        .parameter(
            ParameterDescriptor::required("dependent_variable", ParamType::Field)
                .with_domain(numeric.clone()),
        )
        .parameter(
            ParameterDescriptor::required("model_type", ParamType::String)
                .with_domain(Domain::coded::<ModelType>()?)
                .with_default(ModelType::Continuous),
        )
        .parameter(
            ParameterDescriptor::required("explanatory_variables", ParamType::multi(ParamType::Field))
                .with_domain(numeric),
        )
        .parameter(ParameterDescriptor::required("output_features", ParamType::FeatureReference))
        .parameter(
            ParameterDescriptor::required("neighborhood_type", ParamType::String)
                .with_domain(Domain::coded::<NeighborhoodType>()?)
                .with_default(NeighborhoodType::NumberOfNeighbors),
        )
        .parameter(
            ParameterDescriptor::required("neighborhood_selection_method", ParamType::String)
                .with_domain(Domain::coded::<SelectionMethod>()?)
                .with_default(SelectionMethod::GoldenSearch),
        )
        .parameter(neighbors("minimum_number_of_neighbors"))
        .parameter(neighbors("maximum_number_of_neighbors"))
        .parameter(ParameterDescriptor::optional("minimum_search_distance", ParamType::LinearUnit))
        .parameter(ParameterDescriptor::optional("maximum_search_distance", ParamType::LinearUnit))
        .parameter(neighbors("number_of_neighbors"))
        .parameter(ParameterDescriptor::optional("distance_band", ParamType::LinearUnit))
        .parameter(
            ParameterDescriptor::optional("local_weighting_scheme", ParamType::String)
                .with_domain(Domain::coded::<WeightingScheme>()?)
                .with_default(WeightingScheme::Bisquare),
        )
        .parameter(ParameterDescriptor::optional(
            "coefficient_raster_workspace",
            ParamType::FeatureReference,
        ))
        .parameter(
            ParameterDescriptor::optional("scale", ParamType::Boolean)
                .with_domain(Domain::coded::<ScaleData>()?)
                .with_default(ScaleData::Scale),
        )
        .parameter(ParameterDescriptor::derived("output_statistics", ParamType::String))
        .environment_keys([
            env_keys::WORKSPACE,
            env_keys::SCRATCH_WORKSPACE,
            env_keys::OUTPUT_COORDINATE_SYSTEM,
            env_keys::EXTENT,
            env_keys::CELL_SIZE,
            env_keys::MASK,
            env_keys::PARALLEL_PROCESSING_FACTOR,
        ])
        .build()
}

impl GeographicallyWeightedRegression {
    pub fn new(
        in_features: impl Into<String>,
        dependent_variable: FieldRef,
        explanatory_variables: Vec<FieldRef>,
        output_features: impl Into<String>,
    ) -> Self {
        let mut tool = Self::default();
        let values = &mut tool.params.values;
        values.insert("in_features", ParamValue::FeatureRef(in_features.into()));
        values.insert("dependent_variable", dependent_variable);
        values.insert("explanatory_variables", explanatory_variables);
        values.insert("output_features", ParamValue::FeatureRef(output_features.into()));
        tool
    }

    pub fn model_type(&mut self, model: ModelType) -> Result<&mut Self, InvocationError> {
        self.try_set("model_type", model)?;
        Ok(self)
    }

    /// Golden search bounded by neighbor counts.
    pub fn golden_search_neighbors(
        &mut self,
        minimum: i64,
        maximum: i64,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("neighborhood_type", NeighborhoodType::NumberOfNeighbors)?;
        self.try_set("neighborhood_selection_method", SelectionMethod::GoldenSearch)?;
        self.try_set("minimum_number_of_neighbors", minimum)?;
        self.try_set("maximum_number_of_neighbors", maximum)?;
        Ok(self)
    }

    /// Golden search bounded by distances.
    pub fn golden_search_distance(
        &mut self,
        minimum: LinearUnit,
        maximum: LinearUnit,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("neighborhood_type", NeighborhoodType::DistanceBand)?;
        self.try_set("neighborhood_selection_method", SelectionMethod::GoldenSearch)?;
        self.try_set("minimum_search_distance", minimum)?;
        self.try_set("maximum_search_distance", maximum)?;
        Ok(self)
    }

    /// Fixed neighbor count.
    pub fn fixed_neighbors(&mut self, count: i64) -> Result<&mut Self, InvocationError> {
        self.try_set("neighborhood_type", NeighborhoodType::NumberOfNeighbors)?;
        self.try_set("neighborhood_selection_method", SelectionMethod::UserDefined)?;
        self.try_set("number_of_neighbors", count)?;
        Ok(self)
    }

    /// Fixed distance band.
    pub fn fixed_distance_band(&mut self, band: LinearUnit) -> Result<&mut Self, InvocationError> {
        self.try_set("neighborhood_type", NeighborhoodType::DistanceBand)?;
        self.try_set("neighborhood_selection_method", SelectionMethod::UserDefined)?;
        self.try_set("distance_band", band)?;
        Ok(self)
    }

    pub fn local_weighting_scheme(
        &mut self,
        scheme: WeightingScheme,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("local_weighting_scheme", scheme)?;
        Ok(self)
    }

    pub fn coefficient_raster_workspace(
        &mut self,
        workspace: impl Into<String>,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set(
            "coefficient_raster_workspace",
            ParamValue::FeatureRef(workspace.into()),
        )?;
        Ok(self)
    }

    pub fn scale(&mut self, scale: ScaleData) -> Result<&mut Self, InvocationError> {
        self.try_set("scale", scale)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobind_rs_protocol::WireValue;
    use geobind_rs_tools::{BuildOptions, LinearUnitKind, ValidationError};
    use pretty_assertions::assert_eq;

    fn tool(explanatory: Vec<FieldRef>) -> GeographicallyWeightedRegression {
        GeographicallyWeightedRegression::new(
            "C:/data/counties.shp",
            FieldRef::new("INCOME", FieldType::Double),
            explanatory,
            "C:/out/gwr.shp",
        )
    }

    #[test]
    fn uses_overridden_execute_name() {
        let tool = tool(vec![FieldRef::new("EDUCATION", FieldType::Float)]);
        let payload = tool.to_payload(&BuildOptions::default()).expect("payload");
        assert_eq!(payload.tool_target, "GWR_stats");
        assert_eq!(
            payload.ordered_values[3],
            WireValue::List(vec![WireValue::String("EDUCATION".to_string())])
        );
        assert_eq!(payload.ordered_values[15], WireValue::Bool(true));
        assert_eq!(payload.output_names, vec!["output_statistics"]);
    }

    #[test]
    fn explanatory_variables_are_checked_per_field() {
        let tool = tool(vec![
            FieldRef::new("EDUCATION", FieldType::Float),
            FieldRef::new("STATE", FieldType::Text),
        ]);
        let err = tool.to_payload(&BuildOptions::default()).unwrap_err();
        let errors = err.validation_errors().expect("validation");
        assert_eq!(errors.len(), 1);
        let ValidationError::DomainViolation(domain_err) = &errors.0[0] else {
            panic!("expected domain violation");
        };
        assert_eq!(domain_err.parameter_name, "explanatory_variables");
        assert_eq!(
            domain_err.offending_value,
            ParamValue::from(FieldRef::new("STATE", FieldType::Text))
        );
    }

    #[test]
    fn neighborhood_helpers_set_consistent_values() {
        let mut tool = tool(vec![FieldRef::new("EDUCATION", FieldType::Float)]);
        tool.golden_search_distance(
            LinearUnit::new(1.0, LinearUnitKind::Kilometers),
            LinearUnit::new(20.0, LinearUnitKind::Kilometers),
        )
        .expect("distance search");
        let payload = tool.to_payload(&BuildOptions::default()).expect("payload");
        assert_eq!(payload.ordered_values[5].to_string(), "DISTANCE_BAND");
        assert_eq!(payload.ordered_values[6].to_string(), "GOLDEN_SEARCH");
        assert_eq!(payload.ordered_values[9].to_string(), "1 Kilometers");

        assert!(tool.fixed_neighbors(1).is_err());
    }
}
