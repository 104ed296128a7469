use super::TOOLBOX;
use super::enums::{DistanceMethod, FdrCorrection, SpatialRelationship, Standardization};
use geobind_rs_tools::{
    DescriptorError, Domain, FieldRef, FieldType, GpTool, InvocationError, ParamType, ParamValue,
    ParameterDescriptor, ToolDescriptor, ToolParams, env_keys,
};

/// Hot Spot Analysis (Getis-Ord Gi*): find statistically significant
/// clusters of high and low values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotSpotAnalysis {
    params: ToolParams,
}

gp_tool!(HotSpotAnalysis, describe);

fn describe() -> Result<ToolDescriptor, DescriptorError> {
    ToolDescriptor::builder("HotSpots", TOOLBOX)
        .parameter(ParameterDescriptor::required(
            "input_feature_class",
            ParamType::FeatureReference,
        ))
        .parameter(
            ParameterDescriptor::required("input_field", ParamType::Field)
                .with_domain(Domain::field_types(FieldType::NUMERIC)),
        )
        .parameter(ParameterDescriptor::required(
            "output_feature_class",
            ParamType::FeatureReference,
        ))
        .parameter(
            ParameterDescriptor::required("conceptualization", ParamType::String)
                .with_domain(Domain::coded::<SpatialRelationship>()?)
                .with_default(SpatialRelationship::FixedDistanceBand),
        )
        .parameter(
            ParameterDescriptor::required("distance_method", ParamType::String)
                .with_domain(Domain::coded::<DistanceMethod>()?)
                .with_default(DistanceMethod::Euclidean),
        )
        .parameter(
            ParameterDescriptor::required("standardization", ParamType::String)
                .with_domain(Domain::coded::<Standardization>()?)
                .with_default(Standardization::Row),
        )
        .parameter(
            ParameterDescriptor::optional("distance_band", ParamType::Double)
                .with_domain(Domain::range(0.0, f64::MAX)),
        )
        .parameter(
            ParameterDescriptor::optional("self_potential_field", ParamType::Field)
                .with_domain(Domain::field_types(FieldType::NUMERIC)),
        )
        .parameter(ParameterDescriptor::optional(
            "weights_matrix_file",
            ParamType::FeatureReference,
        ))
        .parameter(
            ParameterDescriptor::optional("apply_fdr", ParamType::Boolean)
                .with_domain(Domain::coded::<FdrCorrection>()?)
                .with_default(FdrCorrection::Skip),
        )
        .parameter(
            ParameterDescriptor::optional("number_of_neighbors", ParamType::Long)
                .with_domain(Domain::range(1.0, 1000.0)),
        )
        .parameter(ParameterDescriptor::derived("results_field", ParamType::String))
        .environment_keys([
            env_keys::WORKSPACE,
            env_keys::SCRATCH_WORKSPACE,
            env_keys::OUTPUT_COORDINATE_SYSTEM,
            env_keys::EXTENT,
            env_keys::GEOGRAPHIC_TRANSFORMATIONS,
        ])
        .build()
}

impl HotSpotAnalysis {
    pub fn new(
        input_feature_class: impl Into<String>,
        input_field: FieldRef,
        output_feature_class: impl Into<String>,
    ) -> Self {
        let mut tool = Self::default();
        let values = &mut tool.params.values;
        values.insert(
            "input_feature_class",
            ParamValue::FeatureRef(input_feature_class.into()),
        );
        values.insert("input_field", input_field);
        values.insert(
            "output_feature_class",
            ParamValue::FeatureRef(output_feature_class.into()),
        );
        tool
    }

    pub fn conceptualization(
        &mut self,
        relationship: SpatialRelationship,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("conceptualization", relationship)?;
        Ok(self)
    }

    pub fn distance_method(&mut self, method: DistanceMethod) -> Result<&mut Self, InvocationError> {
        self.try_set("distance_method", method)?;
        Ok(self)
    }

    pub fn standardization(
        &mut self,
        standardization: Standardization,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("standardization", standardization)?;
        Ok(self)
    }

    pub fn distance_band(&mut self, distance: f64) -> Result<&mut Self, InvocationError> {
        self.try_set("distance_band", distance)?;
        Ok(self)
    }

    pub fn self_potential_field(&mut self, field: FieldRef) -> Result<&mut Self, InvocationError> {
        self.try_set("self_potential_field", field)?;
        Ok(self)
    }

    pub fn weights_matrix_file(&mut self, path: impl Into<String>) -> Result<&mut Self, InvocationError> {
        self.try_set("weights_matrix_file", ParamValue::FeatureRef(path.into()))?;
        Ok(self)
    }

    pub fn apply_fdr(&mut self, correction: FdrCorrection) -> Result<&mut Self, InvocationError> {
        self.try_set("apply_fdr", correction)?;
        Ok(self)
    }

    pub fn number_of_neighbors(&mut self, neighbors: i64) -> Result<&mut Self, InvocationError> {
        self.try_set("number_of_neighbors", neighbors)?;
        Ok(self)
    }
}
