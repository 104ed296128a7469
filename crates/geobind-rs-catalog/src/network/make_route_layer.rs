use super::TOOLBOX;
use super::enums::{InvalidLocations, LineShape, Sequence, TimeZoneUsage, UturnPolicy};
use chrono::{DateTime, Utc};
use geobind_rs_tools::{
    DescriptorError, Domain, GpTool, InvocationError, ParamType, ParamValue, ParameterDescriptor,
    ToolDescriptor, ToolParams, env_keys,
};

/// Make Route Layer: create a route analysis layer on a network dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MakeRouteLayer {
    params: ToolParams,
}

gp_tool!(MakeRouteLayer, describe);

fn describe() -> Result<ToolDescriptor, DescriptorError> {
    ToolDescriptor::builder("MakeRouteLayer", TOOLBOX)
        .parameter(
            ParameterDescriptor::required("network_data_source", ParamType::FeatureReference)
                .with_category("Network"),
        )
        .parameter(ParameterDescriptor::optional("layer_name", ParamType::String).with_default("Route"))
        .parameter(ParameterDescriptor::optional("travel_mode", ParamType::String))
        .parameter(
            ParameterDescriptor::optional("sequence", ParamType::String)
                .with_domain(Domain::coded::<Sequence>()?)
                .with_default(Sequence::FindBest),
        )
        .parameter(ParameterDescriptor::optional("time_of_day", ParamType::Date))
        .parameter(
            ParameterDescriptor::optional("time_zone", ParamType::String)
                .with_domain(Domain::coded::<TimeZoneUsage>()?)
                .with_default(TimeZoneUsage::LocalTime),
        )
        .parameter(
            ParameterDescriptor::optional("line_shape", ParamType::String)
                .with_domain(Domain::coded::<LineShape>()?)
                .with_default(LineShape::AlongNetwork)
                .with_category("Output Geometry"),
        )
        .parameter(
            ParameterDescriptor::optional("accumulate_attributes", ParamType::multi(ParamType::String))
                .with_category("Accumulation"),
        )
        .parameter(
            ParameterDescriptor::optional("uturn_policy", ParamType::String)
                .with_domain(Domain::coded::<UturnPolicy>()?)
                .with_default(UturnPolicy::AllowUturns)
                .with_category("Restrictions"),
        )
        .parameter(
            ParameterDescriptor::optional("ignore_invalid_locations", ParamType::Boolean)
                .with_domain(Domain::coded::<InvalidLocations>()?)
                .with_default(InvalidLocations::Skip),
        )
        .parameter(ParameterDescriptor::derived(
            "out_network_analysis_layer",
            ParamType::FeatureReference,
        ))
        .environment_keys([
            env_keys::WORKSPACE,
            env_keys::SCRATCH_WORKSPACE,
            env_keys::OUTPUT_COORDINATE_SYSTEM,
        ])
        .build()
}

impl MakeRouteLayer {
    pub fn new(network_data_source: impl Into<String>) -> Self {
        let mut tool = Self::default();
        tool.params.values.insert(
            "network_data_source",
            ParamValue::FeatureRef(network_data_source.into()),
        );
        tool
    }

    pub fn layer_name(&mut self, name: impl Into<String>) -> Result<&mut Self, InvocationError> {
        self.try_set("layer_name", name.into())?;
        Ok(self)
    }

    pub fn travel_mode(&mut self, mode: impl Into<String>) -> Result<&mut Self, InvocationError> {
        self.try_set("travel_mode", mode.into())?;
        Ok(self)
    }

    pub fn sequence(&mut self, sequence: Sequence) -> Result<&mut Self, InvocationError> {
        self.try_set("sequence", sequence)?;
        Ok(self)
    }

    pub fn time_of_day(&mut self, at: DateTime<Utc>) -> Result<&mut Self, InvocationError> {
        self.try_set("time_of_day", at)?;
        Ok(self)
    }

    pub fn time_zone(&mut self, usage: TimeZoneUsage) -> Result<&mut Self, InvocationError> {
        self.try_set("time_zone", usage)?;
        Ok(self)
    }

    pub fn line_shape(&mut self, shape: LineShape) -> Result<&mut Self, InvocationError> {
        self.try_set("line_shape", shape)?;
        Ok(self)
    }

    pub fn accumulate_attributes<I, S>(&mut self, attributes: I) -> Result<&mut Self, InvocationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes = attributes.into_iter().map(Into::into).collect::<Vec<String>>();
        self.try_set("accumulate_attributes", attributes)?;
        Ok(self)
    }

    pub fn uturn_policy(&mut self, policy: UturnPolicy) -> Result<&mut Self, InvocationError> {
        self.try_set("uturn_policy", policy)?;
        Ok(self)
    }

    pub fn ignore_invalid_locations(
        &mut self,
        handling: InvalidLocations,
    ) -> Result<&mut Self, InvocationError> {
        self.try_set("ignore_invalid_locations", handling)?;
        Ok(self)
    }
}
