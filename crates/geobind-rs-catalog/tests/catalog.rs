//! Catalogue-wide properties over every registered tool.

use geobind_rs_catalog::network::{Sequence, SnapType, UturnPolicy};
use geobind_rs_catalog::stats::{ModelType, SpatialRelationship};
use geobind_rs_catalog::{
    AddLocations, GeographicallyWeightedRegression, HotSpotAnalysis, MakeRouteLayer,
    catalog_registry, register_catalog_tools,
};
use geobind_rs_protocol::WireValue;
use geobind_rs_tools::{
    BuildOptions, CodedEnum, DescriptorRegistry, Domain, EnumMapping, FieldRef, FieldType,
    GpTool, ParameterValues, RegistryError, Requirement, ToolDescriptor, build,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Every catalogue tool with only its constructor (required) values set.
fn required_only() -> Vec<(Arc<ToolDescriptor>, ParameterValues)> {
    vec![
        (
            MakeRouteLayer::descriptor().expect("descriptor"),
            MakeRouteLayer::new("Streets_ND").params().values.clone(),
        ),
        (
            AddLocations::descriptor().expect("descriptor"),
            AddLocations::new("Route", "Stops", "stores.shp")
                .params()
                .values
                .clone(),
        ),
        (
            HotSpotAnalysis::descriptor().expect("descriptor"),
            HotSpotAnalysis::new("crimes.shp", FieldRef::new("COUNT", FieldType::Long), "out.shp")
                .params()
                .values
                .clone(),
        ),
        (
            GeographicallyWeightedRegression::descriptor().expect("descriptor"),
            GeographicallyWeightedRegression::new(
                "counties.shp",
                FieldRef::new("INCOME", FieldType::Double),
                vec![FieldRef::new("EDUCATION", FieldType::Float)],
                "gwr.shp",
            )
            .params()
            .values
            .clone(),
        ),
    ]
}

fn collect_mappings(domain: &Domain, out: &mut Vec<Arc<EnumMapping>>) {
    match domain {
        Domain::CodedValues(mapping) => out.push(mapping.clone()),
        Domain::ValueTable(columns) => columns
            .iter()
            .flatten()
            .for_each(|column| collect_mappings(column, out)),
        Domain::Composite(domains) => domains.iter().for_each(|d| collect_mappings(d, out)),
        Domain::Range { .. } | Domain::FieldTypes(_) => {}
    }
}

#[test]
fn registry_contains_every_tool() {
    let registry = catalog_registry().expect("registry");
    assert_eq!(
        registry.list(),
        vec![
            "AddLocations",
            "GeographicallyWeightedRegression",
            "HotSpots",
            "MakeRouteLayer"
        ]
    );
    assert!(registry.describe("GWR_stats").is_some());
}

#[test]
fn registering_twice_is_rejected() {
    let registry = DescriptorRegistry::new();
    register_catalog_tools(&registry).expect("first");
    let err = register_catalog_tools(&registry).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateTool("MakeRouteLayer".to_string()));
}

#[test]
fn required_only_builds_substitute_every_default_once() {
    for (descriptor, values) in required_only() {
        let payload =
            build(&descriptor, &values, &BuildOptions::default()).expect("required-only build");

        let mut explicit = values.clone();
        let slots = descriptor
            .parameters
            .iter()
            .filter(|param| param.requirement != Requirement::Derived)
            .collect::<Vec<_>>();
        assert_eq!(payload.ordered_values.len(), slots.len(), "{}", descriptor.tool_name);

        for (param, wire) in slots.iter().zip(&payload.ordered_values) {
            let expect_value = values.contains(&param.name) || param.default.is_some();
            assert_eq!(
                !wire.is_null(),
                expect_value,
                "{}.{}",
                descriptor.tool_name,
                param.name
            );
            if let Some(default) = &param.default
                && !values.contains(&param.name)
            {
                explicit.insert(param.name.clone(), default.clone());
            }
        }

        let with_defaults =
            build(&descriptor, &explicit, &BuildOptions::default()).expect("explicit build");
        assert_eq!(payload.ordered_values, with_defaults.ordered_values);
        assert_eq!(payload.output_names, descriptor.output_names());
    }
}

#[test]
fn every_catalog_mapping_round_trips() {
    let registry = catalog_registry().expect("registry");
    let mut mappings = Vec::new();
    for descriptor in registry.all() {
        for param in &descriptor.parameters {
            if let Some(domain) = &param.domain {
                collect_mappings(domain, &mut mappings);
            }
        }
    }
    assert!(mappings.len() >= 15);

    for mapping in mappings {
        for entry in mapping.entries() {
            let token = mapping.to_wire(&entry.symbol).expect("token");
            assert_eq!(mapping.from_wire(token), Some(entry.symbol.as_str()));
        }
    }
}

#[test]
fn typed_enums_round_trip() {
    for variant in UturnPolicy::ALL {
        let token = variant.to_wire().expect("token");
        assert_eq!(UturnPolicy::from_wire(&token), Some(*variant));
    }
    for variant in Sequence::ALL {
        let token = variant.to_wire().expect("token");
        assert_eq!(Sequence::from_wire(&token), Some(*variant));
    }
    for variant in SpatialRelationship::ALL {
        let token = variant.to_wire().expect("token");
        assert_eq!(SpatialRelationship::from_wire(&token), Some(*variant));
    }
    assert_eq!(ModelType::from_wire("COUNT"), Some(ModelType::Count));
    assert_eq!(SnapType::NoSnapping.to_wire().expect("token"), "NONE");
}

#[test]
fn boolean_flag_defaults_encode_as_booleans() {
    let (descriptor, values) = required_only().remove(0);
    let payload = build(&descriptor, &values, &BuildOptions::default()).expect("payload");
    assert_eq!(payload.ordered_values.last(), Some(&WireValue::Bool(true)));
}
