use anyhow::{Context, Result};
use geobind_rs::catalog::network::{AppendMode, SnapType, UturnPolicy};
use geobind_rs::catalog::{AddLocations, FieldMapping, MakeRouteLayer, SearchCriteria};
use geobind_rs::config::GeobindConfig;
use geobind_rs::init_logging;
use geobind_rs::tools::{
    BuildOptions, EnvironmentSettings, GpTool, LinearUnit, LinearUnitKind, env_keys,
    with_configured_defaults,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let network = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "C:/data/SanFrancisco.gdb/Transportation/Streets_ND".to_string());

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = GeobindConfig::load_layered(&cwd)
        .context("failed to load geobind config")?
        .config;
    let options = BuildOptions::from(&config.invocation);

    let mut route = MakeRouteLayer::new(&network);
    route
        .layer_name("DeliveryRoute")?
        .uturn_policy(UturnPolicy::DeadEndsOnly)?
        .accumulate_attributes(["Meters", "TravelTime"])?;
    let environment = with_configured_defaults(
        &*MakeRouteLayer::descriptor()?,
        &config.environment,
        EnvironmentSettings::new(),
    );
    for (key, value) in environment.iter() {
        route.set_environment(key, value.clone())?;
    }

    let mut stops = AddLocations::new("DeliveryRoute", "Stops", "C:/data/stores.shp");
    stops
        .field_mappings([
            FieldMapping::field("Name", "STORE_NAME"),
            FieldMapping::constant("Attr_TravelTime", "5"),
        ])?
        .search_tolerance(LinearUnit::new(500.0, LinearUnitKind::Meters))?
        .search_criteria(SearchCriteria::PerSource(vec![
            ("Streets".to_string(), SnapType::Shape),
            ("Streets_ND_Junctions".to_string(), SnapType::NoSnapping),
        ]))?
        .append(AppendMode::Clear)?;
    stops.set_environment(env_keys::WORKSPACE, "C:/data/SanFrancisco.gdb")?;

    if config.client.base_url.is_none() {
        // No engine configured: show what would be submitted.
        for payload in [route.to_payload(&options)?, stops.to_payload(&options)?] {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        return Ok(());
    }

    let executor = geobind_rs::http_executor(&config)?;
    let outputs = executor.run(&route).await?;
    println!("route layer: {:?}", outputs.get("out_network_analysis_layer"));
    let outputs = executor.run(&stops).await?;
    for message in &outputs.messages {
        println!("[{:?}] {}", message.severity, message.text);
    }
    Ok(())
}
