//! 名称层级解析的集成测试

use chainlog::log::{
    LogSink, LoggingConfig, MemorySink, ProviderDescriptor, ProviderRegistry, Result, Severity,
};
use std::sync::Arc;

fn registry_with(names: &[&str], default: &str) -> Result<Arc<ProviderRegistry>> {
    let config = LoggingConfig::new(
        default,
        names
            .iter()
            .map(|n| ProviderDescriptor::new(*n, "MemorySink"))
            .collect(),
    );
    let factory = |_: &ProviderDescriptor| -> anyhow::Result<Arc<dyn LogSink>> {
        Ok(Arc::new(MemorySink::default()))
    };
    Ok(Arc::new(ProviderRegistry::with_factory(&config, &factory)?))
}

#[test]
fn test_resolution_independent_of_configuration_order() -> Result<()> {
    let orders: [[&str; 4]; 3] = [
        ["System", "System.Configuration", "System.Configuration.Install", "Default"],
        ["System.Configuration.Install", "System.Configuration", "System", "Default"],
        ["Default", "System.Configuration", "System.Configuration.Install", "System"],
    ];

    for names in orders.iter() {
        let registry = registry_with(names, "Default")?;

        assert_eq!(
            registry.resolve("System.Configuration.Install.FooBar").name(),
            "System.Configuration.Install"
        );
        assert_eq!(
            registry.resolve("System.Configuration.Install").name(),
            "System.Configuration.Install"
        );
        assert!(Arc::ptr_eq(
            &registry.resolve("CuttingEdge.Logging"),
            registry.default_provider()
        ));
    }
    Ok(())
}

#[test]
fn test_named_logger_writes_to_resolved_provider() -> Result<()> {
    let config = LoggingConfig::from_json(
        r#"{
            default_provider: "Default",
            providers: [
                { name: "Default", type: "MemorySink" },
                { name: "Shop", type: "MemorySink", threshold: "Error" },
            ]
        }"#,
    )?;
    let registry = Arc::new(ProviderRegistry::new(&config)?);

    let logger = registry.logger("Shop.Orders.Checkout");
    assert_eq!(logger.provider()?.name(), "Shop");
    assert_eq!(logger.log(Severity::Warning, "below the shop threshold")?, None);
    assert!(logger.log(Severity::Error, "payment declined")?.is_some());

    let other = registry.logger("Inventory");
    assert_eq!(other.provider()?.name(), "Default");
    Ok(())
}
