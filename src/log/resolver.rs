use crate::log::provider::Provider;
use crate::log::registry::ProviderRegistry;
use std::sync::Arc;

/// 按名称层级解析 provider
///
/// 1. 大小写不敏感的精确匹配
/// 2. 否则在所有满足 `name` 以 `provider.name + "."` 开头的 provider 中选名称最长的；
///    长度相同时取配置顺序中靠前的
/// 3. 都没有匹配时返回默认 provider
///
/// 例如配置了 `System`、`System.Configuration`，请求 `System.Configuration.Install.FooBar`
/// 得到 `System.Configuration`
pub fn resolve_provider(registry: &ProviderRegistry, name: &str) -> Arc<Provider> {
    if let Some(provider) = registry.get(name) {
        return provider;
    }

    let requested = name.to_lowercase();
    let mut best: Option<&Arc<Provider>> = None;

    for provider in registry.providers() {
        if !is_dotted_prefix(provider.name(), &requested) {
            continue;
        }
        match best {
            Some(current) if current.name().len() >= provider.name().len() => {}
            _ => best = Some(provider),
        }
    }

    best.unwrap_or_else(|| registry.default_provider()).clone()
}

fn is_dotted_prefix(provider_name: &str, requested: &str) -> bool {
    let prefix = provider_name.to_lowercase();
    requested.len() > prefix.len()
        && requested.starts_with(&prefix)
        && requested.as_bytes()[prefix.len()] == b'.'
}
