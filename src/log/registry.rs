use crate::log::config::{LoggingConfig, ProviderDescriptor};
use crate::log::error::{LoggingError, Result};
use crate::log::logger::Logger;
use crate::log::provider::Provider;
use crate::log::resolver::resolve_provider;
use crate::log::sink::{create_sink_from_options, LogSink};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// 根据 provider 描述创建 sink
///
/// 默认实现 [`TypeOptionsSinkFactory`] 通过类型注册表查找 sink 类型；
/// 测试中可以直接传入闭包注入内存 sink 或总是失败的 sink
pub trait SinkFactory: Send + Sync {
    fn create(&self, descriptor: &ProviderDescriptor) -> anyhow::Result<Arc<dyn LogSink>>;
}

impl<F> SinkFactory for F
where
    F: Fn(&ProviderDescriptor) -> anyhow::Result<Arc<dyn LogSink>> + Send + Sync,
{
    fn create(&self, descriptor: &ProviderDescriptor) -> anyhow::Result<Arc<dyn LogSink>> {
        self(descriptor)
    }
}

/// 通过 `type` + `settings` 在类型注册表中创建 sink
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeOptionsSinkFactory;

impl SinkFactory for TypeOptionsSinkFactory {
    fn create(&self, descriptor: &ProviderDescriptor) -> anyhow::Result<Arc<dyn LogSink>> {
        crate::log::register_builtin_components();
        let sink = create_sink_from_options(&descriptor.sink_options())?;
        Ok(Arc::from(sink))
    }
}

/// Provider 注册表
///
/// 持有所有 provider（按配置顺序），provider 之间的 fallback 只保存弱引用。
/// 构建完成后只读，无需加锁
pub struct ProviderRegistry {
    providers: Vec<Arc<Provider>>,
    index: HashMap<String, usize>,
    default_provider: Arc<Provider>,
}

impl ProviderRegistry {
    /// 使用内置 sink 类型注册表构建
    pub fn new(config: &LoggingConfig) -> Result<Self> {
        Self::with_factory(config, &TypeOptionsSinkFactory)
    }

    /// 使用指定的 sink 工厂构建
    ///
    /// 校验顺序：没有 provider、名称重复、fallback 不存在、fallback 成环、默认 provider 不存在，
    /// 全部通过后才创建 sink。任何一步失败都不会产生部分构建的注册表
    pub fn with_factory(config: &LoggingConfig, factory: &dyn SinkFactory) -> Result<Self> {
        Self::build(&config.providers, &config.default_provider, factory)
    }

    pub fn build(
        descriptors: &[ProviderDescriptor],
        default_provider: &str,
        factory: &dyn SinkFactory,
    ) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(LoggingError::MissingDefaultProvider {
                reason: "no providers are configured".to_string(),
            });
        }

        let index = build_index(descriptors)?;
        check_fallbacks(descriptors, &index)?;
        check_cycles(descriptors, &index)?;

        let default_index = *index.get(&default_provider.to_lowercase()).ok_or_else(|| {
            LoggingError::MissingDefaultProvider {
                reason: format!(
                    "default provider '{}' does not match any configured provider",
                    default_provider
                ),
            }
        })?;

        let providers = build_providers(descriptors, &index, factory)?;
        let default_provider = providers[default_index].clone();

        ::log::debug!(
            "provider registry built with {} providers, default provider '{}'",
            providers.len(),
            default_provider.name()
        );

        Ok(Self {
            providers,
            index,
            default_provider,
        })
    }

    /// 所有 provider，按配置顺序
    pub fn providers(&self) -> &[Arc<Provider>] {
        &self.providers
    }

    /// 大小写不敏感的精确查找
    pub fn get(&self, name: &str) -> Option<Arc<Provider>> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| self.providers[i].clone())
    }

    pub fn default_provider(&self) -> &Arc<Provider> {
        &self.default_provider
    }

    /// 按名称层级解析 provider，见 [`resolve_provider`]
    pub fn resolve(&self, name: &str) -> Arc<Provider> {
        resolve_provider(self, name)
    }

    /// 获取写入默认 provider 的 Logger
    pub fn default_logger(self: &Arc<Self>) -> Logger {
        Logger::with_registry(self.default_provider.clone(), self.clone())
    }

    /// 获取按名称层级解析出的 Logger
    pub fn logger(self: &Arc<Self>, name: &str) -> Logger {
        Logger::with_registry(self.resolve(name), self.clone())
    }

    /// 刷新所有 provider 的 sink
    pub fn flush(&self) -> Result<()> {
        for provider in &self.providers {
            provider
                .sink()
                .flush()
                .map_err(|err| LoggingError::sink(provider.name(), err))?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers)
            .field("default_provider", &self.default_provider.name())
            .finish()
    }
}

fn build_index(descriptors: &[ProviderDescriptor]) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(descriptors.len());
    for (i, descriptor) in descriptors.iter().enumerate() {
        if descriptor.name.is_empty() {
            return Err(LoggingError::Configuration {
                provider: String::new(),
                message: format!("provider #{} has an empty name", i),
            });
        }
        if index.insert(descriptor.name.to_lowercase(), i).is_some() {
            return Err(LoggingError::DuplicateProviderName {
                name: descriptor.name.clone(),
            });
        }
    }
    Ok(index)
}

fn check_fallbacks(descriptors: &[ProviderDescriptor], index: &HashMap<String, usize>) -> Result<()> {
    for descriptor in descriptors {
        if let Some(fallback) = &descriptor.fallback {
            if !index.contains_key(&fallback.to_lowercase()) {
                return Err(LoggingError::UnresolvedFallback {
                    provider: descriptor.name.clone(),
                    fallback: fallback.clone(),
                });
            }
        }
    }
    Ok(())
}

fn fallback_index(descriptor: &ProviderDescriptor, index: &HashMap<String, usize>) -> Option<usize> {
    descriptor
        .fallback
        .as_ref()
        .and_then(|name| index.get(&name.to_lowercase()).copied())
}

// 沿 fallback 链前进，链长不超过 provider 总数；回到当前路径上的节点即成环
fn check_cycles(descriptors: &[ProviderDescriptor], index: &HashMap<String, usize>) -> Result<()> {
    let mut verified = HashSet::new();

    for start in 0..descriptors.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut current = Some(start);

        while let Some(i) = current {
            if verified.contains(&i) {
                break;
            }
            if let Some(pos) = path.iter().position(|&p| p == i) {
                let cycle = path[pos..]
                    .iter()
                    .chain(std::iter::once(&i))
                    .map(|&p| descriptors[p].name.as_str())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(LoggingError::CyclicFallback { cycle });
            }
            path.push(i);
            current = fallback_index(&descriptors[i], index);
        }

        verified.extend(path);
    }
    Ok(())
}

// fallback 先于引用它的 provider 创建，保证弱引用建立时目标已存在
fn build_providers(
    descriptors: &[ProviderDescriptor],
    index: &HashMap<String, usize>,
    factory: &dyn SinkFactory,
) -> Result<Vec<Arc<Provider>>> {
    let mut built: Vec<Option<Arc<Provider>>> = vec![None; descriptors.len()];

    for start in 0..descriptors.len() {
        let mut pending = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            if built[i].is_some() {
                break;
            }
            pending.push(i);
            current = fallback_index(&descriptors[i], index);
        }

        for &i in pending.iter().rev() {
            let descriptor = &descriptors[i];
            let sink = factory
                .create(descriptor)
                .map_err(|err| LoggingError::Configuration {
                    provider: descriptor.name.clone(),
                    message: format!("{:#}", err),
                })?;

            let mut provider = Provider::new(descriptor.name.clone(), descriptor.threshold, sink);
            if let Some(fallback) = fallback_index(descriptor, index).and_then(|f| built[f].as_ref()) {
                provider = provider.with_fallback(fallback);
            }
            built[i] = Some(Arc::new(provider));
        }
    }

    built
        .into_iter()
        .zip(descriptors)
        .map(|(provider, descriptor)| {
            provider.ok_or_else(|| LoggingError::Configuration {
                provider: descriptor.name.clone(),
                message: "provider was not built".to_string(),
            })
        })
        .collect()
}
