// 类型注册表和工厂函数

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use super::type_options::TypeOptions;

// Trait-based 构造函数类型
// 返回 Box<dyn Any>，实际包含的是 Box<dyn Trait>
// 构造函数内部可能再次访问注册表，调用前必须先释放读锁
type TraitConstructor = Arc<dyn Fn(JsonValue) -> Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

// Trait 注册表：为每个 Trait 类型维护一个独立的注册表
// 外层 HashMap 的 key 是 Trait 的 TypeId，内层 HashMap 的 key 是类型名称
static TRAIT_REGISTRY: Lazy<RwLock<HashMap<TypeId, HashMap<String, TraitConstructor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn insert_constructor<Trait>(type_name: &str, constructor: TraitConstructor) -> Result<()>
where
    Trait: ?Sized + 'static,
{
    let mut registry = TRAIT_REGISTRY
        .write()
        .map_err(|_| anyhow!("Failed to acquire write lock"))?;
    registry
        .entry(TypeId::of::<Trait>())
        .or_insert_with(HashMap::new)
        .insert(type_name.to_string(), constructor);
    Ok(())
}

/// 为实现特定 Trait 的类型注册构造函数
///
/// 这个方法允许你注册多个实现同一 Trait 的不同类型，并在运行时根据配置创建 trait object
///
/// # 类型参数
/// - `T`: 具体实现类型
/// - `Trait`: 目标 trait（使用 `dyn Trait` 形式）
/// - `Config`: 配置类型
///
/// # 示例
/// ```ignore
/// register_trait::<MemorySink, dyn LogSink, MemorySinkConfig>("MemorySink")?;
///
/// let sink: Box<dyn LogSink> = create_trait_from_type_options(&type_options)?;
/// ```
pub fn register_trait<T, Trait, Config>(type_name: &str) -> Result<()>
where
    T: Send + Sync + 'static,
    Trait: ?Sized + Send + Sync + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    T: From<Config>,
    Box<T>: Into<Box<Trait>>,
{
    let constructor: TraitConstructor = Arc::new(move |value| {
        let config: Config = serde_json::from_value(value)?;
        let trait_object: Box<Trait> = Box::new(T::from(config)).into();
        // 将 Box<dyn Trait> 包装成 Box<dyn Any>
        Ok(Box::new(trait_object) as Box<dyn Any + Send + Sync>)
    });

    insert_constructor::<Trait>(type_name, constructor)
}

/// 为构造可能失败的类型注册构造函数
///
/// 与 [`register_trait`] 相同，但要求 `T: TryFrom<Config>`，构造失败时错误会返回给调用方，
/// 而不是在构造阶段 panic
pub fn register_fallible_trait<T, Trait, Config>(type_name: &str) -> Result<()>
where
    T: Send + Sync + 'static,
    Trait: ?Sized + Send + Sync + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    T: TryFrom<Config, Error = anyhow::Error>,
    Box<T>: Into<Box<Trait>>,
{
    let constructor: TraitConstructor = Arc::new(move |value| {
        let config: Config = serde_json::from_value(value)?;
        let trait_object: Box<Trait> = Box::new(T::try_from(config)?).into();
        Ok(Box::new(trait_object) as Box<dyn Any + Send + Sync>)
    });

    insert_constructor::<Trait>(type_name, constructor)
}

/// 使用闭包注册构造函数
///
/// 适用于需要捕获外部状态的场景（例如在测试中注入共享的 sink 实例）
pub fn register_trait_fn<Trait, Config, F>(type_name: &str, factory: F) -> Result<()>
where
    Trait: ?Sized + Send + Sync + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    F: Fn(Config) -> Result<Box<Trait>> + Send + Sync + 'static,
{
    let constructor: TraitConstructor = Arc::new(move |value| {
        let config: Config = serde_json::from_value(value)?;
        let trait_object = factory(config)?;
        Ok(Box::new(trait_object) as Box<dyn Any + Send + Sync>)
    });

    insert_constructor::<Trait>(type_name, constructor)
}

/// 根据 TypeOptions 创建 trait object
///
/// # 类型参数
/// - `Trait`: 目标 trait（使用 `dyn Trait` 形式）
pub fn create_trait_from_type_options<Trait>(type_options: &TypeOptions) -> Result<Box<Trait>>
where
    Trait: ?Sized + Send + Sync + 'static,
{
    let trait_id = TypeId::of::<Trait>();
    let constructor = {
        let registry = TRAIT_REGISTRY
            .read()
            .map_err(|_| anyhow!("Failed to acquire read lock"))?;

        let trait_registry = registry
            .get(&trait_id)
            .ok_or_else(|| anyhow!("No implementations registered for trait"))?;

        trait_registry
            .get(&type_options.type_name)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "Type '{}' not registered for this trait",
                    type_options.type_name
                )
            })?
    };

    let any_box = constructor(type_options.options.clone())?;

    // 从 Box<dyn Any> 中提取 Box<dyn Trait>
    any_box
        .downcast::<Box<Trait>>()
        .map(|boxed| *boxed)
        .map_err(|_| anyhow!("Failed to downcast to target trait type"))
}

/// 生成简短的类型名称 - 简化完整路径为可读格式
pub fn generate_short_type_name<T: ?Sized + 'static>() -> String {
    simplify_type_name(std::any::type_name::<T>())
}

/// 简化完整类型名称为更可读的格式
///
/// 例如 `std::collections::HashMap<alloc::string::String, alloc::vec::Vec<u8>>`
/// 简化为 `HashMap<String, Vec<u8>>`
pub(crate) fn simplify_type_name(full_name: &str) -> String {
    if let Some(generic_start) = full_name.find('<') {
        let main_part = &full_name[..generic_start];
        let generics_part = &full_name[generic_start..];
        let main_type_name = main_part.split("::").last().unwrap_or(main_part);

        format!("{}{}", main_type_name, simplify_generics(generics_part))
    } else {
        // 如果不是泛型类型，只取路径的最后部分
        full_name.split("::").last().unwrap_or(full_name).to_string()
    }
}

/// 简化泛型参数部分
fn simplify_generics(generics: &str) -> String {
    let mut bracket_count = 0;
    let mut current_param = String::new();
    let mut params = Vec::new();

    for ch in generics.chars() {
        match ch {
            '<' => {
                if bracket_count > 0 {
                    current_param.push(ch);
                }
                bracket_count += 1;
            }
            '>' => {
                bracket_count -= 1;
                if bracket_count > 0 {
                    current_param.push(ch);
                } else if !current_param.is_empty() {
                    params.push(simplify_type_name(current_param.trim()));
                    current_param.clear();
                }
            }
            ',' if bracket_count == 1 => {
                // 分隔符，但不在嵌套泛型内
                if !current_param.is_empty() {
                    params.push(simplify_type_name(current_param.trim()));
                    current_param.clear();
                }
            }
            _ => current_param.push(ch),
        }
    }

    if !current_param.trim().is_empty() {
        params.push(simplify_type_name(current_param.trim()));
    }

    format!("<{}>", params.join(", "))
}
