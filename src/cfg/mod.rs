//! cfg 模块 - 配置与类型注册
//!
//! 提供 sink / formatter 等可插拔组件的工厂注册表，以及多格式配置解析

pub mod format;
pub mod macros;
pub mod registry;
pub mod type_options;

// 重新导出公共 API
pub use format::ConfigFormat;
pub use registry::{
    create_trait_from_type_options, register_fallible_trait, register_trait, register_trait_fn,
};
pub use type_options::TypeOptions;
