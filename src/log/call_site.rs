use std::fmt;

/// 方法参数描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub type_name: String,
    /// 是否为输出参数（显示时带 `out` 前缀）
    pub is_out: bool,
}

/// 调用点描述
///
/// 用于代替字面量 source 字符串，显示格式为 `{declaring_type}.{method}({parameters})`，
/// 输出参数以 `out ` 标注，例如 `app::service::OrderService.submit(Order, out u64)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    declaring_type: String,
    method: String,
    parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    pub fn new(declaring_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method: method.into(),
            parameters: Vec::new(),
        }
    }

    /// 从函数的完整路径创建（如 `app::service::submit`），最后一段为方法名，其余部分为声明类型
    pub fn from_path(path: &str) -> Self {
        // 闭包中调用时 type_name 会带有 `{{closure}}` 段
        let path = path.trim_end_matches("::{{closure}}");
        match path.rsplit_once("::") {
            Some((declaring_type, method)) => Self::new(declaring_type, method),
            None => Self::new("", path),
        }
    }

    /// 添加输入参数
    pub fn with_parameter(mut self, type_name: impl Into<String>) -> Self {
        self.parameters.push(ParameterDescriptor {
            type_name: type_name.into(),
            is_out: false,
        });
        self
    }

    /// 添加输出参数
    pub fn with_out_parameter(mut self, type_name: impl Into<String>) -> Self {
        self.parameters.push(ParameterDescriptor {
            type_name: type_name.into(),
            is_out: true,
        });
        self
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// 方法签名，例如 `submit(Order, out u64)`
    pub fn signature(&self) -> String {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                if p.is_out {
                    format!("out {}", p.type_name)
                } else {
                    p.type_name.clone()
                }
            })
            .collect();
        format!("{}({})", self.method, parameters.join(", "))
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.declaring_type.is_empty() {
            write!(f, "{}", self.signature())
        } else {
            write!(f, "{}.{}", self.declaring_type, self.signature())
        }
    }
}

/// 捕获当前所在函数的调用点描述
///
/// # 示例
///
/// ```ignore
/// fn submit(order: Order) -> Result<u64> {
///     let site = call_site!().with_parameter("Order");
///     logger.log_with_call_site(Severity::Information, "order submitted", &site)?;
/// }
/// ```
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let path = __type_name_of(__here);
        $crate::log::MethodDescriptor::from_path(path.strip_suffix("::__here").unwrap_or(path))
    }};
}
