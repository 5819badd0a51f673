//! 节点值类型与标量值。

/// 节点声明的值类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Boolean,
    Int16,
    Int32,
    Float,
    Double,
    String,
    DateTime,
}

impl ValueType {
    /// 从持久化字符串解析值类型，无法识别时回退为 Float。
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Boolean" => Self::Boolean,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Float" => Self::Float,
            "Double" => Self::Double,
            "String" => Self::String,
            "DateTime" => Self::DateTime,
            _ => Self::Float,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
        }
    }
}

/// 运行时标量值（协议变量与数据源共用）。
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// 尽力转换为 f64（Text 解析失败返回 None）。
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(v) => v.trim().parse::<f64>().ok(),
        }
    }

    /// 尽力转换为 i64（浮点截断）。
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(v) => Some(if *v { 1 } else { 0 }),
            Self::Int(v) => Some(*v),
            Self::Float(v) => Some(*v as i64),
            Self::Text(v) => v.trim().parse::<i64>().ok(),
        }
    }

    /// 真值语义：非零数值为 true，文本按 "true"（忽略大小写）判定。
    pub fn truthy(&self) -> bool {
        match self {
            Self::Bool(v) => *v,
            Self::Int(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            Self::Text(v) => v.trim().eq_ignore_ascii_case("true"),
        }
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<ScalarValue> for serde_json::Value {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Bool(v) => serde_json::Value::Bool(v),
            ScalarValue::Int(v) => serde_json::Value::from(v),
            ScalarValue::Float(v) => {
                serde_json::Number::from_f64(v).map(serde_json::Value::Number).unwrap_or(serde_json::Value::Null)
            }
            ScalarValue::Text(v) => serde_json::Value::String(v),
        }
    }
}
