//! 会话主体与角色。

/// 用户角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Operator,
    ReadOnly,
}

impl Role {
    /// 从持久化字符串解析，无法识别时回退为 ReadOnly。
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Admin" => Self::Admin,
            "Operator" => Self::Operator,
            _ => Self::ReadOnly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Operator => "Operator",
            Self::ReadOnly => "ReadOnly",
        }
    }
}

/// 协议侧节点操作权限。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Read,
    Write,
    Browse,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Browse => "Browse",
        }
    }
}

/// 鉴权成功后解析出的会话主体。
///
/// 每次认证尝试新建，不缓存、不持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// 匿名主体（仅在允许匿名登录时产生）。
    pub fn anonymous() -> Self {
        Self::new("Anonymous", Role::ReadOnly)
    }
}
