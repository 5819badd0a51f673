//! 端点身份（证书/私钥）提供方。

use std::path::PathBuf;
use tracing::warn;

/// 证书与私钥路径对。
#[derive(Debug, Clone)]
pub struct EndpointIdentity {
    pub certificate_path: PathBuf,
    pub private_key_path: PathBuf,
}

/// 端点身份提供方。
///
/// 返回 None 表示无证书可用，端点只开放无加密策略。
pub trait IdentityProvider: Send + Sync {
    fn identity(&self) -> Option<EndpointIdentity>;
}

/// 无证书环境。
#[derive(Debug, Default)]
pub struct NoIdentity;

impl IdentityProvider for NoIdentity {
    fn identity(&self) -> Option<EndpointIdentity> {
        None
    }
}

/// 文件系统上的证书对：两个文件都存在才生效。
#[derive(Debug)]
pub struct FileIdentity {
    certificate_path: PathBuf,
    private_key_path: PathBuf,
}

impl FileIdentity {
    pub fn new(certificate_path: impl Into<PathBuf>, private_key_path: impl Into<PathBuf>) -> Self {
        Self {
            certificate_path: certificate_path.into(),
            private_key_path: private_key_path.into(),
        }
    }
}

impl IdentityProvider for FileIdentity {
    fn identity(&self) -> Option<EndpointIdentity> {
        if self.certificate_path.is_file() && self.private_key_path.is_file() {
            return Some(EndpointIdentity {
                certificate_path: self.certificate_path.clone(),
                private_key_path: self.private_key_path.clone(),
            });
        }
        warn!(
            target: "bridge.server",
            "certificate pair missing ({} / {}), endpoint stays unencrypted",
            self.certificate_path.display(),
            self.private_key_path.display()
        );
        None
    }
}
