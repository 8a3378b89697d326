//! 统一错误类型定义

use serde::Serialize;
use thiserror::Error;

/// RDAP 工具箱错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum RdapError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 网络错误
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 请求超时
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 域名不存在（HTTP 404）
    #[error("No registration data found for {0}")]
    NotFound(String),

    /// 上游服务返回非成功状态
    #[error("Lookup service returned HTTP {status}: {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error title/description from the RDAP error body, or the raw body.
        message: String,
    },

    /// 响应解析失败
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// 已有查询正在进行
    #[error("A lookup is already in progress")]
    Busy,

    /// 导出失败
    #[error("Export failed: {0}")]
    ExportError(String),
}

impl RdapError {
    /// 是否为预期行为（用户输入、域名不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::NotFound(_) | Self::Busy
        )
    }
}

/// RDAP 工具箱 Result 类型别名
pub type RdapResult<T> = std::result::Result<T, RdapError>;
