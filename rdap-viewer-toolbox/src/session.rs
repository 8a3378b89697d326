//! 查询会话状态
//!
//! Mirrors the lookup page: the input, a loading flag, the last result with its
//! rendered report, and the last error. A result lives until the next query replaces it.

use crate::error::{RdapError, RdapResult};
use crate::services::{FormatOptions, format_report};
use crate::types::{LookupResult, Report};

/// 查询会话状态
#[derive(Debug, Default)]
pub struct LookupSession {
    /// 当前输入
    pub input: String,
    /// 是否正在查询
    pub loading: bool,
    /// 最近一次成功的查询结果
    pub result: Option<LookupResult>,
    /// 最近一次成功结果的渲染报告
    pub report: Option<Report>,
    /// 错误信息
    pub error: Option<String>,
    options: FormatOptions,
}

impl LookupSession {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// 开始查询：设置 loading，清除错误。已在查询中则拒绝。
    pub fn begin(&mut self, input: &str) -> RdapResult<()> {
        if self.loading {
            return Err(RdapError::Busy);
        }
        self.input = input.trim().to_string();
        self.loading = true;
        self.error = None;
        Ok(())
    }

    /// 查询成功：整体替换结果与报告
    pub fn succeed(&mut self, result: LookupResult) -> &Report {
        let report = format_report(&result, &self.input, &self.options);
        self.loading = false;
        self.error = None;
        self.result = Some(result);
        self.report.insert(report)
    }

    /// 查询失败：清除旧结果，记录错误
    pub fn fail(&mut self, error: &RdapError) {
        self.loading = false;
        self.result = None;
        self.report = None;
        self.error = Some(error.to_string());
    }

    /// 应用一次查询的结果
    pub fn finish(&mut self, outcome: &RdapResult<LookupResult>) {
        match outcome {
            Ok(result) => {
                self.succeed(result.clone());
            }
            Err(e) => self.fail(e),
        }
    }

    /// 清除全部状态（保留格式选项）
    pub fn clear(&mut self) {
        let options = std::mem::take(&mut self.options);
        *self = Self::new(options);
    }
}
