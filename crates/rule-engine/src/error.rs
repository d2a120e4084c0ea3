//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则格式校验未通过: {0}")]
    InvalidFormat(String),

    #[error("规则解析失败: {0}")]
    ParseError(String),

    #[error("无效的逻辑操作符: {0}")]
    InvalidLogicalOperator(String),

    #[error("规则未找到: {0}")]
    RuleNotFound(String),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;
