//! 规则字符串形状校验
//!
//! 解析前的廉价预检：只检查字符串是否符合
//! `IDENT OP VALUE ((AND|OR) IDENT OP VALUE)*` 的形状，不保证可解析。
//! 例如 `department=HR` 能通过校验，但解析器会因值非数值而拒绝。

use regex::Regex;

/// 规则形状校验器
pub struct RuleValidator {
    shape_regex: Regex,
}

impl RuleValidator {
    pub fn new() -> Self {
        Self {
            shape_regex: Regex::new(r"^(\w+)([<>=]+)([\w\s]+)(\s+(AND|OR)\s+(\w+)([<>=]+)([\w\s]+))*$")
                .unwrap(),
        }
    }

    /// 校验规则字符串的形状
    ///
    /// 任何不匹配的输入（包括空串）返回 false，不产生错误。
    pub fn is_valid(&self, rule_string: &str) -> bool {
        self.shape_regex.is_match(rule_string)
    }
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 校验规则字符串形状的便捷入口
pub fn is_valid_rule(rule_string: &str) -> bool {
    RuleValidator::new().is_valid(rule_string)
}
