//! 规则字符串解析器
//!
//! 将 `age>30 AND salary<5000` 形式的规则字符串解析为 AST。
//!
//! 文法：`expression := condition ((AND|OR) condition)*`。链式条件按
//! 左结合折叠，AND 与 OR 之间没有优先级之分，`a AND b OR c` 解析为
//! `(a AND b) OR c`，与 [`crate::combiner`] 的折叠方向一致。
//! 不支持括号分组、算术表达式和非数值的比较值。

use crate::error::{Result, RuleError};
use crate::models::{Condition, Node, OperatorNode};
use crate::operators::{ComparisonOperator, LogicalOperator};
use regex::Regex;
use tracing::debug;

/// 规则解析器
pub struct RuleParser {
    /// 匹配 `IDENT OP DIGITS` 形式的单个条件
    condition_regex: Regex,
    /// 匹配两侧带空白的顶层布尔关键字
    keyword_regex: Regex,
}

impl RuleParser {
    pub fn new() -> Self {
        Self {
            condition_regex: Regex::new(r"^(\w+)([<>=]+)(\d+)$").unwrap(),
            keyword_regex: Regex::new(r"\s+(AND|OR)\s+").unwrap(),
        }
    }

    /// 解析规则字符串
    ///
    /// 关键字之间的每一段都必须是合法条件；任何一段解析失败，
    /// 整条规则解析失败。
    pub fn parse(&self, rule_string: &str) -> Result<Node> {
        let input = rule_string.trim();
        debug!(rule = %input, "解析规则字符串");

        let mut tree: Option<Node> = None;
        let mut pending: Option<LogicalOperator> = None;
        let mut segment_start = 0;

        for keyword in self.keyword_regex.find_iter(input) {
            let condition = self.parse_condition(&input[segment_start..keyword.start()])?;
            tree = Some(match (tree.take(), pending.take()) {
                (Some(left), Some(operator)) => {
                    Node::Operator(OperatorNode::new(operator, left, condition))
                }
                _ => condition,
            });
            pending = Some(keyword.as_str().trim().parse()?);
            segment_start = keyword.end();
        }

        let last = self.parse_condition(&input[segment_start..])?;
        Ok(match (tree, pending) {
            (Some(left), Some(operator)) => {
                Node::Operator(OperatorNode::new(operator, left, last))
            }
            _ => last,
        })
    }

    /// 解析单个条件段
    ///
    /// 值仅接受纯数字串，小数和负数在此路径下会被拒绝。
    fn parse_condition(&self, segment: &str) -> Result<Node> {
        let segment = segment.trim();
        let caps = self
            .condition_regex
            .captures(segment)
            .ok_or_else(|| RuleError::ParseError(format!("无法解析条件表达式: '{}'", segment)))?;

        let field = caps[1].to_string();
        let operator: ComparisonOperator = caps[2].parse()?;
        let value: f64 = caps[3]
            .parse()
            .map_err(|_| RuleError::ParseError(format!("无法解析数值: '{}'", &caps[3])))?;

        Ok(Node::Condition(Condition::new(field, operator, value)))
    }
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析规则字符串的便捷入口
pub fn parse_rule(rule_string: &str) -> Result<Node> {
    RuleParser::new().parse(rule_string)
}
