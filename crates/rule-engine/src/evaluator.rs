//! AST 评估器
//!
//! 将 AST 与记录数据求值为布尔结论。条件层面的异常（字段缺失、
//! 值非数值、未知比较操作符）一律按不满足处理；逻辑操作符异常
//! 则是硬错误，表明文档已被破坏。

use crate::error::{Result, RuleError};
use crate::models::{Condition, EvaluationContext, EvaluationReport, Node, OperatorNode, Rule};
use crate::operators::{ComparisonOperator, LogicalOperator};
use std::time::Instant;

/// AST 评估器
pub struct RuleEvaluator {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleEvaluator {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 评估 AST，返回布尔结论
    pub fn evaluate(&self, node: &Node, context: &EvaluationContext) -> Result<bool> {
        let mut trace = Vec::new();
        self.evaluate_node(node, context, &mut trace, "root")
    }

    /// 评估规则记录，返回带追踪信息的报告
    pub fn execute(&self, rule: &Rule, context: &EvaluationContext) -> Result<EvaluationReport> {
        let start = Instant::now();

        let mut report = EvaluationReport::new(rule.id.clone(), rule.name.clone());
        let mut trace = Vec::new();

        report.matched = self.evaluate_node(&rule.root, context, &mut trace, "root")?;
        report.evaluation_trace = trace;
        report.evaluation_time_ms = start.elapsed().as_millis() as i64;

        Ok(report)
    }

    /// 递归评估节点
    fn evaluate_node(
        &self,
        node: &Node,
        context: &EvaluationContext,
        trace: &mut Vec<String>,
        path: &str,
    ) -> Result<bool> {
        match node {
            Node::Condition(cond) => Ok(self.evaluate_condition(cond, context, trace, path)),
            Node::Operator(op_node) => self.evaluate_operator(op_node, context, trace, path),
        }
    }

    /// 评估条件节点
    ///
    /// 字段缺失、值非数值、未知比较操作符都返回 false，不产生错误。
    fn evaluate_condition(
        &self,
        cond: &Condition,
        context: &EvaluationContext,
        trace: &mut Vec<String>,
        path: &str,
    ) -> bool {
        let field_value = context.numeric_field(&cond.field);
        let operator = cond.operator.parse::<ComparisonOperator>().ok();

        let matched = match (field_value, operator) {
            (Some(user_value), Some(op)) => op.compare(user_value, cond.value),
            _ => false,
        };

        if self.trace_enabled {
            trace.push(format!(
                "{}: {} {} {} => {}",
                path,
                cond.field,
                cond.operator,
                cond.value,
                if matched { "MATCHED" } else { "NOT_MATCHED" }
            ));
        }

        matched
    }

    /// 评估逻辑操作符节点
    ///
    /// 不做短路求值，两个子树总是全部评估。操作符缺失按 AND 处理；
    /// 归一化后既非 AND 也非 OR 的操作符产生 `InvalidLogicalOperator`。
    fn evaluate_operator(
        &self,
        node: &OperatorNode,
        context: &EvaluationContext,
        trace: &mut Vec<String>,
        path: &str,
    ) -> Result<bool> {
        let left = self.evaluate_node(&node.left, context, trace, &format!("{}.left", path))?;
        let right = self.evaluate_node(&node.right, context, trace, &format!("{}.right", path))?;

        let operator = node
            .operator
            .as_deref()
            .unwrap_or("AND")
            .parse::<LogicalOperator>()?;

        let matched = match operator {
            LogicalOperator::And => left && right,
            LogicalOperator::Or => left || right,
        };

        if self.trace_enabled {
            trace.push(format!(
                "{}: {} {} {} => {}",
                path, left, operator, right, matched
            ));
        }

        Ok(matched)
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// 评估 AST 的便捷入口，不收集追踪信息
pub fn evaluate_ast(node: &Node, context: &EvaluationContext) -> Result<bool> {
    RuleEvaluator::new().evaluate(node, context)
}
