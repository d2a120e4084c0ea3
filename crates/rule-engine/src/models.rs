//! 规则引擎领域模型

use crate::operators::{ComparisonOperator, LogicalOperator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// AST 节点（条件或逻辑操作符）
///
/// 持久化形态与节点的 JSON 形态一致：
/// `{"type": "condition", ...}` 或 `{"type": "operator", ...}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Condition(Condition),
    Operator(OperatorNode),
}

impl Node {
    /// 用 AND 组合两棵子树
    pub fn and(left: Node, right: Node) -> Self {
        Self::Operator(OperatorNode::new(LogicalOperator::And, left, right))
    }

    /// 用 OR 组合两棵子树
    pub fn or(left: Node, right: Node) -> Self {
        Self::Operator(OperatorNode::new(LogicalOperator::Or, left, right))
    }
}

/// 条件节点（叶子）
///
/// 操作符以字符串形式存储：外部文档中可能携带不在支持范围内的操作符，
/// 这类文档仍需正常反序列化，并在评估时按不满足处理。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: f64,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: ComparisonOperator, value: f64) -> Self {
        Self {
            field: field.into(),
            operator: operator.to_string(),
            value,
        }
    }
}

/// 逻辑操作符节点（内部节点，恰好两个子树）
///
/// `operator` 缺失的文档按 AND 语义评估。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorNode {
    pub operator: Option<String>,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl OperatorNode {
    pub fn new(operator: LogicalOperator, left: Node, right: Node) -> Self {
        Self {
            operator: Some(operator.to_string()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// 规则记录
///
/// `name` 保存创建规则时的原始规则字符串，`root` 为解析后的 AST。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub root: Node,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    pub fn new(name: impl Into<String>, root: Node) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            root,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// 评估上下文 - 提供给规则引擎的记录数据
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    data: Value,
}

impl EvaluationContext {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// 从 JSON 字符串创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: Value = serde_json::from_str(json)?;
        Ok(Self { data })
    }

    /// 获取字段的原始值
    ///
    /// 字段缺失返回 None，与"存在但非数值"可区分。
    pub fn get_field(&self, field: &str) -> Option<&Value> {
        self.data.as_object()?.get(field)
    }

    /// 获取字段的数值形式
    ///
    /// 数值直接返回；数值字符串（如 "42"）按浮点数解析；其余返回 None。
    pub fn numeric_field(&self, field: &str) -> Option<f64> {
        match self.get_field(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// 获取底层数据
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// 评估结果报告
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub matched: bool,
    pub rule_id: String,
    pub rule_name: String,
    pub evaluation_trace: Vec<String>,
    pub evaluation_time_ms: i64,
}

impl EvaluationReport {
    pub fn new(rule_id: String, rule_name: String) -> Self {
        Self {
            matched: false,
            rule_id,
            rule_name,
            evaluation_trace: Vec::new(),
            evaluation_time_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_serialization_shape() {
        let node = Node::and(
            Node::Condition(Condition::new("age", ComparisonOperator::Gt, 30.0)),
            Node::Condition(Condition::new("salary", ComparisonOperator::Lt, 5000.0)),
        );

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "operator");
        assert_eq!(value["operator"], "AND");
        assert_eq!(value["left"]["type"], "condition");
        assert_eq!(value["left"]["field"], "age");
        assert_eq!(value["left"]["operator"], ">");
        assert_eq!(value["left"]["value"], 30.0);
        assert_eq!(value["right"]["field"], "salary");
    }

    #[test]
    fn test_node_roundtrip() {
        let node = Node::or(
            Node::Condition(Condition::new("age", ComparisonOperator::Gte, 18.0)),
            Node::and(
                Node::Condition(Condition::new("salary", ComparisonOperator::Eq, 5000.0)),
                Node::Condition(Condition::new("experience", ComparisonOperator::Lte, 3.0)),
            ),
        );

        let json = serde_json::to_string(&node).unwrap();
        let parsed: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_operator_field_may_be_absent() {
        // 外部文档可能缺失 operator 字段，反序列化后为 None
        let json = r#"
        {
            "type": "operator",
            "left": {"type": "condition", "field": "age", "operator": ">", "value": 30},
            "right": {"type": "condition", "field": "salary", "operator": "<", "value": 5000}
        }
        "#;

        let node: Node = serde_json::from_str(json).unwrap();
        match node {
            Node::Operator(op) => assert!(op.operator.is_none()),
            _ => panic!("expected operator node"),
        }
    }

    #[test]
    fn test_unknown_comparison_operator_still_deserializes() {
        let json = r#"{"type": "condition", "field": "age", "operator": "!=", "value": 30}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        match node {
            Node::Condition(cond) => assert_eq!(cond.operator, "!="),
            _ => panic!("expected condition node"),
        }
    }

    #[test]
    fn test_rule_record() {
        let rule = Rule::new(
            "age>30",
            Node::Condition(Condition::new("age", ComparisonOperator::Gt, 30.0)),
        );

        assert_eq!(rule.name, "age>30");
        assert!(!rule.id.is_empty());

        let json = serde_json::to_string(&rule).unwrap();
        let parsed: Rule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, rule.id);
        assert_eq!(parsed.root, rule.root);
    }

    #[test]
    fn test_evaluation_context_lookup() {
        let ctx = EvaluationContext::new(json!({
            "age": 35,
            "salary": "4500",
            "department": "HR"
        }));

        assert_eq!(ctx.get_field("age"), Some(&json!(35)));
        assert_eq!(ctx.numeric_field("age"), Some(35.0));
        // 数值字符串按浮点数解析
        assert_eq!(ctx.numeric_field("salary"), Some(4500.0));
        // 存在但非数值
        assert!(ctx.get_field("department").is_some());
        assert_eq!(ctx.numeric_field("department"), None);
        // 字段缺失
        assert_eq!(ctx.get_field("experience"), None);
        assert_eq!(ctx.numeric_field("experience"), None);
    }
}
