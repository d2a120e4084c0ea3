//! 规则表达式引擎
//!
//! 提供纯函数式的规则评估能力，支持：
//! - 规则字符串的形状校验与解析（`age>30 AND salary<5000`）
//! - AST 的 AND 合并
//! - AST 对记录数据的布尔评估（失败即不满足）
//! - 线程安全的内存规则注册表

pub mod combiner;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod operators;
pub mod parser;
pub mod store;
pub mod validator;

pub use combiner::combine_asts;
pub use error::{Result, RuleError};
pub use evaluator::{evaluate_ast, RuleEvaluator};
pub use models::{
    Condition, EvaluationContext, EvaluationReport, Node, OperatorNode, Rule,
};
pub use operators::{ComparisonOperator, LogicalOperator};
pub use parser::{parse_rule, RuleParser};
pub use store::RuleStore;
pub use validator::{is_valid_rule, RuleValidator};
