//! 规则 AST 合并
//!
//! 将多棵已解析的 AST 左结合折叠为一棵 AND 链。

use crate::models::Node;

/// 用 AND 合并多棵 AST
///
/// 空序列返回 None；单元素序列原样返回该节点；
/// 其余情况按 `((n0 AND n1) AND n2) ...` 左结合折叠。
/// 不校验输入是否为合法树，信任上游解析结果。
pub fn combine_asts(nodes: Vec<Node>) -> Option<Node> {
    let mut nodes = nodes.into_iter();
    let first = nodes.next()?;
    Some(nodes.fold(first, Node::and))
}
