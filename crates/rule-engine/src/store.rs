//! 规则注册表
//!
//! 使用 DashMap 提供线程安全的内存规则注册表，承载规则的创建、合并、
//! 查询、更新、删除与评估。持久化由上层协作方负责，本层不做 I/O。

use crate::combiner::combine_asts;
use crate::error::{Result, RuleError};
use crate::evaluator::RuleEvaluator;
use crate::models::{EvaluationContext, EvaluationReport, Node, Rule};
use crate::parser::RuleParser;
use crate::validator::RuleValidator;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 规则注册表
#[derive(Clone)]
pub struct RuleStore {
    rules: Arc<DashMap<String, Rule>>,
    parser: Arc<RuleParser>,
    validator: Arc<RuleValidator>,
}

impl RuleStore {
    /// 创建新的规则注册表
    pub fn new() -> Self {
        Self {
            rules: Arc::new(DashMap::new()),
            parser: Arc::new(RuleParser::new()),
            validator: Arc::new(RuleValidator::new()),
        }
    }

    /// 获取当前注册的规则数量
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 检查注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 检查规则是否存在
    pub fn contains(&self, rule_id: &str) -> bool {
        self.rules.contains_key(rule_id)
    }

    /// 从规则字符串创建并注册规则
    #[instrument(skip(self, rule_string))]
    pub fn create(&self, rule_string: &str) -> Result<Rule> {
        let root = self.parse_checked(rule_string)?;

        let rule = Rule::new(rule_string.trim(), root);
        self.rules.insert(rule.id.clone(), rule.clone());

        info!(rule_id = %rule.id, "规则已创建");
        Ok(rule)
    }

    /// 获取规则
    pub fn get(&self, rule_id: &str) -> Option<Rule> {
        self.rules.get(rule_id).map(|r| r.clone())
    }

    /// 获取所有规则 ID
    pub fn list_ids(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.key().clone()).collect()
    }

    /// 获取所有规则
    pub fn list_all(&self) -> Vec<Rule> {
        self.rules.iter().map(|r| r.value().clone()).collect()
    }

    /// 更新规则
    ///
    /// 保留规则 ID 和创建时间，刷新规则字符串、AST 与更新时间。
    #[instrument(skip(self, rule_string), fields(rule_id = %rule_id))]
    pub fn update(&self, rule_id: &str, rule_string: &str) -> Result<Rule> {
        let root = self.parse_checked(rule_string)?;

        let mut entry = self.rules.get_mut(rule_id).ok_or_else(|| {
            warn!("更新不存在的规则: {}", rule_id);
            RuleError::RuleNotFound(rule_id.to_string())
        })?;

        entry.name = rule_string.trim().to_string();
        entry.root = root;
        entry.updated_at = Utc::now();

        info!("规则已更新: {}", rule_id);
        Ok(entry.clone())
    }

    /// 删除规则
    #[instrument(skip(self))]
    pub fn delete(&self, rule_id: &str) -> Result<()> {
        if self.rules.remove(rule_id).is_some() {
            info!("规则已删除: {}", rule_id);
            Ok(())
        } else {
            warn!("删除不存在的规则: {}", rule_id);
            Err(RuleError::RuleNotFound(rule_id.to_string()))
        }
    }

    /// 合并多条已注册规则为一条新规则
    ///
    /// 按给定顺序取出各规则的 AST，用 AND 左结合折叠后注册为新规则，
    /// 新规则名为各来源规则名以 " AND " 连接。
    #[instrument(skip(self))]
    pub fn combine(&self, rule_ids: &[String]) -> Result<Rule> {
        let mut names = Vec::with_capacity(rule_ids.len());
        let mut roots = Vec::with_capacity(rule_ids.len());

        for rule_id in rule_ids {
            let rule = self
                .get(rule_id)
                .ok_or_else(|| RuleError::RuleNotFound(rule_id.clone()))?;
            names.push(rule.name);
            roots.push(rule.root);
        }

        let combined_root = combine_asts(roots)
            .ok_or_else(|| RuleError::InvalidFormat("合并规则列表不能为空".to_string()))?;

        let rule = Rule::new(names.join(" AND "), combined_root);
        self.rules.insert(rule.id.clone(), rule.clone());

        info!(rule_id = %rule.id, source_count = rule_ids.len(), "规则已合并");
        Ok(rule)
    }

    /// 评估已注册规则
    pub fn evaluate(
        &self,
        rule_id: &str,
        context: &EvaluationContext,
    ) -> Result<EvaluationReport> {
        let rule = self
            .get(rule_id)
            .ok_or_else(|| RuleError::RuleNotFound(rule_id.to_string()))?;

        RuleEvaluator::new().with_trace().execute(&rule, context)
    }

    /// 校验并解析规则字符串
    fn parse_checked(&self, rule_string: &str) -> Result<Node> {
        if rule_string.trim().is_empty() || !self.validator.is_valid(rule_string) {
            return Err(RuleError::InvalidFormat(format!(
                "无效的规则格式: '{}'，应为类似 \"age>30\" 或 \"age>30 AND salary<5000\" 的表达式",
                rule_string
            )));
        }

        self.parser.parse(rule_string)
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}
