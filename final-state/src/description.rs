//! # Description 模块
//!
//! 将 JSON 效果描述转换为 [`EffectNode`]。
//!
//! ## 描述格式
//!
//! | JSON | EffectNode | 说明 |
//! |------|------------|------|
//! | `{"children": [...]}` | `Composite` | 子节点递归转换 |
//! | `{"target": "a", "keyframes": [...]}` | `Keyframes` | `target` 可为 `null` |
//! | `[{"target": ..}, {"children": ..}]` | `Composite` | 元素全部是效果对象（含 `target` 或 `children`） |
//! | `[{...}, ...]` | `Raw` | 其他数组视为关键帧列表 |
//! | `{"keyframes": [...]}` | `Raw` | 无 `target` 字段 |
//! | 其他 | `Opaque` | 应用时报 `InvalidEffectShape` |
//!
//! 目标以名称引用，通过 [`TargetLookup`] 查找。

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::effect::{EffectNode, Keyframe, KeyframeEffect};
use crate::error::DescriptionError;
use crate::target::Target;

/// 按名称查找目标
pub trait TargetLookup {
    fn lookup(&self, name: &str) -> Option<Target>;
}

impl TargetLookup for HashMap<String, Target> {
    fn lookup(&self, name: &str) -> Option<Target> {
        self.get(name).cloned()
    }
}

impl TargetLookup for BTreeMap<String, Target> {
    fn lookup(&self, name: &str) -> Option<Target> {
        self.get(name).cloned()
    }
}

/// 从 JSON 文本解析效果描述
pub fn parse_effect_str(
    text: &str,
    targets: &impl TargetLookup,
) -> Result<EffectNode, DescriptionError> {
    let value: Value = serde_json::from_str(text).map_err(|e| DescriptionError::Json {
        message: e.to_string(),
    })?;
    parse_effect(&value, targets)
}

/// 将 JSON 值转换为效果树
pub fn parse_effect(
    value: &Value,
    targets: &impl TargetLookup,
) -> Result<EffectNode, DescriptionError> {
    match value {
        Value::Array(items) if is_effect_list(items) => items
            .iter()
            .map(|item| parse_effect(item, targets))
            .collect::<Result<Vec<_>, _>>()
            .map(EffectNode::Composite),
        Value::Array(items) => parse_keyframes(items).map(EffectNode::Raw),
        Value::Object(map) => parse_object(map, targets),
        other => Ok(EffectNode::Opaque(json_kind(other).to_string())),
    }
}

/// 非空且每个元素都带有 `target` 或 `children` 字段
fn is_effect_list(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|item| {
            item.as_object()
                .is_some_and(|map| map.contains_key("target") || map.contains_key("children"))
        })
}

fn parse_object(
    map: &Map<String, Value>,
    targets: &impl TargetLookup,
) -> Result<EffectNode, DescriptionError> {
    if let Some(Value::Array(children)) = map.get("children") {
        let children = children
            .iter()
            .map(|child| parse_effect(child, targets))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(EffectNode::Composite(children));
    }

    if let Some(target) = map.get("target") {
        let target = resolve_target(target, targets)?;
        let frames = match map.get("keyframes") {
            Some(keyframes) => parse_effect(keyframes, targets)?,
            None => EffectNode::Opaque("undefined".to_string()),
        };
        let effect = KeyframeEffect::with_source(target, move || frames.clone());
        return Ok(EffectNode::Keyframes(effect));
    }

    match map.get("keyframes") {
        Some(Value::Array(items)) => parse_keyframes(items).map(EffectNode::Raw),
        _ => Ok(EffectNode::Opaque("object".to_string())),
    }
}

fn resolve_target(
    value: &Value,
    targets: &impl TargetLookup,
) -> Result<Option<Target>, DescriptionError> {
    match value {
        Value::Null => Ok(None),
        Value::String(name) => targets
            .lookup(name)
            .map(Some)
            .ok_or_else(|| DescriptionError::UnknownTarget { name: name.clone() }),
        other => Err(DescriptionError::InvalidTarget {
            kind: json_kind(other).to_string(),
        }),
    }
}

fn parse_keyframes(items: &[Value]) -> Result<Vec<Keyframe>, DescriptionError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_keyframe(index, item))
        .collect()
}

fn parse_keyframe(index: usize, value: &Value) -> Result<Keyframe, DescriptionError> {
    let Value::Object(map) = value else {
        return Err(DescriptionError::InvalidKeyframe {
            index,
            message: format!("期望对象，实际为 {}", json_kind(value)),
        });
    };

    map.iter()
        .map(|(name, value)| match value {
            Value::String(s) => Ok((name.clone(), s.clone())),
            Value::Number(n) => Ok((name.clone(), n.to_string())),
            other => Err(DescriptionError::InvalidKeyframe {
                index,
                message: format!("属性 '{}' 的值类型无效: {}", name, json_kind(other)),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
