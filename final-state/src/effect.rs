//! # Effect 模块
//!
//! 效果树定义。
//!
//! ## 核心概念
//!
//! - `Keyframe`: 某一时刻的样式属性表（属性名 → 属性值）
//! - `KeyframeEffect`: 带目标的关键帧效果，关键帧列表按需获取
//! - `EffectNode`: 效果树节点（组合 / 关键帧效果 / 裸关键帧列表 / 回调）

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::target::Target;

/// 关键帧
///
/// 属性名与属性值都是不透明字符串，原样写入目标，不做任何解释。
/// 属性保持编写顺序，写入目标时按此顺序进行（简写属性与完整属性会相互覆盖）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyframe {
    properties: IndexMap<String, String>,
}

impl Keyframe {
    /// 创建空关键帧
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加属性
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// 设置属性，返回被覆盖的旧值
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(name.into(), value.into())
    }

    /// 获取属性值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// 按编写顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Keyframe {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// 关键帧来源
///
/// `KeyframeEffect` 不直接保存关键帧，而是在解析时通过此接口获取。
/// 返回值通常是 [`EffectNode::Raw`]；其他形态会在校验阶段被拒绝。
pub trait KeyframeSource {
    /// 获取关键帧列表
    fn get_frames(&self) -> EffectNode;
}

impl KeyframeSource for Vec<Keyframe> {
    fn get_frames(&self) -> EffectNode {
        EffectNode::Raw(self.clone())
    }
}

impl<F> KeyframeSource for F
where
    F: Fn() -> EffectNode,
{
    fn get_frames(&self) -> EffectNode {
        self()
    }
}

/// 关键帧效果
///
/// 携带一个（可能为空的）嵌入目标和一个关键帧来源。
#[derive(Clone)]
pub struct KeyframeEffect {
    target: Option<Target>,
    source: Rc<dyn KeyframeSource>,
}

impl KeyframeEffect {
    /// 使用固定关键帧列表创建
    pub fn new(target: Option<Target>, keyframes: Vec<Keyframe>) -> Self {
        Self::with_source(target, keyframes)
    }

    /// 使用自定义关键帧来源创建
    pub fn with_source(target: Option<Target>, source: impl KeyframeSource + 'static) -> Self {
        Self {
            target,
            source: Rc::new(source),
        }
    }

    /// 嵌入的目标
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// 获取关键帧列表
    pub fn get_frames(&self) -> EffectNode {
        self.source.get_frames()
    }
}

impl fmt::Debug for KeyframeEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeEffect")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// 过程式效果
///
/// 由回调函数逐帧计算样式，没有可读取的最终关键帧。
/// 仅用于表示输入，永远不会被调用。
#[derive(Clone)]
pub struct EffectCallback(Rc<dyn Fn(Option<f64>)>);

impl EffectCallback {
    pub fn new(callback: impl Fn(Option<f64>) + 'static) -> Self {
        Self(Rc::new(callback))
    }
}

impl fmt::Debug for EffectCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EffectCallback(..)")
    }
}

/// 效果树节点
#[derive(Debug, Clone)]
pub enum EffectNode {
    /// 组合效果（分组或序列），按顺序递归处理子节点
    Composite(Vec<EffectNode>),

    /// 带目标的关键帧效果
    Keyframes(KeyframeEffect),

    /// 裸关键帧列表，目标来自调用方
    Raw(Vec<Keyframe>),

    /// 过程式效果（不支持）
    Callback(EffectCallback),

    /// 不具备序列形态的值，字符串仅用于诊断
    Opaque(String),
}

impl EffectNode {
    /// 节点形态名称（用于日志和错误信息）
    pub fn kind(&self) -> &str {
        match self {
            Self::Composite(_) => "composite",
            Self::Keyframes(_) => "keyframe effect",
            Self::Raw(_) => "keyframe list",
            Self::Callback(_) => "callback",
            Self::Opaque(kind) => kind,
        }
    }
}

impl From<KeyframeEffect> for EffectNode {
    fn from(effect: KeyframeEffect) -> Self {
        Self::Keyframes(effect)
    }
}

impl From<Vec<Keyframe>> for EffectNode {
    fn from(keyframes: Vec<Keyframe>) -> Self {
        Self::Raw(keyframes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_keyframe_builder() {
        let kf = Keyframe::new().with("opacity", "1").with("color", "red");

        assert_eq!(kf.len(), 2);
        assert_eq!(kf.get("opacity"), Some("1"));
        assert_eq!(kf.get("width"), None);

        // 保持编写顺序
        let names: Vec<_> = kf.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["opacity", "color"]);
    }

    #[test]
    fn test_keyframe_insert_overwrites() {
        let mut kf = Keyframe::new();
        assert_eq!(kf.insert("left", "0px"), None);
        assert_eq!(kf.insert("left", "10px"), Some("0px".to_string()));
        assert_eq!(kf.get("left"), Some("10px"));
    }

    #[test]
    fn test_keyframe_json_keeps_authored_order() {
        let kf: Keyframe = serde_json::from_str(r#"{"padding-left":"5px","padding":"0"}"#).unwrap();
        let names: Vec<_> = kf.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["padding-left", "padding"]);

        // 覆盖旧值不改变位置
        let kf = kf.with("padding-left", "1px");
        let names: Vec<_> = kf.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["padding-left", "padding"]);
    }

    #[test]
    fn test_keyframe_json_shape() {
        let kf: Keyframe = serde_json::from_str(r#"{"width":"10px"}"#).unwrap();
        assert_eq!(kf, Keyframe::new().with("width", "10px"));
        assert_eq!(serde_json::to_string(&kf).unwrap(), r#"{"width":"10px"}"#);
    }

    #[test]
    fn test_keyframe_effect_frames_are_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let effect = KeyframeEffect::with_source(None, move || {
            counter.set(counter.get() + 1);
            EffectNode::Raw(vec![Keyframe::new().with("top", "0")])
        });

        assert_eq!(calls.get(), 0);
        assert!(matches!(effect.get_frames(), EffectNode::Raw(list) if list.len() == 1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_node_kind() {
        assert_eq!(EffectNode::Composite(vec![]).kind(), "composite");
        assert_eq!(EffectNode::Raw(vec![]).kind(), "keyframe list");
        assert_eq!(EffectNode::Callback(EffectCallback::new(|_| {})).kind(), "callback");
        assert_eq!(EffectNode::Opaque("number".to_string()).kind(), "number");
    }
}
