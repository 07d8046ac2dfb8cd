//! # Target 模块
//!
//! 样式目标抽象。
//!
//! ## 核心概念
//!
//! - `StyleTarget`: 可写入样式的对象接口
//! - `Target`: 目标句柄，按身份（同一对象）比较
//! - `Element`: 内存中的样式目标实现

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// 可写入样式的对象接口
///
/// 使用内部可变性，写入通过 `&self` 完成。
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Sprite {
///     alpha: RefCell<String>,
/// }
///
/// impl StyleTarget for Sprite {
///     fn label(&self) -> String {
///         "sprite".to_string()
///     }
///
///     fn set_style_property(&self, name: &str, value: &str) {
///         if name == "opacity" {
///             *self.alpha.borrow_mut() = value.to_string();
///         }
///     }
/// }
/// ```
pub trait StyleTarget {
    /// 目标描述（用于日志）
    fn label(&self) -> String;

    /// 设置样式属性，覆盖同名旧值，其他属性保持不变
    fn set_style_property(&self, name: &str, value: &str);
}

/// 目标句柄
///
/// 克隆只复制引用；两个句柄相等当且仅当指向同一对象。
#[derive(Clone)]
pub struct Target(Rc<dyn StyleTarget>);

impl Target {
    pub fn new<T: StyleTarget + 'static>(target: Rc<T>) -> Self {
        Self(target as Rc<dyn StyleTarget>)
    }

    /// 是否指向同一对象
    pub fn same(&self, other: &Target) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    pub fn label(&self) -> String {
        self.0.label()
    }

    pub fn set_style_property(&self, name: &str, value: &str) {
        self.0.set_style_property(name, value);
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Target {}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Target({})", self.label())
    }
}

/// 内存样式目标
///
/// 持有一张样式表，`Element` 的克隆共享同一张表和同一身份。
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementData>,
}

struct ElementData {
    name: String,
    style: RefCell<BTreeMap<String, String>>,
}

impl StyleTarget for ElementData {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.style
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }
}

impl Element {
    /// 创建空样式的元素
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ElementData {
                name: name.into(),
                style: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// 获取指向此元素的目标句柄
    pub fn target(&self) -> Target {
        Target::new(self.inner.clone())
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 获取样式属性当前值
    pub fn style(&self, name: &str) -> Option<String> {
        self.inner.style.borrow().get(name).cloned()
    }

    /// 直接设置样式属性（不经过应用器）
    pub fn set_style(&self, name: &str, value: &str) {
        self.inner.set_style_property(name, value);
    }

    /// 移除样式属性，返回旧值
    pub fn remove_style(&self, name: &str) -> Option<String> {
        self.inner.style.borrow_mut().remove(name)
    }

    /// 已设置的样式属性数量
    pub fn style_len(&self) -> usize {
        self.inner.style.borrow().len()
    }

    /// 以内联样式文本形式输出，如 `color: red; opacity: 1;`
    pub fn css_text(&self) -> String {
        self.inner
            .style
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.inner.name)
            .field("style", &self.css_text())
            .finish()
    }
}
