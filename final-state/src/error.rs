//! # Error 模块
//!
//! 定义 final-state 中使用的错误类型。

use thiserror::Error;

/// 应用最终状态时的错误
///
/// 全部在解析阶段同步返回，绝不会在帧回调中产生。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// 过程式（回调）效果，无法读取静态关键帧
    #[error("不支持 EffectCallback 形式的效果")]
    UnsupportedEffectKind,

    /// 既不是组合效果，也不是关键帧序列
    #[error("期望关键帧序列或效果，实际为 {kind}")]
    InvalidEffectShape { kind: String },

    /// 既没有嵌入目标，也没有提供默认目标
    #[error("无法确定效果的目标")]
    UnresolvedTarget,
}

/// 效果描述解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptionError {
    /// JSON 语法错误
    #[error("效果描述不是合法的 JSON: {message}")]
    Json { message: String },

    /// 目标名称未注册
    #[error("未知目标 '{name}'")]
    UnknownTarget { name: String },

    /// 目标字段既不是字符串也不是 null
    #[error("目标字段类型无效: {kind}")]
    InvalidTarget { kind: String },

    /// 关键帧格式无效
    #[error("第 {index} 个关键帧无效 - {message}")]
    InvalidKeyframe { index: usize, message: String },
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 解析失败
    #[error("配置解析失败: {0}")]
    ParseFailed(String),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
}

/// Result 类型别名
pub type ApplyResult<T> = Result<T, ApplyError>;
