//! # Config 模块
//!
//! 应用器配置。
//!
//! ## 配置优先级
//!
//! 1. 代码中显式构造（最高）
//! 2. 配置文件 (JSON)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ConfigError;

/// 帧提交方式
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    /// 同一批写入共用一次帧回调，在同一帧内一起生效
    #[default]
    Batched,
    /// 每个叶子效果单独注册一次帧回调
    PerLeaf,
}

/// 应用器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplierConfig {
    /// 帧提交方式
    #[serde(default)]
    pub frame_mode: FrameMode,

    /// 是否为每次属性写入输出 trace 日志
    #[serde(default = "default_trace_writes")]
    pub trace_writes: bool,
}

impl Default for ApplierConfig {
    fn default() -> Self {
        Self {
            frame_mode: FrameMode::default(),
            trace_writes: default_trace_writes(),
        }
    }
}

fn default_trace_writes() -> bool {
    false
}

impl ApplierConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并输出警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_json_str(&content) {
                Ok(config) => {
                    info!(path = ?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}
