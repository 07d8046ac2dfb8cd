//! # Final State
//!
//! 将动画效果的最终关键帧作为静态样式写入目标。
//!
//! 动画本身由外部动画系统驱动；本库只在动画结束（或被跳过）后，
//! 保证目标停留在动画描述的最终状态。
//!
//! ## 流程概述
//!
//! ```text
//! EffectNode ──► FinalStateApplier::apply()
//!                  │  解析 / 校验（同步，错误立即返回）
//!                  ▼
//!             待写入队列 ──► FrameScheduler（下一帧绘制前）
//!                                  │
//!                                  ▼
//!                        Target::set_style_property()
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! use final_state::{EffectNode, Element, FinalStateApplier, Keyframe, KeyframeEffect, ManualScheduler};
//!
//! let scheduler = ManualScheduler::new();
//! let applier = FinalStateApplier::new(scheduler.clone());
//!
//! let box_el = Element::new("box");
//! let effect = EffectNode::Keyframes(KeyframeEffect::new(
//!     Some(box_el.target()),
//!     vec![Keyframe::new().with("opacity", "0"), Keyframe::new().with("opacity", "1")],
//! ));
//!
//! applier.apply(&effect, None)?;
//! scheduler.run_frame();
//! assert_eq!(box_el.style("opacity").as_deref(), Some("1"));
//! ```
//!
//! ## 模块结构
//!
//! - [`effect`]：效果树与关键帧
//! - [`target`]：样式目标
//! - [`scheduler`]：帧回调调度
//! - [`applier`]：最终状态解析与应用
//! - [`description`]：JSON 效果描述
//! - [`config`]：应用器配置
//! - [`error`]：错误类型定义

pub mod applier;
pub mod config;
pub mod description;
pub mod effect;
pub mod error;
pub mod scheduler;
pub mod target;

// 重导出核心类型
pub use applier::{ApplySummary, FinalStateApplier, apply_final_state};
pub use config::{ApplierConfig, FrameMode};
pub use description::{TargetLookup, parse_effect, parse_effect_str};
pub use effect::{EffectCallback, EffectNode, Keyframe, KeyframeEffect, KeyframeSource};
pub use error::{ApplyError, ApplyResult, ConfigError, DescriptionError};
pub use scheduler::{FrameCallback, FrameScheduler, ImmediateScheduler, ManualScheduler};
pub use target::{Element, StyleTarget, Target};
