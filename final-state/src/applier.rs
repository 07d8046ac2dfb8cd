//! # Applier 模块
//!
//! 最终状态应用器。
//!
//! 深度优先遍历效果树，把每个叶子解析为（目标，最终关键帧），
//! 校验在调用方的同一轮内同步完成，实际写入推迟到下一次帧回调：
//! ```rust,ignore
//! let applier = FinalStateApplier::new(scheduler.clone());
//! applier.apply(&effect, Some(&target))?; // 校验失败立即返回
//! scheduler.run_frame();                  // 样式在这里写入
//! ```

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::{ApplierConfig, FrameMode};
use crate::effect::{EffectNode, Keyframe};
use crate::error::{ApplyError, ApplyResult};
use crate::scheduler::FrameScheduler;
use crate::target::Target;

/// 一次待提交的样式写入
struct StyleWrite {
    target: Target,
    keyframe: Keyframe,
}

/// 待写入队列
#[derive(Default)]
struct PendingWrites {
    /// 等待当前批次帧回调的写入
    writes: Vec<StyleWrite>,
    /// 当前批次是否已注册帧回调
    frame_requested: bool,
    /// PerLeaf 模式下尚未执行的回调数
    in_flight: usize,
}

/// 单次 `apply` 的解析结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// 已安排写入的叶子数
    pub scheduled: usize,
    /// 因目标不匹配被跳过的叶子数
    pub skipped: usize,
    /// 关键帧列表为空的叶子数
    pub empty: usize,
}

/// 最终状态应用器
///
/// 持有帧调度器和待写入队列。同一批次（上一次帧回调执行之后安排的所有写入）
/// 在同一次帧回调中一起提交。
pub struct FinalStateApplier<S: FrameScheduler> {
    scheduler: S,
    config: ApplierConfig,
    pending: Rc<RefCell<PendingWrites>>,
}

impl<S: FrameScheduler> fmt::Debug for FinalStateApplier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalStateApplier")
            .field("config", &self.config)
            .field("pending", &self.pending_writes())
            .finish()
    }
}

impl<S: FrameScheduler> FinalStateApplier<S> {
    /// 使用默认配置创建
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, ApplierConfig::default())
    }

    pub fn with_config(scheduler: S, config: ApplierConfig) -> Self {
        Self {
            scheduler,
            config,
            pending: Rc::new(RefCell::new(PendingWrites::default())),
        }
    }

    /// 从配置文件创建
    ///
    /// 配置文件缺失或无效时使用默认配置（见 [`ApplierConfig::load`]）。
    pub fn from_config_file(scheduler: S, path: impl AsRef<Path>) -> Self {
        Self::with_config(scheduler, ApplierConfig::load(path))
    }

    pub fn config(&self) -> &ApplierConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// 等待下一次帧回调提交的写入数量
    pub fn pending_writes(&self) -> usize {
        let pending = self.pending.borrow();
        pending.writes.len() + pending.in_flight
    }

    /// 将效果的最终关键帧应用到目标
    ///
    /// # 参数
    /// - `effect`: 效果树
    /// - `default_target`: 默认目标；提供时，嵌入目标与之不同的关键帧效果会被跳过
    ///
    /// # 返回
    /// - `Ok(ApplySummary)`: 解析完成，写入将在下一次帧回调执行
    /// - `Err(ApplyError)`: 遇到无效节点，之前已安排的写入仍然有效
    pub fn apply(
        &self,
        effect: &EffectNode,
        default_target: Option<&Target>,
    ) -> ApplyResult<ApplySummary> {
        let mut summary = ApplySummary::default();
        self.resolve(effect, default_target, &mut summary)?;
        Ok(summary)
    }

    fn resolve(
        &self,
        node: &EffectNode,
        default_target: Option<&Target>,
        summary: &mut ApplySummary,
    ) -> ApplyResult<()> {
        match node {
            EffectNode::Composite(children) => {
                for child in children {
                    self.resolve(child, default_target, summary)?;
                }
                Ok(())
            }
            EffectNode::Keyframes(effect) => {
                if let Some(default) = default_target {
                    if effect.target() != Some(default) {
                        debug!(
                            embedded = ?effect.target(),
                            selected = %default.label(),
                            "目标不匹配，跳过效果"
                        );
                        summary.skipped += 1;
                        return Ok(());
                    }
                }
                let frames = effect.get_frames();
                self.resolve_leaf(&frames, effect.target(), summary)
            }
            other => self.resolve_leaf(other, default_target, summary),
        }
    }

    fn resolve_leaf(
        &self,
        value: &EffectNode,
        target: Option<&Target>,
        summary: &mut ApplySummary,
    ) -> ApplyResult<()> {
        let keyframes = match value {
            EffectNode::Callback(_) => return Err(ApplyError::UnsupportedEffectKind),
            EffectNode::Raw(keyframes) => keyframes,
            other => {
                return Err(ApplyError::InvalidEffectShape {
                    kind: other.kind().to_string(),
                });
            }
        };

        let target = target.ok_or(ApplyError::UnresolvedTarget)?;

        let Some(last) = keyframes.last() else {
            debug!(element = %target.label(), "关键帧列表为空，无需写入");
            summary.empty += 1;
            return Ok(());
        };

        self.schedule(StyleWrite {
            target: target.clone(),
            keyframe: last.clone(),
        });
        summary.scheduled += 1;
        Ok(())
    }

    fn schedule(&self, write: StyleWrite) {
        let trace_writes = self.config.trace_writes;
        let pending = Rc::clone(&self.pending);

        match self.config.frame_mode {
            FrameMode::Batched => {
                let needs_frame = {
                    let mut queue = self.pending.borrow_mut();
                    queue.writes.push(write);
                    !std::mem::replace(&mut queue.frame_requested, true)
                };
                if !needs_frame {
                    return;
                }

                debug!("注册帧回调");
                self.scheduler.request_frame(Box::new(move || {
                    let writes = {
                        let mut queue = pending.borrow_mut();
                        queue.frame_requested = false;
                        std::mem::take(&mut queue.writes)
                    };
                    commit(&writes, trace_writes);
                }));
            }
            FrameMode::PerLeaf => {
                self.pending.borrow_mut().in_flight += 1;
                self.scheduler.request_frame(Box::new(move || {
                    pending.borrow_mut().in_flight -= 1;
                    commit(std::slice::from_ref(&write), trace_writes);
                }));
            }
        }
    }
}

/// 在帧回调中写入样式
fn commit(writes: &[StyleWrite], trace_writes: bool) {
    for write in writes {
        for (name, value) in write.keyframe.iter() {
            if trace_writes {
                trace!(element = %write.target.label(), property = name, value = value, "写入样式");
            }
            write.target.set_style_property(name, value);
        }
    }
    debug!(count = writes.len(), "提交最终状态");
}

/// 一次性应用最终状态
///
/// 使用默认配置的临时应用器，写入在调度器的下一次帧回调中提交。
pub fn apply_final_state<S: FrameScheduler>(
    scheduler: S,
    effect: &EffectNode,
    default_target: Option<&Target>,
) -> ApplyResult<ApplySummary> {
    FinalStateApplier::new(scheduler).apply(effect, default_target)
}
