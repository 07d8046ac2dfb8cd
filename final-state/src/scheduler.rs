//! # Scheduler 模块
//!
//! 帧回调调度抽象：在下一次绘制前执行一次回调。
//!
//! 宿主环境提供真实实现；`ManualScheduler` 由调用方手动推进帧，
//! `ImmediateScheduler` 立即同步执行。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// 帧回调（一次性）
pub type FrameCallback = Box<dyn FnOnce()>;

/// 帧回调调度器
///
/// 注册的回调在下一次绘制前执行且只执行一次，没有取消手段。
pub trait FrameScheduler {
    /// 注册下一帧回调
    fn request_frame(&self, callback: FrameCallback);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &S {
    fn request_frame(&self, callback: FrameCallback) {
        (**self).request_frame(callback);
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn request_frame(&self, callback: FrameCallback) {
        (**self).request_frame(callback);
    }
}

/// 手动推进的调度器
///
/// 克隆共享同一个回调队列，适合宿主主循环或测试。
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Vec<FrameCallback>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 执行一帧
    ///
    /// 只执行本次调用前已注册的回调；回调执行期间新注册的回调留到下一帧。
    ///
    /// # 返回
    /// 本帧执行的回调数量
    pub fn run_frame(&self) -> usize {
        let callbacks = std::mem::take(&mut *self.queue.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback();
        }
        count
    }

    /// 等待执行的回调数量
    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push(callback);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending_frames())
            .finish()
    }
}

/// 立即执行的调度器
///
/// 用于没有绘制循环的宿主，回调在注册时同步执行。
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_manual_scheduler_runs_once() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        scheduler.request_frame(Box::new(move || counter.set(counter.get() + 1)));
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(hits.get(), 0);

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);

        // 回调只执行一次
        assert_eq!(scheduler.run_frame(), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_manual_scheduler_defers_nested_requests() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));

        let inner_scheduler = scheduler.clone();
        let counter = hits.clone();
        scheduler.request_frame(Box::new(move || {
            let counter = counter.clone();
            inner_scheduler.request_frame(Box::new(move || counter.set(counter.get() + 1)));
        }));

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.pending_frames(), 1);

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_immediate_scheduler() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();

        ImmediateScheduler.request_frame(Box::new(move || counter.set(counter.get() + 1)));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_scheduler_through_reference() {
        let scheduler = ManualScheduler::new();
        let by_ref: &dyn FrameScheduler = &scheduler;

        by_ref.request_frame(Box::new(|| {}));
        assert_eq!(scheduler.pending_frames(), 1);
    }
}
