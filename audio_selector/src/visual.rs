//! 渲染协作方接口模块
//!
//! 模型从不直接绘制：创建标记或选区时向渲染方申请可视句柄，删除时请求释放。
//! 句柄是不透明的整数，模型不持有任何渲染库类型。

/// 渲染方签发的不透明可视句柄。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// 宿主可替换的渲染后端抽象。
pub trait VisualBackend {
    /// 在 `time` 处创建一条标记线，返回其句柄。
    fn create_mark(&mut self, time: f64) -> VisualHandle;

    /// 创建一个覆盖 `[start, end]` 的选区高亮，返回其句柄。
    fn create_span(&mut self, start: f64, end: f64) -> VisualHandle;

    /// 移动既有选区高亮的端点。候选选区跟随游标时会被反复调用。
    fn move_span(&mut self, handle: VisualHandle, start: f64, end: f64);

    /// 释放一个可视对象。
    fn release(&mut self, handle: VisualHandle);
}

/// 空实现：签发递增句柄并忽略其余请求。
/// 适用于每帧按查询接口重绘、不保留可视对象的立即模式宿主。
#[derive(Default)]
pub struct NullVisual {
    next: u64,
}

impl VisualBackend for NullVisual {
    fn create_mark(&mut self, _time: f64) -> VisualHandle {
        self.next += 1;
        VisualHandle(self.next)
    }

    fn create_span(&mut self, _start: f64, _end: f64) -> VisualHandle {
        self.next += 1;
        VisualHandle(self.next)
    }

    fn move_span(&mut self, _handle: VisualHandle, _start: f64, _end: f64) {}

    fn release(&mut self, _handle: VisualHandle) {}
}
