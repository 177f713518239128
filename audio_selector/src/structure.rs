//! 数据结构模块
//!
//! 定义标注模型的核心数据结构：标记、已提交选区与进行中的候选选区。

use thiserror::Error;

use crate::visual::VisualHandle;

/// 单个时间点标记（节拍切分点）。
///
/// `handle` 指向渲染协作方持有的可视对象，模型只用它来请求释放。
#[derive(Clone, Copy, Debug)]
pub struct Mark {
    pub time: f64,
    pub handle: VisualHandle,
}

/// 已提交的选区，保证 `start <= end`。
#[derive(Clone, Copy, Debug)]
pub struct Selection {
    pub start: f64,
    pub end: f64,
    pub handle: VisualHandle,
}

impl Selection {
    pub fn range(&self) -> (f64, f64) {
        (self.start, self.end)
    }
}

/// 进行中的候选选区：锚点固定，`head` 跟随游标。
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub anchor: f64,
    pub head: f64,
    pub handle: VisualHandle,
}

impl Candidate {
    /// 归一化端点，返回 `(min, max)`。
    pub fn normalized(&self) -> (f64, f64) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }
}

/// 标注模型的错误类型。
#[derive(Debug, Error)]
pub enum SelectorError {
    /// 基于索引的删除收到无效索引。
    #[error("索引 {index} 超出范围（共 {len} 项）")]
    OutOfRange { index: usize, len: usize },

    /// 构造参数无效。
    #[error("无效配置：{0}")]
    InvalidConfiguration(String),
}
