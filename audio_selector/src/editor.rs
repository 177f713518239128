//! 输入符号与配置模块
//!
//! 宿主把原始设备事件翻译为封闭的输入符号集合后交给路由器；
//! 未映射的原始按键应在宿主一侧丢弃并记录，不会进入模型。

use serde::{Deserialize, Serialize};

/// 路由器可接受的全部输入符号。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputSymbol {
    /// 小步前进（默认 +0.001 秒）
    StepForward,
    /// 小步后退
    StepBackward,
    /// 大步前进（默认 +0.01 秒）
    JumpForward,
    /// 大步后退
    JumpBackward,
    /// 在当前游标处落下标记
    PlaceMark,
    /// 开启或提交选区
    ToggleSelection,
    /// 放弃进行中的选区
    CancelSelection,
    /// 指针点击：游标移动到指定时间。像素到时间的换算由宿主完成。
    SeekTo(f64),
}

/// 选择器的运行配置。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorOptions {
    /// 小步长（秒）
    pub step_small: f64,
    /// 大步长（秒）
    pub step_large: f64,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            step_small: 0.001,
            step_large: 0.01,
        }
    }
}
