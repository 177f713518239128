//! 游标控制模块

use crate::structure::SelectorError;

/// 当前游标时间位置，始终钳制在 `[0, duration]` 内。
#[derive(Clone, Copy, Debug)]
pub struct CursorController {
    position: f64,
    duration: f64,
}

impl CursorController {
    /// 创建游标控制器。`duration` 为信号总时长（秒），必须为有限正数，
    /// 此后不可变更。
    pub fn new(duration: f64) -> Result<Self, SelectorError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SelectorError::InvalidConfiguration(format!(
                "时长必须为有限正数，实际为 {}",
                duration
            )));
        }
        Ok(Self {
            position: 0.0,
            duration,
        })
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// 相对移动，结果钳制到 `[0, duration]`。
    pub fn move_by(&mut self, delta: f64) {
        self.move_to(self.position + delta);
    }

    /// 绝对移动，钳制到 `[0, duration]`。非有限的目标被忽略。
    pub fn move_to(&mut self, x: f64) {
        if !x.is_finite() {
            log::warn!("忽略非有限的游标目标：{}", x);
            return;
        }
        self.position = x.clamp(0.0, self.duration);
    }
}
