//! 选择器主模块
//!
//! `AudioSelector` 把游标、标记与选区组合为单个标注会话：路由输入符号、
//! 在变更提交后按注册顺序通知观察者，并向宿主提供查询与删除接口。
//! 一次会话只有一个可变实例，所有操作同步完成，返回前变更已全部生效。

use crate::cursor::CursorController;
use crate::editor::{InputSymbol, SelectorOptions};
use crate::marks::MarkRegistry;
use crate::selection::SelectionManager;
use crate::structure::SelectorError;
use crate::visual::{NullVisual, VisualBackend};

type MarkObserver = Box<dyn FnMut(usize, &[f64])>;
type SelectionObserver = Box<dyn FnMut(f64, f64)>;

/// 单个标注会话的核心状态与事件入口。
pub struct AudioSelector {
    cursor: CursorController,
    marks: MarkRegistry,
    selections: SelectionManager,
    visual: Box<dyn VisualBackend>,
    options: SelectorOptions,
    mark_observers: Vec<MarkObserver>,
    selection_observers: Vec<SelectionObserver>,
}

impl AudioSelector {
    /// 以信号总时长（秒）创建标注会话。
    pub fn new(duration: f64) -> Result<Self, SelectorError> {
        Self::with_options(duration, SelectorOptions::default())
    }

    pub fn with_options(duration: f64, options: SelectorOptions) -> Result<Self, SelectorError> {
        Ok(Self {
            cursor: CursorController::new(duration)?,
            marks: MarkRegistry::new(),
            selections: SelectionManager::new(),
            visual: Box::new(NullVisual::default()),
            options,
            mark_observers: Vec::new(),
            selection_observers: Vec::new(),
        })
    }

    /// 替换渲染后端。应在开始标注前设置：既有句柄不会迁移到新后端。
    pub fn set_visual_backend(&mut self, visual: Box<dyn VisualBackend>) {
        self.visual = visual;
    }

    pub fn options(&self) -> SelectorOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SelectorOptions) {
        self.options = options;
    }

    //
    // 输入路由
    //

    /// 处理一个输入符号。
    pub fn handle_input(&mut self, symbol: InputSymbol) {
        match symbol {
            InputSymbol::StepForward => self.move_cursor_by(self.options.step_small),
            InputSymbol::StepBackward => self.move_cursor_by(-self.options.step_small),
            InputSymbol::JumpForward => self.move_cursor_by(self.options.step_large),
            InputSymbol::JumpBackward => self.move_cursor_by(-self.options.step_large),
            InputSymbol::PlaceMark => self.place_mark(),
            InputSymbol::ToggleSelection => self.toggle_selection(),
            InputSymbol::CancelSelection => self.selections.cancel(self.visual.as_mut()),
            InputSymbol::SeekTo(x) => self.move_cursor_to(x),
        }
    }

    /// 相对移动游标；进行中的候选选区的跟随端点随之更新。
    pub fn move_cursor_by(&mut self, delta: f64) {
        self.cursor.move_by(delta);
        self.selections
            .track(self.cursor.position(), self.visual.as_mut());
    }

    /// 绝对移动游标；进行中的候选选区的跟随端点随之更新。
    pub fn move_cursor_to(&mut self, x: f64) {
        self.cursor.move_to(x);
        self.selections
            .track(self.cursor.position(), self.visual.as_mut());
    }

    fn place_mark(&mut self) {
        let before = self.marks.len();
        let index = self
            .marks
            .create(self.cursor.position(), self.visual.as_mut());
        // 重复时间不产生新标记，也不通知观察者
        if self.marks.len() != before {
            let times = self.marks.times();
            for observer in &mut self.mark_observers {
                observer(index, &times);
            }
        }
    }

    fn toggle_selection(&mut self) {
        let committed = self
            .selections
            .toggle(self.cursor.position(), self.visual.as_mut());
        if let Some((start, end)) = committed {
            for observer in &mut self.selection_observers {
                observer(start, end);
            }
        }
    }

    //
    // 观察者注册
    //

    /// 注册标记创建回调，参数为新标记的索引与完整的升序时间列表。
    /// 回调在变更生效后按注册顺序同步触发。
    pub fn on_create_mark<F>(&mut self, observer: F)
    where
        F: FnMut(usize, &[f64]) + 'static,
    {
        self.mark_observers.push(Box::new(observer));
    }

    /// 注册选区创建回调，参数为归并后的选区端点。
    pub fn on_create_selection<F>(&mut self, observer: F)
    where
        F: FnMut(f64, f64) + 'static,
    {
        self.selection_observers.push(Box::new(observer));
    }

    //
    // 查询与删除
    //

    pub fn cursor(&self) -> f64 {
        self.cursor.position()
    }

    pub fn duration(&self) -> f64 {
        self.cursor.duration()
    }

    /// 所有标记时间，升序。
    pub fn marks(&self) -> Vec<f64> {
        self.marks.times()
    }

    /// 所有已提交选区（顺序无意义）。
    pub fn selections(&self) -> Vec<(f64, f64)> {
        self.selections.ranges()
    }

    /// 进行中候选选区的（锚点, 跟随端点），未归一化。
    pub fn candidate(&self) -> Option<(f64, f64)> {
        self.selections.candidate()
    }

    pub fn is_selecting(&self) -> bool {
        self.selections.is_open()
    }

    /// 删除第 `index` 个标记，其后的标记索引前移。
    pub fn delete_mark(&mut self, index: usize) -> Result<(), SelectorError> {
        self.marks.delete(index, self.visual.as_mut())
    }

    /// 删除第 `index` 个选区。
    pub fn delete_selection(&mut self, index: usize) -> Result<(), SelectorError> {
        self.selections.delete(index, self.visual.as_mut())
    }
}
