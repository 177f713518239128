//! # audio_selector
//!
//! 一个用于音频波形标注的核心组件库：以游标驱动，在信号上落下
//! 点状**标记**（节拍切分点）与区间**选区**，供宿主应用的渲染层与
//! 播放层消费。组件本身不做任何绘制，渲染方通过不透明句柄协议与
//! 查询接口接入。
//!
//! ## 功能特性
//!
//! - **游标控制**：单一时间位置，始终钳制在 `[0, duration]` 内
//! - **有序标记**：二分插入、严格升序、按索引删除
//! - **选区归并**：提交时对重叠或包含的既有选区做确定性归并
//! - **事件路由**：封闭的输入符号集合，变更生效后按注册顺序通知观察者
//! - **分段播放**：按标记切分信号并经 rodio 顺序播放
//!
//! ## 基本使用
//!
//! ```
//! use audio_selector::{AudioSelector, InputSymbol};
//!
//! let mut selector = AudioSelector::new(10.0).unwrap();
//!
//! // 游标移动与标注
//! selector.handle_input(InputSymbol::SeekTo(1.5));
//! selector.handle_input(InputSymbol::PlaceMark);
//! assert_eq!(selector.marks(), vec![1.5]);
//!
//! // 拉出并提交一个选区
//! selector.handle_input(InputSymbol::ToggleSelection);
//! selector.handle_input(InputSymbol::SeekTo(3.0));
//! selector.handle_input(InputSymbol::ToggleSelection);
//! assert_eq!(selector.selections(), vec![(1.5, 3.0)]);
//! ```
//!
//! ## 集成到宿主应用
//!
//! ```
//! use audio_selector::{AudioSelector, InputSymbol};
//!
//! let mut selector = AudioSelector::new(60.0).unwrap();
//!
//! // 注册观察者
//! selector.on_create_mark(|index, times| {
//!     log::info!("新标记 #{}，当前共 {} 个", index, times.len());
//! });
//! selector.on_create_selection(|start, end| {
//!     log::info!("新选区 [{:.3}, {:.3}]", start, end);
//! });
//!
//! // 宿主事件循环中：把翻译好的输入符号喂给路由器
//! selector.handle_input(InputSymbol::StepForward);
//! ```

pub mod structure;
pub mod visual;
pub mod cursor;
pub mod marks;
pub mod selection;
pub mod editor;
pub mod selector;
pub mod audio;

pub use audio::{
    segment_bounds, NullPlayback, PlaybackBackend, SegmentEngine, SegmentEngineConfig,
};
pub use cursor::CursorController;
pub use editor::{InputSymbol, SelectorOptions};
pub use marks::MarkRegistry;
pub use selection::SelectionManager;
pub use selector::AudioSelector;
pub use structure::{Candidate, Mark, Selection, SelectorError};
pub use visual::{NullVisual, VisualBackend, VisualHandle};
