//! 标记管理模块
//!
//! 维护按时间严格升序的标记序列。索引不是稳定身份：删除一个标记后，
//! 其后所有标记隐式重新编号，序列本身就是唯一事实来源。

use crate::structure::{Mark, SelectorError};
use crate::visual::VisualBackend;

/// 有序标记集合。
#[derive(Default)]
pub struct MarkRegistry {
    marks: Vec<Mark>,
}

impl MarkRegistry {
    pub fn new() -> Self {
        Self { marks: Vec::new() }
    }

    /// 在 `at` 处插入标记，二分查找插入位置，返回最终索引。
    ///
    /// 完全相同的时间已有标记时不做任何事，直接返回既有索引。
    pub fn create(&mut self, at: f64, visual: &mut dyn VisualBackend) -> usize {
        let index = self.marks.partition_point(|m| m.time < at);
        if let Some(mark) = self.marks.get(index) {
            if mark.time == at {
                log::debug!("{} 秒处已有标记（索引 {}），忽略重复插入", at, index);
                return index;
            }
        }
        let handle = visual.create_mark(at);
        self.marks.insert(index, Mark { time: at, handle });
        index
    }

    /// 删除第 `index` 个标记并请求释放其可视句柄。
    pub fn delete(
        &mut self,
        index: usize,
        visual: &mut dyn VisualBackend,
    ) -> Result<(), SelectorError> {
        if index >= self.marks.len() {
            return Err(SelectorError::OutOfRange {
                index,
                len: self.marks.len(),
            });
        }
        let mark = self.marks.remove(index);
        visual.release(mark.handle);
        Ok(())
    }

    /// 所有标记时间，升序。
    pub fn times(&self) -> Vec<f64> {
        self.marks.iter().map(|m| m.time).collect()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::NullVisual;

    #[test]
    fn test_create_keeps_strict_ascending_order() {
        let mut visual = NullVisual::default();
        let mut registry = MarkRegistry::new();
        for &t in &[0.4, 0.1, 0.9, 0.25, 0.6] {
            registry.create(t, &mut visual);
        }
        assert_eq!(registry.times(), vec![0.1, 0.25, 0.4, 0.6, 0.9]);
    }

    #[test]
    fn test_create_returns_insertion_index() {
        let mut visual = NullVisual::default();
        let mut registry = MarkRegistry::new();
        assert_eq!(registry.create(0.5, &mut visual), 0);
        assert_eq!(registry.create(0.2, &mut visual), 0);
        assert_eq!(registry.create(0.8, &mut visual), 2);
        assert_eq!(registry.create(0.6, &mut visual), 2);
    }

    #[test]
    fn test_duplicate_time_is_ignored() {
        let mut visual = NullVisual::default();
        let mut registry = MarkRegistry::new();
        assert_eq!(registry.create(0.5, &mut visual), 0);
        assert_eq!(registry.create(0.5, &mut visual), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_delete_renumbers_following_marks() {
        let mut visual = NullVisual::default();
        let mut registry = MarkRegistry::new();
        for &t in &[0.1, 0.2, 0.3] {
            registry.create(t, &mut visual);
        }
        registry.delete(1, &mut visual).unwrap();
        assert_eq!(registry.times(), vec![0.1, 0.3]);
        // 后续插入按新的编号计算索引
        assert_eq!(registry.create(0.25, &mut visual), 1);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut visual = NullVisual::default();
        let mut registry = MarkRegistry::new();
        registry.create(0.5, &mut visual);
        assert!(matches!(
            registry.delete(1, &mut visual),
            Err(SelectorError::OutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(
            MarkRegistry::new().delete(0, &mut visual),
            Err(SelectorError::OutOfRange { .. })
        ));
    }
}
