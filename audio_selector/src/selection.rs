//! 选区管理模块
//!
//! 管理已提交选区集合与至多一个进行中的候选选区，并实现提交时的
//! 重叠归并算法。已提交集合始终保持两两不相交（允许端点相接）。

use crate::structure::{Candidate, Selection, SelectorError};
use crate::visual::VisualBackend;

/// 选区管理器。`candidate` 为 `None` 即空闲，`Some` 即有进行中的候选选区。
#[derive(Default)]
pub struct SelectionManager {
    committed: Vec<Selection>,
    candidate: Option<Candidate>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空闲时：以 `cursor` 为锚点开启候选选区。
    /// 开启时：运行提交算法，若产生新选区则返回其端点。
    pub fn toggle(&mut self, cursor: f64, visual: &mut dyn VisualBackend) -> Option<(f64, f64)> {
        match self.candidate.take() {
            None => {
                let handle = visual.create_span(cursor, cursor);
                self.candidate = Some(Candidate {
                    anchor: cursor,
                    head: cursor,
                    handle,
                });
                None
            }
            Some(candidate) => self.commit(candidate, visual),
        }
    }

    /// 游标移动时更新候选选区的跟随端点。空闲时无事发生。
    pub fn track(&mut self, x: f64, visual: &mut dyn VisualBackend) {
        if let Some(candidate) = &mut self.candidate {
            candidate.head = x;
            visual.move_span(candidate.handle, candidate.anchor, x);
        }
    }

    /// 丢弃候选选区而不提交。空闲时无事发生。
    pub fn cancel(&mut self, visual: &mut dyn VisualBackend) {
        if let Some(candidate) = self.candidate.take() {
            visual.release(candidate.handle);
        }
    }

    /// 提交算法：归一化端点后对既有选区做单次线性扫描。
    ///
    /// - 候选被某个既有选区完全包含：放弃提交，不产生任何变更；
    /// - 既有选区被候选完全包含：移除之；
    /// - 候选某一端落入既有选区内：向该侧扩展并移除之。
    ///
    /// 扫描无需在扩展后重来：进入提交时集合两两不相交，能与候选
    /// 发生交互的只有左右紧邻与被完全包含者。
    fn commit(
        &mut self,
        candidate: Candidate,
        visual: &mut dyn VisualBackend,
    ) -> Option<(f64, f64)> {
        let (mut start, mut end) = candidate.normalized();

        // 零宽候选不提交
        if start == end {
            visual.release(candidate.handle);
            return None;
        }

        let mut fresh = true;
        let mut doomed = Vec::new();
        for (i, sel) in self.committed.iter().enumerate() {
            if sel.start <= start && end <= sel.end {
                fresh = false;
                break;
            }
            if start <= sel.start && sel.end <= end {
                doomed.push(i);
            } else if sel.start <= start && start <= sel.end {
                start = sel.start;
                doomed.push(i);
            } else if sel.start <= end && end <= sel.end {
                end = sel.end;
                doomed.push(i);
            }
        }

        if !fresh {
            visual.release(candidate.handle);
            return None;
        }

        for i in doomed.into_iter().rev() {
            let sel = self.committed.remove(i);
            visual.release(sel.handle);
        }

        // 候选的可视句柄随归并后的端点转为正式选区
        visual.move_span(candidate.handle, start, end);
        self.committed.push(Selection {
            start,
            end,
            handle: candidate.handle,
        });
        Some((start, end))
    }

    /// 删除第 `index` 个选区并请求释放其可视句柄。
    pub fn delete(
        &mut self,
        index: usize,
        visual: &mut dyn VisualBackend,
    ) -> Result<(), SelectorError> {
        if index >= self.committed.len() {
            return Err(SelectorError::OutOfRange {
                index,
                len: self.committed.len(),
            });
        }
        let sel = self.committed.remove(index);
        visual.release(sel.handle);
        Ok(())
    }

    /// 所有已提交选区的端点（顺序无意义）。
    pub fn ranges(&self) -> Vec<(f64, f64)> {
        self.committed.iter().map(|s| s.range()).collect()
    }

    /// 进行中候选选区的（锚点, 跟随端点），未归一化。
    pub fn candidate(&self) -> Option<(f64, f64)> {
        self.candidate.map(|c| (c.anchor, c.head))
    }

    pub fn is_open(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::NullVisual;

    fn commit_range(mgr: &mut SelectionManager, visual: &mut NullVisual, from: f64, to: f64) {
        mgr.toggle(from, visual);
        mgr.track(to, visual);
        mgr.toggle(to, visual);
    }

    fn assert_disjoint(mgr: &SelectionManager) {
        let ranges = mgr.ranges();
        for (i, &(s1, e1)) in ranges.iter().enumerate() {
            for &(s2, e2) in &ranges[i + 1..] {
                assert!(
                    e1 <= s2 || e2 <= s1,
                    "选区 ({}, {}) 与 ({}, {}) 重叠",
                    s1,
                    e1,
                    s2,
                    e2
                );
            }
        }
    }

    #[test]
    fn test_commit_normalizes_reversed_drag() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        commit_range(&mut mgr, &mut visual, 3.0, 1.0);
        assert_eq!(mgr.ranges(), vec![(1.0, 3.0)]);
    }

    #[test]
    fn test_contained_candidate_is_discarded() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        commit_range(&mut mgr, &mut visual, 1.0, 4.0);
        mgr.toggle(2.0, &mut visual);
        mgr.track(3.0, &mut visual);
        assert_eq!(mgr.toggle(3.0, &mut visual), None);
        assert_eq!(mgr.ranges(), vec![(1.0, 4.0)]);
    }

    #[test]
    fn test_containing_candidate_absorbs_existing() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        commit_range(&mut mgr, &mut visual, 2.0, 3.0);
        commit_range(&mut mgr, &mut visual, 1.0, 4.0);
        assert_eq!(mgr.ranges(), vec![(1.0, 4.0)]);
    }

    #[test]
    fn test_overlap_extends_both_sides() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        commit_range(&mut mgr, &mut visual, 1.0, 3.0);
        commit_range(&mut mgr, &mut visual, 4.0, 6.0);
        commit_range(&mut mgr, &mut visual, 2.0, 5.0);
        assert_eq!(mgr.ranges(), vec![(1.0, 6.0)]);
    }

    #[test]
    fn test_touching_selections_merge() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        commit_range(&mut mgr, &mut visual, 1.0, 2.0);
        commit_range(&mut mgr, &mut visual, 2.0, 3.0);
        assert_eq!(mgr.ranges(), vec![(1.0, 3.0)]);
    }

    #[test]
    fn test_cancel_discards_candidate() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        mgr.toggle(1.0, &mut visual);
        mgr.track(2.0, &mut visual);
        mgr.cancel(&mut visual);
        assert!(!mgr.is_open());
        assert!(mgr.is_empty());
        // 空闲时 cancel 同样无事发生
        mgr.cancel(&mut visual);
        assert!(mgr.is_empty());
    }

    #[test]
    fn test_zero_width_candidate_never_commits() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        mgr.toggle(1.5, &mut visual);
        assert_eq!(mgr.toggle(1.5, &mut visual), None);
        assert!(mgr.is_empty());
        assert!(!mgr.is_open());
    }

    #[test]
    fn test_committed_set_stays_disjoint() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        for &(from, to) in &[
            (0.5, 1.0),
            (2.0, 2.5),
            (0.8, 2.2),
            (4.0, 5.0),
            (3.9, 4.1),
            (6.0, 6.5),
        ] {
            commit_range(&mut mgr, &mut visual, from, to);
            assert_disjoint(&mgr);
        }
        let mut ranges = mgr.ranges();
        ranges.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert_eq!(ranges, vec![(0.5, 2.5), (3.9, 5.0), (6.0, 6.5)]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut visual = NullVisual::default();
        let mut mgr = SelectionManager::new();
        commit_range(&mut mgr, &mut visual, 1.0, 2.0);
        assert!(mgr.delete(0, &mut visual).is_ok());
        assert!(matches!(
            mgr.delete(0, &mut visual),
            Err(SelectorError::OutOfRange { index: 0, len: 0 })
        ));
    }
}
