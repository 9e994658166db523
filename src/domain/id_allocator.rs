//! 整数 ID 分配器
//!
//! 新 ID = max(已有 ID, 历史最高 ID) + 1。
//! 记录历史最高值，删除当前最大 ID 的记录后也不会复用该 ID。

/// ID 分配器
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    high_water: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有 ID 集合初始化
    pub fn seeded(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut allocator = Self::new();
        for id in ids {
            allocator.observe(id);
        }
        allocator
    }

    /// 记录一个已存在的 ID
    pub fn observe(&mut self, id: u64) {
        self.high_water = self.high_water.max(id);
    }

    /// 分配下一个 ID
    pub fn allocate(&mut self) -> u64 {
        self.high_water += 1;
        self.high_water
    }
}
