use serde_json::Value;

/// One page of undecoded upstream records.
#[derive(Debug, Clone)]
pub struct Page {
    pub records: Vec<Value>,
    pub offset: u64,
    pub limit: usize,
}

impl Page {
    pub fn new(records: Vec<Value>, offset: u64, limit: usize) -> Self {
        Page {
            records,
            offset,
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// A short page means the upstream has nothing past it.
    pub fn reached_end(&self) -> bool {
        self.records.len() < self.limit
    }
}
