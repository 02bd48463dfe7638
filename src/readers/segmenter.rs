use crate::utils::constants::LINE_TERMINATOR;

/// Half-open byte range `[start, end)` of the mapped input owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSegment {
    pub start: usize,
    pub end: usize,
}

impl FileSegment {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits the input into line-aligned segments, one per worker.
pub struct FileSegmenter {
    segment_count: usize,
}

impl FileSegmenter {
    pub fn new(segment_count: usize) -> Self {
        Self {
            segment_count: segment_count.max(1),
        }
    }

    /// Targets `i * len / count` and moves each one forward to just past the
    /// next line terminator. Segments that would be empty are dropped, so the
    /// result can be shorter than the requested count but always covers the
    /// whole input.
    pub fn segment(&self, data: &[u8]) -> Vec<FileSegment> {
        let len = data.len();
        let count = self.segment_count;

        if len < count || count == 1 {
            return vec![FileSegment::new(0, len)];
        }

        let mut segments = Vec::with_capacity(count);
        let mut start = 0;

        for i in 1..count {
            let target = i * len / count;
            if target < start {
                continue;
            }
            let boundary = match data[target..].iter().position(|&b| b == LINE_TERMINATOR) {
                Some(pos) => target + pos + 1,
                None => len,
            };
            if boundary >= len {
                break;
            }
            if boundary > start {
                segments.push(FileSegment::new(start, boundary));
                start = boundary;
            }
        }

        segments.push(FileSegment::new(start, len));
        segments
    }
}
