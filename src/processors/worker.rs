use crate::error::{ProcessingError, Result};
use crate::models::StationKey;
use crate::processors::ShardMap;
use crate::readers::scanner::{broadcast, find_byte, ScratchBuffer};
use crate::readers::{parse_tenths, FileSegment};
use crate::utils::constants::{DELIMITER, LINE_TERMINATOR, MAX_STATION_NAME_LEN};
use tracing::debug;

const DELIMITER_PATTERN: u64 = broadcast(DELIMITER);
const TERMINATOR_PATTERN: u64 = broadcast(LINE_TERMINATOR);

/// Scans one segment of the mapped input into a private [`ShardMap`].
///
/// The segment is consumed one window at a time: each window is copied into
/// the worker's scratch buffer, scanned for complete lines, and the cursor
/// moves to just past the last terminator found. Station keys borrow from
/// the mapped input, never from the scratch buffer.
pub struct SegmentWorker<'a> {
    data: &'a [u8],
    window_size: usize,
}

impl<'a> SegmentWorker<'a> {
    pub fn new(data: &'a [u8], window_size: usize) -> Self {
        Self { data, window_size }
    }

    pub fn process(&self, index: usize, segment: FileSegment) -> Result<ShardMap<'a>> {
        debug!(worker = index, start = segment.start, end = segment.end, "scanning segment");

        let mut shard = ShardMap::new();
        let mut scratch = ScratchBuffer::with_capacity(self.window_size);
        let mut position = segment.start;

        while position < segment.end {
            let window_end = segment.end.min(position + self.window_size);
            scratch.load(&self.data[position..window_end]);

            let at_segment_end = window_end == segment.end;
            let consumed = self.scan_window(&scratch, position, at_segment_end, &mut shard)?;
            if consumed == 0 {
                return Err(ProcessingError::malformed(
                    position,
                    format!("no line terminator within {} bytes", self.window_size),
                ));
            }
            position += consumed;
        }

        debug!(
            worker = index,
            records = shard.record_count(),
            stations = shard.len(),
            "segment done"
        );
        Ok(shard)
    }

    /// Aggregates every complete line in `scratch` and returns the number of
    /// bytes consumed. A trailing partial line is left for the next window
    /// unless the window ends the segment, in which case it is the final,
    /// unterminated record of the file.
    fn scan_window(
        &self,
        scratch: &ScratchBuffer,
        base: usize,
        at_segment_end: bool,
        shard: &mut ShardMap<'a>,
    ) -> Result<usize> {
        let buf = scratch.padded();
        let len = scratch.len();
        let mut line_start = 0;

        while line_start < len {
            let line_end = match find_byte(buf, line_start, TERMINATOR_PATTERN) {
                Some(pos) => pos,
                None if at_segment_end => len,
                None => break,
            };

            let delimiter = match find_byte(buf, line_start, DELIMITER_PATTERN) {
                Some(pos) if pos < line_end => pos,
                _ => {
                    return Err(ProcessingError::malformed(
                        base + line_start,
                        "missing ';' delimiter",
                    ))
                }
            };

            let name_len = delimiter - line_start;
            if name_len == 0 || name_len > MAX_STATION_NAME_LEN {
                return Err(ProcessingError::malformed(
                    base + line_start,
                    format!("station name length {} outside 1..={}", name_len, MAX_STATION_NAME_LEN),
                ));
            }

            let raw_value = &buf[delimiter + 1..line_end];
            let value = parse_tenths(raw_value).ok_or_else(|| {
                ProcessingError::malformed(
                    base + line_start,
                    format!("invalid measurement '{}'", String::from_utf8_lossy(raw_value)),
                )
            })?;

            let name = &self.data[base + line_start..base + delimiter];
            shard.update(StationKey::new(name), value);

            line_start = line_end + 1;
        }

        Ok(line_start.min(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementAggregator;

    fn whole(data: &[u8]) -> FileSegment {
        FileSegment::new(0, data.len())
    }

    #[test]
    fn test_aggregates_segment() -> Result<()> {
        let data = b"Hamburg;12.0\nHamburg;14.0\nParis;9.5\n";
        let shard = SegmentWorker::new(data, 128).process(0, whole(data))?;

        assert_eq!(shard.len(), 2);
        assert_eq!(shard.record_count(), 3);
        let hamburg = shard.get(b"Hamburg").unwrap();
        assert_eq!((hamburg.min, hamburg.max, hamburg.sum, hamburg.count), (120, 140, 260, 2));
        assert_eq!(shard.get(b"Paris"), Some(&MeasurementAggregator::new(95)));

        Ok(())
    }

    #[test]
    fn test_small_windows_match_single_window() -> Result<()> {
        let mut data = Vec::new();
        for i in 0..300 {
            let line = format!("Station-{:03};{}{}.{}\n", i % 23, if i % 3 == 0 { "-" } else { "" }, i % 97, i % 10);
            data.extend_from_slice(line.as_bytes());
        }

        let reference = SegmentWorker::new(&data, data.len()).process(0, whole(&data))?;
        for window in [24, 25, 31, 64, 100, 1000] {
            let shard = SegmentWorker::new(&data, window).process(0, whole(&data))?;
            assert_eq!(shard.len(), reference.len());
            assert_eq!(shard.record_count(), 300);
            for (key, agg) in reference.iter() {
                assert_eq!(shard.get(key.name()), Some(agg), "window {window}");
            }
        }

        Ok(())
    }

    #[test]
    fn test_sub_segment_only_sees_its_lines() -> Result<()> {
        let data = b"A;1.0\nB;2.0\nC;3.0\n";
        let shard = SegmentWorker::new(data, 128).process(1, FileSegment::new(6, 12))?;

        assert_eq!(shard.len(), 1);
        assert_eq!(shard.get(b"B"), Some(&MeasurementAggregator::new(20)));

        Ok(())
    }

    #[test]
    fn test_unterminated_final_record() -> Result<()> {
        let data = b"A;1.0\nB;-2.5";
        let shard = SegmentWorker::new(data, 8).process(0, whole(data))?;

        assert_eq!(shard.record_count(), 2);
        assert_eq!(shard.get(b"B"), Some(&MeasurementAggregator::new(-25)));

        Ok(())
    }

    #[test]
    fn test_empty_segment_yields_empty_shard() -> Result<()> {
        let shard = SegmentWorker::new(b"", 128).process(0, FileSegment::new(0, 0))?;
        assert!(shard.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_delimiter_is_fatal() {
        let data = b"A;1.0\nB 2.0\nC;3.0\n";
        let err = SegmentWorker::new(data, 128).process(0, whole(data)).unwrap_err();

        match err {
            ProcessingError::MalformedRecord { offset, .. } => assert_eq!(offset, 6),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_value_is_fatal() {
        let data = b"A;1.0\nB;2.25\n";
        let result = SegmentWorker::new(data, 128).process(0, whole(data));
        assert!(matches!(result, Err(ProcessingError::MalformedRecord { offset: 6, .. })));
    }

    #[test]
    fn test_name_length_bounds() {
        let data = b";1.0\n";
        assert!(SegmentWorker::new(data, 128).process(0, whole(data)).is_err());

        let mut data = vec![b'n'; MAX_STATION_NAME_LEN];
        data.extend_from_slice(b";1.0\n");
        assert!(SegmentWorker::new(&data, 128).process(0, whole(&data)).is_ok());

        let mut data = vec![b'n'; MAX_STATION_NAME_LEN + 1];
        data.extend_from_slice(b";1.0\n");
        assert!(SegmentWorker::new(&data, 128).process(0, whole(&data)).is_err());
    }

    #[test]
    fn test_line_longer_than_window_is_fatal() {
        let data = b"Hamburg;12.0\nA-very-long-station-name;1.0\n";
        let result = SegmentWorker::new(data, 16).process(0, whole(data));
        assert!(matches!(result, Err(ProcessingError::MalformedRecord { offset: 13, .. })));
    }
}
