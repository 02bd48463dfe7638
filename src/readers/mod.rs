pub mod mapped_file;
pub mod scanner;
pub mod segmenter;
pub mod value_parser;

pub use mapped_file::MappedFile;
pub use scanner::{broadcast, find_byte, ScratchBuffer};
pub use segmenter::{FileSegment, FileSegmenter};
pub use value_parser::parse_tenths;
