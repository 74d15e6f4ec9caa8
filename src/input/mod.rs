//! Sample input: the double-buffered byte reader and the line-level stream.

mod line;
mod reader;

pub use line::LineStream;
pub use reader::SampleReader;
