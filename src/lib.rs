pub mod engine;
pub mod logging;
pub mod shared;

pub use engine::aggregate::{
    CodecOptions, ConcatAggregator, ConcatPartial, ConcatSink, ConcatSpec, GroupKey, RowSink,
};
pub use engine::errors::{ConcatError, FormatError};

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
