pub mod codec;
pub mod concat;
pub mod parallel;
pub mod partial;
pub mod plan;
pub mod sink;

pub use codec::CodecOptions;
pub use concat::ConcatAggregator;
pub use partial::{ConcatPartial, GroupKey};
pub use plan::ConcatSpec;
pub use sink::{ConcatSink, RowSink};
