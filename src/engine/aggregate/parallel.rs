use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::engine::aggregate::codec::CodecOptions;
use crate::engine::aggregate::partial::ConcatPartial;
use crate::engine::aggregate::plan::ConcatSpec;
use crate::engine::aggregate::sink::{ConcatSink, RowSink};
use crate::engine::errors::ConcatError;
use crate::shared::config::Settings;

/// Aggregates one partition and returns its partial in wire form.
pub fn aggregate_partition(
    spec: &ConcatSpec,
    rows: &[Value],
    group_limit: Option<usize>,
    opts: &CodecOptions,
) -> Result<Vec<u8>, ConcatError> {
    let mut sink = ConcatSink::new(spec.clone()).with_group_limit(group_limit);
    for row in rows {
        sink.on_row(row)?;
    }
    Ok(sink.into_partial().to_bytes(opts))
}

/// Runs one sink per partition on the rayon pool, then decodes the shipped
/// partials and merges them on the calling thread in partition order.
/// `group_limit` caps the groups each partition's sink tracks.
pub fn aggregate_partitioned(
    spec: &ConcatSpec,
    partitions: &[Vec<Value>],
    group_limit: Option<usize>,
    opts: &CodecOptions,
) -> Result<ConcatPartial, ConcatError> {
    let blobs: Vec<Vec<u8>> = partitions
        .par_iter()
        .map(|rows| aggregate_partition(spec, rows, group_limit, opts))
        .collect::<Result<_, _>>()
        .inspect_err(|e| e.log_error())?;

    let mut merged = ConcatPartial::new(spec.clone());
    for (idx, blob) in blobs.iter().enumerate() {
        let partial = ConcatPartial::from_bytes(spec.clone(), blob, opts)
            .map_err(ConcatError::from)
            .inspect_err(|e| e.log_error())?;
        debug!(target: "group_concat::parallel", partition = idx, groups = partial.len(), bytes = blob.len(), "Merging partition");
        merged.merge(&partial);
    }
    Ok(merged)
}

/// Partitioned run with the group limit and codec options taken from `settings`.
pub fn aggregate_partitioned_with_settings(
    spec: &ConcatSpec,
    partitions: &[Vec<Value>],
    settings: &Settings,
) -> Result<ConcatPartial, ConcatError> {
    aggregate_partitioned(
        spec,
        partitions,
        settings.aggregate.group_limit,
        &CodecOptions::from_config(&settings.aggregate),
    )
}
