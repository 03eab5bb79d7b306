//! Response compression layer.

use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::{DefaultPredicate, Predicate, SizeAbove};

/// Smallest body worth compressing, in bytes.
const MIN_COMPRESS_BYTES: u16 = 1024;

/// Builds a gzip layer that leaves small JSON bodies alone.
pub fn build_compression_layer() -> CompressionLayer<impl Predicate> {
    CompressionLayer::new()
        .gzip(true)
        .compress_when(DefaultPredicate::new().and(SizeAbove::new(MIN_COMPRESS_BYTES)))
}
