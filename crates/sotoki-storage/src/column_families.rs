//! RocksDB column family definitions.
//!
//! The two logical relations of the tuple store live in two column families
//! of one database, so a single write batch covers both.
//!
//! | Name | Purpose | Key Format | Optimization |
//! |------|---------|------------|--------------|
//! | tuples | Primary relation | (entity ns, entity local, attr ns, attr field) | Bloom filter, cache |
//! | tuples_index | Secondary index | (attr ns, attr field, kind, packed value, entity ns, entity local) | Cache |
//!
//! Both families share one LRU block cache.

use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options};

/// Column family name constants.
pub mod cf_names {
    /// Primary relation: (entity, attribute) -> (kind, packed value).
    pub const TUPLES: &str = "tuples";

    /// Secondary index: (attribute, kind, value, entity) -> backpointer.
    pub const TUPLES_INDEX: &str = "tuples_index";

    /// All column family names.
    pub const ALL: &[&str] = &[TUPLES, TUPLES_INDEX];
}

/// Options for the primary relation.
///
/// Reads are either point lookups (index maintenance) or short forward scans
/// over one entity, so bloom filters plus block cache pay off.
pub fn tuples_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
    opts.create_if_missing(true);

    opts
}

/// Options for the secondary index.
///
/// Keys have variable-length leading components, so there is no fixed prefix
/// extractor; scans rely on seek plus the component comparator.
pub fn index_options(cache: &Cache) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_cache_index_and_filter_blocks(true);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
    opts.create_if_missing(true);

    opts
}

/// Descriptors for every column family, sharing `cache`.
pub fn get_column_family_descriptors(cache: &Cache) -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(cf_names::TUPLES, tuples_options(cache)),
        ColumnFamilyDescriptor::new(cf_names::TUPLES_INDEX, index_options(cache)),
    ]
}
