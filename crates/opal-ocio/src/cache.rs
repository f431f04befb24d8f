//! Thread-safe processor caching.
//!
//! ```
//! use opal_ocio::{ColorSpace, Config, ProcessorCache, Transform, TransformDirection};
//!
//! let mut config = Config::new("cache");
//! config.add_colorspace(ColorSpace::builder("linear").build())?;
//! config.add_colorspace(
//!     ColorSpace::builder("gamma")
//!         .to_reference(Transform::exponent([2.2, 2.2, 2.2, 1.0]))
//!         .build(),
//! )?;
//!
//! let cache = ProcessorCache::new();
//! let a = cache.get_or_create(&config, "gamma", "linear", "", TransformDirection::Forward)?;
//! let b = cache.get_or_create(&config, "gamma", "linear", "", TransformDirection::Forward)?;
//! assert_eq!(a.cache_id(), b.cache_id());
//! assert_eq!(cache.len(), 1);
//! # Ok::<(), opal_ocio::OcioError>(())
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::{trace, warn};

use crate::config::Config;
use crate::error::OcioResult;
use crate::processor::Processor;
use crate::transform::TransformDirection;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    src: String,
    dst: String,
    looks: String,
    direction: TransformDirection,
}

/// Compiled processors keyed by `(config revision, src, dst, looks, direction)`.
///
/// One cache may serve several configs. Editing a config gives it a new
/// [`Config::revision`], so later lookups compile afresh; entries for old
/// revisions stay until [`Self::clear`]. Processors with dynamic properties
/// are never stored: each caller gets its own slots.
#[derive(Debug, Default)]
pub struct ProcessorCache {
    cache: RwLock<HashMap<CacheKey, Processor>>,
}

impl ProcessorCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached processor or compiles and stores a new one.
    pub fn get_or_create(
        &self,
        config: &Config,
        src: &str,
        dst: &str,
        looks: &str,
        direction: TransformDirection,
    ) -> OcioResult<Processor> {
        let key = CacheKey {
            revision: config.revision(),
            src: src.to_string(),
            dst: dst.to_string(),
            looks: looks.to_string(),
            direction,
        };

        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.get(&key) {
                trace!(src, dst, looks, "processor cache hit");
                return Ok(hit.clone());
            }
        }

        let processor = config.processor_with_direction(src, dst, looks, direction)?;
        if processor.has_dynamic_properties() {
            warn!(src, dst, looks, "processor has dynamic properties, not caching");
            return Ok(processor);
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // another thread may have compiled the same key meanwhile
        let entry = cache.entry(key).or_insert(processor);
        Ok(entry.clone())
    }

    /// Number of cached processors.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached processor.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
