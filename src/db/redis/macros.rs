/// Returns a cached value or computes, stores and returns it.
///
/// Expands inside an `async` fn returning `AppResult`: a cache hit short-cuts
/// the block, a miss awaits `$block`, propagates its error with `?` and queues
/// the value for a background write with the given TTL in seconds.
///
/// ```rust,ignore
/// let headlines: Vec<Headline> = cached!(self.cache, key, HEADLINES_CACHE_TTL, async {
///     self.fetch_upstream(&query).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
