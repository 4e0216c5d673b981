/// One hit-count color bucket: the label applies when `min <= hitcount < max`.
pub type ColorBucket = (i64, i64, &'static str);

/// Ordered hit-count color buckets; the first matching bucket wins.
///
/// Hit counts outside every bucket, notably the `-1` "no data" sentinel,
/// fall back to [`DEFAULT_COLOR`].
pub const COLOR_BUCKETS: &[ColorBucket] = &[
    (0, 1, "red"),
    (1, 10, "gold"),
    (10, 30, "yellow"),
    (30, 50, "greenyellow"),
    (50, i64::MAX, "lawngreen"),
];

/// Color used when a hit count matches no bucket.
pub const DEFAULT_COLOR: &str = "red";
