use derive_builder::Builder;

/// Limits and tuning knobs for a bridge search.
///
/// ```
/// use kakehashi::options::BridgeOptionsBuilder;
///
/// let options = BridgeOptionsBuilder::default()
///     .max_depth(1_000)
///     .threads(4)
///     .build()
///     .unwrap();
///
/// assert_eq!(options.max_depth, Some(1_000));
/// assert_eq!(options.threads, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(default)]
pub struct BridgeOptions {
    /// Maximum number of frames the explicit DFS stack may hold. `None` means the search is only
    /// bounded by available memory.
    #[builder(setter(strip_option))]
    pub max_depth: Option<usize>,
    /// Worker threads used when independent components are searched concurrently.
    pub threads: usize,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            threads: 1,
        }
    }
}
