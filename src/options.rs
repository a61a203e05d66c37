//! Scan configuration.

/// Default input file size limit (512 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Default nesting limit for embedded objects.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options controlling a scan.
///
/// # Example
///
/// ```
/// use odsec::ScanOptions;
///
/// let options = ScanOptions::new()
///     .with_max_depth(4)
///     .with_follow_objects(false);
/// assert_eq!(options.max_depth, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Input files larger than this many bytes are refused.
    pub max_file_size: u64,

    /// Maximum nesting of embedded objects that will be followed.
    pub max_depth: usize,

    /// Follow `draw:object` references into embedded content streams.
    pub follow_objects: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            follow_objects: true,
        }
    }
}

impl ScanOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input file size limit in bytes.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the embedded object nesting limit.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enable or disable following embedded objects.
    pub fn with_follow_objects(mut self, follow: bool) -> Self {
        self.follow_objects = follow;
        self
    }
}
