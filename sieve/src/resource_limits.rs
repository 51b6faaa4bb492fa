/// Resource limits to keep pathological expressions from exhausting the host
///
/// These limits protect against malicious inputs while being generous enough
/// for all legitimate rule sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum size of a single expression text in bytes
    /// Real usage: ~100 bytes, Limit: 64KB
    pub max_expression_bytes: usize,

    /// Maximum expression nesting depth
    /// Real usage: ~3 levels, Limit: 100 (30x+)
    pub max_expression_depth: usize,

    /// Maximum nesting of composite operation calls
    /// Real usage: 1-2 levels, Limit: 32
    pub max_call_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_expression_bytes: 64 * 1024, // 64 KB
            max_expression_depth: 100,
            max_call_depth: 32,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
