use super::syntax::SyntaxNode;

/// Default cap on summary candidates per file.
pub const MAX_SUMMARIES_PER_FILE: usize = 20;

/// Collects the summarizable nodes under `root` in source order.
///
/// Nodes are not deduplicated: two functions with the same name are two
/// candidates. An empty kind set yields nothing.
pub fn extract_nodes<N: SyntaxNode>(root: N, kinds: &[&str], max: usize) -> Vec<N> {
    if kinds.is_empty() {
        return Vec::new();
    }
    root.descendants_of_kinds(kinds, max)
}
