use smallvec::SmallVec;

/// Per-worker mutable state for BVH traversal.
///
/// The scene and all geometry are read-only while rendering; the traversal
/// stack and candidate list are the one piece of query-time mutable state.
/// Each parallel worker owns exactly one `QueryScratch` and passes it down
/// through every intersection call, so no state is ever shared between
/// threads or looked up from ambient thread identity.
#[derive(Clone, Debug, Default)]
pub struct QueryScratch {
    /// Depth-first traversal stack of node indices
    pub stack: SmallVec<[i32; 64]>,
    /// Triangle indices whose leaf boxes the ray hit
    pub candidates: SmallVec<[u32; 64]>,
}

impl QueryScratch {
    pub fn new() -> Self { Self::default() }
}
