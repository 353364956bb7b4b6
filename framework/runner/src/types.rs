/// Recommended error type for a benchmark `main` function. Configuration errors convert into it so
/// you can use `?` to propagate them.
pub type GraderResult<T> = anyhow::Result<T>;
