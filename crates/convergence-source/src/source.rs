/// Anything that can report the newest profit percentage.
///
/// Calls are synchronous: the job issues one query per tick and waits for it.
pub trait PercentSource: Send + Sync {
    /// Short identifier used in log lines.
    fn name(&self) -> &str;

    /// Latest value, or `None` when the query produced no usable row.
    fn latest(&self) -> crate::Result<Option<f64>>;

    /// Up to `limit` most recent values, oldest first.
    ///
    /// Used once at start-up to seed the window. Sources without history
    /// return an empty vector.
    fn history(&self, limit: usize) -> crate::Result<Vec<f64>> {
        let _ = limit;
        Ok(Vec::new())
    }
}
