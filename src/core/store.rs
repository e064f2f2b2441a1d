//! Record source trait

/// Something that can hand a list view its current dataset
///
/// Fetching, retries and caching all happen behind this trait; the view only
/// ever sees a fresh, fully loaded `Vec`.
pub trait RecordSource<R>: Send + Sync {
    /// Get all records (unfiltered, unsorted)
    fn list_all(&self) -> Vec<R>;
}

impl<R: Clone + Send + Sync> RecordSource<R> for Vec<R> {
    fn list_all(&self) -> Vec<R> {
        self.clone()
    }
}

impl<R: Clone + Send + Sync> RecordSource<R> for [R] {
    fn list_all(&self) -> Vec<R> {
        self.to_vec()
    }
}
