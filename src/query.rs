//! The customized-retrieval descriptor.

use std::cmp::Ordering;

type Filter<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;
type Order<E> = Box<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

/// `None` and zero both mean "not specified".
pub(crate) fn effective(value: Option<usize>) -> Option<usize> {
    value.filter(|v| *v > 0)
}

/// A caller-supplied description of one customized retrieval: predicate
/// filter, ordering, related-data inclusion, and paging. Consumed by value,
/// once per call.
///
/// Backends apply the stages in a fixed order: filter, then inclusion,
/// then ordering, then skip, then take. The default query returns every
/// stored entity.
///
/// ```ignore
/// let recent = repo.get(
///     Query::new()
///         .filter(|post: &Post| post.published)
///         .order_by_key(|post| post.title.clone())
///         .skip(10)
///         .take(10),
/// )?;
/// ```
pub struct Query<E> {
    pub(crate) filter: Option<Filter<E>>,
    pub(crate) order: Option<Order<E>>,
    pub(crate) include: Vec<String>,
    pub(crate) skip: Option<usize>,
    pub(crate) take: Option<usize>,
}

impl<E> Default for Query<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Query<E> {
    /// An empty query: no filter, no ordering, no inclusion, no paging.
    pub fn new() -> Self {
        Query {
            filter: None,
            order: None,
            include: Vec::new(),
            skip: None,
            take: None,
        }
    }

    /// Keep only entities matching the predicate.
    pub fn filter(mut self, predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Order results with a comparator.
    pub fn order_by(mut self, compare: impl Fn(&E, &E) -> Ordering + Send + Sync + 'static) -> Self {
        self.order = Some(Box::new(compare));
        self
    }

    /// Order results by a sort key extracted from each entity.
    pub fn order_by_key<K: Ord>(self, sort_key: impl Fn(&E) -> K + Send + Sync + 'static) -> Self {
        self.order_by(move |a, b| sort_key(a).cmp(&sort_key(b)))
    }

    /// Comma-separated names of related data to eagerly materialize.
    /// Meaningful only to backends that hold related data (SQLite); the
    /// in-memory backend ignores it.
    pub fn include(mut self, names: &str) -> Self {
        self.include.extend(
            names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from),
        );
        self
    }

    /// Number of entities to skip from the start of the results.
    /// Zero means "no skip".
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Limit on the number of entities returned. Zero means "no limit".
    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    /// Paging-only query, used by `get_all`.
    pub(crate) fn page(skip: Option<usize>, take: Option<usize>) -> Self {
        let mut query = Self::new();
        query.skip = skip;
        query.take = take;
        query
    }

    /// Stage 1: the predicate filter.
    pub(crate) fn apply_filter(&self, items: &mut Vec<E>) {
        if let Some(filter) = &self.filter {
            items.retain(|item| filter(item));
        }
    }

    /// Stages 3–5: ordering, skip, take. The inclusion stage between
    /// filtering and ordering is the backend's concern.
    pub(crate) fn apply_order_and_page(&self, items: &mut Vec<E>) {
        if let Some(order) = &self.order {
            items.sort_by(|a, b| order(a, b));
        }
        if let Some(skip) = effective(self.skip) {
            let skip = skip.min(items.len());
            items.drain(..skip);
        }
        if let Some(take) = effective(self.take) {
            items.truncate(take);
        }
    }

    /// The full pipeline, for backends with no related data to include.
    pub(crate) fn apply(&self, mut items: Vec<E>) -> Vec<E> {
        self.apply_filter(&mut items);
        self.apply_order_and_page(&mut items);
        items
    }
}
