//! Read-only projections of other stores.

use std::marker::PhantomData;
use std::sync::Arc;

use super::{Readable, Subscription};

/// A value computed from another store.
///
/// Nothing is cached: [`Readable::get`] and every notification run the
/// projection against the source's current value.
pub struct Derived<S, T, U> {
    source: S,
    project: Arc<dyn Fn(&T) -> U + Send + Sync>,
    _source_value: PhantomData<fn(&T)>,
}

impl<S: Clone, T, U> Clone for Derived<S, T, U> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            project: Arc::clone(&self.project),
            _source_value: PhantomData,
        }
    }
}

impl<S, T, U> Derived<S, T, U>
where
    S: Readable<T>,
    T: 'static,
    U: 'static,
{
    /// Project `source` through `project`.
    pub fn new<F>(source: S, project: F) -> Self
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        Self {
            source,
            project: Arc::new(project),
            _source_value: PhantomData,
        }
    }
}

impl<S, T, U> Readable<U> for Derived<S, T, U>
where
    S: Readable<T>,
    T: 'static,
    U: 'static,
{
    fn get(&self) -> U {
        (self.project)(&self.source.get())
    }

    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&U) + Send + Sync + 'static,
    {
        let project = Arc::clone(&self.project);
        self.source.subscribe(move |value| listener(&project(value)))
    }
}
