use core::future::Future;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeatureSupport {
    #[default]
    Unknown,
    Supported,
    NotSupported,
}

/// Lazily queried, sticky support flag of an optional vendor extension.
#[derive(Debug, Clone)]
pub struct Feature {
    name: &'static str,
    support: FeatureSupport,
}

impl Feature {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            support: FeatureSupport::Unknown,
        }
    }

    pub fn get(&self) -> FeatureSupport {
        self.support
    }

    pub fn is_supported(&self) -> bool {
        self.support == FeatureSupport::Supported
    }

    /// Resolve the feature, running `query` only while it is unknown.
    ///
    /// A query error (timeout included) resolves to `NotSupported` and is
    /// never returned to the caller.
    pub async fn resolve<T, F, Fut>(&mut self, query: F) -> FeatureSupport
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        self.resolve_value(query).await;
        self.support
    }

    /// Like [`resolve`](Self::resolve), but hands back the query's value when
    /// the query ran now and succeeded.
    pub async fn resolve_value<T, F, Fut>(&mut self, query: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if self.support != FeatureSupport::Unknown {
            return None;
        }

        match query().await {
            Ok(value) => {
                debug!("{} supported", self.name);
                self.support = FeatureSupport::Supported;
                Some(value)
            }
            Err(_e) => {
                debug!("{} unsupported: {}", self.name, _e);
                self.support = FeatureSupport::NotSupported;
                None
            }
        }
    }

    /// Without an eligible port the feature cannot be used; resolve it
    /// without querying.
    pub fn resolve_without_port(&mut self) -> FeatureSupport {
        if self.support == FeatureSupport::Unknown {
            debug!("{} unsupported: no eligible port", self.name);
            self.support = FeatureSupport::NotSupported;
        }
        self.support
    }
}
