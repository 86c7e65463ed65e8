//! Edge and vertex predicates.
//!
//! Filters are plain values wrapping a shared predicate. They compose with
//! the [`and`] and [`or`] combinators:
//!
//! ```
//! use pvmodel::traversal::filter::{and, or, keep_name, keep_process_variables, keep_directories};
//! let f = and(or(keep_process_variables(), keep_directories()), keep_name("x"));
//! # let _ = f;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::model::{EdgeKind, EdgeProperties, VertexKind, VertexProperties};

/// A composable predicate.
pub trait Filter: Clone + Send + Sync + 'static {
    type Item: ?Sized;

    fn keep(&self, item: &Self::Item) -> bool;

    fn from_predicate(predicate: impl Fn(&Self::Item) -> bool + Send + Sync + 'static) -> Self;
}

/// Keeps what both filters keep.
pub fn and<F: Filter>(a: F, b: F) -> F {
    F::from_predicate(move |item| a.keep(item) && b.keep(item))
}

/// Keeps what either filter keeps.
pub fn or<F: Filter>(a: F, b: F) -> F {
    F::from_predicate(move |item| a.keep(item) || b.keep(item))
}

// ============================================================================
// EdgeFilter
// ============================================================================

#[derive(Clone)]
pub struct EdgeFilter(Arc<dyn Fn(&EdgeProperties) -> bool + Send + Sync>);

impl EdgeFilter {
    pub fn keep_all() -> Self {
        Self::from_predicate(|_| true)
    }

    pub fn kind(kind: EdgeKind) -> Self {
        Self::from_predicate(move |e| e.kind == kind)
    }
}

impl Filter for EdgeFilter {
    type Item = EdgeProperties;

    fn keep(&self, item: &EdgeProperties) -> bool {
        (self.0)(item)
    }

    fn from_predicate(predicate: impl Fn(&EdgeProperties) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }
}

impl Default for EdgeFilter {
    fn default() -> Self {
        Self::keep_all()
    }
}

impl fmt::Debug for EdgeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EdgeFilter(..)")
    }
}

pub fn keep_pv_access() -> EdgeFilter {
    EdgeFilter::kind(EdgeKind::PvAccess)
}

pub fn keep_ownership() -> EdgeFilter {
    EdgeFilter::kind(EdgeKind::Ownership)
}

pub fn keep_parenthood() -> EdgeFilter {
    EdgeFilter::kind(EdgeKind::Parenthood)
}

pub fn keep_neighbourhood() -> EdgeFilter {
    EdgeFilter::kind(EdgeKind::Neighbourhood)
}

pub fn keep_trigger() -> EdgeFilter {
    EdgeFilter::kind(EdgeKind::Trigger)
}

// ============================================================================
// VertexFilter
// ============================================================================

#[derive(Clone)]
pub struct VertexFilter(Arc<dyn Fn(&VertexProperties) -> bool + Send + Sync>);

impl VertexFilter {
    pub fn keep_all() -> Self {
        Self::from_predicate(|_| true)
    }

    pub fn kind(kind: VertexKind) -> Self {
        Self::from_predicate(move |v| v.kind() == kind)
    }
}

impl Filter for VertexFilter {
    type Item = VertexProperties;

    fn keep(&self, item: &VertexProperties) -> bool {
        (self.0)(item)
    }

    fn from_predicate(predicate: impl Fn(&VertexProperties) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }
}

impl Default for VertexFilter {
    fn default() -> Self {
        Self::keep_all()
    }
}

impl fmt::Debug for VertexFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VertexFilter(..)")
    }
}

pub fn keep_root() -> VertexFilter {
    VertexFilter::kind(VertexKind::Root)
}

pub fn keep_module_groups() -> VertexFilter {
    VertexFilter::kind(VertexKind::ModuleGroup)
}

pub fn keep_application_modules() -> VertexFilter {
    VertexFilter::kind(VertexKind::ApplicationModule)
}

pub fn keep_variable_groups() -> VertexFilter {
    VertexFilter::kind(VertexKind::VariableGroup)
}

pub fn keep_device_modules() -> VertexFilter {
    VertexFilter::kind(VertexKind::DeviceModule)
}

pub fn keep_process_variables() -> VertexFilter {
    VertexFilter::kind(VertexKind::ProcessVariable)
}

pub fn keep_directories() -> VertexFilter {
    VertexFilter::kind(VertexKind::Directory)
}

/// Vertices with exactly this name. Root and device modules never match.
pub fn keep_name(name: impl Into<String>) -> VertexFilter {
    let name = name.into();
    VertexFilter::from_predicate(move |v| v.name() == Some(name.as_str()))
}

/// Process variables carrying `tag`.
pub fn keep_tag(tag: impl Into<String>) -> VertexFilter {
    let tag = tag.into();
    VertexFilter::from_predicate(move |v| v.tags().is_some_and(|tags| tags.contains(&tag)))
}
