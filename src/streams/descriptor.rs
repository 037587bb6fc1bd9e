//! Resource descriptors

use crate::decode::ResponseShape;
use crate::pagination::PaginationConfig;
use crate::partition::ParentLink;

/// How a resource is paged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// `limit` + continuation token (`next` -> `start`)
    Token,
    /// A single request returns everything
    Unpaged,
}

/// Static description of one extractable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Stream name
    pub name: &'static str,
    /// Primary key field
    pub primary_key: &'static str,
    /// Path relative to the base URL; dependent resources use a template
    pub path: &'static str,
    /// Where the records live in the response
    pub shape: ResponseShape,
    /// Paging policy
    pub paging: Paging,
    /// Parent stream, for dependent resources
    pub parent: Option<ParentLink>,
}

impl ResourceDescriptor {
    /// Pagination config for this resource
    pub fn pagination(&self, page_size: u32) -> PaginationConfig {
        match self.paging {
            Paging::Token => PaginationConfig::token(page_size),
            Paging::Unpaged => PaginationConfig::None,
        }
    }

    /// Whether records are fetched per parent record
    pub fn is_dependent(&self) -> bool {
        self.parent.is_some()
    }
}
