//! Execution engine module
//!
//! Pagination loop and parent-child stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `RecordSource` - anything that yields a stream of records
//! - `HttpStream` - a resource read directly from its own endpoint
//! - `ChildStream` - a resource read once per record of a parent stream
//!
//! Requests are strictly sequential: the next page is requested only after
//! every record of the current page has been yielded, and a child stream
//! finishes one parent before pulling the next parent record.

mod types;

pub use types::{RecordStream, SourceContext, SyncStats};

use crate::error::{Error, Result};
use crate::http::PageRequest;
use crate::pagination::{NextPage, PaginationState};
use crate::partition::ParentRouter;
use crate::streams::ResourceDescriptor;
use crate::template;
use async_stream::stream;
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A named source of records
pub trait RecordSource: Send + Sync {
    /// Stream name
    fn name(&self) -> &str;

    /// Primary key field of every record
    fn primary_key(&self) -> &str;

    /// Start reading; nothing is requested until the stream is polled
    ///
    /// Once `cancel` fires the stream yields `Error::Cancelled` and ends.
    fn read_records(&self, cancel: CancellationToken) -> RecordStream;
}

/// Run one full pagination cycle against `path`
pub fn paginate(
    context: Arc<SourceContext>,
    descriptor: ResourceDescriptor,
    path: String,
    cancel: CancellationToken,
) -> RecordStream {
    Box::pin(stream! {
        let paginator = descriptor.pagination(context.page_size).build();
        let decoder = descriptor.shape.decoder();
        let mut state = PaginationState::new();
        let mut params = paginator.initial_params();

        loop {
            if cancel.is_cancelled() {
                yield Err(Error::Cancelled);
                return;
            }

            if state.page >= context.max_pages {
                yield Err(Error::PageLimitExceeded {
                    path: path.clone(),
                    max_pages: context.max_pages,
                });
                return;
            }

            let request = match PageRequest::new(&context.base_url, &path) {
                Ok(request) => request.params(params.clone()),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            debug!("{}: requesting page {} ({})", descriptor.name, state.page + 1, request);

            let fetched = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                result = context.client.get_json(&request) => Some(result),
            };
            let body = match fetched {
                None => {
                    yield Err(Error::Cancelled);
                    return;
                }
                Some(Err(e)) => {
                    yield Err(e);
                    return;
                }
                Some(Ok(body)) => body,
            };
            context.record_page();

            let records = match decoder.decode(&body) {
                Ok(records) => records,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let next = paginator.process_response(&body, records.len(), &mut state);
            debug!("{}: page {} returned {} records", descriptor.name, state.page, records.len());

            for record in records {
                if cancel.is_cancelled() {
                    yield Err(Error::Cancelled);
                    return;
                }
                yield Ok(record);
            }

            match next {
                NextPage::Continue { query_params } => params = query_params,
                NextPage::Done => break,
            }
        }

        debug!(
            "{}: fetched {} records from {} in {} pages",
            descriptor.name, state.total_fetched, path, state.page
        );
    })
}

// ============================================================================
// Independent streams
// ============================================================================

/// A resource read from its own endpoint
pub struct HttpStream {
    descriptor: ResourceDescriptor,
    context: Arc<SourceContext>,
}

impl HttpStream {
    /// Create a stream for a resource that has no parent
    pub fn new(descriptor: ResourceDescriptor, context: Arc<SourceContext>) -> Result<Self> {
        if let Some(link) = descriptor.parent {
            return Err(Error::config(format!(
                "Stream '{}' depends on '{}' and must be built as a child stream",
                descriptor.name, link.stream
            )));
        }
        Ok(Self {
            descriptor,
            context,
        })
    }

    /// Resource descriptor
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }
}

impl RecordSource for HttpStream {
    fn name(&self) -> &str {
        self.descriptor.name
    }

    fn primary_key(&self) -> &str {
        self.descriptor.primary_key
    }

    fn read_records(&self, cancel: CancellationToken) -> RecordStream {
        info!("Starting sync for stream: {}", self.descriptor.name);
        paginate(
            Arc::clone(&self.context),
            self.descriptor,
            self.descriptor.path.to_string(),
            cancel,
        )
    }
}

// ============================================================================
// Dependent streams
// ============================================================================

/// A resource read once per record of a parent stream
///
/// Child records are emitted grouped by parent, in parent order. Any error
/// from the parent, a parent record without a key, or a failed child
/// request ends the stream.
pub struct ChildStream {
    descriptor: ResourceDescriptor,
    context: Arc<SourceContext>,
    parent: Arc<dyn RecordSource>,
    router: ParentRouter,
}

impl ChildStream {
    /// Create a dependent stream over an already-built parent
    pub fn new(
        descriptor: ResourceDescriptor,
        context: Arc<SourceContext>,
        parent: Arc<dyn RecordSource>,
    ) -> Result<Self> {
        let link = descriptor.parent.ok_or_else(|| {
            Error::config(format!("Stream '{}' has no parent stream", descriptor.name))
        })?;

        if link.stream != parent.name() {
            return Err(Error::config(format!(
                "Stream '{}' expects parent '{}', got '{}'",
                descriptor.name,
                link.stream,
                parent.name()
            )));
        }

        Ok(Self {
            router: ParentRouter::from_link(descriptor.name, &link),
            descriptor,
            context,
            parent,
        })
    }

    /// Resource descriptor
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }
}

impl RecordSource for ChildStream {
    fn name(&self) -> &str {
        self.descriptor.name
    }

    fn primary_key(&self) -> &str {
        self.descriptor.primary_key
    }

    fn read_records(&self, cancel: CancellationToken) -> RecordStream {
        let descriptor = self.descriptor;
        let context = Arc::clone(&self.context);
        let parent = Arc::clone(&self.parent);
        let router = self.router.clone();

        Box::pin(stream! {
            info!(
                "Starting partitioned sync for stream: {} (parent: {})",
                descriptor.name,
                parent.name()
            );

            let mut parents = parent.read_records(cancel.clone());
            let mut partitions = 0u64;

            while let Some(parent_record) = parents.next().await {
                let parent_record = match parent_record {
                    Ok(record) => record,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let partition = match router.partition_for(&parent_record) {
                    Ok(partition) => partition,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let path = match template::render(descriptor.path, &partition.context()) {
                    Ok(path) => path,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };
                debug!("{}: processing partition {}", descriptor.name, partition.id);

                let mut children =
                    paginate(Arc::clone(&context), descriptor, path, cancel.clone());
                while let Some(child) = children.next().await {
                    let failed = child.is_err();
                    yield child;
                    if failed {
                        return;
                    }
                }
                partitions += 1;
            }

            info!(
                "Completed partitioned sync for {}: {} partitions",
                descriptor.name, partitions
            );
        })
    }
}
