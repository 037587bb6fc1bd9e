//! The stream registry
//!
//! Nine resources of the Customer.io App API, in the order they are listed
//! and read.

use super::descriptor::{Paging, ResourceDescriptor};
use crate::decode::ResponseShape;
use crate::engine::{ChildStream, HttpStream, RecordSource, SourceContext};
use crate::error::{Error, Result};
use crate::partition::ParentLink;
use std::sync::Arc;

const BROADCAST_PARENT: ParentLink = ParentLink {
    stream: "broadcasts",
    parent_key: "id",
    partition_field: "broadcast_id",
};

const CAMPAIGN_PARENT: ParentLink = ParentLink {
    stream: "campaigns",
    parent_key: "id",
    partition_field: "campaign_id",
};

const fn independent(
    name: &'static str,
    path: &'static str,
    envelope: &'static str,
    paging: Paging,
) -> ResourceDescriptor {
    ResourceDescriptor {
        name,
        primary_key: "id",
        path,
        shape: ResponseShape::Envelope(envelope),
        paging,
        parent: None,
    }
}

// Per-parent endpoints answer with one bare object and are never paged
const fn dependent(name: &'static str, path: &'static str, parent: ParentLink) -> ResourceDescriptor {
    ResourceDescriptor {
        name,
        primary_key: "id",
        path,
        shape: ResponseShape::Object,
        paging: Paging::Unpaged,
        parent: Some(parent),
    }
}

/// All resources, in registry order
pub static DESCRIPTORS: [ResourceDescriptor; 9] = [
    independent("activities", "activities", "activities", Paging::Token),
    independent("broadcasts", "broadcasts", "broadcasts", Paging::Unpaged),
    dependent(
        "broadcast_metrics",
        "broadcasts/{{ partition.broadcast_id }}/metrics",
        BROADCAST_PARENT,
    ),
    dependent(
        "broadcast_metrics_links",
        "broadcasts/{{ partition.broadcast_id }}/metrics/links",
        BROADCAST_PARENT,
    ),
    dependent(
        "broadcast_actions",
        "broadcasts/{{ partition.broadcast_id }}/actions",
        BROADCAST_PARENT,
    ),
    independent("campaigns", "campaigns", "campaigns", Paging::Unpaged),
    dependent(
        "campaign_metrics",
        "campaigns/{{ partition.campaign_id }}/metrics",
        CAMPAIGN_PARENT,
    ),
    dependent(
        "campaign_metrics_links",
        "campaigns/{{ partition.campaign_id }}/metrics/links",
        CAMPAIGN_PARENT,
    ),
    dependent(
        "campaign_actions",
        "campaigns/{{ partition.campaign_id }}/actions",
        CAMPAIGN_PARENT,
    ),
];

/// Look up a resource by stream name
pub fn descriptor(name: &str) -> Option<&'static ResourceDescriptor> {
    DESCRIPTORS.iter().find(|d| d.name == name)
}

/// Stream names in registry order
pub fn stream_names() -> impl Iterator<Item = &'static str> {
    DESCRIPTORS.iter().map(|d| d.name)
}

/// Build all nine streams over one shared context
///
/// Dependent streams reuse the parent instance built earlier in the list,
/// so each read of a child re-reads its parent from the API.
pub fn build_streams(context: &Arc<SourceContext>) -> Result<Vec<Arc<dyn RecordSource>>> {
    let mut streams: Vec<Arc<dyn RecordSource>> = Vec::with_capacity(DESCRIPTORS.len());

    for descriptor in DESCRIPTORS {
        let stream: Arc<dyn RecordSource> = match descriptor.parent {
            None => Arc::new(HttpStream::new(descriptor, Arc::clone(context))?),
            Some(link) => {
                let parent = streams
                    .iter()
                    .find(|s| s.name() == link.stream)
                    .cloned()
                    .ok_or_else(|| Error::StreamNotFound {
                        stream: link.stream.to_string(),
                    })?;
                Arc::new(ChildStream::new(descriptor, Arc::clone(context), parent)?)
            }
        };
        streams.push(stream);
    }

    Ok(streams)
}
