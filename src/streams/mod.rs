//! Stream registry
//!
//! Every resource is described by a static `ResourceDescriptor`: its name,
//! path, response shape, paging policy and, for dependent resources, the
//! parent it is read through. The engine turns descriptors into streams.

mod descriptor;
mod registry;

pub use descriptor::{Paging, ResourceDescriptor};
pub use registry::{build_streams, descriptor, stream_names, DESCRIPTORS};
