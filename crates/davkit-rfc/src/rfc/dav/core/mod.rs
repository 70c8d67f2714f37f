//! `WebDAV` XML types.
//!
//! Qualified names, namespace tables, the owned element tree and the
//! structural multistatus representation.

mod depth;
mod element;
pub mod href;
mod multistatus;
pub mod namespace;
mod status;

pub use depth::Depth;
pub use element::{XmlElement, XmlNode};
pub use href::Href;
pub use multistatus::{Multistatus, Propstat, ResponseElement};
pub use namespace::{
    CALDAV_NS, CARDDAV_NS, CS_NS, DAV_NS, Namespace, NamespaceRegistry, QName, dav_names,
};
pub use status::Status;
