/// Status code of a `207 Multi-Status` response, the only success code for
/// `PROPFIND` and `REPORT`.
pub const SC_MULTI_STATUS: u16 = 207;

/// Content type sent with XML request bodies.
pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Content type used when storing XML documents with `PUT`.
pub const XML_DOCUMENT_CONTENT_TYPE: &str = "application/xml";

pub const CRATE_NAME: &str = "davkit";
pub const DEFAULT_USER_AGENT: &str =
    const_str::concat!(CRATE_NAME, "/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
