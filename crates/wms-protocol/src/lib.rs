//! OGC WMS 1.1.1 request handling and ArcGIS REST export mapping.
//!
//! Supports:
//! - WMS GetMap / GetCapabilities parameter parsing (1.1.1 and 1.3.0 keys)
//! - Service exception and capabilities documents
//! - Translation of WMS parameters into MapServer `export` parameters

use wms_common::WmsError;

pub mod capabilities;
pub mod exceptions;
pub mod export;
pub mod getmap;

pub use capabilities::{build_capabilities_xml, CAPABILITIES_CONTENT_TYPE};
pub use exceptions::{exception_for, service_exception_xml, SERVICE_EXCEPTION_CONTENT_TYPE};
pub use export::{build_export_url, ExportParams};
pub use getmap::WmsParams;

pub(crate) fn xml_error(err: impl std::fmt::Display) -> WmsError {
    WmsError::InternalError(format!("XML write error: {}", err))
}
