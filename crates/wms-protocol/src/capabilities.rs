//! WMS GetCapabilities document.
//!
//! The proxy advertises a single service entry pointing back at itself;
//! layer discovery stays with the upstream MapServer.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use wms_common::WmsResult;

use crate::xml_error;

/// MIME type of a WMS 1.1.1 capabilities document.
pub const CAPABILITIES_CONTENT_TYPE: &str = "application/vnd.ogc.wms_xml";

pub const SERVICE_TITLE: &str = "ArcGIS REST to WMS Proxy";

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Build the capabilities document with `base_url` as the online resource.
pub fn build_capabilities_xml(base_url: &str) -> WmsResult<String> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("WMS_Capabilities").with_attributes([("version", "1.1.1")]),
        ))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("Service")))
        .map_err(xml_error)?;

    for (tag, text) in [("Name", "WMS"), ("Title", SERVICE_TITLE)] {
        writer
            .write_event(Event::Start(BytesStart::new(tag)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new(tag)))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::Empty(
            BytesStart::new("OnlineResource")
                .with_attributes([("xmlns:xlink", XLINK_NS), ("xlink:href", base_url)]),
        ))
        .map_err(xml_error)?;

    writer
        .write_event(Event::End(BytesEnd::new("Service")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("WMS_Capabilities")))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}
