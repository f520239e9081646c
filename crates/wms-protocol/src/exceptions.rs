//! WMS 1.1.1 service exception documents.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use wms_common::{WmsError, WmsResult};

use crate::xml_error;

/// MIME type of a WMS 1.1.1 exception report.
pub const SERVICE_EXCEPTION_CONTENT_TYPE: &str = "application/vnd.ogc.se_xml";

/// Serialize a `ServiceExceptionReport` with one exception.
///
/// The message is XML-escaped.
pub fn service_exception_xml(code: &str, message: &str) -> WmsResult<String> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("ServiceExceptionReport").with_attributes([("version", "1.1.1")]),
        ))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("ServiceException").with_attributes([("code", code)]),
        ))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(message)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("ServiceException")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("ServiceExceptionReport")))
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

/// Exception report for an error, using its WMS exception code.
pub fn exception_for(err: &WmsError) -> WmsResult<String> {
    service_exception_xml(err.wms_exception_code(), &err.to_string())
}
