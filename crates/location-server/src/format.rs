//! Plain-text rendering of directory API responses.

use serde_json::{Map, Value};

const UNKNOWN: &str = "Unknown";
const NOT_PROVIDED: &str = "Not provided";

/// Shape of a search response.
#[derive(Debug, PartialEq)]
pub enum Listing<'a> {
    /// Request failed or the body has no `items`.
    Unavailable,
    Empty,
    Found(&'a [Value]),
}

impl<'a> Listing<'a> {
    pub fn from_response(response: Option<&'a Value>) -> Self {
        match response.and_then(|body| body.get("items")) {
            None => Listing::Unavailable,
            Some(items) if is_blank(items) => Listing::Empty,
            Some(Value::Array(items)) => Listing::Found(items),
            Some(_) => Listing::Unavailable,
        }
    }
}

/// Null, `false`, zero and empty strings, arrays or objects carry no data.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Render every location, separated by `---` lines.
pub fn format_locations(items: &[Value]) -> String {
    items
        .iter()
        .map(format_location)
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Render one location record. Absent fields show as `Unknown`.
pub fn format_location(location: &Value) -> String {
    let empty = Map::new();
    let record = location.as_object().unwrap_or(&empty);
    let address = section(record, "address").unwrap_or(&empty);
    let contact = section(record, "contact").unwrap_or(&empty);

    let field = |map: &Map<String, Value>, key: &str| scalar(map.get(key)).unwrap_or(UNKNOWN.into());
    let optional = |key: &str| scalar(contact.get(key)).unwrap_or(NOT_PROVIDED.into());
    let phone = scalar(contact.get("phone"))
        .or_else(|| scalar(record.get("contactPhone")))
        .unwrap_or(UNKNOWN.into());

    format!(
        "
Location Name: {name}
Location Code: {code}
Type: {kind}
SubType: {subtype}
Operated By: {operator}

Address: {address1},
         {city},
         {region} {postal}
Country: {country}
Coordinates: {lat}, {lon}

Contact: 
  Phone: {phone}
  Fax: {fax}
  Email: {email}

Time Zone: {tz}
Location Active: {active}
Region: {market}
",
        name = field(record, "locationName"),
        code = field(record, "locationCode"),
        kind = field(record, "locationType"),
        subtype = field(record, "locationSubType"),
        operator = field(record, "operatedBy"),
        address1 = field(address, "address1"),
        city = field(address, "city"),
        region = field(address, "stateProvinceRegion"),
        postal = field(address, "postalCode"),
        country = field(address, "country"),
        lat = field(address, "latitude"),
        lon = field(address, "longitude"),
        fax = optional("fax"),
        email = optional("email"),
        tz = field(record, "timeZone"),
        active = field(record, "locationActive"),
        market = field(record, "region"),
    )
}

fn section<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    record.get(key).and_then(Value::as_object)
}

/// Strings print bare, other scalars in JSON form. Null counts as missing.
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
