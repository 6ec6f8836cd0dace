//! Minimal HTTP/1.1 plumbing: request reader, response writer, form
//! decoding and cookie parsing.
//!
//! Deliberately small: one request per connection, `Connection: close` on
//! every response, bounded header and body sizes. TLS termination is an
//! external concern.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, SystemTime};

use time::OffsetDateTime;

/// Upper bound for the request line plus headers.
const MAX_HEAD_BYTES: usize = 32 * 1024;

/// Upper bound for a request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A parsed HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method, uppercase.
    pub method: String,
    /// Request path, without the query string.
    pub path: String,
    /// Raw query string (without the `?`), possibly empty.
    pub query: String,
    headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Builds a GET request; handy for handler tests and embedding.
    #[must_use]
    pub fn get(path: &str) -> HttpRequest {
        let (path, query) = split_query(path);
        HttpRequest {
            method: "GET".to_string(),
            path: path.to_string(),
            query: query.to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Builds a form-urlencoded POST request.
    #[must_use]
    pub fn post(path: &str, body: &str) -> HttpRequest {
        let (path, query) = split_query(path);
        HttpRequest {
            method: "POST".to_string(),
            path: path.to_string(),
            query: query.to_string(),
            headers: vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: body.as_bytes().to_vec(),
        }
    }

    /// Adds a header; builder-style for tests.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> HttpRequest {
        self.headers.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// The first value of a header, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The value of a cookie, if the request carries it.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.header("cookie")?;
        for pair in header.split(';') {
            let pair = pair.trim();
            if let Some((n, v)) = pair.split_once('=') {
                if n == name {
                    return Some(v.to_string());
                }
            }
        }
        None
    }

    /// The decoded form fields: the query string plus, for POST requests,
    /// the form-urlencoded body. Body fields win on duplicates.
    #[must_use]
    pub fn form(&self) -> HashMap<String, String> {
        let mut form = parse_form(&self.query);
        if self.method == "POST" {
            if let Ok(body) = std::str::from_utf8(&self.body) {
                for (k, v) in parse_form(body) {
                    form.insert(k, v);
                }
            }
        }
        form
    }

    /// A form field parsed as an integer; `-1` when missing or malformed.
    #[must_use]
    pub fn int_param(&self, form: &HashMap<String, String>, name: &str) -> i32 {
        form.get(name).and_then(|v| v.parse().ok()).unwrap_or(-1)
    }
}

/// An HTTP response under construction.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers, in order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// An empty response with the given status.
    #[must_use]
    pub fn new(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A 200 response with a `text/plain; charset=utf-8` body.
    #[must_use]
    pub fn text(body: Vec<u8>) -> HttpResponse {
        HttpResponse::new(200)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// A 200 response with a `text/html; charset=utf-8` body.
    #[must_use]
    pub fn html(body: Vec<u8>) -> HttpResponse {
        HttpResponse::new(200)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(body)
    }

    /// An error response with a short plain-text explanation.
    #[must_use]
    pub fn error(status: u16, message: &str) -> HttpResponse {
        HttpResponse::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(message.as_bytes().to_vec())
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> HttpResponse {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> HttpResponse {
        self.body = body;
        self
    }

    /// The first value of a header, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body as UTF-8 text (lossy); for tests and logging.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Reads and parses one HTTP request off the stream.
pub fn read_request(stream: &mut TcpStream) -> io::Result<HttpRequest> {
    let mut head = Vec::with_capacity(1024);
    let mut byte = [0u8; 1];

    // Read up to the blank line separating headers from the body. One byte
    // at a time is fine at this scale; the kernel buffers for us.
    while !head.ends_with(b"\r\n\r\n") {
        if head.len() >= MAX_HEAD_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "request head too large",
            ));
        }
        let n = stream.read(&mut byte)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-request",
            ));
        }
        head.push(byte[0]);
    }

    let head = String::from_utf8(head)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "non-UTF-8 request head"))?;
    let mut lines = head.split("\r\n");

    let request_line = lines
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "empty request"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing method"))?
        .to_ascii_uppercase();
    let target = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing request target"))?;
    let (path, query) = split_query(target);

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_BODY_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "request body too large",
        ));
    }

    let mut body = vec![0u8; content_length];
    stream.read_exact(&mut body)?;

    Ok(HttpRequest {
        method,
        path: path.to_string(),
        query: query.to_string(),
        headers,
        body,
    })
}

/// Writes the response and flushes. Every response closes the connection.
pub fn write_response(stream: &mut TcpStream, resp: &HttpResponse) -> io::Result<()> {
    let reason = match resp.status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "",
    };

    let mut out = Vec::with_capacity(resp.body.len() + 256);
    out.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", resp.status, reason).as_bytes());
    for (name, value) in &resp.headers {
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(format!("Content-Length: {}\r\n", resp.body.len()).as_bytes());
    out.extend_from_slice(b"Connection: close\r\n\r\n");
    out.extend_from_slice(&resp.body);

    stream.write_all(&out)?;
    stream.flush()
}

fn split_query(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}

/// Decodes an `application/x-www-form-urlencoded` string.
pub(crate) fn parse_form(s: &str) -> HashMap<String, String> {
    let mut form = HashMap::new();
    for pair in s.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        form.insert(percent_decode(name), percent_decode(value));
    }
    form
}

/// Percent-decoding with `+` as space. Malformed escapes pass through
/// verbatim.
pub(crate) fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (hex_val(bytes.get(i + 1)), hex_val(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push(hi * 16 + lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: Option<&u8>) -> Option<u8> {
    match b? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Formats a time as an IMF-fixdate HTTP date, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`.
#[must_use]
pub fn http_date(t: SystemTime) -> String {
    let t = OffsetDateTime::from(t);
    let weekday = match t.weekday() {
        time::Weekday::Monday => "Mon",
        time::Weekday::Tuesday => "Tue",
        time::Weekday::Wednesday => "Wed",
        time::Weekday::Thursday => "Thu",
        time::Weekday::Friday => "Fri",
        time::Weekday::Saturday => "Sat",
        time::Weekday::Sunday => "Sun",
    };
    let month = match t.month() {
        time::Month::January => "Jan",
        time::Month::February => "Feb",
        time::Month::March => "Mar",
        time::Month::April => "Apr",
        time::Month::May => "May",
        time::Month::June => "Jun",
        time::Month::July => "Jul",
        time::Month::August => "Aug",
        time::Month::September => "Sep",
        time::Month::October => "Oct",
        time::Month::November => "Nov",
        time::Month::December => "Dec",
    };
    format!(
        "{weekday}, {:02} {month} {} {:02}:{:02}:{:02} GMT",
        t.day(),
        t.year(),
        t.hour(),
        t.minute(),
        t.second()
    )
}

/// The HTTP date 72 hours from now, for `Expires` headers of the bundled
/// static resources.
#[must_use]
pub fn expires_in_72h() -> String {
    http_date(SystemTime::now() + Duration::from_secs(72 * 60 * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_decoding() {
        let form = parse_form("et=0&cid=5&cval=a%2Cb+c&empty=");
        assert_eq!(form["et"], "0");
        assert_eq!(form["cid"], "5");
        assert_eq!(form["cval"], "a,b c");
        assert_eq!(form["empty"], "");
        assert!(!form.contains_key("missing"));
    }

    #[test]
    fn percent_decode_edge_cases() {
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("a+b"), "a b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%41"), "A");
    }

    #[test]
    fn cookies() {
        let req = HttpRequest::get("/x").with_header("Cookie", "a=1; gwu-sessid=abc22; b=2");
        assert_eq!(req.cookie("gwu-sessid").as_deref(), Some("abc22"));
        assert_eq!(req.cookie("a").as_deref(), Some("1"));
        assert_eq!(req.cookie("nope"), None);
    }

    #[test]
    fn post_body_overrides_query() {
        let req = HttpRequest::post("/w/e?et=9", "et=0&cid=5");
        let form = req.form();
        assert_eq!(form["et"], "0");
        assert_eq!(form["cid"], "5");
    }

    #[test]
    fn http_date_format() {
        let date = http_date(SystemTime::UNIX_EPOCH);
        assert_eq!(date, "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn int_params() {
        let req = HttpRequest::post("/w/e", "et=11&cid=9");
        let form = req.form();
        assert_eq!(req.int_param(&form, "et"), 11);
        assert_eq!(req.int_param(&form, "mx"), -1);
    }
}
