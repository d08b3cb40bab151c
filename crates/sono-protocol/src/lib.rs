//! Wire frames for the Sono interpreter protocol.
//!
//! Every message is a single text payload. The first line is a header tag and
//! everything after the first newline is the body, verbatim.

use std::fmt;

/// Header tag naming the purpose of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// Code to evaluate (client to server).
    Code,
    /// File request (client to server) or file contents (server to client).
    File,
    /// Console output (server to client).
    Out,
    /// Execution status (server to client).
    Status,
}

impl Header {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "CODE",
            Self::File => "FILE",
            Self::Out => "OUT",
            Self::Status => "STATUS",
        }
    }

    /// Exact, case-sensitive match on a header line.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "CODE" => Some(Self::Code),
            "FILE" => Some(Self::File),
            "OUT" => Some(Self::Out),
            "STATUS" => Some(Self::Status),
            _ => None,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a `STATUS` frame that means "running".
pub const STATUS_RUNNING: &str = "TRUE";
/// Body the server sends when execution has finished.
pub const STATUS_IDLE: &str = "FALSE";

/// Split a payload at its first newline into `(header, body)`.
///
/// A payload without a newline is all header and an empty body.
pub fn split_frame(payload: &str) -> (&str, &str) {
    payload.split_once('\n').unwrap_or((payload, ""))
}

fn encode(header: Header, body: &str) -> String {
    let mut payload = String::with_capacity(header.as_str().len() + 1 + body.len());
    payload.push_str(header.as_str());
    payload.push('\n');
    payload.push_str(body);
    payload
}

/// Frames sent by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// A command line or a whole editor buffer to run.
    Code(String),
    /// Request the contents of a named example file.
    File(String),
}

impl ClientFrame {
    pub const fn header(&self) -> Header {
        match self {
            Self::Code(_) => Header::Code,
            Self::File(_) => Header::File,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::Code(body) | Self::File(body) => body,
        }
    }

    pub fn encode(&self) -> String {
        encode(self.header(), self.body())
    }

    /// Decode a client payload, as the server sees it.
    pub fn decode(payload: &str) -> Option<Self> {
        let (header, body) = split_frame(payload);
        match Header::parse(header)? {
            Header::Code => Some(Self::Code(body.to_string())),
            Header::File => Some(Self::File(body.to_string())),
            Header::Out | Header::Status => None,
        }
    }
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Console output to append.
    Out(String),
    /// Full contents of a file pushed to the client.
    File(String),
    /// Whether previously submitted code is still executing.
    Status { running: bool },
    /// A header this client does not know. Kept so callers can log it.
    Unknown { header: String, body: String },
}

impl ServerFrame {
    pub fn decode(payload: &str) -> Self {
        let (header, body) = split_frame(payload);
        match Header::parse(header) {
            Some(Header::Out) => Self::Out(body.to_string()),
            Some(Header::File) => Self::File(body.to_string()),
            Some(Header::Status) => Self::Status {
                running: body == STATUS_RUNNING,
            },
            Some(Header::Code) | None => Self::Unknown {
                header: header.to_string(),
                body: body.to_string(),
            },
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Out(body) => encode(Header::Out, body),
            Self::File(body) => encode(Header::File, body),
            Self::Status { running } => encode(
                Header::Status,
                if *running { STATUS_RUNNING } else { STATUS_IDLE },
            ),
            Self::Unknown { header, body } => format!("{header}\n{body}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_first_newline_only() {
        assert_eq!(split_frame("OUT\na\nb\n"), ("OUT", "a\nb\n"));
        assert_eq!(split_frame("STATUS"), ("STATUS", ""));
        assert_eq!(split_frame(""), ("", ""));
    }

    #[test]
    fn test_client_frame_encoding() {
        assert_eq!(ClientFrame::Code("print(1)".into()).encode(), "CODE\nprint(1)");
        assert_eq!(ClientFrame::File("hello.so".into()).encode(), "FILE\nhello.so");
        assert_eq!(ClientFrame::Code(String::new()).encode(), "CODE\n");
    }

    #[test]
    fn test_decode_server_frames() {
        assert_eq!(
            ServerFrame::decode("OUT\nline 1\nline 2"),
            ServerFrame::Out("line 1\nline 2".into())
        );
        assert_eq!(
            ServerFrame::decode("FILE\nx = 1;\n"),
            ServerFrame::File("x = 1;\n".into())
        );
    }

    #[test]
    fn test_status_is_running_only_for_literal_true() {
        assert_eq!(
            ServerFrame::decode("STATUS\nTRUE"),
            ServerFrame::Status { running: true }
        );
        for body in ["FALSE", "true", "TRUE\n", ""] {
            let payload = format!("STATUS\n{body}");
            assert_eq!(
                ServerFrame::decode(&payload),
                ServerFrame::Status { running: false },
                "body {body:?}"
            );
        }
    }

    #[test]
    fn test_unknown_and_client_headers_are_unknown() {
        assert!(matches!(
            ServerFrame::decode("PING\n"),
            ServerFrame::Unknown { ref header, .. } if header == "PING"
        ));
        assert!(matches!(
            ServerFrame::decode("CODE\nx"),
            ServerFrame::Unknown { .. }
        ));
        assert!(matches!(
            ServerFrame::decode("out\nx"),
            ServerFrame::Unknown { .. }
        ));
    }

    #[test]
    fn test_client_decode_rejects_server_headers() {
        assert_eq!(
            ClientFrame::decode("CODE\na\nb"),
            Some(ClientFrame::Code("a\nb".into()))
        );
        assert_eq!(ClientFrame::decode("OUT\nhi"), None);
        assert_eq!(ClientFrame::decode("nonsense"), None);
    }
}
