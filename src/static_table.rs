//! HPACK static header table (RFC 7541 Appendix A).

use std::sync::OnceLock;

/// One header table entry. Static entries without a value keep `None`
/// rather than an empty string so full-indexed lookups can distinguish
/// "no value defined" from "value is empty".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderTableEntry {
    pub name: String,
    pub value: Option<String>,
}

impl HeaderTableEntry {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Octet size charged against table capacity (RFC 7541 §4.1): name
    /// length plus value length plus a fixed 32-byte overhead.
    pub fn length(&self) -> usize {
        self.name.len() + self.value.as_ref().map_or(0, String::len) + 32
    }
}

pub const STATIC_TABLE_LENGTH: usize = 61;

const ENTRIES: [(&str, Option<&str>); STATIC_TABLE_LENGTH] = [
    (":authority", None),                        // 1
    (":method", Some("GET")),                    // 2
    (":method", Some("POST")),                   // 3
    (":path", Some("/")),                        // 4
    (":path", Some("/index.html")),              // 5
    (":scheme", Some("http")),                   // 6
    (":scheme", Some("https")),                  // 7
    (":status", Some("200")),                    // 8
    (":status", Some("204")),                    // 9
    (":status", Some("206")),                    // 10
    (":status", Some("304")),                    // 11
    (":status", Some("400")),                    // 12
    (":status", Some("404")),                    // 13
    (":status", Some("500")),                    // 14
    ("accept-charset", None),                    // 15
    ("accept-encoding", Some("gzip, deflate")),  // 16
    ("accept-language", None),                   // 17
    ("accept-ranges", None),                     // 18
    ("accept", None),                            // 19
    ("access-control-allow-origin", None),       // 20
    ("age", None),                               // 21
    ("allow", None),                             // 22
    ("authorization", None),                     // 23
    ("cache-control", None),                     // 24
    ("content-disposition", None),               // 25
    ("content-encoding", None),                  // 26
    ("content-language", None),                  // 27
    ("content-length", None),                    // 28
    ("content-location", None),                  // 29
    ("content-range", None),                     // 30
    ("content-type", None),                      // 31
    ("cookie", None),                            // 32
    ("date", None),                              // 33
    ("etag", None),                              // 34
    ("expect", None),                            // 35
    ("expires", None),                           // 36
    ("from", None),                              // 37
    ("host", None),                              // 38
    ("if-match", None),                          // 39
    ("if-modified-since", None),                 // 40
    ("if-none-match", None),                     // 41
    ("if-range", None),                          // 42
    ("if-unmodified-since", None),               // 43
    ("last-modified", None),                     // 44
    ("link", None),                              // 45
    ("location", None),                          // 46
    ("max-forwards", None),                      // 47
    ("proxy-authenticate", None),                // 48
    ("proxy-authorization", None),               // 49
    ("range", None),                             // 50
    ("referer", None),                           // 51
    ("refresh", None),                           // 52
    ("retry-after", None),                       // 53
    ("server", None),                            // 54
    ("set-cookie", None),                        // 55
    ("strict-transport-security", None),         // 56
    ("transfer-encoding", None),                 // 57
    ("user-agent", None),                        // 58
    ("vary", None),                              // 59
    ("via", None),                               // 60
    ("www-authenticate", None),                  // 61
];

fn table() -> &'static [HeaderTableEntry] {
    static TABLE: OnceLock<Vec<HeaderTableEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ENTRIES
            .iter()
            .map(|(name, value)| HeaderTableEntry::new(*name, value.map(str::to_owned)))
            .collect()
    })
}

/// Look up a static entry by its 1-based HPACK index.
pub fn entry(index: usize) -> Option<&'static HeaderTableEntry> {
    if (1..=STATIC_TABLE_LENGTH).contains(&index) {
        Some(&table()[index - 1])
    } else {
        None
    }
}

/// Find the static entry matching both name and value. 1-based index.
pub fn find_entry(name: &str, value: Option<&str>) -> Option<usize> {
    table()
        .iter()
        .position(|e| e.name == name && e.value.as_deref() == value)
        .map(|i| i + 1)
}

/// Find the first static entry matching the name alone. 1-based index.
pub fn find_name(name: &str) -> Option<usize> {
    table()
        .iter()
        .position(|e| e.name == name)
        .map(|i| i + 1)
}
