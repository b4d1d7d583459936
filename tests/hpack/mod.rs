//! HPACK integration tests: RFC 7541 Appendix C conformance plus
//! malformed-input handling.

mod encoding;
