use super::{ReadNpyError, TruncatedBufferError, WriteNpyError};
use byteorder::{ByteOrder, LittleEndian};
use log::{trace, warn};
use serde_json::Value as JsonValue;
use std::error::Error;
use std::fmt;

/// Magic string to indicate npy format.
pub(crate) const MAGIC_STRING: &[u8] = b"\x93NUMPY";

/// Number of bytes taken up by version number (1 byte for major version, 1
/// byte for minor version).
const VERSION_NUM_BYTES: usize = 2;

/// Number of bytes in representation of header length.
const HEADER_LEN_NUM_BYTES: usize = 2;

/// Length of everything before the header text.
pub(crate) const PREAMBLE_LEN: usize =
    MAGIC_STRING.len() + VERSION_NUM_BYTES + HEADER_LEN_NUM_BYTES;

/// The data following the header starts at a multiple of this many bytes.
pub(crate) const HEADER_ALIGN: usize = 64;

/// Format version stored after the magic string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    /// Version 1.0, the only version written by this crate.
    pub const V1_0: Version = Version { major: 1, minor: 0 };
}

impl Default for Version {
    fn default() -> Version {
        Version::V1_0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// An error in the header of an `.npy` file.
#[derive(Debug)]
pub enum ParseHeaderError {
    MagicString,
    /// Indicates that the array format string contains non-ASCII characters.
    NonAscii,
    /// The normalized header dictionary is not valid JSON.
    DictParse(serde_json::Error),
    MetaNotDict(JsonValue),
    MissingKey(&'static str),
    IllegalValue {
        key: &'static str,
        value: JsonValue,
    },
}

impl Error for ParseHeaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ParseHeaderError::*;
        match self {
            MagicString => None,
            NonAscii => None,
            DictParse(err) => Some(err),
            MetaNotDict(_) => None,
            MissingKey(_) => None,
            IllegalValue { .. } => None,
        }
    }
}

impl fmt::Display for ParseHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ParseHeaderError::*;
        match self {
            MagicString => write!(f, "bad magic: start does not match magic string"),
            NonAscii => write!(f, "malformed header: non-ascii in array format string"),
            DictParse(err) => write!(f, "malformed header: error parsing metadata dict: {}", err),
            MetaNotDict(value) => write!(f, "malformed header: metadata is not a dict: {}", value),
            MissingKey(key) => write!(f, "malformed header: missing key: {}", key),
            IllegalValue { key, value } => {
                write!(f, "malformed header: illegal value for key {}: {}", key, value)
            }
        }
    }
}

impl From<serde_json::Error> for ParseHeaderError {
    fn from(err: serde_json::Error) -> ParseHeaderError {
        ParseHeaderError::DictParse(err)
    }
}

/// Rewrites the Python dict literal of an `.npy` header into JSON.
///
/// The text is lower-cased (turning `True`/`False` into `true`/`false`),
/// tuple parentheses become array brackets, single quotes become double
/// quotes, and a comma directly followed by a closing bracket or brace is
/// dropped. Brackets and commas inside string literals are left alone.
fn normalize_dict_literal(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    // The quote character that opened the current string literal.
    let mut open_quote: Option<u8> = None;
    for (i, &byte) in bytes.iter().enumerate() {
        match (open_quote, byte) {
            (Some(quote), _) if byte == quote => {
                open_quote = None;
                out.push('"');
            }
            (Some(_), b'"') => out.push_str("\\\""),
            (Some(_), _) => out.push(char::from(byte)),
            (None, b'\'' | b'"') => {
                open_quote = Some(byte);
                out.push('"');
            }
            (None, _) => match byte {
                b'(' => out.push('['),
                b')' => out.push(']'),
                b',' => {
                    let next = bytes[i + 1..].iter().find(|b| !b.is_ascii_whitespace());
                    if !matches!(next, Some(b')') | Some(b']') | Some(b'}')) {
                        out.push(',');
                    }
                }
                _ => out.push(char::from(byte)),
            },
        }
    }
    out
}

/// The metadata dictionary of an `.npy` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub type_descriptor: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fortran_order = if self.fortran_order { "True" } else { "False" };
        write!(
            f,
            "{{'descr': '{}', 'fortran_order': {}, 'shape': (",
            self.type_descriptor, fortran_order
        )?;
        for (i, len) in self.shape.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", len)?;
        }
        f.write_str(",), } ")
    }
}

impl Header {
    fn from_json_value(value: JsonValue) -> Result<Self, ParseHeaderError> {
        if let JsonValue::Object(dict) = value {
            let mut type_descriptor: Option<String> = None;
            let mut fortran_order: Option<bool> = None;
            let mut shape: Option<Vec<usize>> = None;
            for (key, value) in dict {
                match key.as_str() {
                    "descr" => {
                        if let JsonValue::String(s) = value {
                            type_descriptor = Some(s);
                        } else {
                            return Err(ParseHeaderError::IllegalValue {
                                key: "descr",
                                value,
                            });
                        }
                    }
                    "fortran_order" => {
                        if let JsonValue::Bool(b) = value {
                            fortran_order = Some(b);
                        } else {
                            return Err(ParseHeaderError::IllegalValue {
                                key: "fortran_order",
                                value,
                            });
                        }
                    }
                    "shape" => {
                        fn parse_shape(value: &JsonValue) -> Option<Vec<usize>> {
                            let shape = value
                                .as_array()?
                                .iter()
                                .map(|elem| usize::try_from(elem.as_u64()?).ok())
                                .collect::<Option<Vec<usize>>>()?;
                            // The element count must be representable.
                            shape.iter().try_fold(1usize, |acc, &len| acc.checked_mul(len))?;
                            Some(shape)
                        }
                        if let Some(s) = parse_shape(&value) {
                            shape = Some(s);
                        } else {
                            return Err(ParseHeaderError::IllegalValue {
                                key: "shape",
                                value,
                            });
                        }
                    }
                    other => trace!("ignoring unknown header key {:?}", other),
                }
            }
            match (type_descriptor, fortran_order, shape) {
                (Some(type_descriptor), Some(fortran_order), Some(shape)) => Ok(Header {
                    type_descriptor,
                    fortran_order,
                    shape,
                }),
                (None, _, _) => Err(ParseHeaderError::MissingKey("descr")),
                (_, None, _) => Err(ParseHeaderError::MissingKey("fortran_order")),
                (_, _, None) => Err(ParseHeaderError::MissingKey("shape")),
            }
        } else {
            Err(ParseHeaderError::MetaNotDict(value))
        }
    }

    /// Parses the header text between the preamble and the data.
    fn parse_text(bytes: &[u8]) -> Result<Self, ParseHeaderError> {
        if !bytes.is_ascii() {
            return Err(ParseHeaderError::NonAscii);
        }
        // ASCII strings are always valid UTF-8.
        let text = String::from_utf8_lossy(bytes);
        let normalized = normalize_dict_literal(&text);
        trace!("normalized header: {}", normalized.trim_end());
        let dict: JsonValue = serde_json::from_str(&normalized)?;
        Header::from_json_value(dict)
    }

    /// Parses the preamble and header at the start of `bytes`.
    ///
    /// Returns the header, the format version, and the bytes following the
    /// header region. The stored header length is trusted as is; its
    /// alignment is not checked.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, Version, &[u8]), ReadNpyError> {
        // Check for magic string.
        match bytes.get(..MAGIC_STRING.len()) {
            Some(magic) if magic == MAGIC_STRING => {}
            Some(_) => return Err(ParseHeaderError::MagicString.into()),
            None if MAGIC_STRING.starts_with(bytes) => {
                return Err(TruncatedBufferError::Preamble { len: bytes.len() }.into())
            }
            None => return Err(ParseHeaderError::MagicString.into()),
        }
        let preamble = bytes
            .get(..PREAMBLE_LEN)
            .ok_or(TruncatedBufferError::Preamble { len: bytes.len() })?;

        // Get version number.
        let version = Version {
            major: preamble[MAGIC_STRING.len()],
            minor: preamble[MAGIC_STRING.len() + 1],
        };
        if version != Version::V1_0 {
            warn!(
                "reading .npy format version {} with a version 1.0 header layout",
                version
            );
        }

        // Get `HEADER_LEN`.
        let header_len =
            LittleEndian::read_u16(&preamble[MAGIC_STRING.len() + VERSION_NUM_BYTES..]) as usize;
        let rest = &bytes[PREAMBLE_LEN..];
        if rest.len() < header_len {
            return Err(TruncatedBufferError::HeaderRegion {
                header_len,
                available: rest.len(),
            }
            .into());
        }
        let (text, data) = rest.split_at(header_len);
        let header = Header::parse_text(text)?;
        Ok((header, version, data))
    }

    /// Formats the preamble and the padded header.
    ///
    /// The returned bytes always have a length divisible by 64 and end with a
    /// newline.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WriteNpyError> {
        let arr_format = self.to_string();

        // Pad with spaces so that the data starts on an aligned boundary.
        let unpadded_len = PREAMBLE_LEN + arr_format.len();
        let padding = (HEADER_ALIGN - unpadded_len % HEADER_ALIGN) % HEADER_ALIGN;
        let header_len = arr_format.len() + padding;
        if header_len > u16::MAX as usize {
            return Err(WriteNpyError::HeaderTooLong(header_len));
        }

        let mut out = Vec::with_capacity(PREAMBLE_LEN + header_len);
        out.extend_from_slice(MAGIC_STRING);
        out.push(Version::V1_0.major);
        out.push(Version::V1_0.minor);
        let mut len_bytes = [0; HEADER_LEN_NUM_BYTES];
        LittleEndian::write_u16(&mut len_bytes, header_len as u16);
        out.extend_from_slice(&len_bytes);
        out.extend_from_slice(arr_format.as_bytes());
        out.resize(PREAMBLE_LEN + header_len, b' ');
        // The final byte is a newline even if it lands on the template's
        // trailing space.
        if let Some(last) = out.last_mut() {
            *last = b'\n';
        }

        debug_assert_eq!(out.len() % HEADER_ALIGN, 0);
        Ok(out)
    }
}
