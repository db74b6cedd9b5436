//! Content-Size Estimator
//!
//! Estimates how large attachments become once their transfer encoding is
//! applied. Counts come from a single scan of the content:
//!
//! | class   | bytes                                         |
//! |---------|-----------------------------------------------|
//! | `crlf`  | `\r\n` or a lone `\n` (one per line ending)   |
//! | `hibin` | `0x80..=0xff`                                 |
//! | `lobin` | other control bytes except tab, and `0x7f`    |
//! | `ascii` | everything else                               |

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Byte-class counts of some content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentInfo {
    pub lobin: u64,
    pub hibin: u64,
    pub ascii: u64,
    pub crlf: u64,
}

impl ContentInfo {
    pub fn scan(bytes: &[u8]) -> Self {
        let mut info = Self::default();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    info.crlf += 1;
                    i += 1;
                }
                b'\n' => info.crlf += 1,
                b'\t' => info.ascii += 1,
                0x80..=0xff => info.hibin += 1,
                0x00..=0x1f | 0x7f => info.lobin += 1,
                _ => info.ascii += 1,
            }
            i += 1;
        }
        info
    }

    pub fn is_text(&self) -> bool {
        self.lobin == 0
    }

    /// Size once encoded with `encoding`.
    pub fn encoded_size(&self, encoding: Encoding) -> u64 {
        let Self {
            lobin,
            hibin,
            ascii,
            crlf,
        } = *self;
        match encoding {
            Encoding::QuotedPrintable => 3 * (lobin + hibin) + ascii + crlf,
            Encoding::Base64 => (4 * (lobin + hibin + ascii + crlf)) / 3,
            Encoding::SevenBit | Encoding::EightBit | Encoding::Binary => {
                lobin + hibin + ascii + crlf
            }
        }
    }
}

/// Content-Transfer-Encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    SevenBit,
    EightBit,
    Binary,
    QuotedPrintable,
    Base64,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::SevenBit => "7bit",
            Encoding::EightBit => "8bit",
            Encoding::Binary => "binary",
            Encoding::QuotedPrintable => "quoted-printable",
            Encoding::Base64 => "base64",
        }
    }

    /// Encoding a mail-safe sender would pick for `info`.
    pub fn choose(info: &ContentInfo) -> Self {
        if !info.is_text() {
            Encoding::Base64
        } else if info.hibin > 0 {
            Encoding::QuotedPrintable
        } else {
            Encoding::SevenBit
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Content-Disposition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    #[default]
    Attachment,
}

impl Disposition {
    pub fn toggled(self) -> Self {
        match self {
            Disposition::Inline => Disposition::Attachment,
            Disposition::Attachment => Disposition::Inline,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub source: AttachmentSource,
    pub content_type: String,
    pub encoding: Encoding,
    pub disposition: Disposition,
    pub description: Option<String>,
    /// Cached scan; filled on demand.
    pub content: Option<ContentInfo>,
}

impl Attachment {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(AttachmentSource::File(path.into()))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(AttachmentSource::Memory(bytes.into()))
    }

    fn new(source: AttachmentSource) -> Self {
        Self {
            source,
            content_type: "application/octet-stream".to_string(),
            encoding: Encoding::default(),
            disposition: Disposition::default(),
            description: None,
            content: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name shown in the attachment list.
    pub fn display_name(&self) -> String {
        if let Some(d) = &self.description {
            return d.clone();
        }
        match &self.source {
            AttachmentSource::File(path) => path.display().to_string(),
            AttachmentSource::Memory(_) => "(memory)".to_string(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            AttachmentSource::File(path) => Some(path),
            AttachmentSource::Memory(_) => None,
        }
    }

    /// Raw bytes of the attachment.
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            AttachmentSource::File(path) => fs::read(path),
            AttachmentSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }

    /// Scan the content if not done yet and cache the counts. `None` if it
    /// cannot be read. The encoding and content type are left alone.
    pub fn classify(&mut self) -> Option<ContentInfo> {
        if self.content.is_none() {
            self.content = self.scan();
        }
        self.content
    }

    fn scan(&self) -> Option<ContentInfo> {
        match self.read() {
            Ok(bytes) => Some(ContentInfo::scan(&bytes)),
            Err(err) => {
                warn!(name = %self.display_name(), %err, "cannot classify attachment");
                None
            }
        }
    }

    /// Rescan the content and pick the encoding and content type for it.
    /// Returns false, changing nothing, when the content cannot be read.
    pub fn update_encoding(&mut self) -> bool {
        let Some(info) = self.scan() else {
            return false;
        };
        self.encoding = Encoding::choose(&info);
        self.content_type = if info.is_text() {
            "text/plain".to_string()
        } else {
            "application/octet-stream".to_string()
        };
        self.content = Some(info);
        debug!(name = %self.display_name(), encoding = self.encoding.name(), "encoding updated");
        true
    }

    /// Encoded size, classifying on demand; 0 when unknown.
    pub fn encoded_size(&mut self) -> u64 {
        self.classify()
            .map_or(0, |info| info.encoded_size(self.encoding))
    }
}

/// Total size of `attachments` after their transfer encodings are applied.
///
/// Attachments that cannot be read count as 0.
pub fn cum_attachs_size(attachments: &mut [Attachment]) -> u64 {
    let total = attachments.iter_mut().map(Attachment::encoded_size).sum();
    debug!(count = attachments.len(), total, "attachments size");
    total
}

/// Human-readable size: `999`, `1.2K`, `12K`, `1.2M`, `12M`.
pub fn pretty_size(n: u64) -> String {
    if n < 1000 {
        n.to_string()
    } else if n < 10189 {
        format!("{:.1}K", n as f64 / 1024.0)
    } else if n < 1023949 {
        format!("{}K", (n + 51) / 1024)
    } else if n < 10433332 {
        format!("{:.1}M", n as f64 / 1048576.0)
    } else {
        format!("{}M", (n + 52428) / 1048576)
    }
}
