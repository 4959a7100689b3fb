//! Bundle container format.
//!
//! A bundle is a single file: magic + format version, a JSON manifest
//! section, lz4-compressed asset entries, and a trailing SHA3-256 digest
//! over everything before it.

use crate::bundle::manifest::BundleManifest;
use crate::core::{Digest256, Error, Result};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Magic bytes identifying a bundle container.
pub const MAGIC: &[u8; 6] = b"GBNDL1";

/// Container format version written by this crate.
pub const FORMAT_VERSION: u16 = 1;

/// Builder that authors bundle files.
///
/// Used by host-side packaging tooling; asset payloads are lz4-compressed
/// individually so a reader can decode them independently.
pub struct BundleWriter {
    manifest: BundleManifest,
    assets: Vec<(String, Vec<u8>)>,
}

impl BundleWriter {
    /// Create a writer for the given manifest.
    pub fn new(manifest: BundleManifest) -> Self {
        Self {
            manifest,
            assets: Vec::new(),
        }
    }

    /// Add a packaged asset.
    pub fn with_asset(mut self, name: &str, data: &[u8]) -> Self {
        self.assets.push((name.to_string(), data.to_vec()));
        self
    }

    /// Serialize the container to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.manifest.validate()?;
        let manifest_json = self.manifest.to_json()?.into_bytes();

        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(manifest_json.len() as u32).to_le_bytes());
        out.extend_from_slice(&manifest_json);

        out.extend_from_slice(&(self.assets.len() as u32).to_le_bytes());
        for (name, data) in &self.assets {
            let name_bytes = name.as_bytes();
            let blob = compress_prepend_size(data);
            out.extend_from_slice(&(name_bytes.len() as u16).to_le_bytes());
            out.extend_from_slice(name_bytes);
            out.extend_from_slice(&(blob.len() as u32).to_le_bytes());
            out.extend_from_slice(&blob);
        }

        let digest = Digest256::of(&out);
        out.extend_from_slice(digest.as_bytes());
        Ok(out)
    }

    /// Write the container to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

/// A fully read, digest-verified bundle container.
pub struct BundleArchive {
    manifest: BundleManifest,
    assets: HashMap<String, Vec<u8>>,
    digest: Digest256,
}

impl BundleArchive {
    /// Read and verify a bundle file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = read_bundle_bytes(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Parse and verify a container from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = SectionReader::new(bytes);
        let manifest = read_header(&mut reader)?;

        // Trailing digest covers everything before it.
        if bytes.len() < 32 {
            return Err(Error::BundleInvalid("truncated container".to_string()));
        }
        let body = &bytes[..bytes.len() - 32];
        let mut recorded = [0u8; 32];
        recorded.copy_from_slice(&bytes[bytes.len() - 32..]);
        let recorded = Digest256::new(recorded);
        let computed = Digest256::of(body);
        if recorded != computed {
            return Err(Error::DigestMismatch {
                recorded: recorded.to_hex(),
                computed: computed.to_hex(),
            });
        }

        let asset_count = reader.u32()? as usize;
        let mut assets = HashMap::with_capacity(asset_count);
        for _ in 0..asset_count {
            let name_len = reader.u16()? as usize;
            let name = String::from_utf8(reader.take(name_len)?.to_vec())
                .map_err(|e| Error::BundleInvalid(format!("asset name not UTF-8: {}", e)))?;
            let blob_len = reader.u32()? as usize;
            let blob = reader.take(blob_len)?;
            let data = decompress_size_prepended(blob)
                .map_err(|e| Error::AssetDecodeFailed(format!("{}: {}", name, e)))?;
            assets.insert(name, data);
        }

        Ok(Self {
            manifest,
            assets,
            digest: recorded,
        })
    }

    /// The packaged manifest.
    pub fn manifest(&self) -> &BundleManifest {
        &self.manifest
    }

    /// Look up a packaged asset by name.
    pub fn asset(&self, name: &str) -> Option<&[u8]> {
        self.assets.get(name).map(|v| v.as_slice())
    }

    /// Names of all packaged assets.
    pub fn asset_names(&self) -> Vec<&str> {
        self.assets.keys().map(|k| k.as_str()).collect()
    }

    /// The verified content digest.
    pub fn digest(&self) -> &Digest256 {
        &self.digest
    }

    /// Consume the archive, yielding its decompressed assets.
    pub fn into_assets(self) -> HashMap<String, Vec<u8>> {
        self.assets
    }
}

/// Read only the container header and manifest.
///
/// Used by the inspector: no asset decoding, no digest verification, no
/// code loading.
pub(crate) fn read_manifest(path: &Path) -> Result<BundleManifest> {
    let bytes = read_bundle_bytes(path)?;
    let mut reader = SectionReader::new(&bytes);
    read_header(&mut reader)
}

fn read_bundle_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::BundleNotFound(path.display().to_string()),
        _ => Error::Io(e),
    })
}

fn read_header(reader: &mut SectionReader<'_>) -> Result<BundleManifest> {
    let magic = reader.take(MAGIC.len())?;
    if magic != MAGIC {
        return Err(Error::BundleInvalid("bad magic bytes".to_string()));
    }
    let version = reader.u16()?;
    if version != FORMAT_VERSION {
        return Err(Error::UnsupportedFormatVersion(version));
    }
    let manifest_len = reader.u32()? as usize;
    let manifest_bytes = reader.take(manifest_len)?;
    let manifest: BundleManifest = serde_json::from_slice(manifest_bytes)
        .map_err(|e| Error::BundleInvalid(format!("malformed manifest: {}", e)))?;
    Ok(manifest)
}

/// Bounds-checked cursor over the container bytes.
struct SectionReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SectionReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(Error::BundleInvalid("truncated container".to_string()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
