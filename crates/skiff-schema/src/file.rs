use crate::digest::Digest;
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content a bundle [`File`] holds, named by its canonical extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "blob")]
    Blob,
    #[serde(rename = "directory")]
    Directory,
    #[serde(rename = "zip")]
    Zip,
    #[serde(rename = "tar")]
    Tar,
    #[serde(rename = "tar.gz")]
    TarGzip,
    #[serde(rename = "tar.bz2")]
    TarBzip2,
    #[serde(rename = "tar.xz")]
    TarLzma,
    #[serde(rename = "tar.Z")]
    TarZlib,
    #[serde(rename = "tar.zst")]
    TarZstd,
}

impl FileType {
    pub const ALL: [FileType; 9] = [
        Self::Blob,
        Self::Directory,
        Self::Zip,
        Self::Tar,
        Self::TarGzip,
        Self::TarBzip2,
        Self::TarLzma,
        Self::TarZlib,
        Self::TarZstd,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Directory => "directory",
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGzip => "tar.gz",
            Self::TarBzip2 => "tar.bz2",
            Self::TarLzma => "tar.xz",
            Self::TarZlib => "tar.Z",
            Self::TarZstd => "tar.zst",
        }
    }

    /// Look up the file type whose extension is exactly `extension`.
    ///
    /// Matching is case-sensitive: `tar.Z` and `tar.z` are different strings
    /// and only the former is known.
    pub fn for_extension(extension: &str) -> Result<Self, SchemaError> {
        match extension {
            "blob" => Ok(Self::Blob),
            "directory" => Ok(Self::Directory),
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            "tar.gz" => Ok(Self::TarGzip),
            "tar.bz2" => Ok(Self::TarBzip2),
            "tar.xz" => Ok(Self::TarLzma),
            "tar.Z" => Ok(Self::TarZlib),
            "tar.zst" => Ok(Self::TarZstd),
            other => Err(SchemaError::UnknownExtension(other.to_owned())),
        }
    }

    pub fn is_archive(self) -> bool {
        !matches!(self, Self::Blob | Self::Directory)
    }

    /// Guess the archive type of a file from the suffix of its name.
    ///
    /// The longest matching suffix wins, so `python.tar.gz` is a `TarGzip`
    /// rather than a plain `Tar`. Returns `None` when no archive extension
    /// matches.
    pub fn infer(file_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|ty| ty.is_archive())
            .filter(|ty| {
                file_name
                    .strip_suffix(ty.extension())
                    .is_some_and(|stem| stem.ends_with('.'))
            })
            .max_by_key(|ty| ty.extension().len())
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_extension(s)
    }
}

/// Where the bytes of a [`File`] come from when the bundle is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Produced at runtime by running the named binding command.
    Binding(String),
    /// Downloaded from a URL by the fetcher.
    Fetch,
}

/// A named artifact placed in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct File {
    pub name: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub digest: Option<Digest>,
    #[serde(default, rename = "type")]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub is_executable: bool,
    #[serde(default)]
    pub eager_extract: bool,
    #[serde(default)]
    pub source: Option<Source>,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            digest: None,
            file_type: None,
            is_executable: false,
            eager_extract: false,
            source: None,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digest = Some(digest);
        self
    }

    #[must_use]
    pub fn with_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn executable(mut self) -> Self {
        self.is_executable = true;
        self
    }

    #[must_use]
    pub fn eager_extract(mut self) -> Self {
        self.eager_extract = true;
        self
    }

    /// The key this file is addressed by: `key` when present, else `name`.
    pub fn id(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// The `{id}` token the bundler replaces with this file's on-disk location.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_extension_matches_every_member() {
        for ty in FileType::ALL {
            assert_eq!(FileType::for_extension(ty.extension()).unwrap(), ty);
        }
        assert_eq!(FileType::for_extension("tar.gz").unwrap(), FileType::TarGzip);
    }

    #[test]
    fn extensions_are_unique() {
        let mut exts: Vec<&str> = FileType::ALL.iter().map(|t| t.extension()).collect();
        exts.sort_unstable();
        exts.dedup();
        assert_eq!(exts.len(), FileType::ALL.len());
    }

    #[test]
    fn unknown_extension_fails() {
        let err = FileType::for_extension("rar").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownExtension(ref e) if e == "rar"));
        assert!(FileType::for_extension("tar.z").is_err());
        assert!("TAR".parse::<FileType>().is_err());
    }

    #[test]
    fn infer_prefers_longest_suffix() {
        assert_eq!(FileType::infer("cpython-3.12.tar.gz"), Some(FileType::TarGzip));
        assert_eq!(FileType::infer("node.tar"), Some(FileType::Tar));
        assert_eq!(FileType::infer("jdk.zip"), Some(FileType::Zip));
        assert_eq!(FileType::infer("old.tar.Z"), Some(FileType::TarZlib));
        assert_eq!(FileType::infer("script.py"), None);
        assert_eq!(FileType::infer("tar.gz"), None);
    }

    #[test]
    fn file_type_serde_uses_extension() {
        let json = serde_json::to_string(&FileType::TarZstd).unwrap();
        assert_eq!(json, "\"tar.zst\"");
        let back: FileType = serde_json::from_str("\"tar.xz\"").unwrap();
        assert_eq!(back, FileType::TarLzma);
    }

    #[test]
    fn id_prefers_key_over_name() {
        let plain = File::new("python.tar.gz");
        assert_eq!(plain.id(), "python.tar.gz");
        assert_eq!(plain.placeholder(), "{python.tar.gz}");

        let keyed = File::new("python.tar.gz").with_key("cpython");
        assert_eq!(keyed.id(), "cpython");
        assert_eq!(keyed.placeholder(), "{cpython}");
    }

    #[test]
    fn builder_sets_flags() {
        let file = File::new("app.pex")
            .with_type(FileType::Blob)
            .with_digest(Digest::new(10, "ab"))
            .with_source(Source::Fetch)
            .executable()
            .eager_extract();
        assert!(file.is_executable);
        assert!(file.eager_extract);
        assert_eq!(file.source, Some(Source::Fetch));
        assert_eq!(file.file_type, Some(FileType::Blob));
    }

    #[test]
    fn file_deserializes_with_defaults() {
        let file: File = serde_json::from_str(
            r#"{"name": "cowsay.jar", "source": {"binding": "fetch-jar"}}"#,
        )
        .unwrap();
        assert_eq!(file.source, Some(Source::Binding("fetch-jar".to_owned())));
        assert!(!file.is_executable);
        assert!(file.key.is_none());
    }
}
