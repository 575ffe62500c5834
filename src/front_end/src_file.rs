use crate::{error::MsgWithCause, logging::ERROR};
use core::fmt::Display;
use std::{fs::File, io::Read as _, path::Path};

#[derive(Debug)]
pub struct SrcFile<'path> {
    pub(crate) path: &'path Path,
    pub(crate) code: String,
}

impl<'path> SrcFile<'path> {
    pub fn load(path: &'path Path) -> Result<Self, Error<'path>> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) => return Err(Error { path, kind: ErrorKind::Io(err) }),
        };

        let file_metadata = match file.metadata() {
            Ok(file_metadata) => file_metadata,
            Err(err) => return Err(Error { path, kind: ErrorKind::Io(err) }),
        };

        if !file_metadata.is_file() {
            return Err(Error { path, kind: ErrorKind::MustBeAFilePath });
        }

        let mut code = String::new();
        let bytes_read = match file.read_to_string(&mut code) {
            Ok(bytes_read) => bytes_read as u64,
            Err(err) => return Err(Error { path, kind: ErrorKind::Io(err) }),
        };

        if bytes_read != file_metadata.len() {
            return Err(Error { path, kind: ErrorKind::CouldNotReadEntireFile });
        }

        return Ok(Self { path, code });
    }

    #[must_use]
    #[inline(always)]
    pub const fn path(&self) -> &'path Path {
        return self.path;
    }

    #[must_use]
    #[inline(always)]
    pub fn code(&self) -> &str {
        return &self.code;
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    Io(std::io::Error),
    MustBeAFilePath,
    CouldNotReadEntireFile,
}

#[derive(Debug)]
pub struct Error<'path> {
    pub path: &'path Path,
    pub kind: ErrorKind,
}

impl Display for Error<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let message = format!("could not read '{}'", self.path.display());
        let cause = match &self.kind {
            ErrorKind::Io(err) => format!("{err} ({})", err.kind()),
            ErrorKind::MustBeAFilePath => "must be a file path".to_owned(),
            ErrorKind::CouldNotReadEntireFile => "failed to read the entire file".to_owned(),
        };

        let error = MsgWithCause { kind: &ERROR, message: &message, cause: &cause };
        return write!(f, "{error}");
    }
}

impl std::error::Error for Error<'_> {}
