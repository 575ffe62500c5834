use crate::{error::MsgWithCause, logging::ERROR};
use core::fmt::Display;
use std::{
    path::{Path, PathBuf},
    process::Command,
};

const ASM_EXTENSION: &str = "asm";
const OBJ_EXTENSION: &str = "o";
const EXE_EXTENSION: &str = "";

/// paths of the compilation artifacts derived from the source file path, and
/// the external commands that produce them
#[derive(Debug)]
pub struct Artifacts {
    pub asm_path: PathBuf,
    pub obj_path: PathBuf,
    pub exe_path: PathBuf,
}

impl Artifacts {
    pub fn new(src_path: &Path, out_path: Option<&Path>) -> Result<Self, Error> {
        if src_path.is_dir() {
            return Err(Error::MustBeAFilePath(src_path.to_owned()));
        }

        let src_path_stem = match src_path.file_stem() {
            Some(path_name) => Path::new(path_name),
            None => return Err(Error::SrcPathCannotBeEmpty),
        };

        let Some(out_path) = out_path else {
            return Ok(Self {
                asm_path: src_path_stem.with_extension(ASM_EXTENSION),
                obj_path: src_path_stem.with_extension(OBJ_EXTENSION),
                exe_path: src_path_stem.with_extension(EXE_EXTENSION),
            });
        };

        if out_path.is_file() {
            return Err(Error::MustBeADirectoryPath(out_path.to_owned()));
        }

        if let Err(err) = std::fs::create_dir_all(out_path) {
            if err.kind() != std::io::ErrorKind::AlreadyExists {
                return Err(Error::CouldNotCreateOutputDirectory {
                    path: out_path.to_owned(),
                    err,
                });
            }
        }

        return Ok(Self {
            asm_path: out_path.join(src_path_stem.with_extension(ASM_EXTENSION)),
            obj_path: out_path.join(src_path_stem.with_extension(OBJ_EXTENSION)),
            exe_path: out_path.join(src_path_stem.with_extension(EXE_EXTENSION)),
        });
    }

    #[must_use]
    pub fn assembler(&self) -> Command {
        let mut assembler_command = Command::new("nasm");
        _ = assembler_command
            .arg("-felf64")
            .arg(self.asm_path.as_os_str())
            .arg("-o")
            .arg(self.obj_path.as_os_str());
        return assembler_command;
    }

    #[must_use]
    pub fn linker(&self) -> Command {
        let mut linker_command = Command::new("ld");
        _ = linker_command
            .arg(self.obj_path.as_os_str())
            .arg("-o")
            .arg(self.exe_path.as_os_str());
        return linker_command;
    }
}

#[derive(Debug)]
pub enum Error {
    MustBeAFilePath(PathBuf),
    SrcPathCannotBeEmpty,

    MustBeADirectoryPath(PathBuf),
    CouldNotCreateOutputDirectory { path: PathBuf, err: std::io::Error },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (message, cause) = match self {
            Self::MustBeAFilePath(path) => (
                format!("invalid '{}' path", path.display()),
                "must be a file path".to_owned(),
            ),
            Self::SrcPathCannotBeEmpty => {
                ("invalid src path".to_owned(), "cannot be empty".to_owned())
            }
            Self::MustBeADirectoryPath(path) => (
                format!("invalid '{}' path", path.display()),
                "must be a directory path".to_owned(),
            ),
            Self::CouldNotCreateOutputDirectory { path, err } => (
                format!("could not create output directory '{}'", path.display()),
                format!("{err} ({})", err.kind()),
            ),
        };

        let error = MsgWithCause { kind: &ERROR, message: &message, cause: &cause };
        return write!(f, "{error}");
    }
}

impl std::error::Error for Error {}
