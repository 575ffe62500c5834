use crate::{error::MsgWithCause, logging::ERROR};
use core::fmt::{Debug, Display};
use std::borrow::Cow;

pub mod artifacts;
pub mod compiler;

pub use compiler::Compiler;

#[derive(Debug)]
pub struct ErrorInfo {
    pub message: Cow<'static, str>,
    pub cause: Cow<'static, str>,
}

pub trait IntoErrorInfo: Debug {
    fn info(&self) -> ErrorInfo;
}

#[derive(Debug)]
pub struct Error<Kind: IntoErrorInfo> {
    pub kind: Kind,
}

impl<Kind: IntoErrorInfo> Display for Error<Kind> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let ErrorInfo { message, cause } = self.kind.info();
        let error = MsgWithCause { kind: &ERROR, message: &message, cause: &cause };
        return write!(f, "{error}");
    }
}

impl<Kind: IntoErrorInfo> std::error::Error for Error<Kind> {}
