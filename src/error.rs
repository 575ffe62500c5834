use crate::logging::CAUSE;
use core::fmt::Display;

#[derive(Clone)]
pub struct Msg<'kind, 'message> {
    pub kind: &'kind dyn Display,
    pub message: &'message dyn Display,
}

impl Display for Msg<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return write!(f, "{kind}: {message}", kind = self.kind, message = self.message);
    }
}

#[derive(Clone)]
pub struct MsgWithCause<'kind, 'message, 'cause> {
    pub kind: &'kind dyn Display,
    pub message: &'message dyn Display,
    pub cause: &'cause dyn Display,
}

impl Display for MsgWithCause<'_, '_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        return write!(
            f,
            "{kind}: {message}\
            \n{CAUSE}: {cause}",
            kind = self.kind,
            message = self.message,
            cause = self.cause,
        );
    }
}
