use thiserror::Error;

/// Failures talking to the push gateway.
///
/// These are captured inside a `DispatchOutcome` rather than propagated: a
/// failed batch must not take down the dispatch call that produced it, and
/// there is no automatic retry. Resend endpoints exist for exactly that.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("push gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("push gateway rejected batch: status={status}, body={body}")]
    Rejected { status: u16, body: String },
}

impl GatewayError {
    /// Status code of a rejection, if the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Transport(_) => None,
            GatewayError::Rejected { status, .. } => Some(*status),
        }
    }
}
