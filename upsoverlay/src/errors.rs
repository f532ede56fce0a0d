use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Overlay is already initialized")]
    AlreadyInitialized,

    #[error("DOM error: {0}")]
    Dom(#[from] upsdom::DomError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] upsgateway::GatewayError),
}
