/// A failed request to the catalog service.
pub type NetworkError = giantbomb::Error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("nothing is live right now")]
    NoLiveVideo,
    #[error(transparent)]
    Config(#[from] envy::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
